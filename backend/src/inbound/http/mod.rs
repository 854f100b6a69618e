//! HTTP inbound adapter exposing the game endpoints.

pub mod admin;
pub mod attempts;
pub mod error;
pub mod game_settings;
pub mod health;
pub mod players;
pub mod schemas;
pub mod state;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::ApiResult;
