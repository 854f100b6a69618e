//! Driving port exposing the current game settings to clients.

use async_trait::async_trait;

use crate::domain::{Error, GameSettings};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameSettingsQuery: Send + Sync {
    /// Fetch the settings as currently stored.
    async fn current_settings(&self) -> Result<GameSettings, Error>;
}
