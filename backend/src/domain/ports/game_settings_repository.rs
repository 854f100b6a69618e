//! Port for reading the operator-owned game settings row.

use async_trait::async_trait;

use crate::domain::GameSettings;

use super::define_port_error;

define_port_error! {
    /// Errors raised while loading game settings.
    pub enum GameSettingsRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } => "game settings connection failed: {message}",
        /// Query failed or the settings row is missing.
        Query { message: String } => "game settings query failed: {message}",
        /// The stored discount ranges cannot be decoded.
        Malformed { message: String } => "game settings are malformed: {message}",
    }
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GameSettingsRepository: Send + Sync {
    /// Read the current settings; never cached.
    async fn load(&self) -> Result<GameSettings, GameSettingsRepositoryError>;
}
