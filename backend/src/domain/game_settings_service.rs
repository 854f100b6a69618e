//! Read-only game settings service.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{GameSettingsQuery, GameSettingsRepository, GameSettingsRepositoryError};
use crate::domain::{Error, GameSettings};

/// Exposes stored settings through [`GameSettingsQuery`].
#[derive(Clone)]
pub struct GameSettingsService<S> {
    settings: Arc<S>,
}

impl<S> GameSettingsService<S> {
    pub fn new(settings: Arc<S>) -> Self {
        Self { settings }
    }
}

fn map_settings_error(error: GameSettingsRepositoryError) -> Error {
    match error {
        GameSettingsRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("game settings unavailable: {message}"))
        }
        GameSettingsRepositoryError::Query { message }
        | GameSettingsRepositoryError::Malformed { message } => {
            Error::internal(format!("game settings error: {message}"))
        }
    }
}

#[async_trait]
impl<S> GameSettingsQuery for GameSettingsService<S>
where
    S: GameSettingsRepository,
{
    async fn current_settings(&self) -> Result<GameSettings, Error> {
        self.settings.load().await.map_err(map_settings_error)
    }
}
