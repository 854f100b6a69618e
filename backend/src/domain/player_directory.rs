//! Player directory service implementing lookup and registration.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::info;

use crate::domain::ports::{
    LookupOutcome, PlayerDirectory, PlayerRepository, PlayerRepositoryError, RegistrationOutcome,
};
use crate::domain::{Error, PhoneNumber, PlayerName, User};

/// Player directory backed by a [`PlayerRepository`].
#[derive(Clone)]
pub struct PlayerDirectoryService<R> {
    players: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> PlayerDirectoryService<R> {
    pub fn new(players: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { players, clock }
    }
}

pub(crate) fn map_player_repository_error(error: PlayerRepositoryError) -> Error {
    match error {
        PlayerRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("player store unavailable: {message}"))
        }
        PlayerRepositoryError::Query { message } => {
            Error::internal(format!("player store error: {message}"))
        }
    }
}

#[async_trait]
impl<R> PlayerDirectory for PlayerDirectoryService<R>
where
    R: PlayerRepository,
{
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, Error> {
        self.players
            .find_by_phone(phone)
            .await
            .map_err(map_player_repository_error)
    }

    async fn lookup(&self, phone: &PhoneNumber) -> Result<LookupOutcome, Error> {
        Ok(match self.find_by_phone(phone).await? {
            Some(user) => LookupOutcome::Found(user),
            None => LookupOutcome::RegistrationRequired,
        })
    }

    async fn register(
        &self,
        name: &PlayerName,
        phone: &PhoneNumber,
    ) -> Result<RegistrationOutcome, Error> {
        let inserted = self
            .players
            .insert_if_absent(name, phone, self.clock.utc())
            .await
            .map_err(map_player_repository_error)?;

        Ok(match inserted {
            Some(user) => {
                info!(
                    user_id = %user.id(),
                    attempts_left = user.attempts_left(),
                    "player registered"
                );
                RegistrationOutcome::Registered(user)
            }
            None => RegistrationOutcome::Conflict,
        })
    }
}

#[cfg(test)]
#[path = "player_directory_tests.rs"]
mod tests;
