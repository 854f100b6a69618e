//! Port for player persistence.
//!
//! Registration and attempt recording are single atomic operations here
//! rather than read/modify/write sequences driven by the service: adapters
//! must read the game settings, evaluate the [`User`] policies and commit
//! inside one transaction so concurrent requests cannot lose updates.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{
    AttemptReceipt, AttemptRejection, Difference, PhoneNumber, PlayerName, User, UserId,
};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by player repository adapters.
    pub enum PlayerRepositoryError {
        /// Store unreachable, timed out or aborted the transaction; retryable.
        Connection { message: String } => "player repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "player repository query failed: {message}",
    }
}

/// Result of an atomic attempt write.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptWrite {
    /// The attempt row and updated player were committed.
    Committed(AttemptReceipt),
    /// The player policy refused the attempt; nothing was written.
    Rejected(AttemptRejection),
    /// No player has this id.
    UserNotFound,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerRepository: Send + Sync {
    /// Fetch a player by normalised phone number.
    async fn find_by_phone(&self, phone: &PhoneNumber)
    -> Result<Option<User>, PlayerRepositoryError>;

    /// Insert a new player unless the phone is already registered.
    ///
    /// The attempt budget comes from the game settings read in the same
    /// transaction. Returns `None` when another player owns the phone,
    /// including when a concurrent registration won the race.
    async fn insert_if_absent(
        &self,
        name: &PlayerName,
        phone: &PhoneNumber,
        registered_at: DateTime<Utc>,
    ) -> Result<Option<User>, PlayerRepositoryError>;

    /// Lock the player, apply [`User::apply_attempt`] against freshly read
    /// discount ranges, append the attempt and commit.
    async fn record_attempt(
        &self,
        user_id: &UserId,
        difference: Difference,
        recorded_at: DateTime<Utc>,
    ) -> Result<AttemptWrite, PlayerRepositoryError>;
}
