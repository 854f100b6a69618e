//! Driving port for recording game attempts.

use async_trait::async_trait;

use crate::domain::{AttemptReceipt, Difference, Error, UserId};

/// Outcome of recording one attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    /// The attempt was stored and the player updated.
    Recorded(AttemptReceipt),
    /// The player has no attempts left; nothing was stored.
    Exhausted,
    /// No player has this id.
    UserNotFound,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AttemptLedger: Send + Sync {
    /// Consume one attempt for `user_id` and fold `difference` into the
    /// player's best result.
    async fn record_attempt(
        &self,
        user_id: &UserId,
        difference: Difference,
    ) -> Result<AttemptOutcome, Error>;
}
