//! Attempt ledger service.
//!
//! The repository performs the locked read/evaluate/write; this service maps
//! its result onto the driving-port outcome and turns a discount
//! configuration gap into an operator-visible failure.

use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use serde_json::json;
use tracing::{debug, error};

use crate::domain::player_directory::map_player_repository_error;
use crate::domain::ports::{AttemptLedger, AttemptOutcome, AttemptWrite, PlayerRepository};
use crate::domain::{AttemptRejection, Difference, Error, NoMatchingRange, UserId};

/// Detail code attached when no discount range covers a result.
pub const NO_MATCHING_RANGE_CODE: &str = "no_matching_range";

/// Attempt ledger backed by a [`PlayerRepository`].
#[derive(Clone)]
pub struct AttemptLedgerService<R> {
    players: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> AttemptLedgerService<R> {
    pub fn new(players: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { players, clock }
    }
}

fn configuration_gap(user_id: &UserId, gap: NoMatchingRange) -> Error {
    error!(
        %user_id,
        difference = gap.difference,
        "discount ranges do not cover result; attempt rolled back"
    );
    Error::service_unavailable("discount configuration does not cover this result")
        .with_details(json!({ "code": NO_MATCHING_RANGE_CODE }))
}

#[async_trait]
impl<R> AttemptLedger for AttemptLedgerService<R>
where
    R: PlayerRepository,
{
    async fn record_attempt(
        &self,
        user_id: &UserId,
        difference: Difference,
    ) -> Result<AttemptOutcome, Error> {
        let write = self
            .players
            .record_attempt(user_id, difference, self.clock.utc())
            .await
            .map_err(map_player_repository_error)?;

        match write {
            AttemptWrite::Committed(receipt) => {
                debug!(
                    %user_id,
                    attempt_id = %receipt.attempt_id,
                    attempts_left = receipt.attempts_left,
                    "attempt recorded"
                );
                Ok(AttemptOutcome::Recorded(receipt))
            }
            AttemptWrite::Rejected(AttemptRejection::Exhausted) => Ok(AttemptOutcome::Exhausted),
            AttemptWrite::Rejected(AttemptRejection::NoMatchingRange(gap)) => {
                Err(configuration_gap(user_id, gap))
            }
            AttemptWrite::UserNotFound => Ok(AttemptOutcome::UserNotFound),
        }
    }
}
