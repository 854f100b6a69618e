//! Recorded game attempts.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::game_settings::DiscountPercent;
use super::player::{Difference, User, UserId};

/// Identifier of a recorded attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttemptId(Uuid);

impl AttemptId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for AttemptId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Append-only attempt row.
#[derive(Debug, Clone, PartialEq)]
pub struct Attempt {
    pub id: AttemptId,
    pub user_id: UserId,
    pub difference: Difference,
    pub created_at: DateTime<Utc>,
}

impl Attempt {
    pub fn new(user_id: UserId, difference: Difference, created_at: DateTime<Utc>) -> Self {
        Self {
            id: AttemptId::random(),
            user_id,
            difference,
            created_at,
        }
    }
}

/// Player state after an attempt was committed.
#[derive(Debug, Clone, PartialEq)]
pub struct AttemptReceipt {
    pub attempt_id: AttemptId,
    pub attempts_left: u32,
    pub best_result: Option<Difference>,
    pub discount: DiscountPercent,
}

impl AttemptReceipt {
    /// Summarise the committed player state for `attempt`.
    pub fn new(attempt: &Attempt, user: &User) -> Self {
        Self {
            attempt_id: attempt.id,
            attempts_left: user.attempts_left(),
            best_result: user.best_result(),
            discount: user.discount(),
        }
    }
}
