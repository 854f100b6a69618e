//! Test utilities for the backend crate.
//!
//! Shared by unit tests (in `src/`) and integration tests (in `tests/`).
//! Compiled for tests and when the `test-support` feature is enabled.

use std::sync::Mutex;
use std::time::Duration;

use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::Clock;

use crate::domain::{AdminId, DiscountRangeError, PasswordDigestError};
use crate::outbound::memory::{InMemoryGameStore, launch_settings};

/// Clock whose time only moves when a test advances it.
#[derive(Debug)]
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}",)
            }
        };
        *self.lock_clock() += delta;
    }

    pub fn advance_seconds(&self, seconds: i64) {
        *self.lock_clock() += TimeDelta::seconds(seconds);
    }

    fn lock_clock(&self) -> std::sync::MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// Failures while seeding a test store.
#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error(transparent)]
    Settings(#[from] DiscountRangeError),
    #[error(transparent)]
    Password(#[from] PasswordDigestError),
}

/// In-memory store with the launch settings and one admin account.
pub async fn seeded_store(
    admin_id: AdminId,
    admin_password: &str,
) -> Result<InMemoryGameStore, SeedError> {
    let store = InMemoryGameStore::new(launch_settings()?);
    store.insert_admin(admin_id, admin_password).await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn clock_moves_only_when_advanced() {
        let start = Utc::now();
        let clock = MutableClock::new(start);
        assert_eq!(clock.utc(), start);

        clock.advance(Duration::from_secs(90));
        clock.advance_seconds(30);

        assert_eq!(clock.utc(), start + TimeDelta::minutes(2));
    }
}
