//! Driving port for player identity use-cases.
//!
//! Inbound adapters call this port to resolve a phone number to a player
//! (the game's "login") or to register a new one.

use async_trait::async_trait;

use crate::domain::{Error, PhoneNumber, PlayerName, User};

/// Outcome of looking a phone number up.
#[derive(Debug, Clone, PartialEq)]
pub enum LookupOutcome {
    /// A player owns this phone.
    Found(User),
    /// No player yet; the caller should collect a name and register.
    RegistrationRequired,
}

/// Outcome of a registration attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum RegistrationOutcome {
    /// A new player was created.
    Registered(User),
    /// The phone is already registered; retry as a lookup.
    Conflict,
}

/// Domain use-case port for player lookup and registration.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PlayerDirectory: Send + Sync {
    /// Read-only lookup; a missing player is `Ok(None)`.
    async fn find_by_phone(&self, phone: &PhoneNumber) -> Result<Option<User>, Error>;

    /// Resolve a phone to a player without creating anything.
    async fn lookup(&self, phone: &PhoneNumber) -> Result<LookupOutcome, Error>;

    /// Create a player for `phone` with the configured attempt budget.
    async fn register(
        &self,
        name: &PlayerName,
        phone: &PhoneNumber,
    ) -> Result<RegistrationOutcome, Error>;
}
