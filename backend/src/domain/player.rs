//! Player identity and game state.
//!
//! A [`User`] is created once per normalised phone number and then mutated
//! only by recorded attempts. The policy methods here are pure so storage
//! adapters can run them inside their own transactions.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use super::game_settings::{DiscountPercent, DiscountRanges, NoMatchingRange};
use super::phone::PhoneNumber;

/// Maximum characters in a player name.
pub const PLAYER_NAME_MAX: usize = 64;

/// Validation errors for player-supplied values.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlayerValidationError {
    #[error("user id must be a valid UUID")]
    InvalidId,
    #[error("name must not be empty")]
    EmptyName,
    #[error("name must be at most {max} characters")]
    NameTooLong { max: usize },
    #[error("difference must be a finite number")]
    NonFiniteDifference,
    #[error("difference must not be negative")]
    NegativeDifference,
    #[error("difference must be a whole number")]
    FractionalDifference,
    #[error("difference must be at most {max}")]
    DifferenceTooLarge { max: u32 },
}

/// Stable player identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Parse a textual UUID.
    pub fn new(id: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        Uuid::parse_str(id.as_ref())
            .map(Self)
            .map_err(|_| PlayerValidationError::InvalidId)
    }

    /// Generate a new random identifier.
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

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Display name chosen at registration.
///
/// ## Invariants
/// - Trimmed, non-empty, at most [`PLAYER_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PlayerName(String);

impl PlayerName {
    pub fn new(name: impl AsRef<str>) -> Result<Self, PlayerValidationError> {
        let trimmed = name.as_ref().trim();
        if trimmed.is_empty() {
            return Err(PlayerValidationError::EmptyName);
        }
        if trimmed.chars().count() > PLAYER_NAME_MAX {
            return Err(PlayerValidationError::NameTooLong {
                max: PLAYER_NAME_MAX,
            });
        }
        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PlayerName {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl From<PlayerName> for String {
    fn from(value: PlayerName) -> Self {
        value.0
    }
}

impl TryFrom<String> for PlayerName {
    type Error = PlayerValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

/// Whole-number distance between a guess and the target. Lower is better.
///
/// Results are counted in whole units, so contiguous integer tiers such as
/// `[0, 10]` and `[11, ∞)` cover every possible value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "u32")]
pub struct Difference(u32);

impl Difference {
    /// Validate a reported difference.
    ///
    /// JSON numbers arrive as `f64`; any value with a fractional part is
    /// rejected rather than rounded.
    ///
    /// # Examples
    /// ```
    /// use promo_backend::domain::Difference;
    ///
    /// assert_eq!(Difference::new(12.0).map(Difference::value), Ok(12));
    /// assert!(Difference::new(2.5).is_err());
    /// assert!(Difference::new(-1.0).is_err());
    /// assert!(Difference::new(f64::NAN).is_err());
    /// ```
    pub fn new(value: f64) -> Result<Self, PlayerValidationError> {
        if !value.is_finite() {
            return Err(PlayerValidationError::NonFiniteDifference);
        }
        if value < 0.0 {
            return Err(PlayerValidationError::NegativeDifference);
        }
        if value.fract() != 0.0 {
            return Err(PlayerValidationError::FractionalDifference);
        }
        if value > f64::from(u32::MAX) {
            return Err(PlayerValidationError::DifferenceTooLarge { max: u32::MAX });
        }
        // Whole, non-negative and within u32 range: the cast is exact.
        Ok(Self(value as u32))
    }

    pub fn value(self) -> u32 {
        self.0
    }

    /// The value handed to the tier resolver.
    pub fn as_f64(self) -> f64 {
        f64::from(self.0)
    }

    fn beats(self, other: Self) -> bool {
        self.0 < other.0
    }
}

impl From<u32> for Difference {
    fn from(value: u32) -> Self {
        Self(value)
    }
}

impl TryFrom<f64> for Difference {
    type Error = PlayerValidationError;

    fn try_from(value: f64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Difference> for u32 {
    fn from(value: Difference) -> Self {
        value.0
    }
}

/// Why an attempt could not be applied to a player.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum AttemptRejection {
    /// No attempts remain.
    #[error("no attempts remaining")]
    Exhausted,
    /// The configured tiers do not cover the new best result.
    #[error(transparent)]
    NoMatchingRange(#[from] NoMatchingRange),
}

/// Persisted field values used to rebuild a [`User`].
#[derive(Debug, Clone)]
pub struct UserSnapshot {
    pub id: UserId,
    pub name: PlayerName,
    pub phone: PhoneNumber,
    pub attempts_left: u32,
    pub best_result: Option<Difference>,
    pub discount: DiscountPercent,
    pub created_at: DateTime<Utc>,
}

/// A registered player.
///
/// ## Invariants
/// - `attempts_left` never increases after registration.
/// - `best_result` only ever decreases.
/// - `discount` is the tier of `best_result` under the ranges read by the
///   latest attempt; zero until the first attempt.
#[derive(Debug, Clone, PartialEq)]
pub struct User {
    id: UserId,
    name: PlayerName,
    phone: PhoneNumber,
    attempts_left: u32,
    best_result: Option<Difference>,
    discount: DiscountPercent,
    created_at: DateTime<Utc>,
}

impl User {
    /// Create a freshly registered player with the configured attempt budget.
    pub fn register(
        name: PlayerName,
        phone: PhoneNumber,
        attempts_number: u32,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: UserId::random(),
            name,
            phone,
            attempts_left: attempts_number,
            best_result: None,
            discount: DiscountPercent::ZERO,
            created_at,
        }
    }

    /// Rebuild a player from stored values.
    pub fn restore(snapshot: UserSnapshot) -> Self {
        let UserSnapshot {
            id,
            name,
            phone,
            attempts_left,
            best_result,
            discount,
            created_at,
        } = snapshot;
        Self {
            id,
            name,
            phone,
            attempts_left,
            best_result,
            discount,
            created_at,
        }
    }

    pub fn id(&self) -> UserId {
        self.id
    }

    pub fn name(&self) -> &PlayerName {
        &self.name
    }

    pub fn phone(&self) -> &PhoneNumber {
        &self.phone
    }

    pub fn attempts_left(&self) -> u32 {
        self.attempts_left
    }

    pub fn best_result(&self) -> Option<Difference> {
        self.best_result
    }

    pub fn discount(&self) -> DiscountPercent {
        self.discount
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Keep the better of the stored and the new result.
    ///
    /// Returns `true` when `difference` replaced the stored best result. The
    /// discount is always re-resolved from the resulting best against
    /// `ranges`, so edited tiers take effect on the next attempt even when it
    /// does not improve. A tier lookup failure leaves the player untouched.
    pub fn update_best_result(
        &mut self,
        difference: Difference,
        ranges: &DiscountRanges,
    ) -> Result<bool, NoMatchingRange> {
        let best = match self.best_result {
            Some(current) if !difference.beats(current) => current,
            _ => difference,
        };
        let discount = ranges.resolve(best.as_f64())?;
        let improved = self.best_result != Some(best);
        self.best_result = Some(best);
        self.discount = discount;
        Ok(improved)
    }

    /// Consume one attempt and fold its result into the player state.
    ///
    /// Nothing changes when the attempt is rejected.
    pub fn apply_attempt(
        &mut self,
        difference: Difference,
        ranges: &DiscountRanges,
    ) -> Result<(), AttemptRejection> {
        let Some(remaining) = self.attempts_left.checked_sub(1) else {
            return Err(AttemptRejection::Exhausted);
        };
        self.update_best_result(difference, ranges)?;
        self.attempts_left = remaining;
        Ok(())
    }
}
