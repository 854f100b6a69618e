//! Phone number normalisation for player identity.
//!
//! Players identify themselves with an Israeli mobile number typed either in
//! the local trunk form (`050-1234567`) or the international form
//! (`+972-50-123-4567`). Both spellings of one physical number normalise to
//! the same E.164 value so the unique index on `users.phone` holds
//! regardless of how the number was typed.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

const COUNTRY_CODE: &str = "972";
const INTERNATIONAL_ACCESS: &str = "00";
const TRUNK_PREFIX: char = '0';
const MOBILE_PREFIX: char = '5';
/// Digits after the trunk prefix or country code.
const NATIONAL_NUMBER_DIGITS: usize = 9;

/// Reasons a phone number is rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PhoneValidationError {
    /// Input was blank once trimmed.
    #[error("phone number must not be empty")]
    Empty,
    /// Input contains something other than digits, spaces, hyphens or a
    /// leading plus sign.
    #[error("phone number contains an invalid character '{character}'")]
    InvalidCharacter { character: char },
    /// A separator appears before the first digit or after the last one.
    #[error("phone number separators must sit between digits")]
    MisplacedSeparator,
    /// Neither a trunk prefix nor the country code was supplied.
    #[error("phone number must start with 0 or +972")]
    MissingPrefix,
    /// The national number has the wrong number of digits.
    #[error("phone number must have {expected} digits after the prefix, found {actual}")]
    WrongDigitCount { expected: usize, actual: usize },
    /// The national number is not a mobile number.
    #[error("phone number must be a mobile number starting with 05 or +9725")]
    NotMobile,
}

/// Canonical E.164 mobile phone number (`+9725XXXXXXXX`).
///
/// ## Invariants
/// - Always `+972` followed by nine digits, the first of which is `5`.
///
/// # Examples
/// ```
/// use promo_backend::domain::PhoneNumber;
///
/// let local = PhoneNumber::parse("050-1234567").expect("local form");
/// let international = PhoneNumber::parse("+972 50 123 4567").expect("international form");
/// assert_eq!(local, international);
/// assert_eq!(local.as_str(), "+972501234567");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Validate and normalise a phone number typed by a player.
    pub fn parse(input: &str) -> Result<Self, PhoneValidationError> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(PhoneValidationError::Empty);
        }

        let (has_plus, digits) = collect_digits(trimmed)?;
        let national = strip_prefix(has_plus, &digits)?;

        if national.len() != NATIONAL_NUMBER_DIGITS {
            return Err(PhoneValidationError::WrongDigitCount {
                expected: NATIONAL_NUMBER_DIGITS,
                actual: national.len(),
            });
        }
        if !national.starts_with(MOBILE_PREFIX) {
            return Err(PhoneValidationError::NotMobile);
        }

        Ok(Self(format!("+{COUNTRY_CODE}{national}")))
    }

    /// Borrow the normalised value.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Split the input into digits, enforcing separator placement.
fn collect_digits(input: &str) -> Result<(bool, String), PhoneValidationError> {
    let (has_plus, body) = match input.strip_prefix('+') {
        Some(rest) => (true, rest),
        None => (false, input),
    };

    let mut digits = String::with_capacity(body.len());
    let mut pending_separator = false;
    for character in body.chars() {
        match character {
            '0'..='9' => {
                digits.push(character);
                pending_separator = false;
            }
            ' ' | '-' => {
                if digits.is_empty() {
                    return Err(PhoneValidationError::MisplacedSeparator);
                }
                pending_separator = true;
            }
            other => return Err(PhoneValidationError::InvalidCharacter { character: other }),
        }
    }

    if pending_separator {
        return Err(PhoneValidationError::MisplacedSeparator);
    }
    if digits.is_empty() {
        return Err(PhoneValidationError::WrongDigitCount {
            expected: NATIONAL_NUMBER_DIGITS,
            actual: 0,
        });
    }
    Ok((has_plus, digits))
}

/// Remove the trunk prefix or international prefix, returning the national
/// significant number.
fn strip_prefix(has_plus: bool, digits: &str) -> Result<&str, PhoneValidationError> {
    if has_plus {
        return digits
            .strip_prefix(COUNTRY_CODE)
            .ok_or(PhoneValidationError::MissingPrefix);
    }

    if let Some(rest) = digits
        .strip_prefix(INTERNATIONAL_ACCESS)
        .and_then(|rest| rest.strip_prefix(COUNTRY_CODE))
    {
        return Ok(rest);
    }
    if let Some(rest) = digits.strip_prefix(TRUNK_PREFIX) {
        return Ok(rest);
    }
    // Country code typed without the plus sign.
    digits
        .strip_prefix(COUNTRY_CODE)
        .filter(|rest| rest.len() == NATIONAL_NUMBER_DIGITS)
        .ok_or(PhoneValidationError::MissingPrefix)
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for PhoneNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PhoneNumber> for String {
    fn from(value: PhoneNumber) -> Self {
        value.0
    }
}

impl TryFrom<String> for PhoneNumber {
    type Error = PhoneValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}
