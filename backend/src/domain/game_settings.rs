//! Game configuration and discount tier resolution.
//!
//! `GameSettings` is owned by operators and read fresh inside every
//! transaction that needs it. The discount ranges map a player's best result
//! (a distance from the target, lower is better) onto a percentage.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Largest representable discount.
pub const MAX_DISCOUNT_PERCENT: u8 = 100;

/// Validation errors for discount configuration.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DiscountRangeError {
    /// Discount exceeds 100 percent.
    #[error("discount must be between 0 and {MAX_DISCOUNT_PERCENT}, got {value}")]
    DiscountOutOfRange { value: i64 },
    /// A range bound is NaN or infinite.
    #[error("range bounds must be finite numbers")]
    NonFiniteBound,
    /// The upper bound lies below the lower bound.
    #[error("range max {max} is below min {min}")]
    InvertedBounds { min: f64, max: f64 },
}

/// Whole discount percentage between 0 and 100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct DiscountPercent(u8);

impl DiscountPercent {
    /// No discount earned.
    pub const ZERO: Self = Self(0);

    /// Validate a percentage.
    pub fn new(value: i64) -> Result<Self, DiscountRangeError> {
        u8::try_from(value)
            .ok()
            .filter(|percent| *percent <= MAX_DISCOUNT_PERCENT)
            .map(Self)
            .ok_or(DiscountRangeError::DiscountOutOfRange { value })
    }

    /// The raw percentage.
    pub fn value(self) -> u8 {
        self.0
    }
}

impl TryFrom<i64> for DiscountPercent {
    type Error = DiscountRangeError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<DiscountPercent> for u8 {
    fn from(value: DiscountPercent) -> Self {
        value.0
    }
}

impl fmt::Display for DiscountPercent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// One discount tier: results in `[min, max]` earn `discount`.
///
/// `max = None` leaves the range open-ended.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "DiscountRangeDto", into = "DiscountRangeDto")]
pub struct DiscountRange {
    min: f64,
    max: Option<f64>,
    discount: DiscountPercent,
}

impl DiscountRange {
    /// Validate and construct a range.
    pub fn new(
        min: f64,
        max: Option<f64>,
        discount: DiscountPercent,
    ) -> Result<Self, DiscountRangeError> {
        if !min.is_finite() || max.is_some_and(|upper| !upper.is_finite()) {
            return Err(DiscountRangeError::NonFiniteBound);
        }
        if let Some(upper) = max.filter(|upper| *upper < min) {
            return Err(DiscountRangeError::InvertedBounds { min, max: upper });
        }
        Ok(Self { min, max, discount })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> Option<f64> {
        self.max
    }

    pub fn discount(&self) -> DiscountPercent {
        self.discount
    }

    fn contains(&self, difference: f64) -> bool {
        self.min <= difference && self.max.is_none_or(|upper| difference <= upper)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct DiscountRangeDto {
    min: f64,
    #[serde(default)]
    max: Option<f64>,
    discount: i64,
}

impl From<DiscountRange> for DiscountRangeDto {
    fn from(value: DiscountRange) -> Self {
        Self {
            min: value.min,
            max: value.max,
            discount: i64::from(value.discount.value()),
        }
    }
}

impl TryFrom<DiscountRangeDto> for DiscountRange {
    type Error = DiscountRangeError;

    fn try_from(value: DiscountRangeDto) -> Result<Self, Self::Error> {
        Self::new(value.min, value.max, DiscountPercent::new(value.discount)?)
    }
}

/// Raised when no configured range covers a result.
///
/// This signals a configuration gap, never a player error.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
#[error("no discount range covers difference {difference}")]
pub struct NoMatchingRange {
    pub difference: f64,
}

/// Discount tiers ordered by ascending `min`.
///
/// # Examples
/// ```
/// use promo_backend::domain::{DiscountPercent, DiscountRange, DiscountRanges};
///
/// let ranges = DiscountRanges::new(vec![
///     DiscountRange::new(11.0, None, DiscountPercent::new(10).unwrap()).unwrap(),
///     DiscountRange::new(0.0, Some(10.0), DiscountPercent::new(20).unwrap()).unwrap(),
/// ]);
/// assert_eq!(ranges.resolve(5.0).unwrap().value(), 20);
/// assert_eq!(ranges.resolve(11.0).unwrap().value(), 10);
/// assert!(ranges.resolve(-1.0).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "Vec<DiscountRange>", into = "Vec<DiscountRange>")]
pub struct DiscountRanges(Vec<DiscountRange>);

impl DiscountRanges {
    /// Build the tier list, sorting by lower bound.
    pub fn new(mut ranges: Vec<DiscountRange>) -> Self {
        ranges.sort_by(|left, right| left.min.total_cmp(&right.min));
        Self(ranges)
    }

    /// Map a result onto its discount.
    ///
    /// The first range (by ascending `min`) containing `difference` wins.
    pub fn resolve(&self, difference: f64) -> Result<DiscountPercent, NoMatchingRange> {
        self.0
            .iter()
            .find(|range| range.contains(difference))
            .map(DiscountRange::discount)
            .ok_or(NoMatchingRange { difference })
    }

    pub fn as_slice(&self) -> &[DiscountRange] {
        &self.0
    }
}

impl From<Vec<DiscountRange>> for DiscountRanges {
    fn from(value: Vec<DiscountRange>) -> Self {
        Self::new(value)
    }
}

impl From<DiscountRanges> for Vec<DiscountRange> {
    fn from(value: DiscountRanges) -> Self {
        value.0
    }
}

/// Operator-owned game configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct GameSettings {
    attempts_number: u32,
    discount_ranges: DiscountRanges,
}

impl GameSettings {
    pub fn new(attempts_number: u32, discount_ranges: DiscountRanges) -> Self {
        Self {
            attempts_number,
            discount_ranges,
        }
    }

    /// Attempts granted to a newly registered player.
    pub fn attempts_number(&self) -> u32 {
        self.attempts_number
    }

    pub fn discount_ranges(&self) -> &DiscountRanges {
        &self.discount_ranges
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for tier resolution.
    use super::*;
    use rstest::{fixture, rstest};
    use serde_json::json;

    fn percent(value: i64) -> DiscountPercent {
        DiscountPercent::new(value).expect("valid percent")
    }

    #[fixture]
    fn ranges() -> DiscountRanges {
        DiscountRanges::new(vec![
            DiscountRange::new(0.0, Some(10.0), percent(20)).expect("range"),
            DiscountRange::new(11.0, None, percent(10)).expect("range"),
        ])
    }

    #[rstest]
    #[case(0.0, 20)]
    #[case(5.0, 20)]
    #[case(10.0, 20)]
    #[case(11.0, 10)]
    #[case(1_000.0, 10)]
    fn resolves_first_matching_range(
        ranges: DiscountRanges,
        #[case] difference: f64,
        #[case] expected: u8,
    ) {
        let discount = ranges.resolve(difference).expect("range matches");
        assert_eq!(discount.value(), expected);
    }

    #[rstest]
    #[case(-1.0)]
    #[case(10.5)]
    fn uncovered_results_fail(ranges: DiscountRanges, #[case] difference: f64) {
        let err = ranges.resolve(difference).expect_err("gap must surface");
        assert_eq!(err, NoMatchingRange { difference });
    }

    #[rstest]
    fn empty_ranges_never_match() {
        let err = DiscountRanges::default()
            .resolve(3.0)
            .expect_err("no ranges configured");
        assert_eq!(err.difference, 3.0);
    }

    #[rstest]
    fn overlapping_ranges_prefer_lowest_min() {
        let ranges = DiscountRanges::new(vec![
            DiscountRange::new(5.0, None, percent(5)).expect("range"),
            DiscountRange::new(0.0, Some(20.0), percent(30)).expect("range"),
        ]);
        assert_eq!(ranges.resolve(7.0).expect("match").value(), 30);
    }

    #[rstest]
    fn deserialising_sorts_by_min() {
        let ranges: DiscountRanges = serde_json::from_value(json!([
            { "min": 11, "max": null, "discount": 10 },
            { "min": 0, "max": 10, "discount": 20 },
        ]))
        .expect("valid ranges");

        let mins: Vec<f64> = ranges.as_slice().iter().map(DiscountRange::min).collect();
        assert_eq!(mins, vec![0.0, 11.0]);
    }

    #[rstest]
    #[case(json!({ "min": 0, "max": 10, "discount": 101 }))]
    #[case(json!({ "min": 0, "max": 10, "discount": -1 }))]
    #[case(json!({ "min": 10, "max": 0, "discount": 5 }))]
    fn invalid_ranges_fail_to_deserialise(#[case] payload: serde_json::Value) {
        assert!(serde_json::from_value::<DiscountRange>(payload).is_err());
    }

    #[rstest]
    fn missing_max_is_open_ended() {
        let range: DiscountRange =
            serde_json::from_value(json!({ "min": 3, "discount": 15 })).expect("valid range");
        assert_eq!(range.max(), None);
    }
}
