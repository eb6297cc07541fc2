//! Relevance scores and the soft-logic formulas that combine them.

use serde::Serialize;

/// A relevance score in `[0, 100]`.
///
/// Every constructor clamps, so a `Score` can never leave its range, even
/// after composition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
#[serde(transparent)]
pub struct Score(u8);

impl Score {
    /// No relevance.
    pub const ZERO: Self = Self(0);
    /// Full relevance.
    pub const MAX: Self = Self(100);

    /// Creates a score, clamping into `[0, 100]`.
    #[must_use]
    pub fn new(value: i64) -> Self {
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(value.clamp(0, 100) as u8)
    }

    /// Creates a score from a real value, rounding half away from zero and
    /// clamping. `NaN` maps to zero.
    #[must_use]
    pub fn from_f64(value: f64) -> Self {
        if value.is_nan() {
            return Self::ZERO;
        }
        #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
        Self(value.round().clamp(0.0, 100.0) as u8)
    }

    /// The score as an integer in `[0, 100]`.
    #[must_use]
    pub const fn value(self) -> u8 {
        self.0
    }

    /// The score on the unit interval.
    fn unit(self) -> f64 {
        f64::from(self.0) / 100.0
    }

    /// Soft conjunction: the geometric mean of both scores.
    ///
    /// Zero if either side is zero; never above the larger side.
    #[must_use]
    pub fn soft_and(self, other: Self) -> Self {
        Self::from_f64(100.0 * (self.unit() * other.unit()).sqrt())
    }

    /// Soft disjunction: probabilistic union `a + b - ab/100`.
    ///
    /// Never below the larger side and never above 100.
    #[must_use]
    pub fn soft_or(self, other: Self) -> Self {
        let (a, b) = (f64::from(self.0), f64::from(other.0));
        Self::from_f64(a + b - a * b / 100.0)
    }

    /// Compresses an unbounded raw weight into `[0, 100]` with a logistic
    /// curve centred at `midpoint`. A raw weight of zero stays zero.
    #[must_use]
    pub fn sigmoid(raw: u64, midpoint: f64, steepness: f64) -> Self {
        if raw == 0 {
            return Self::ZERO;
        }
        #[allow(clippy::cast_precision_loss)]
        let raw = raw as f64;
        Self::from_f64(100.0 / (1.0 + (-steepness * (raw - midpoint)).exp()))
    }
}

impl From<Score> for u8 {
    fn from(score: Score) -> Self {
        score.0
    }
}

impl std::fmt::Display for Score {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}
