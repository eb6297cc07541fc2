//! Soft-logic combinators over filter strategies.

use std::fmt;
use std::str::FromStr;

use mailsift_core::Mail;
use serde::{Deserialize, Serialize};

use crate::strategy::{BoxedStrategy, FilterStrategy};
use crate::{FilterError, Result, Score};

/// Conjunction of two strategies.
///
/// Matches when both sides match; the score is the soft AND of both
/// scores, so a side scoring zero zeroes the whole.
pub struct And {
    left: BoxedStrategy,
    right: BoxedStrategy,
}

impl And {
    /// Combines two strategies with AND.
    #[must_use]
    pub fn new(left: BoxedStrategy, right: BoxedStrategy) -> Self {
        Self { left, right }
    }
}

impl FilterStrategy for And {
    fn name(&self) -> &'static str {
        "and"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(self.left.matches(mail)? && self.right.matches(mail)?)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(self.left.score(mail)?.soft_and(self.right.score(mail)?))
    }
}

/// Disjunction of two strategies.
///
/// Matches when either side matches; the score is the soft OR of both
/// scores, never below the stronger side.
pub struct Or {
    left: BoxedStrategy,
    right: BoxedStrategy,
}

impl Or {
    /// Combines two strategies with OR.
    #[must_use]
    pub fn new(left: BoxedStrategy, right: BoxedStrategy) -> Self {
        Self { left, right }
    }
}

impl FilterStrategy for Or {
    fn name(&self) -> &'static str {
        "or"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(self.left.matches(mail)? || self.right.matches(mail)?)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(self.left.score(mail)?.soft_or(self.right.score(mail)?))
    }
}

/// How the strategies of one query are combined.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CombineMode {
    /// Every criterion must match.
    #[default]
    And,
    /// Any criterion may match.
    Or,
}

impl CombineMode {
    /// Parses `"and"` or `"or"`, ignoring case and surrounding whitespace.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "and" => Some(Self::And),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    fn combine(self, left: BoxedStrategy, right: BoxedStrategy) -> BoxedStrategy {
        match self {
            Self::And => Box::new(And::new(left, right)),
            Self::Or => Box::new(Or::new(left, right)),
        }
    }
}

impl FromStr for CombineMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("unknown combine mode '{s}', expected 'and' or 'or'"))
    }
}

impl fmt::Display for CombineMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::And => f.write_str("and"),
            Self::Or => f.write_str("or"),
        }
    }
}

/// Left-folds `strategies` into one composite: `((s1 ∘ s2) ∘ s3) ∘ …`.
///
/// A single strategy is returned unchanged.
///
/// # Errors
///
/// Returns [`FilterError::InvalidQuery`] if `strategies` is empty.
pub fn fold(strategies: Vec<BoxedStrategy>, mode: CombineMode) -> Result<BoxedStrategy> {
    let count = strategies.len();
    let mut iter = strategies.into_iter();
    let first = iter.next().ok_or(FilterError::InvalidQuery)?;
    let composite = iter.fold(first, |acc, next| mode.combine(acc, next));
    tracing::debug!("Folded {count} strategies with {mode}");
    Ok(composite)
}
