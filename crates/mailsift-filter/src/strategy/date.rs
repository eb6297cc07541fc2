//! Date strategies: exact instant, before, and after.
//!
//! Before/after scores decay linearly with the distance from the target,
//! reaching zero once the record is a full window away.

use chrono::{DateTime, Utc};
use mailsift_core::Mail;

use super::FilterStrategy;
use crate::{Result, Score};

/// Default decay window in days.
const DEFAULT_WINDOW_DAYS: i64 = 12 * 30;

/// `100 - days * 100 / window`, clamped. Closer records score higher.
fn decay(days: i64, window_days: i64) -> Score {
    let window_days = window_days.max(1);
    Score::new(100_i64.saturating_sub(days.saturating_mul(100) / window_days))
}

/// Matches mail stamped at exactly the target instant.
#[derive(Debug, Clone, Copy)]
pub struct ExactDateFilter {
    date: DateTime<Utc>,
}

impl ExactDateFilter {
    /// Creates an exact-date filter.
    #[must_use]
    pub const fn new(date: DateTime<Utc>) -> Self {
        Self { date }
    }
}

impl FilterStrategy for ExactDateFilter {
    fn name(&self) -> &'static str {
        "exact_date"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(mail.timestamp == self.date)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(if mail.timestamp == self.date {
            Score::MAX
        } else {
            Score::ZERO
        })
    }
}

/// Matches mail strictly before the target.
#[derive(Debug, Clone, Copy)]
pub struct BeforeDateFilter {
    date: DateTime<Utc>,
    window_days: i64,
}

impl BeforeDateFilter {
    /// Creates a before-date filter with the default 360-day window.
    #[must_use]
    pub const fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Sets the decay window.
    #[must_use]
    pub const fn with_window_days(mut self, window_days: i64) -> Self {
        self.window_days = window_days;
        self
    }
}

impl FilterStrategy for BeforeDateFilter {
    fn name(&self) -> &'static str {
        "before_date"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(mail.timestamp < self.date)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        let days = (self.date - mail.timestamp).num_days();
        Ok(decay(days, self.window_days))
    }
}

/// Matches mail strictly after the target.
#[derive(Debug, Clone, Copy)]
pub struct AfterDateFilter {
    date: DateTime<Utc>,
    window_days: i64,
}

impl AfterDateFilter {
    /// Creates an after-date filter with the default 360-day window.
    #[must_use]
    pub const fn new(date: DateTime<Utc>) -> Self {
        Self {
            date,
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }

    /// Sets the decay window.
    #[must_use]
    pub const fn with_window_days(mut self, window_days: i64) -> Self {
        self.window_days = window_days;
        self
    }
}

impl FilterStrategy for AfterDateFilter {
    fn name(&self) -> &'static str {
        "after_date"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(mail.timestamp > self.date)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        let days = (mail.timestamp - self.date).num_days();
        Ok(decay(days, self.window_days))
    }
}
