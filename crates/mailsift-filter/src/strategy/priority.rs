//! Priority strategy.

use mailsift_core::Mail;

use super::FilterStrategy;
use crate::{Result, Score};

/// Largest priority distance that still matches.
const MAX_DISTANCE: i64 = 2;

/// Matches mail whose priority is within two of the target.
#[derive(Debug, Clone, Copy)]
pub struct PriorityFilter {
    priority: i32,
}

impl PriorityFilter {
    /// Creates a priority filter.
    #[must_use]
    pub const fn new(priority: i32) -> Self {
        Self { priority }
    }

    fn distance(self, mail: &Mail) -> i64 {
        (i64::from(mail.priority) - i64::from(self.priority)).abs()
    }
}

impl FilterStrategy for PriorityFilter {
    fn name(&self) -> &'static str {
        "priority"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(self.distance(mail) <= MAX_DISTANCE)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        let score = match self.distance(mail) {
            0 => 100,
            1 => 75,
            2 => 50,
            _ => 0,
        };
        Ok(Score::new(score))
    }
}
