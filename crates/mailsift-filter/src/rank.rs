//! Ranking orchestrator.

use std::cmp::Ordering;

use mailsift_core::{EngineConfig, Mail, MissingRelationPolicy, TieBreak};

use crate::strategy::FilterStrategy;
use crate::{FilterError, Result, Score};

/// A matching record with its relevance score.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scored {
    /// The record.
    pub mail: Mail,
    /// Relevance under the composite strategy.
    pub score: Score,
}

/// Applies a composite strategy to a candidate list.
///
/// Non-matching records are dropped; the rest are ordered by descending
/// score. Each record is scored exactly once per pass.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ranker {
    config: EngineConfig,
}

impl Ranker {
    /// Creates a ranker with the given tie-break and missing-relation policy.
    #[must_use]
    pub const fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    /// Filters and orders `candidates`, keeping their scores.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MissingRelation`] when a record's sender or
    /// receivers do not resolve and the policy is to propagate.
    pub fn rank_scored(
        &self,
        strategy: &dyn FilterStrategy,
        candidates: Vec<Mail>,
    ) -> Result<Vec<Scored>> {
        let total = candidates.len();
        let mut ranked = Vec::with_capacity(total);

        for mail in candidates {
            let evaluated = strategy
                .matches(&mail)
                .and_then(|matched| matched.then(|| strategy.score(&mail)).transpose());

            match evaluated {
                Ok(Some(score)) => {
                    tracing::trace!("Mail {} scored {score}", mail.id);
                    ranked.push(Scored { mail, score });
                }
                Ok(None) => {}
                Err(FilterError::MissingRelation { mail_id, relation })
                    if self.config.missing_relation == MissingRelationPolicy::Exclude =>
                {
                    tracing::warn!("Excluding mail {mail_id}: cannot resolve {relation}");
                }
                Err(e) => return Err(e),
            }
        }

        ranked.sort_by(|a, b| b.score.cmp(&a.score).then_with(|| self.tie_break(a, b)));
        tracing::debug!("Ranked {} of {total} candidates", ranked.len());
        Ok(ranked)
    }

    /// Filters and orders `candidates`, discarding scores.
    ///
    /// # Errors
    ///
    /// Same as [`rank_scored`](Self::rank_scored).
    pub fn rank(&self, strategy: &dyn FilterStrategy, candidates: Vec<Mail>) -> Result<Vec<Mail>> {
        Ok(self
            .rank_scored(strategy, candidates)?
            .into_iter()
            .map(|scored| scored.mail)
            .collect())
    }

    fn tie_break(&self, a: &Scored, b: &Scored) -> Ordering {
        match self.config.tie_break {
            TieBreak::Preserve => Ordering::Equal,
            TieBreak::NewestFirst => b.mail.timestamp.cmp(&a.mail.timestamp),
            TieBreak::MailId => a.mail.id.cmp(&b.mail.id),
        }
    }
}
