//! Attachment name and content strategy.
//!
//! Scores count occurrences of the whole query, or failing that of each
//! query term, in every attachment's file name and extracted text. The raw
//! weight is unbounded, so it is squashed into `[0, 100]` with a logistic
//! curve: a single file-name hit scores low, a dozen content hits score high.

use mailsift_core::{Attachment, Mail};

use super::FilterStrategy;
use crate::text::{attachment_terms, count_occurrences, normalize};
use crate::{Result, Score};

const FILENAME_FULL_MATCH: u64 = 20;
const FILENAME_PARTIAL_MATCH: u64 = 12;
const CONTENT_FULL_MATCH: u64 = 15;
const CONTENT_PARTIAL_MATCH: u64 = 8;

/// Raw weight that normalizes to 50.
const SIGMOID_MIDPOINT: f64 = 100.0;
const SIGMOID_STEEPNESS: f64 = 0.02;

/// Matches the query against attachment file names and extracted text.
///
/// Attachments without extracted text are searched by name only.
#[derive(Debug, Clone)]
pub struct AttachmentFilter {
    query: String,
    terms: Vec<String>,
}

impl AttachmentFilter {
    /// Creates an attachment filter. An empty query matches nothing.
    #[must_use]
    pub fn new(query: &str) -> Self {
        let query = normalize(query);
        let terms = attachment_terms(&query).map(str::to_string).collect();
        Self { query, terms }
    }

    fn found_in(&self, text: &str) -> bool {
        text.contains(&self.query) || self.terms.iter().any(|term| text.contains(term.as_str()))
    }

    fn weigh(&self, text: &str, full_weight: u64, partial_weight: u64) -> u64 {
        let full = count_occurrences(text, &self.query) as u64;
        if full > 0 {
            return full * full_weight;
        }
        self.terms
            .iter()
            .map(|term| partial_weight * count_occurrences(text, term) as u64)
            .sum()
    }

    fn raw_score(&self, attachment: &Attachment) -> u64 {
        let file_name = attachment.file_name.to_lowercase();
        let content = attachment.indexed_text().to_lowercase();
        if content.is_empty() {
            tracing::trace!(
                "Attachment {:?} has no extracted text, scoring name only",
                attachment.file_name
            );
        }
        self.weigh(&file_name, FILENAME_FULL_MATCH, FILENAME_PARTIAL_MATCH)
            + self.weigh(&content, CONTENT_FULL_MATCH, CONTENT_PARTIAL_MATCH)
    }
}

impl FilterStrategy for AttachmentFilter {
    fn name(&self) -> &'static str {
        "attachment"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        if self.query.is_empty() {
            return Ok(false);
        }
        Ok(mail.attachments.iter().any(|attachment| {
            let content = attachment.indexed_text().to_lowercase();
            self.found_in(&attachment.file_name.to_lowercase())
                || (!content.is_empty() && self.found_in(&content))
        }))
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        if self.query.is_empty() {
            return Ok(Score::ZERO);
        }
        let raw: u64 = mail
            .attachments
            .iter()
            .map(|attachment| self.raw_score(attachment))
            .sum();
        Ok(Score::sigmoid(raw, SIGMOID_MIDPOINT, SIGMOID_STEEPNESS))
    }
}
