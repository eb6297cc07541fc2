//! Subject and body strategies.

use mailsift_core::{Mail, TextMatchMode};

use super::FilterStrategy;
use crate::text::{normalize, words};
use crate::{Result, Score};

const EXACT_WORD_POINTS: i64 = 15;
const EXACT_WORD_CAP: i64 = 90;
const PREFIX_WORD_POINTS: i64 = 8;
const PREFIX_WORD_CAP: i64 = 50;

/// A lower-cased text query with its word list.
#[derive(Debug, Clone)]
struct TextQuery {
    query: String,
    words: Vec<String>,
    mode: TextMatchMode,
}

impl TextQuery {
    fn new(query: &str, mode: TextMatchMode) -> Self {
        let query = normalize(query);
        let words = words(&query).map(str::to_string).collect();
        Self { query, words, mode }
    }

    fn matches(&self, text: &str) -> bool {
        if self.query.is_empty() {
            return false;
        }
        let text = text.to_lowercase();
        if text == self.query {
            return true;
        }
        match self.mode {
            TextMatchMode::Substring => self.words.iter().any(|word| text.contains(word.as_str())),
            TextMatchMode::WordPrefix => {
                let text_words: Vec<&str> = words(&text).collect();
                self.words.iter().any(|word| {
                    text_words
                        .iter()
                        .any(|candidate| candidate.starts_with(word.as_str()))
                })
            }
        }
    }

    fn score(&self, text: &str) -> Score {
        if self.query.is_empty() {
            return Score::ZERO;
        }
        let text = text.to_lowercase();
        if text == self.query {
            return Score::MAX;
        }
        if text.contains(&self.query) {
            return Score::new(90);
        }

        let text_words: Vec<&str> = words(&text).collect();
        let mut exact = 0_i64;
        let mut prefix = 0_i64;
        for word in &self.words {
            if text_words.iter().any(|candidate| candidate == word) {
                exact += 1;
            } else if text_words
                .iter()
                .any(|candidate| candidate.starts_with(word.as_str()))
            {
                prefix += 1;
            }
        }

        if exact > 0 {
            Score::new((exact * EXACT_WORD_POINTS).min(EXACT_WORD_CAP))
        } else if prefix > 0 {
            Score::new((prefix * PREFIX_WORD_POINTS).min(PREFIX_WORD_CAP))
        } else {
            Score::ZERO
        }
    }
}

/// Matches words of the subject line.
///
/// In [`TextMatchMode::Substring`] mode a query word anywhere in the subject
/// is a match, so "port" finds "Report".
#[derive(Debug, Clone)]
pub struct SubjectFilter {
    query: TextQuery,
}

impl SubjectFilter {
    /// Creates a subject filter.
    #[must_use]
    pub fn new(query: &str, mode: TextMatchMode) -> Self {
        Self {
            query: TextQuery::new(query, mode),
        }
    }
}

impl FilterStrategy for SubjectFilter {
    fn name(&self) -> &'static str {
        "subject"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(self.query.matches(&mail.subject))
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(self.query.score(&mail.subject))
    }
}

/// Matches words of the body. A missing body reads as empty.
#[derive(Debug, Clone)]
pub struct BodyFilter {
    query: TextQuery,
}

impl BodyFilter {
    /// Creates a body filter.
    #[must_use]
    pub fn new(query: &str, mode: TextMatchMode) -> Self {
        Self {
            query: TextQuery::new(query, mode),
        }
    }
}

impl FilterStrategy for BodyFilter {
    fn name(&self) -> &'static str {
        "body"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(self.query.matches(mail.body_text()))
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(self.query.score(mail.body_text()))
    }
}
