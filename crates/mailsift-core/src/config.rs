//! Engine configuration.
//!
//! Ranking policies that callers may want to tune without a rebuild live in a
//! JSON file under the user's config directory. A missing file means
//! defaults.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// What to do when a strategy cannot resolve a record's sender or receivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingRelationPolicy {
    /// Abort the search with an error.
    #[default]
    Propagate,
    /// Drop the record from the results and log a warning.
    Exclude,
}

/// Ordering applied to records with equal scores.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TieBreak {
    /// Keep the order the candidates arrived in.
    #[default]
    Preserve,
    /// Most recent timestamp first.
    NewestFirst,
    /// Ascending mail id.
    MailId,
}

/// How subject and body strategies decide that a query word matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TextMatchMode {
    /// Any query word appears anywhere in the text.
    #[default]
    Substring,
    /// Any query word equals, or is a prefix of, a word of the text.
    WordPrefix,
}

/// Tunable search engine settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Handling of unresolvable sender/receiver identities.
    pub missing_relation: MissingRelationPolicy,
    /// Ordering for equal scores.
    pub tie_break: TieBreak,
    /// Days over which before/after date scores decay from 100 to 0.
    pub date_window_days: i64,
    /// Matching rule for subject searches.
    pub subject_match: TextMatchMode,
    /// Matching rule for body searches.
    pub body_match: TextMatchMode,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            missing_relation: MissingRelationPolicy::Propagate,
            tie_break: TieBreak::Preserve,
            date_window_days: 12 * 30,
            subject_match: TextMatchMode::Substring,
            body_match: TextMatchMode::WordPrefix,
        }
    }
}

impl EngineConfig {
    /// Default location: `<config dir>/mailsift/engine.json`.
    #[must_use]
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("mailsift")
            .join("engine.json")
    }

    /// Load configuration from `path`, falling back to defaults if the file
    /// does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// holds invalid values.
    pub async fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No engine config at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let contents = tokio::fs::read_to_string(path).await?;
        let config: Self = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories.
    ///
    /// # Errors
    ///
    /// Returns an error if the directory or file cannot be written.
    pub async fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        let contents = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, contents).await?;
        tracing::info!("Engine config saved to {:?}", path);
        Ok(())
    }

    /// Check value ranges.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if `date_window_days` is not positive.
    pub fn validate(&self) -> Result<()> {
        if self.date_window_days <= 0 {
            return Err(Error::Config(format!(
                "date_window_days must be positive, got {}",
                self.date_window_days
            )));
        }
        Ok(())
    }
}
