//! Exact-equality strategies: read state, folder, attachment presence.

use mailsift_core::Mail;

use super::FilterStrategy;
use crate::{Result, Score};

const fn all_or_nothing(matched: bool) -> Score {
    if matched { Score::MAX } else { Score::ZERO }
}

/// Matches mail whose read flag equals the target.
#[derive(Debug, Clone, Copy)]
pub struct IsReadFilter {
    is_read: bool,
}

impl IsReadFilter {
    /// Creates a read-state filter.
    #[must_use]
    pub const fn new(is_read: bool) -> Self {
        Self { is_read }
    }
}

impl FilterStrategy for IsReadFilter {
    fn name(&self) -> &'static str {
        "is_read"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(mail.is_read == self.is_read)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(all_or_nothing(mail.is_read == self.is_read))
    }
}

/// Matches mail filed in the named folder. Comparison is case-sensitive.
#[derive(Debug, Clone)]
pub struct FolderFilter {
    folder: String,
}

impl FolderFilter {
    /// Creates a folder filter. An empty name matches nothing.
    #[must_use]
    pub fn new(folder: impl Into<String>) -> Self {
        Self {
            folder: folder.into(),
        }
    }

    fn is_match(&self, mail: &Mail) -> bool {
        !self.folder.is_empty() && mail.folder == self.folder
    }
}

impl FilterStrategy for FolderFilter {
    fn name(&self) -> &'static str {
        "folder"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(self.is_match(mail))
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(all_or_nothing(self.is_match(mail)))
    }
}

/// Matches mail that does (or does not) carry attachments.
#[derive(Debug, Clone, Copy)]
pub struct HasAttachmentsFilter {
    has_attachments: bool,
}

impl HasAttachmentsFilter {
    /// Creates an attachment-presence filter.
    #[must_use]
    pub const fn new(has_attachments: bool) -> Self {
        Self { has_attachments }
    }
}

impl FilterStrategy for HasAttachmentsFilter {
    fn name(&self) -> &'static str {
        "has_attachments"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        Ok(mail.has_attachments() == self.has_attachments)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        Ok(all_or_nothing(mail.has_attachments() == self.has_attachments))
    }
}
