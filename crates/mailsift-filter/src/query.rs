//! Query specification and strategy builder.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use mailsift_core::{EngineConfig, IdentityResolver};
use serde::{Deserialize, Serialize};

use crate::combinator::{CombineMode, fold};
use crate::strategy::{
    AfterDateFilter, AttachmentFilter, BeforeDateFilter, BodyFilter, BoxedStrategy,
    ExactDateFilter, FolderFilter, HasAttachmentsFilter, IsReadFilter, PriorityFilter,
    ReceiverFilter, SenderFilter, SubjectFilter,
};
use crate::{FilterError, Result};

/// A sparse search query. Every field is optional; an absent field is not
/// part of the query.
///
/// Strings count as supplied only when they hold something other than
/// whitespace, lists only when non-empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct QuerySpec {
    /// Sender names or addresses; any may match.
    pub sender: Option<Vec<String>>,
    /// Receiver names or addresses; any may match.
    pub receiver: Option<Vec<String>>,
    /// Subject text.
    pub subject: Option<String>,
    /// Body text.
    pub body: Option<String>,
    /// Target priority.
    pub priority: Option<i32>,
    /// Exact send instant.
    pub exact_date: Option<DateTime<Utc>>,
    /// Upper bound (exclusive) on the timestamp.
    pub before_date: Option<DateTime<Utc>>,
    /// Lower bound (exclusive) on the timestamp.
    pub after_date: Option<DateTime<Utc>>,
    /// Read state.
    pub is_read: Option<bool>,
    /// Folder name, compared case-sensitively.
    pub folder: Option<String>,
    /// Whether the mail carries attachments.
    pub has_attachments: Option<bool>,
    /// Text searched in attachment names and extracted content.
    pub attachment: Option<String>,
}

fn supplied_text(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

fn supplied_list(value: Option<&Vec<String>>) -> Option<&[String]> {
    value.map(Vec::as_slice).filter(|list| !list.is_empty())
}

impl QuerySpec {
    /// Creates an empty query.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds sender targets.
    #[must_use]
    pub fn with_sender<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.sender = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    /// Adds receiver targets.
    #[must_use]
    pub fn with_receiver<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.receiver = Some(targets.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the subject text.
    #[must_use]
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the target priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Sets the exact instant.
    #[must_use]
    pub const fn with_exact_date(mut self, date: DateTime<Utc>) -> Self {
        self.exact_date = Some(date);
        self
    }

    /// Sets the upper date bound.
    #[must_use]
    pub const fn with_before_date(mut self, date: DateTime<Utc>) -> Self {
        self.before_date = Some(date);
        self
    }

    /// Sets the lower date bound.
    #[must_use]
    pub const fn with_after_date(mut self, date: DateTime<Utc>) -> Self {
        self.after_date = Some(date);
        self
    }

    /// Sets the read state.
    #[must_use]
    pub const fn with_read(mut self, is_read: bool) -> Self {
        self.is_read = Some(is_read);
        self
    }

    /// Sets the folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Sets the attachment-presence flag.
    #[must_use]
    pub const fn with_has_attachments(mut self, has_attachments: bool) -> Self {
        self.has_attachments = Some(has_attachments);
        self
    }

    /// Sets the attachment search text.
    #[must_use]
    pub fn with_attachment(mut self, query: impl Into<String>) -> Self {
        self.attachment = Some(query.into());
        self
    }

    /// Whether no criterion is supplied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        supplied_list(self.sender.as_ref()).is_none()
            && supplied_list(self.receiver.as_ref()).is_none()
            && supplied_text(self.subject.as_ref()).is_none()
            && supplied_text(self.body.as_ref()).is_none()
            && self.priority.is_none()
            && self.exact_date.is_none()
            && self.before_date.is_none()
            && self.after_date.is_none()
            && self.is_read.is_none()
            && supplied_text(self.folder.as_ref()).is_none()
            && self.has_attachments.is_none()
            && supplied_text(self.attachment.as_ref()).is_none()
    }
}

/// Turns a [`QuerySpec`] into one strategy per supplied criterion.
///
/// Strategies come out in a fixed order: sender, receiver, subject, body,
/// priority, exact date, before date, after date, read state, folder,
/// attachment presence, attachment text. A fresh set is built on every call.
#[derive(Clone)]
pub struct FilterBuilder {
    resolver: Arc<dyn IdentityResolver>,
    config: EngineConfig,
}

impl FilterBuilder {
    /// Creates a builder resolving identities through `resolver`.
    #[must_use]
    pub fn new(resolver: Arc<dyn IdentityResolver>, config: EngineConfig) -> Self {
        Self { resolver, config }
    }

    /// Builds the active strategies for `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidQuery`] if no criterion is supplied.
    pub fn build(&self, spec: &QuerySpec) -> Result<Vec<BoxedStrategy>> {
        let mut strategies: Vec<BoxedStrategy> = Vec::new();

        if let Some(targets) = supplied_list(spec.sender.as_ref()) {
            strategies.push(Box::new(SenderFilter::new(targets, Arc::clone(&self.resolver))));
        }
        if let Some(targets) = supplied_list(spec.receiver.as_ref()) {
            strategies.push(Box::new(ReceiverFilter::new(targets, Arc::clone(&self.resolver))));
        }
        if let Some(subject) = supplied_text(spec.subject.as_ref()) {
            strategies.push(Box::new(SubjectFilter::new(subject, self.config.subject_match)));
        }
        if let Some(body) = supplied_text(spec.body.as_ref()) {
            strategies.push(Box::new(BodyFilter::new(body, self.config.body_match)));
        }
        if let Some(priority) = spec.priority {
            strategies.push(Box::new(PriorityFilter::new(priority)));
        }
        if let Some(date) = spec.exact_date {
            strategies.push(Box::new(ExactDateFilter::new(date)));
        }
        if let Some(date) = spec.before_date {
            strategies.push(Box::new(
                BeforeDateFilter::new(date).with_window_days(self.config.date_window_days),
            ));
        }
        if let Some(date) = spec.after_date {
            strategies.push(Box::new(
                AfterDateFilter::new(date).with_window_days(self.config.date_window_days),
            ));
        }
        if let Some(is_read) = spec.is_read {
            strategies.push(Box::new(IsReadFilter::new(is_read)));
        }
        if let Some(folder) = supplied_text(spec.folder.as_ref()) {
            strategies.push(Box::new(FolderFilter::new(folder)));
        }
        if let Some(has_attachments) = spec.has_attachments {
            strategies.push(Box::new(HasAttachmentsFilter::new(has_attachments)));
        }
        if let Some(query) = supplied_text(spec.attachment.as_ref()) {
            strategies.push(Box::new(AttachmentFilter::new(query)));
        }

        if strategies.is_empty() {
            tracing::debug!("Rejecting query with no criteria");
            return Err(FilterError::InvalidQuery);
        }

        tracing::debug!(
            "Built strategies: {:?}",
            strategies.iter().map(|s| s.name()).collect::<Vec<_>>()
        );
        Ok(strategies)
    }

    /// Builds the strategies for `spec` and folds them with `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidQuery`] if no criterion is supplied.
    pub fn build_and_fold(&self, spec: &QuerySpec, mode: CombineMode) -> Result<BoxedStrategy> {
        fold(self.build(spec)?, mode)
    }
}

impl std::fmt::Debug for FilterBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FilterBuilder")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}
