//! Mail record data models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::UserId;

/// Unique identifier for a mail record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MailId(pub i64);

impl MailId {
    /// Create a new mail ID.
    #[must_use]
    pub const fn new(id: i64) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for MailId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unique identifier for an attachment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AttachmentId(pub i64);

/// A file attached to a mail.
///
/// The binary payload is not part of the record. Only the text extracted at
/// upload time is kept, in `indexed_content`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    /// Unique identifier (None for unsaved attachments).
    #[serde(default)]
    pub id: Option<AttachmentId>,
    /// Original file name.
    pub file_name: String,
    /// MIME content type (e.g. `"application/pdf"`).
    #[serde(default)]
    pub content_type: String,
    /// Plain text extracted when the attachment was uploaded, if any.
    #[serde(default)]
    pub indexed_content: Option<String>,
}

impl Attachment {
    /// Creates an attachment with no extracted text.
    #[must_use]
    pub fn new(file_name: impl Into<String>, content_type: impl Into<String>) -> Self {
        Self {
            id: None,
            file_name: file_name.into(),
            content_type: content_type.into(),
            indexed_content: None,
        }
    }

    /// Sets the extracted text.
    #[must_use]
    pub fn with_indexed_content(mut self, text: impl Into<String>) -> Self {
        self.indexed_content = Some(text.into());
        self
    }

    /// Returns the extracted text, or an empty string if extraction never
    /// produced any.
    #[must_use]
    pub fn indexed_text(&self) -> &str {
        self.indexed_content.as_deref().unwrap_or_default()
    }
}

/// A searchable mail record.
///
/// `sender` and `receivers` hold email addresses. Names are looked up through
/// an [`IdentityResolver`](crate::IdentityResolver) when a search needs them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mail {
    /// Unique identifier.
    pub id: MailId,
    /// User owning this copy of the mail.
    pub owner: UserId,
    /// Sender email address.
    pub sender: String,
    /// Receiver email addresses.
    #[serde(default)]
    pub receivers: Vec<String>,
    /// Subject line.
    #[serde(default)]
    pub subject: String,
    /// Plain text body (absent for some drafts).
    #[serde(default)]
    pub body: Option<String>,
    /// When the mail was sent or saved.
    pub timestamp: DateTime<Utc>,
    /// Priority, conventionally 1 (lowest) to 5.
    #[serde(default = "default_priority")]
    pub priority: i32,
    /// Folder the owner filed the mail in.
    #[serde(default = "default_folder")]
    pub folder: String,
    /// Whether the owner has read the mail.
    #[serde(default)]
    pub is_read: bool,
    /// Attached files.
    #[serde(default)]
    pub attachments: Vec<Attachment>,
}

const fn default_priority() -> i32 {
    1
}

fn default_folder() -> String {
    crate::folders::INBOX.to_string()
}

impl Mail {
    /// Creates an unread inbox mail with priority 1 and no receivers.
    #[must_use]
    pub fn new(
        id: MailId,
        owner: UserId,
        sender: impl Into<String>,
        subject: impl Into<String>,
        timestamp: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            owner,
            sender: sender.into(),
            receivers: Vec::new(),
            subject: subject.into(),
            body: None,
            timestamp,
            priority: default_priority(),
            folder: default_folder(),
            is_read: false,
            attachments: Vec::new(),
        }
    }

    /// Adds a receiver address.
    #[must_use]
    pub fn with_receiver(mut self, email: impl Into<String>) -> Self {
        self.receivers.push(email.into());
        self
    }

    /// Sets the body text.
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Sets the priority.
    #[must_use]
    pub const fn with_priority(mut self, priority: i32) -> Self {
        self.priority = priority;
        self
    }

    /// Sets the folder.
    #[must_use]
    pub fn with_folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = folder.into();
        self
    }

    /// Sets the read flag.
    #[must_use]
    pub const fn with_read(mut self, is_read: bool) -> Self {
        self.is_read = is_read;
        self
    }

    /// Adds an attachment.
    #[must_use]
    pub fn with_attachment(mut self, attachment: Attachment) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Returns the body, treating a missing body as empty.
    #[must_use]
    pub fn body_text(&self) -> &str {
        self.body.as_deref().unwrap_or_default()
    }

    /// Returns true if at least one file is attached.
    #[must_use]
    pub fn has_attachments(&self) -> bool {
        !self.attachments.is_empty()
    }
}
