//! Mail records and their attachments.
//!
//! A [`Mail`] is the unit a search pass scans. Records are read-only
//! snapshots: the engine never mutates them, so a candidate set can be shared
//! freely between concurrent searches.

mod model;

pub use model::{Attachment, AttachmentId, Mail, MailId};

/// Well-known folder names used by the mail server.
pub mod folders {
    /// Received mail.
    pub const INBOX: &str = "inbox";
    /// Mail sent by the owner.
    pub const SENT: &str = "sent";
    /// Unsent drafts.
    pub const DRAFT: &str = "draft";
    /// Deleted mail awaiting cleanup.
    pub const TRASH: &str = "trash";
}
