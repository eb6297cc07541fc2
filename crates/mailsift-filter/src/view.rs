//! Output view of a ranked record.

use chrono::{DateTime, Utc};
use mailsift_core::{Attachment, IdentityResolver, MailId};
use serde::{Deserialize, Serialize};

use crate::{FilterError, Relation, Result, Scored};

/// Attachment summary: name and type, never content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AttachmentView {
    /// Original file name.
    pub file_name: String,
    /// MIME type.
    pub content_type: String,
}

impl From<&Attachment> for AttachmentView {
    fn from(attachment: &Attachment) -> Self {
        Self {
            file_name: attachment.file_name.clone(),
            content_type: attachment.content_type.clone(),
        }
    }
}

/// A search hit as shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmailView {
    /// Mail id.
    pub id: MailId,
    /// Sender's full name.
    pub sender: String,
    /// Receivers' full names, comma separated. Unknown receivers appear as
    /// their address.
    pub receiver: String,
    /// Subject line.
    pub subject: String,
    /// Body text, if any.
    pub body: Option<String>,
    /// Send time.
    pub timestamp: DateTime<Utc>,
    /// Priority.
    pub priority: i32,
    /// Read state.
    #[serde(rename = "isRead")]
    pub is_read: bool,
    /// Folder the mail is filed in.
    pub folder_name: String,
    /// Attachment summaries.
    pub attachments: Vec<AttachmentView>,
    /// Relevance score in `[0, 100]`.
    pub score: u8,
}

impl EmailView {
    /// Builds the view for a ranked record.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MissingRelation`] if the sender does not
    /// resolve to an identity.
    pub fn from_scored(scored: &Scored, resolver: &dyn IdentityResolver) -> Result<Self> {
        let mail = &scored.mail;
        let sender = resolver
            .resolve(&mail.sender)
            .ok_or(FilterError::MissingRelation {
                mail_id: mail.id,
                relation: Relation::Sender,
            })?;

        let receiver = mail
            .receivers
            .iter()
            .map(|email| {
                resolver
                    .resolve(email)
                    .map_or_else(|| email.clone(), |identity| identity.full_name())
            })
            .collect::<Vec<_>>()
            .join(", ");

        Ok(Self {
            id: mail.id,
            sender: sender.full_name(),
            receiver,
            subject: mail.subject.clone(),
            body: mail.body.clone(),
            timestamp: mail.timestamp,
            priority: mail.priority,
            is_read: mail.is_read,
            folder_name: mail.folder.clone(),
            attachments: mail.attachments.iter().map(AttachmentView::from).collect(),
            score: scored.score.value(),
        })
    }
}
