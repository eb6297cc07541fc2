//! Mailbox fixture files.
//!
//! A fixture is a JSON document holding the users and mails to load:
//!
//! ```json
//! {
//!   "users": [
//!     { "user_id": 1, "first_name": "Alice", "last_name": "Smith", "email": "alice@example.com" }
//!   ],
//!   "mails": [
//!     {
//!       "id": 1,
//!       "owner": 1,
//!       "sender": "alice@example.com",
//!       "subject": "Hi",
//!       "timestamp": "2024-05-01T09:00:00Z"
//!     }
//!   ]
//! }
//! ```

use std::path::Path;

use anyhow::{Context, Result};
use mailsift_core::{Identity, Mail, MailRepository};
use serde::Deserialize;
use tracing::info;

/// Users and mails read from a fixture file.
#[derive(Debug, Default, Deserialize)]
pub struct Mailbox {
    /// Identities, inserted first.
    #[serde(default)]
    pub users: Vec<Identity>,
    /// Mails; each owner must be among the users.
    #[serde(default)]
    pub mails: Vec<Mail>,
}

impl Mailbox {
    /// Parses a fixture document.
    pub fn parse(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Invalid mailbox fixture")
    }

    /// Reads and parses a fixture file.
    pub async fn load(path: &Path) -> Result<Self> {
        let json = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read mailbox {}", path.display()))?;
        Self::parse(&json)
    }

    /// Writes every user, then every mail, into `repo`.
    pub async fn import(&self, repo: &MailRepository) -> Result<()> {
        for identity in &self.users {
            repo.insert_user(identity)
                .await
                .with_context(|| format!("Failed to store user {}", identity.email))?;
        }
        for mail in &self.mails {
            repo.insert_mail(mail)
                .await
                .with_context(|| format!("Failed to store mail {}", mail.id))?;
        }
        info!(
            "Imported {} users and {} mails",
            self.users.len(),
            self.mails.len()
        );
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailsift_core::{MailId, RecordStore, UserId};

    use super::*;

    const FIXTURE: &str = r#"{
        "users": [
            { "user_id": 1, "first_name": "John", "last_name": "Doe", "email": "john@example.com" },
            {
                "user_id": 2,
                "first_name": "Alice",
                "last_name": "Smith",
                "email": "alice@example.com"
            }
        ],
        "mails": [
            {
                "id": 10,
                "owner": 1,
                "sender": "alice@example.com",
                "receivers": ["john@example.com"],
                "subject": "Invoice",
                "timestamp": "2024-05-01T09:00:00Z",
                "priority": 3,
                "attachments": [
                    { "file_name": "invoice.pdf", "content_type": "application/pdf" }
                ]
            }
        ]
    }"#;

    #[test]
    fn test_parse_defaults() {
        let mailbox = Mailbox::parse(FIXTURE).unwrap();
        assert_eq!(mailbox.users.len(), 2);
        let mail = &mailbox.mails[0];
        assert_eq!(mail.id, MailId(10));
        assert_eq!(mail.folder, "inbox");
        assert!(!mail.is_read);
        assert!(mail.body.is_none());
        assert_eq!(mail.attachments[0].indexed_text(), "");
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(Mailbox::parse("{ not json").is_err());
    }

    #[tokio::test]
    async fn test_import() {
        let repo = MailRepository::in_memory().await.unwrap();
        Mailbox::parse(FIXTURE)
            .unwrap()
            .import(&repo)
            .await
            .unwrap();

        let mails = repo.find_by_user(UserId(1)).await.unwrap();
        assert_eq!(mails.len(), 1);
        assert_eq!(mails[0].receivers, vec!["john@example.com".to_string()]);
        assert_eq!(repo.directory().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_import_twice() {
        let repo = MailRepository::in_memory().await.unwrap();
        let mailbox = Mailbox::parse(FIXTURE).unwrap();
        mailbox.import(&repo).await.unwrap();
        mailbox.import(&repo).await.unwrap();

        let mails = repo.find_by_user(UserId(1)).await.unwrap();
        assert_eq!(mails.len(), 1);
        assert_eq!(mails[0].receivers.len(), 1);
        assert_eq!(mails[0].attachments.len(), 1);
    }
}
