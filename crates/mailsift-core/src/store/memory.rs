//! Vector-backed record store.

use crate::{Directory, Error, Identity, Mail, Result, UserId};

use super::RecordStore;

/// A [`RecordStore`] holding everything in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    identities: Vec<Identity>,
    mails: Vec<Mail>,
}

impl MemoryStore {
    /// Creates a store from identities and mails.
    #[must_use]
    pub const fn new(identities: Vec<Identity>, mails: Vec<Mail>) -> Self {
        Self { identities, mails }
    }

    /// Adds an identity.
    pub fn add_identity(&mut self, identity: Identity) {
        self.identities.push(identity);
    }

    /// Adds a mail.
    pub fn add_mail(&mut self, mail: Mail) {
        self.mails.push(mail);
    }

    fn user_email(&self, user: UserId) -> Result<&str> {
        self.identities
            .iter()
            .find(|identity| identity.user_id == user)
            .map(|identity| identity.email.as_str())
            .ok_or_else(|| Error::UserNotFound(user.to_string()))
    }
}

impl RecordStore for MemoryStore {
    async fn find_by_user(&self, user: UserId) -> Result<Vec<Mail>> {
        let email = self.user_email(user)?;
        let mails = self
            .mails
            .iter()
            .filter(|mail| {
                mail.owner == user
                    || mail.sender.eq_ignore_ascii_case(email)
                    || mail.receivers.iter().any(|r| r.eq_ignore_ascii_case(email))
            })
            .cloned()
            .collect();
        Ok(mails)
    }

    async fn directory(&self) -> Result<Directory> {
        Ok(self.identities.iter().cloned().collect())
    }
}
