//! Record stores: user-scoped candidate retrieval.
//!
//! The search engine never scopes records itself. A [`RecordStore`] hands it
//! every mail the requesting user sent, received or owns, together with a
//! [`Directory`] for resolving the addresses on those mails.

mod memory;
mod repository;

use std::future::Future;

pub use memory::MemoryStore;
pub use repository::MailRepository;

use crate::{Directory, Mail, Result, UserId};

/// Source of candidate records for a search.
pub trait RecordStore: Send + Sync {
    /// Every mail visible to `user`: sent by them, addressed to them, or
    /// owned by them.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UserNotFound`](crate::Error::UserNotFound) for an
    /// unknown user, or a storage error.
    fn find_by_user(&self, user: UserId) -> impl Future<Output = Result<Vec<Mail>>> + Send;

    /// Snapshot of all known identities.
    ///
    /// # Errors
    ///
    /// Returns an error if the identities cannot be loaded.
    fn directory(&self) -> impl Future<Output = Result<Directory>> + Send;
}
