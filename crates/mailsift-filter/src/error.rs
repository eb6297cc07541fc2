//! Error types for filtering and ranking.

use mailsift_core::MailId;
use thiserror::Error;

/// Relational data a strategy needs from a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Relation {
    /// The sender's identity.
    Sender,
    /// The receivers' identities.
    Receivers,
}

impl std::fmt::Display for Relation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sender => f.write_str("sender"),
            Self::Receivers => f.write_str("receivers"),
        }
    }
}

/// Errors that can occur while building or running a search.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The query supplied no criteria.
    #[error("Invalid query: at least one filter criterion is required")]
    InvalidQuery,

    /// A record's sender or receivers could not be resolved to an identity.
    #[error("Mail {mail_id}: cannot resolve {relation}")]
    MissingRelation {
        /// Record being evaluated.
        mail_id: MailId,
        /// The relation that failed to resolve.
        relation: Relation,
    },

    /// Loading candidates or identities failed.
    #[error("Store error: {0}")]
    Store(#[from] mailsift_core::Error),
}

/// Result type alias using [`FilterError`].
pub type Result<T> = std::result::Result<T, FilterError>;
