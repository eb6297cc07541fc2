//! Single-criterion filter strategies.
//!
//! Each strategy captures exactly one query parameter and answers two
//! independent questions about a record: does it match, and how relevant is
//! it. There is no shared algorithm beyond that contract; every strategy
//! picks its own fuzzy-matching rule.

mod attachment;
mod date;
mod flag;
mod party;
mod priority;
mod text;

use mailsift_core::Mail;

pub use attachment::AttachmentFilter;
pub use date::{AfterDateFilter, BeforeDateFilter, ExactDateFilter};
pub use flag::{FolderFilter, HasAttachmentsFilter, IsReadFilter};
pub use party::{ReceiverFilter, SenderFilter};
pub use priority::PriorityFilter;
pub use text::{BodyFilter, SubjectFilter};

use crate::{Result, Score};

/// A matcher and scorer for one search criterion.
///
/// `matches` and `score` are independent: a record that does not match may
/// still be scored, which lets combinators rank near misses. Top-level
/// ranking keeps only matching records.
pub trait FilterStrategy: Send + Sync {
    /// Short name for logging.
    fn name(&self) -> &'static str;

    /// Whether `mail` satisfies the criterion.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::MissingRelation`](crate::FilterError::MissingRelation)
    /// if the strategy needs an identity the record does not resolve to.
    fn matches(&self, mail: &Mail) -> Result<bool>;

    /// Relevance of `mail` to the criterion.
    ///
    /// # Errors
    ///
    /// Same as [`matches`](Self::matches).
    fn score(&self, mail: &Mail) -> Result<Score>;
}

/// An owned, type-erased strategy.
pub type BoxedStrategy = Box<dyn FilterStrategy>;

impl<T: FilterStrategy + ?Sized> FilterStrategy for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        (**self).matches(mail)
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        (**self).score(mail)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use std::sync::Arc;

    use chrono::{DateTime, TimeZone, Utc};
    use mailsift_core::{Directory, Identity, Mail, MailId, UserId};

    pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0)
            .single()
            .unwrap_or_default()
    }

    pub fn mail(id: i64) -> Mail {
        Mail::new(MailId(id), UserId(1), "john.doe@example.com", "", at(2024, 6, 1))
    }

    pub fn directory() -> Arc<Directory> {
        Arc::new(
            [
                Identity::new(UserId(1), "John", "Doe", "john.doe@example.com"),
                Identity::new(UserId(2), "Alice", "Smith", "alice@example.com"),
                Identity::new(UserId(3), "Bob", "Jones", "bjones@corp.example"),
            ]
            .into_iter()
            .collect(),
        )
    }
}
