//! Search service: store, builder, ranker and views in one call.

use std::sync::Arc;

use mailsift_core::{EngineConfig, MissingRelationPolicy, RecordStore, UserId};

use crate::{CombineMode, EmailView, FilterBuilder, FilterError, QuerySpec, Ranker, Result};

/// Runs user-scoped searches against a [`RecordStore`].
///
/// Every call builds its own strategies, so one service can serve
/// concurrent searches.
#[derive(Debug, Clone)]
pub struct SearchService<S> {
    store: S,
    config: EngineConfig,
}

impl<S: RecordStore> SearchService<S> {
    /// Creates a service over `store`.
    pub const fn new(store: S, config: EngineConfig) -> Self {
        Self { store, config }
    }

    /// Searches `user`'s mail, combining the criteria of `spec` with `mode`.
    ///
    /// # Errors
    ///
    /// Returns [`FilterError::InvalidQuery`] for an empty query (checked
    /// before touching the store), [`FilterError::Store`] if loading fails,
    /// or [`FilterError::MissingRelation`] under the propagate policy.
    pub async fn search(
        &self,
        user: UserId,
        spec: &QuerySpec,
        mode: CombineMode,
    ) -> Result<Vec<EmailView>> {
        if spec.is_empty() {
            return Err(FilterError::InvalidQuery);
        }

        let directory = Arc::new(self.store.directory().await?);
        let candidates = self.store.find_by_user(user).await?;
        tracing::debug!(
            "Searching {} candidates for user {user} with {mode}",
            candidates.len()
        );

        let strategy =
            FilterBuilder::new(directory.clone(), self.config).build_and_fold(spec, mode)?;
        let ranked = Ranker::new(self.config).rank_scored(strategy.as_ref(), candidates)?;

        let mut views = Vec::with_capacity(ranked.len());
        for scored in &ranked {
            match EmailView::from_scored(scored, directory.as_ref()) {
                Ok(view) => views.push(view),
                Err(FilterError::MissingRelation { mail_id, relation })
                    if self.config.missing_relation == MissingRelationPolicy::Exclude =>
                {
                    tracing::warn!(
                        "Excluding mail {mail_id} from results: cannot resolve {relation}"
                    );
                }
                Err(e) => return Err(e),
            }
        }
        Ok(views)
    }

    /// Searches with every criterion required.
    ///
    /// # Errors
    ///
    /// Same as [`search`](Self::search).
    pub async fn search_and(&self, user: UserId, spec: &QuerySpec) -> Result<Vec<EmailView>> {
        self.search(user, spec, CombineMode::And).await
    }

    /// Searches with any criterion sufficient.
    ///
    /// # Errors
    ///
    /// Same as [`search`](Self::search).
    pub async fn search_or(&self, user: UserId, spec: &QuerySpec) -> Result<Vec<EmailView>> {
        self.search(user, spec, CombineMode::Or).await
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use mailsift_core::{Attachment, Identity, Mail, MailId, MailRepository, MemoryStore};

    use super::*;
    use crate::strategy::fixtures::at;

    fn identities() -> Vec<Identity> {
        vec![
            Identity::new(UserId(1), "John", "Doe", "john.doe@example.com"),
            Identity::new(UserId(2), "Alice", "Smith", "alice@example.com"),
            Identity::new(UserId(3), "Bob", "Jones", "bjones@corp.example"),
        ]
    }

    fn mails() -> Vec<Mail> {
        vec![
            Mail::new(MailId(1), UserId(1), "alice@example.com", "Quarterly budget", at(2024, 3, 1))
                .with_receiver("john.doe@example.com")
                .with_priority(3),
            Mail::new(MailId(2), UserId(1), "bjones@corp.example", "Lunch?", at(2024, 3, 2))
                .with_receiver("john.doe@example.com")
                .with_priority(1)
                .with_read(true),
            Mail::new(MailId(3), UserId(1), "john.doe@example.com", "Invoice", at(2024, 3, 3))
                .with_receiver("alice@example.com")
                .with_folder("sent")
                .with_attachment(Attachment::new("Invoice_2024.pdf", "application/pdf")),
            // Not visible to John.
            Mail::new(MailId(4), UserId(2), "alice@example.com", "Private", at(2024, 3, 4))
                .with_receiver("bjones@corp.example")
                .with_priority(3),
        ]
    }

    fn memory_service() -> SearchService<MemoryStore> {
        SearchService::new(MemoryStore::new(identities(), mails()), EngineConfig::default())
    }

    fn ids(views: &[EmailView]) -> Vec<i64> {
        views.iter().map(|v| v.id.0).collect()
    }

    #[tokio::test]
    async fn test_search_and() {
        let spec = QuerySpec::new().with_priority(3).with_read(false);
        let views = memory_service().search_and(UserId(1), &spec).await.unwrap();
        assert_eq!(ids(&views), vec![1]);
        assert_eq!(views[0].sender, "Alice Smith");
        assert_eq!(views[0].score, 100);
    }

    #[tokio::test]
    async fn test_search_or() {
        let spec = QuerySpec::new().with_folder("sent").with_priority(3);
        let views = memory_service().search_or(UserId(1), &spec).await.unwrap();

        // Mail 1: priority exact (100) | folder miss (0) = 100.
        // Mail 3: folder hit (100) | priority 1 vs 3 (50) = 100.
        // Mail 2: folder miss | priority 1 vs 3 (50) = 50.
        assert_eq!(ids(&views), vec![1, 3, 2]);
        assert_eq!(views[2].score, 50);
    }

    #[tokio::test]
    async fn test_search_is_user_scoped() {
        let spec = QuerySpec::new().with_subject("private");
        let views = memory_service().search_and(UserId(1), &spec).await.unwrap();
        assert!(views.is_empty());

        let views = memory_service().search_and(UserId(2), &spec).await.unwrap();
        assert_eq!(ids(&views), vec![4]);
    }

    #[tokio::test]
    async fn test_empty_query_rejected_before_store() {
        // Unknown user would fail in the store; the query check comes first.
        let result = memory_service()
            .search_and(UserId(99), &QuerySpec::new())
            .await;
        assert!(matches!(result, Err(FilterError::InvalidQuery)));
    }

    #[tokio::test]
    async fn test_unknown_user() {
        let result = memory_service()
            .search_or(UserId(99), &QuerySpec::new().with_read(true))
            .await;
        assert!(matches!(
            result,
            Err(FilterError::Store(mailsift_core::Error::UserNotFound(_)))
        ));
    }

    #[tokio::test]
    async fn test_unresolved_sender_policy() {
        let mut store = MemoryStore::new(identities(), mails());
        store.add_mail(
            Mail::new(MailId(5), UserId(1), "ghost@nowhere", "Boo", at(2024, 3, 5))
                .with_receiver("john.doe@example.com"),
        );
        let spec = QuerySpec::new().with_read(false);

        let propagate = SearchService::new(store.clone(), EngineConfig::default());
        assert!(matches!(
            propagate.search_and(UserId(1), &spec).await,
            Err(FilterError::MissingRelation { mail_id: MailId(5), .. })
        ));

        let config = EngineConfig {
            missing_relation: MissingRelationPolicy::Exclude,
            ..EngineConfig::default()
        };
        let exclude = SearchService::new(store, config);
        let views = exclude.search_and(UserId(1), &spec).await.unwrap();
        assert_eq!(ids(&views), vec![1, 3]);
    }

    #[tokio::test]
    async fn test_search_sqlite_store() {
        let repo = MailRepository::in_memory().await.unwrap();
        for identity in identities() {
            repo.insert_user(&identity).await.unwrap();
        }
        for mail in mails() {
            repo.insert_mail(&mail).await.unwrap();
        }

        let service = SearchService::new(repo, EngineConfig::default());
        let spec = QuerySpec::new().with_attachment("invoice");
        let views = service.search_and(UserId(1), &spec).await.unwrap();

        assert_eq!(ids(&views), vec![3]);
        assert_eq!(views[0].receiver, "Alice Smith");
        assert_eq!(views[0].attachments[0].file_name, "Invoice_2024.pdf");
        assert_eq!(views[0].score, 17);
    }

    #[tokio::test]
    async fn test_exact_date_survives_sqlite_store() {
        let repo = MailRepository::in_memory().await.unwrap();
        for identity in identities() {
            repo.insert_user(&identity).await.unwrap();
        }
        let sent = at(2024, 3, 1) + chrono::Duration::nanoseconds(123_456_789);
        repo.insert_mail(&Mail::new(MailId(7), UserId(1), "alice@example.com", "Precise", sent))
            .await
            .unwrap();

        let service = SearchService::new(repo, EngineConfig::default());
        let spec = QuerySpec::new().with_exact_date(sent);
        let views = service.search_and(UserId(1), &spec).await.unwrap();

        assert_eq!(ids(&views), vec![7]);
        assert_eq!(views[0].timestamp, sent);
    }
}
