//! Sender and receiver strategies.
//!
//! Both match a list of free-text targets ("alice", "bob jones",
//! "carol@example.com") against the name and address of a resolved identity.

use std::sync::Arc;

use mailsift_core::{Identity, IdentityResolver, Mail};

use super::FilterStrategy;
use crate::text::{identity_tokens, normalize};
use crate::{FilterError, Relation, Result, Score};

/// Lower-cased views of an identity used for matching.
struct Party {
    full_name: String,
    email: String,
    local_part: String,
}

impl Party {
    fn new(identity: &Identity) -> Self {
        Self {
            full_name: identity.full_name().to_lowercase(),
            email: identity.email.to_lowercase(),
            local_part: identity.local_part().to_lowercase(),
        }
    }

    /// Every whitespace-separated query token prefixes some name or
    /// local-part token.
    fn all_tokens_prefixed(&self, query: &str) -> bool {
        let haystack = format!("{} {}", self.full_name, self.local_part);
        let tokens: Vec<&str> = identity_tokens(&haystack).collect();
        query
            .split_whitespace()
            .all(|q| tokens.iter().any(|token| token.starts_with(q)))
    }

    fn matches(&self, query: &str) -> bool {
        if self.full_name.contains(query)
            || self.email.contains(query)
            || self.local_part.contains(query)
        {
            return true;
        }
        self.all_tokens_prefixed(query)
    }

    fn score(&self, query: &str) -> Score {
        let tier = if self.email == query {
            100
        } else if self.full_name == query {
            90
        } else if self.local_part == query {
            80
        } else if self.email.starts_with(query) {
            70
        } else if self.full_name.starts_with(query) {
            60
        } else if self.email.contains(query) {
            50
        } else if self.full_name.contains(query) {
            40
        } else if self.all_tokens_prefixed(query) {
            30
        } else {
            0
        };
        Score::new(tier)
    }
}

/// Normalized, non-empty search targets.
fn normalize_targets<I, S>(targets: I) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    targets
        .into_iter()
        .map(|t| normalize(t.as_ref()))
        .filter(|t| !t.is_empty())
        .collect()
}

fn best_score(parties: &[Party], targets: &[String]) -> Score {
    targets
        .iter()
        .flat_map(|target| parties.iter().map(move |party| party.score(target)))
        .max()
        .unwrap_or(Score::ZERO)
}

fn any_match(parties: &[Party], targets: &[String]) -> bool {
    targets
        .iter()
        .any(|target| parties.iter().any(|party| party.matches(target)))
}

/// Matches the sender of a mail by name or address.
pub struct SenderFilter {
    targets: Vec<String>,
    resolver: Arc<dyn IdentityResolver>,
}

impl SenderFilter {
    /// Creates a sender filter over one or more targets. Blank targets are
    /// ignored; with none left the filter matches nothing.
    #[must_use]
    pub fn new<I, S>(targets: I, resolver: Arc<dyn IdentityResolver>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            targets: normalize_targets(targets),
            resolver,
        }
    }

    fn sender(&self, mail: &Mail) -> Result<Party> {
        self.resolver
            .resolve(&mail.sender)
            .map(|identity| Party::new(&identity))
            .ok_or(FilterError::MissingRelation {
                mail_id: mail.id,
                relation: Relation::Sender,
            })
    }
}

impl FilterStrategy for SenderFilter {
    fn name(&self) -> &'static str {
        "sender"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        if self.targets.is_empty() {
            return Ok(false);
        }
        let sender = self.sender(mail)?;
        Ok(any_match(std::slice::from_ref(&sender), &self.targets))
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        if self.targets.is_empty() {
            return Ok(Score::ZERO);
        }
        let sender = self.sender(mail)?;
        Ok(best_score(std::slice::from_ref(&sender), &self.targets))
    }
}

/// Matches any receiver of a mail by name or address.
pub struct ReceiverFilter {
    targets: Vec<String>,
    resolver: Arc<dyn IdentityResolver>,
}

impl ReceiverFilter {
    /// Creates a receiver filter over one or more targets. Blank targets are
    /// ignored; with none left the filter matches nothing.
    #[must_use]
    pub fn new<I, S>(targets: I, resolver: Arc<dyn IdentityResolver>) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            targets: normalize_targets(targets),
            resolver,
        }
    }

    fn receivers(&self, mail: &Mail) -> Result<Vec<Party>> {
        mail.receivers
            .iter()
            .map(|email| {
                self.resolver
                    .resolve(email)
                    .map(|identity| Party::new(&identity))
                    .ok_or(FilterError::MissingRelation {
                        mail_id: mail.id,
                        relation: Relation::Receivers,
                    })
            })
            .collect()
    }
}

impl FilterStrategy for ReceiverFilter {
    fn name(&self) -> &'static str {
        "receiver"
    }

    fn matches(&self, mail: &Mail) -> Result<bool> {
        if self.targets.is_empty() {
            return Ok(false);
        }
        Ok(any_match(&self.receivers(mail)?, &self.targets))
    }

    fn score(&self, mail: &Mail) -> Result<Score> {
        if self.targets.is_empty() {
            return Ok(Score::ZERO);
        }
        Ok(best_score(&self.receivers(mail)?, &self.targets))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::strategy::fixtures::{directory, mail};

    fn sender(targets: &[&str]) -> SenderFilter {
        SenderFilter::new(targets.iter().copied(), directory())
    }

    #[test]
    fn test_sender_score_tiers() {
        let m = mail(1);
        let cases = [
            ("john.doe@example.com", 100),
            ("John Doe", 90),
            ("john.doe", 80),
            ("john.d", 70),
            ("john", 70),
            ("doe@", 50),
            ("n do", 40),
            ("jo do", 30),
            ("jane", 0),
        ];
        for (query, expected) in cases {
            assert_eq!(
                sender(&[query]).score(&m).unwrap().value(),
                expected,
                "query {query:?}"
            );
        }
    }

    #[test]
    fn test_name_prefix_tier() {
        // Full name starts with the query but the address does not
        let mut m = mail(1);
        m.sender = "bjones@corp.example".to_string();
        assert_eq!(sender(&["bob"]).score(&m).unwrap().value(), 60);
        assert_eq!(sender(&["jones"]).score(&m).unwrap().value(), 50);
    }

    #[test]
    fn test_sender_matches_substring_and_tokens() {
        let m = mail(1);
        assert!(sender(&["DOE"]).matches(&m).unwrap());
        assert!(sender(&["example.com"]).matches(&m).unwrap());
        assert!(sender(&["jo d"]).matches(&m).unwrap());
        assert!(!sender(&["alice"]).matches(&m).unwrap());
        assert!(!sender(&["jo x"]).matches(&m).unwrap());
    }

    #[test]
    fn test_multiple_targets_take_max() {
        let m = mail(1);
        let filter = sender(&["alice", "doe", "john.doe@example.com"]);
        assert!(filter.matches(&m).unwrap());
        assert_eq!(filter.score(&m).unwrap().value(), 100);
    }

    #[test]
    fn test_empty_targets_match_nothing() {
        let m = mail(1);
        let filter = sender(&["", "   "]);
        assert!(!filter.matches(&m).unwrap());
        assert_eq!(filter.score(&m).unwrap(), Score::ZERO);
    }

    #[test]
    fn test_unresolvable_sender_is_an_error() {
        let mut m = mail(9);
        m.sender = "ghost@nowhere.test".to_string();
        let err = sender(&["john"]).matches(&m).unwrap_err();
        assert!(matches!(
            err,
            FilterError::MissingRelation {
                relation: Relation::Sender,
                ..
            }
        ));
        assert!(sender(&["john"]).score(&m).is_err());
    }

    #[test]
    fn test_receiver_any_of_many() {
        let m = mail(1)
            .with_receiver("alice@example.com")
            .with_receiver("bjones@corp.example");
        let filter = ReceiverFilter::new(["bob"], directory());
        assert!(filter.matches(&m).unwrap());
        assert_eq!(filter.score(&m).unwrap().value(), 60);

        let filter = ReceiverFilter::new(["smith", "alice@example.com"], directory());
        assert_eq!(filter.score(&m).unwrap().value(), 100);

        let filter = ReceiverFilter::new(["carol"], directory());
        assert!(!filter.matches(&m).unwrap());
    }

    #[test]
    fn test_receiver_without_receivers_does_not_match() {
        let filter = ReceiverFilter::new(["alice"], directory());
        assert!(!filter.matches(&mail(1)).unwrap());
        assert_eq!(filter.score(&mail(1)).unwrap(), Score::ZERO);
    }

    #[test]
    fn test_unresolvable_receiver_is_an_error() {
        let m = mail(1).with_receiver("stranger@else.where");
        let filter = ReceiverFilter::new(["alice"], directory());
        assert!(matches!(
            filter.matches(&m),
            Err(FilterError::MissingRelation {
                relation: Relation::Receivers,
                ..
            })
        ));
    }
}
