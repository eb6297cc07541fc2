//! Identity resolution.

use std::collections::HashMap;

use super::model::Identity;

/// Maps an email address to the identity that owns it.
///
/// Resolution is synchronous: strategies call it in the middle of a ranking
/// pass, so implementations must answer from memory.
pub trait IdentityResolver: Send + Sync {
    /// Returns the identity for `email`, or `None` if no user owns it.
    fn resolve(&self, email: &str) -> Option<Identity>;
}

/// In-memory identity directory keyed by lower-cased email address.
#[derive(Debug, Clone, Default)]
pub struct Directory {
    by_email: HashMap<String, Identity>,
}

impl Directory {
    /// Creates an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an identity, replacing any previous entry for the same address.
    pub fn insert(&mut self, identity: Identity) {
        self.by_email
            .insert(identity.email.trim().to_lowercase(), identity);
    }

    /// Number of known identities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_email.len()
    }

    /// Returns true if the directory holds no identities.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_email.is_empty()
    }
}

impl FromIterator<Identity> for Directory {
    fn from_iter<I: IntoIterator<Item = Identity>>(iter: I) -> Self {
        let mut directory = Self::new();
        for identity in iter {
            directory.insert(identity);
        }
        directory
    }
}

impl IdentityResolver for Directory {
    fn resolve(&self, email: &str) -> Option<Identity> {
        self.by_email.get(&email.trim().to_lowercase()).cloned()
    }
}
