//! # In-Memory Account Directory
//!
//! Reference slug registry. Owns the slug → payee mapping the submission
//! pipeline resolves receivers through. Slug and account CRUD beyond
//! registration live in an upstream service.

use async_trait::async_trait;
use parking_lot::RwLock;
use pg_03_submission::{AccountDirectory, DirectoryError, ReceiverProfile};
use shared_types::Address;
use std::collections::HashMap;
use tracing::debug;

/// In-memory slug directory.
#[derive(Default)]
pub struct InMemoryDirectory {
    entries: RwLock<HashMap<String, ReceiverProfile>>,
}

impl InMemoryDirectory {
    /// Create an empty directory.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a slug for a payee.
    ///
    /// Returns `false` when the slug is already taken; the existing claim is
    /// left untouched.
    pub fn register(&self, slug: &str, address: Address, display_name: &str) -> bool {
        let mut entries = self.entries.write();
        if entries.contains_key(slug) {
            return false;
        }
        entries.insert(
            slug.to_string(),
            ReceiverProfile {
                address,
                display_name: display_name.to_string(),
            },
        );
        debug!(slug, %address, "Slug registered");
        true
    }

    /// Number of claimed slugs.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// True when no slug is claimed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl AccountDirectory for InMemoryDirectory {
    async fn resolve_slug(&self, slug: &str) -> Result<Option<ReceiverProfile>, DirectoryError> {
        Ok(self.entries.read().get(slug).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_register_and_resolve() {
        let directory = InMemoryDirectory::new();
        assert!(directory.register("alice", Address([0xBB; 20]), "Alice"));

        let profile = directory.resolve_slug("alice").await.unwrap().unwrap();
        assert_eq!(profile.address, Address([0xBB; 20]));
        assert_eq!(profile.display_name, "Alice");
    }

    #[tokio::test]
    async fn test_slug_conflict_rejected() {
        let directory = InMemoryDirectory::new();
        assert!(directory.register("alice", Address([0xBB; 20]), "Alice"));
        assert!(!directory.register("alice", Address([0xCC; 20]), "Impostor"));

        // First claim wins.
        let profile = directory.resolve_slug("alice").await.unwrap().unwrap();
        assert_eq!(profile.address, Address([0xBB; 20]));
    }

    #[tokio::test]
    async fn test_unknown_slug_resolves_none() {
        let directory = InMemoryDirectory::new();
        assert!(directory.resolve_slug("nobody").await.unwrap().is_none());
    }
}
