//! Server-side storage backing for visitor carts.
//!
//! Each browser session gets a visitor id; the vault scopes the core
//! library's well-known cart key to that visitor. Tabs sharing a session
//! share one entry - last write from any tab wins, with no reconciliation.

use std::time::Duration;

use moka::sync::Cache;
use stride_core::storage::{Storage, StorageError};

/// Upper bound on concurrently tracked visitors.
const MAX_VISITOR_ENTRIES: u64 = 100_000;

/// Entries idle this long are evicted (abandoned carts).
const ENTRY_IDLE_EXPIRY: Duration = Duration::from_secs(30 * 24 * 60 * 60);

/// Bounded in-memory store holding every visitor's persisted cart bytes.
#[derive(Clone)]
pub struct CartVault {
    entries: Cache<String, Vec<u8>>,
}

impl CartVault {
    /// Create an empty vault with capacity and idle-expiry bounds.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: Cache::builder()
                .max_capacity(MAX_VISITOR_ENTRIES)
                .time_to_idle(ENTRY_IDLE_EXPIRY)
                .build(),
        }
    }

    /// A [`Storage`] handle scoped to one visitor's namespace.
    #[must_use]
    pub fn for_visitor(&self, visitor_id: &str) -> VisitorStorage {
        VisitorStorage {
            entries: self.entries.clone(),
            visitor_id: visitor_id.to_owned(),
        }
    }
}

impl Default for CartVault {
    fn default() -> Self {
        Self::new()
    }
}

/// One visitor's view of the vault.
///
/// Keys passed through the [`Storage`] trait (the core library always uses
/// its single well-known cart key) are prefixed with the visitor id, so
/// visitors never observe each other's entries.
pub struct VisitorStorage {
    entries: Cache<String, Vec<u8>>,
    visitor_id: String,
}

impl VisitorStorage {
    fn scoped(&self, key: &str) -> String {
        format!("{}:{key}", self.visitor_id)
    }
}

impl Storage for VisitorStorage {
    fn read(&self, key: &str) -> Result<Option<Vec<u8>>, StorageError> {
        Ok(self.entries.get(&self.scoped(key)))
    }

    fn write(&self, key: &str, value: &[u8]) -> Result<(), StorageError> {
        self.entries.insert(self.scoped(key), value.to_vec());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.entries.invalidate(&self.scoped(key));
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_visitors_are_isolated() {
        let vault = CartVault::new();
        let alice = vault.for_visitor("alice");
        let bob = vault.for_visitor("bob");

        alice.write("cart", b"alice's cart").unwrap();
        assert!(bob.read("cart").unwrap().is_none());
        assert_eq!(
            alice.read("cart").unwrap().as_deref(),
            Some(&b"alice's cart"[..])
        );
    }

    #[test]
    fn test_same_visitor_last_write_wins() {
        // Two tabs sharing one session share the entry; no merging.
        let vault = CartVault::new();
        let tab_one = vault.for_visitor("shared");
        let tab_two = vault.for_visitor("shared");

        tab_one.write("cart", b"from tab one").unwrap();
        tab_two.write("cart", b"from tab two").unwrap();
        assert_eq!(
            tab_one.read("cart").unwrap().as_deref(),
            Some(&b"from tab two"[..])
        );
    }

    #[test]
    fn test_remove_clears_only_that_visitor() {
        let vault = CartVault::new();
        let alice = vault.for_visitor("alice");
        let bob = vault.for_visitor("bob");
        alice.write("cart", b"a").unwrap();
        bob.write("cart", b"b").unwrap();

        alice.remove("cart").unwrap();
        assert!(alice.read("cart").unwrap().is_none());
        assert_eq!(bob.read("cart").unwrap().as_deref(), Some(&b"b"[..]));
    }
}
