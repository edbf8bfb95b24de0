//! Concurrent in-memory token store.
//!
//! The only mutable state shared across request tasks. DashMap gives per-key
//! atomicity: a lookup racing a revoke observes either the pre- or the
//! post-revoke record, never a partial one. No global lock is held across
//! the store.

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::TokenRecord;

#[derive(Clone, Default)]
pub struct TokenStore {
    tokens: Arc<DashMap<String, TokenRecord>>,
}

impl TokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a freshly minted record. A value collision means the token
    /// generator's uniqueness invariant broke; that is an internal error,
    /// not a user-facing one.
    pub fn insert(&self, record: TokenRecord) -> Result<(), AppError> {
        match self.tokens.entry(record.value.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::Internal(anyhow::anyhow!(
                "Token value collision in store"
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    /// Look up a token, treating expired and revoked records as absent.
    ///
    /// Expiry is detected lazily here; a dead record may still be physically
    /// present until swept, and is reclaimed opportunistically on access.
    pub fn lookup(&self, value: &str) -> Option<TokenRecord> {
        let record = self.tokens.get(value)?.clone();
        if record.is_valid() {
            return Some(record);
        }

        // The guard from `get` is dropped above; reclaim only if the record
        // is still invalid at removal time.
        self.tokens.remove_if(value, |_, r| !r.is_valid());
        None
    }

    /// Mark a token revoked. Terminal state; idempotent for already-revoked
    /// or missing tokens.
    pub fn revoke(&self, value: &str) {
        if let Some(mut entry) = self.tokens.get_mut(value) {
            entry.revoked = true;
        }
    }

    /// Reclaim expired and revoked entries. Validity never depends on this
    /// running; it only frees memory.
    pub fn sweep(&self) -> usize {
        let before = self.tokens.len();
        self.tokens.retain(|_, record| record.is_valid());
        before.saturating_sub(self.tokens.len())
    }

    /// Physical entry count, dead records included.
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Scope, TokenKind};
    use chrono::{Duration, Utc};
    use std::collections::HashSet;

    fn record(ttl_seconds: u64) -> TokenRecord {
        TokenRecord::new(
            TokenKind::Access,
            "a@x.com".to_string(),
            "c1".to_string(),
            HashSet::from([Scope::Write]),
            ttl_seconds,
        )
    }

    #[test]
    fn test_insert_then_lookup() {
        let store = TokenStore::new();
        let token = record(600);
        let value = token.value.clone();

        store.insert(token).unwrap();
        let found = store.lookup(&value).expect("token should be valid");
        assert_eq!(found.account, "a@x.com");
    }

    #[test]
    fn test_collision_is_an_internal_error() {
        let store = TokenStore::new();
        let token = record(600);
        let duplicate = token.clone();

        store.insert(token).unwrap();
        let err = store.insert(duplicate).unwrap_err();
        assert!(matches!(err, AppError::Internal(_)));
    }

    #[test]
    fn test_expired_lookup_is_invalid_without_sweep() {
        let store = TokenStore::new();
        let mut token = record(600);
        token.expires_at = Utc::now() - Duration::seconds(1);
        let value = token.value.clone();

        store.insert(token).unwrap();
        assert!(store.lookup(&value).is_none());
        // Opportunistically reclaimed on access
        assert_eq!(store.len(), 0);
    }

    #[test]
    fn test_revoke_is_immediate_and_idempotent() {
        let store = TokenStore::new();
        let token = record(600);
        let value = token.value.clone();
        store.insert(token).unwrap();

        store.revoke(&value);
        assert!(store.lookup(&value).is_none());

        // Idempotent on already-revoked and on missing values
        store.revoke(&value);
        store.revoke("no-such-token");
    }

    #[test]
    fn test_sweep_reclaims_dead_entries() {
        let store = TokenStore::new();

        let live = record(600);
        let live_value = live.value.clone();
        store.insert(live).unwrap();

        let mut expired = record(600);
        expired.expires_at = Utc::now() - Duration::seconds(1);
        store.insert(expired).unwrap();

        let revoked = record(600);
        let revoked_value = revoked.value.clone();
        store.insert(revoked).unwrap();
        store.revoke(&revoked_value);

        assert_eq!(store.sweep(), 2);
        assert_eq!(store.len(), 1);
        assert!(store.lookup(&live_value).is_some());
    }

    #[test]
    fn test_concurrent_inserts_and_lookups() {
        let store = TokenStore::new();
        let mut handles = Vec::new();

        for _ in 0..8 {
            let store = store.clone();
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    let token = record(600);
                    let value = token.value.clone();
                    store.insert(token).unwrap();
                    assert!(store.lookup(&value).is_some());
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(store.len(), 8 * 50);
    }

    #[test]
    fn test_lookup_racing_revoke_is_atomic() {
        let store = TokenStore::new();
        let token = record(600);
        let value = token.value.clone();
        store.insert(token).unwrap();

        let reader = {
            let store = store.clone();
            let value = value.clone();
            std::thread::spawn(move || {
                // Either pre-revoke (valid) or post-revoke (absent); a valid
                // result must never carry the revoked flag.
                for _ in 0..1000 {
                    if let Some(record) = store.lookup(&value) {
                        assert!(!record.revoked);
                    }
                }
            })
        };

        store.revoke(&value);
        reader.join().unwrap();
        assert!(store.lookup(&value).is_none());
    }
}
