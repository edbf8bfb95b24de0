//! In-memory credential store.

use dashmap::DashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::Account;

/// Holds registered accounts keyed by email. The caller must hash the
/// password before `save`; this store never sees plaintext.
#[derive(Clone, Default)]
pub struct AccountStore {
    accounts: Arc<DashMap<String, Account>>,
}

impl AccountStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Persist an account. A duplicate identity is a conflict, never a
    /// silent merge.
    pub fn save(&self, account: Account) -> Result<Account, AppError> {
        match self.accounts.entry(account.email.clone()) {
            dashmap::mapref::entry::Entry::Occupied(_) => Err(AppError::Conflict(anyhow::anyhow!(
                "Account already exists: {}",
                account.email
            ))),
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(account.clone());
                Ok(account)
            }
        }
    }

    /// A missing identity is a normal negative result, not an error.
    pub fn find(&self, email: &str) -> Option<Account> {
        self.accounts.get(email).map(|entry| entry.clone())
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::utils::Digest;
    use std::collections::HashSet;

    fn account(email: &str) -> Account {
        Account::new(
            email.to_string(),
            Digest::new("$argon2id$stub".to_string()),
            HashSet::from([Role::User]),
        )
    }

    #[test]
    fn test_save_and_find() {
        let store = AccountStore::new();
        store.save(account("a@x.com")).unwrap();

        let found = store.find("a@x.com").expect("account should exist");
        assert_eq!(found.email, "a@x.com");
        assert!(store.find("missing@x.com").is_none());
    }

    #[test]
    fn test_duplicate_save_is_a_conflict() {
        let store = AccountStore::new();
        store.save(account("a@x.com")).unwrap();

        let err = store.save(account("a@x.com")).unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
        assert_eq!(store.len(), 1);
    }
}
