//! Authentication manager: account credentials to principal.

use std::collections::HashSet;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::{generate_token_value, Account, Principal, Role};
use crate::store::AccountStore;
use crate::utils::{Digest, Hasher, Password};

#[derive(Clone)]
pub struct AuthService {
    accounts: AccountStore,
    hasher: Arc<Hasher>,
    /// Digest of a random throwaway secret, verified against when the
    /// identity is unknown so both failure paths cost a full verification.
    decoy_hash: Digest,
}

impl AuthService {
    pub fn new(accounts: AccountStore, hasher: Arc<Hasher>) -> Result<Self, AppError> {
        let decoy_hash = hasher
            .hash(&Password::new(generate_token_value()))
            .map_err(AppError::Internal)?;
        Ok(Self {
            accounts,
            hasher,
            decoy_hash,
        })
    }

    /// Validate an (identity, password) pair and produce a principal.
    ///
    /// A missing account and a wrong password yield the same error and the
    /// same verification cost, so the caller cannot enumerate identities by
    /// response or by timing.
    pub fn authenticate(&self, email: &str, password: &Password) -> Result<Principal, AppError> {
        match self.accounts.find(email) {
            Some(account) => {
                if self.hasher.verify(password, &account.password_hash)? {
                    Ok(Principal::from(&account))
                } else {
                    Err(invalid_credentials())
                }
            }
            None => {
                // Never matches; burns the same work as a real check
                self.hasher.verify(password, &self.decoy_hash)?;
                Err(invalid_credentials())
            }
        }
    }

    /// Register an account, hashing the password before it reaches the
    /// store. Used by bootstrap seeding.
    pub fn register(
        &self,
        email: &str,
        password: &Password,
        roles: HashSet<Role>,
    ) -> Result<Account, AppError> {
        let password_hash = self.hasher.hash(password).map_err(AppError::Internal)?;
        let account = self
            .accounts
            .save(Account::new(email.to_string(), password_hash, roles))?;

        tracing::info!(email = %account.email, "Account registered");
        Ok(account)
    }
}

fn invalid_credentials() -> AppError {
    AppError::InvalidGrant(anyhow::anyhow!("Invalid account credentials"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service_with_account() -> AuthService {
        let service = AuthService::new(AccountStore::new(), Arc::new(Hasher::new())).unwrap();
        service
            .register(
                "a@x.com",
                &Password::new("pw1".to_string()),
                HashSet::from([Role::User]),
            )
            .unwrap();
        service
    }

    #[test]
    fn test_authenticate_success() {
        let service = service_with_account();
        let principal = service
            .authenticate("a@x.com", &Password::new("pw1".to_string()))
            .unwrap();

        assert_eq!(principal.email, "a@x.com");
        assert!(principal.roles.contains(&Role::User));
    }

    #[test]
    fn test_wrong_password_and_unknown_account_look_alike() {
        let service = service_with_account();

        let wrong_password = service
            .authenticate("a@x.com", &Password::new("nope".to_string()))
            .unwrap_err();
        let unknown_account = service
            .authenticate("b@x.com", &Password::new("pw1".to_string()))
            .unwrap_err();

        assert!(matches!(wrong_password, AppError::InvalidGrant(_)));
        assert!(matches!(unknown_account, AppError::InvalidGrant(_)));
        assert_eq!(wrong_password.to_string(), unknown_account.to_string());
    }

    #[test]
    fn test_unknown_account_pays_for_a_verification() {
        let service = service_with_account();

        let start = std::time::Instant::now();
        service
            .authenticate("a@x.com", &Password::new("nope".to_string()))
            .unwrap_err();
        let wrong_password = start.elapsed();

        let start = std::time::Instant::now();
        service
            .authenticate("b@x.com", &Password::new("pw1".to_string()))
            .unwrap_err();
        let unknown_account = start.elapsed();

        // Both failure paths run an argon2 verification; without the decoy
        // the unknown-account path returns orders of magnitude faster
        assert!(unknown_account * 10 > wrong_password);
    }

    #[test]
    fn test_register_duplicate_conflicts() {
        let service = service_with_account();
        let err = service
            .register(
                "a@x.com",
                &Password::new("other".to_string()),
                HashSet::from([Role::User]),
            )
            .unwrap_err();
        assert!(matches!(err, AppError::Conflict(_)));
    }
}
