//! Account model and the principal derived from it.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::utils::Digest;

/// Account roles; closed set, mapping 1:1 to authorization authorities.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    User,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::User => "USER",
        }
    }
}

/// A registered account. The password digest is computed by the caller before
/// `AccountStore::save` and is never serialized or exposed after creation.
#[derive(Debug, Clone)]
pub struct Account {
    /// Unique identity (email).
    pub email: String,
    pub password_hash: Digest,
    pub roles: HashSet<Role>,
}

impl Account {
    pub fn new(email: String, password_hash: Digest, roles: HashSet<Role>) -> Self {
        Self {
            email,
            password_hash,
            roles,
        }
    }
}

/// Resolved identity carried through a request after authentication or token
/// validation. Holds identity and roles by composition; no password material.
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub email: String,
    pub roles: HashSet<Role>,
}

impl From<&Account> for Principal {
    fn from(account: &Account) -> Self {
        Self {
            email: account.email.clone(),
            roles: account.roles.clone(),
        }
    }
}
