//! Registered API clients, grant types and scopes.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::utils::Digest;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantType {
    Password,
    RefreshToken,
}

impl GrantType {
    pub fn as_str(&self) -> &'static str {
        match self {
            GrantType::Password => "password",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

impl fmt::Display for GrantType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for GrantType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "password" => Ok(GrantType::Password),
            "refresh_token" => Ok(GrantType::RefreshToken),
            _ => Err(format!("Unsupported grant type: {}", s)),
        }
    }
}

/// Named permission bucket a token is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    Read,
    Write,
}

impl Scope {
    pub fn as_str(&self) -> &'static str {
        match self {
            Scope::Read => "read",
            Scope::Write => "write",
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Scope {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "read" => Ok(Scope::Read),
            "write" => Ok(Scope::Write),
            _ => Err(format!("Unknown scope: {}", s)),
        }
    }
}

/// Parse a space-separated scope parameter. Empty input yields an empty set.
pub fn parse_scopes(raw: &str) -> Result<HashSet<Scope>, String> {
    raw.split_whitespace().map(str::parse).collect()
}

/// Render a scope set as a stable space-separated string.
pub fn format_scopes(scopes: &HashSet<Scope>) -> String {
    let mut sorted: Vec<&Scope> = scopes.iter().collect();
    sorted.sort();
    sorted
        .iter()
        .map(|s| s.as_str())
        .collect::<Vec<_>>()
        .join(" ")
}

/// A registered API client. Immutable after registration.
#[derive(Debug, Clone)]
pub struct Client {
    pub client_id: String,
    pub secret_hash: Digest,
    pub grant_types: HashSet<GrantType>,
    pub scopes: HashSet<Scope>,
    /// Access-token TTL in seconds.
    pub access_token_ttl: u64,
    /// Refresh-token TTL in seconds.
    pub refresh_token_ttl: u64,
}

impl Client {
    pub fn new(
        client_id: String,
        secret_hash: Digest,
        grant_types: HashSet<GrantType>,
        scopes: HashSet<Scope>,
        access_token_ttl: u64,
        refresh_token_ttl: u64,
    ) -> Self {
        Self {
            client_id,
            secret_hash,
            grant_types,
            scopes,
            access_token_ttl,
            refresh_token_ttl,
        }
    }

    pub fn is_grant_allowed(&self, grant_type: GrantType) -> bool {
        self.grant_types.contains(&grant_type)
    }

    pub fn is_scope_allowed(&self, scope: Scope) -> bool {
        self.scopes.contains(&scope)
    }
}
