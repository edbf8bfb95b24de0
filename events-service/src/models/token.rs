//! Token records held by the in-memory token store.

use chrono::{DateTime, Duration, Utc};
use rand::RngCore;
use std::collections::HashSet;

use crate::models::Scope;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Access,
    Refresh,
}

/// A minted token. Created only by the token issuer; the `revoked` flag is
/// the only mutation a record ever sees.
#[derive(Debug, Clone)]
pub struct TokenRecord {
    /// Opaque, globally unique, unguessable value.
    pub value: String,
    pub kind: TokenKind,
    /// Owning account identity (email).
    pub account: String,
    /// Issuing client identity.
    pub client_id: String,
    pub scopes: HashSet<Scope>,
    pub issued_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
    pub revoked: bool,
}

impl TokenRecord {
    pub fn new(
        kind: TokenKind,
        account: String,
        client_id: String,
        scopes: HashSet<Scope>,
        ttl_seconds: u64,
    ) -> Self {
        let now = Utc::now();
        Self {
            value: generate_token_value(),
            kind,
            account,
            client_id,
            scopes,
            issued_at: now,
            expires_at: now + Duration::seconds(ttl_seconds as i64),
            revoked: false,
        }
    }

    pub fn is_expired(&self) -> bool {
        Utc::now() >= self.expires_at
    }

    /// Validity is computed from the record itself, never from mere presence
    /// in the store.
    pub fn is_valid(&self) -> bool {
        !self.is_expired() && !self.revoked
    }

    /// Seconds remaining until expiry, floored at zero.
    pub fn expires_in(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds().max(0)
    }
}

/// Generate a 256-bit random token value, hex encoded.
///
/// Collision probability at this width is negligible; the store still treats
/// an actual collision as an internal invariant violation.
pub fn generate_token_value() -> String {
    let mut bytes = [0u8; 32];
    rand::rngs::OsRng.fill_bytes(&mut bytes);
    hex::encode(bytes)
}
