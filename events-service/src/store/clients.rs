//! Static in-memory client registry.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AppError;
use crate::models::Client;
use crate::utils::{Hasher, Password};

/// Registered API clients, built once at bootstrap and immutable afterwards.
/// Client secrets are held as argon2 digests, same discipline as account
/// passwords.
pub struct ClientRegistry {
    clients: HashMap<String, Client>,
    hasher: Arc<Hasher>,
}

impl ClientRegistry {
    pub fn new(hasher: Arc<Hasher>) -> Self {
        Self {
            clients: HashMap::new(),
            hasher,
        }
    }

    /// Register a client. Bootstrap-time only; the registry is wrapped in an
    /// `Arc` before serving starts, which freezes it.
    pub fn register(&mut self, client: Client) {
        self.clients.insert(client.client_id.clone(), client);
    }

    pub fn lookup(&self, client_id: &str) -> Option<&Client> {
        self.clients.get(client_id)
    }

    /// Verify the presented secret against the client's stored digest.
    pub fn authenticate(&self, client: &Client, secret: &Password) -> Result<bool, AppError> {
        self.hasher
            .verify(secret, &client.secret_hash)
            .map_err(AppError::Internal)
    }

    pub fn len(&self) -> usize {
        self.clients.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clients.is_empty()
    }
}
