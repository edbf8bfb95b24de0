//! Token issuer: password and refresh-token grants.

use std::collections::HashSet;
use std::sync::Arc;

use crate::dtos::TokenResponse;
use crate::error::AppError;
use crate::models::{format_scopes, parse_scopes, Client, GrantType, Scope, TokenKind, TokenRecord};
use crate::services::AuthService;
use crate::store::{ClientRegistry, TokenStore};
use crate::utils::Password;

/// Client credentials presented on the token endpoint.
#[derive(Debug)]
pub struct ClientCredentials {
    pub client_id: String,
    pub secret: Password,
}

#[derive(Clone)]
pub struct TokenIssuer {
    clients: Arc<ClientRegistry>,
    auth: AuthService,
    tokens: TokenStore,
}

impl TokenIssuer {
    pub fn new(clients: Arc<ClientRegistry>, auth: AuthService, tokens: TokenStore) -> Self {
        Self {
            clients,
            auth,
            tokens,
        }
    }

    /// Password grant: exchange account credentials for an access/refresh
    /// token pair.
    pub fn password_grant(
        &self,
        credentials: &ClientCredentials,
        username: &str,
        password: &Password,
        requested_scope: Option<&str>,
    ) -> Result<TokenResponse, AppError> {
        let client = self.resolve_client(credentials, GrantType::Password)?;

        let principal = self.auth.authenticate(username, password)?;

        let granted = granted_scopes(&client, requested_scope)?;

        let access = TokenRecord::new(
            TokenKind::Access,
            principal.email.clone(),
            client.client_id.clone(),
            granted.clone(),
            client.access_token_ttl,
        );
        let refresh = TokenRecord::new(
            TokenKind::Refresh,
            principal.email.clone(),
            client.client_id.clone(),
            granted.clone(),
            client.refresh_token_ttl,
        );

        self.tokens.insert(access.clone())?;
        self.tokens.insert(refresh.clone())?;

        tracing::info!(
            account = %principal.email,
            client_id = %client.client_id,
            scope = %format_scopes(&granted),
            "Password grant issued"
        );

        Ok(TokenResponse::new(
            access.value,
            access.expires_at.signed_duration_since(access.issued_at).num_seconds(),
            refresh.value,
            refresh
                .expires_at
                .signed_duration_since(refresh.issued_at)
                .num_seconds(),
            format_scopes(&granted),
        ))
    }

    /// Refresh grant: exchange a valid refresh token for a new access token.
    ///
    /// The refresh token is not consumed; it stays valid until its own
    /// expiry. Deliberate policy: simplicity over one-time-use rotation.
    pub fn refresh_grant(
        &self,
        credentials: &ClientCredentials,
        refresh_token: &str,
    ) -> Result<TokenResponse, AppError> {
        let client = self.resolve_client(credentials, GrantType::RefreshToken)?;

        let record = self
            .tokens
            .lookup(refresh_token)
            .filter(|r| r.kind == TokenKind::Refresh)
            .filter(|r| r.client_id == client.client_id)
            .ok_or_else(|| AppError::InvalidGrant(anyhow::anyhow!("Invalid refresh token")))?;

        let access = TokenRecord::new(
            TokenKind::Access,
            record.account.clone(),
            client.client_id.clone(),
            record.scopes.clone(),
            client.access_token_ttl,
        );
        self.tokens.insert(access.clone())?;

        tracing::info!(
            account = %record.account,
            client_id = %client.client_id,
            "Access token refreshed"
        );

        let refresh_expires_in = record.expires_in();
        Ok(TokenResponse::new(
            access.value,
            access.expires_at.signed_duration_since(access.issued_at).num_seconds(),
            record.value,
            refresh_expires_in,
            format_scopes(&record.scopes),
        ))
    }

    /// Resolve and authenticate the client, and check the grant type is
    /// allowed for it. All three failures collapse into `InvalidClient`.
    fn resolve_client(
        &self,
        credentials: &ClientCredentials,
        grant_type: GrantType,
    ) -> Result<Client, AppError> {
        let client = self
            .clients
            .lookup(&credentials.client_id)
            .ok_or_else(|| AppError::InvalidClient(anyhow::anyhow!("Unknown client")))?;

        if !self.clients.authenticate(client, &credentials.secret)? {
            return Err(AppError::InvalidClient(anyhow::anyhow!(
                "Client secret mismatch"
            )));
        }

        if !client.is_grant_allowed(grant_type) {
            return Err(AppError::InvalidClient(anyhow::anyhow!(
                "Grant type {} not allowed for client",
                grant_type
            )));
        }

        Ok(client.clone())
    }
}

/// Intersect explicitly requested scopes with the client's allowed set;
/// default to the full allowed set when nothing was requested.
fn granted_scopes(
    client: &Client,
    requested_scope: Option<&str>,
) -> Result<HashSet<Scope>, AppError> {
    let requested = match requested_scope.map(str::trim) {
        None | Some("") => return Ok(client.scopes.clone()),
        Some(raw) => {
            parse_scopes(raw).map_err(|e| AppError::InvalidScope(anyhow::anyhow!(e)))?
        }
    };

    let granted: HashSet<Scope> = requested
        .into_iter()
        .filter(|scope| client.is_scope_allowed(*scope))
        .collect();

    if granted.is_empty() {
        return Err(AppError::InvalidScope(anyhow::anyhow!(
            "Requested scopes not permitted for client"
        )));
    }
    Ok(granted)
}
