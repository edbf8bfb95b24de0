//! Bearer-token resolution middleware.

use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;

use crate::models::{Principal, TokenKind};
use crate::services::AuthContext;
use crate::AppState;

/// Resolve a presented access token into an [`AuthContext`] stored in the
/// request extensions.
///
/// Absent, expired, revoked or wrong-kind tokens leave the request
/// anonymous; read operations are public, and the route gate rejects
/// anonymous mutations downstream. No error is produced here.
pub async fn resolve_principal(State(state): State<AppState>, mut req: Request, next: Next) -> Response {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    if let Some(token) = token {
        match state.tokens.lookup(token) {
            Some(record) if record.kind == TokenKind::Access => {
                // The account behind a live token can only be missing if the
                // stores diverged; treat it as anonymous.
                if let Some(account) = state.accounts.find(&record.account) {
                    req.extensions_mut().insert(AuthContext {
                        principal: Principal::from(&account),
                        scopes: record.scopes.clone(),
                    });
                } else {
                    tracing::warn!(account = %record.account, "Token resolved to a missing account");
                }
            }
            _ => {
                tracing::debug!("Presented token did not resolve to a valid access token");
            }
        }
    }

    next.run(req).await
}

/// Extractor for the optional authentication state.
pub struct MaybeAuth(pub Option<AuthContext>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for MaybeAuth
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(MaybeAuth(parts.extensions.get::<AuthContext>().cloned()))
    }
}
