use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Token endpoint request (form encoded, RFC 6749 parameter names).
/// Which fields are required depends on `grant_type`.
#[derive(Debug, Deserialize, ToSchema)]
pub struct TokenRequest {
    #[schema(example = "password")]
    pub grant_type: String,

    /// Client credentials may come here or via HTTP Basic.
    pub client_id: Option<String>,
    pub client_secret: Option<String>,

    /// Password grant: account identity.
    #[schema(example = "a@x.com")]
    pub username: Option<String>,
    /// Password grant: account password.
    pub password: Option<String>,
    /// Password grant: requested scopes, space separated.
    #[schema(example = "read write")]
    pub scope: Option<String>,

    /// Refresh grant: the refresh token value.
    pub refresh_token: Option<String>,
}

/// Successful token endpoint response.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct TokenResponse {
    pub access_token: String,
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Seconds until the access token expires.
    #[schema(example = 600)]
    pub expires_in: i64,
    pub refresh_token: String,
    /// Seconds until the refresh token expires.
    #[schema(example = 3600)]
    pub refresh_expires_in: i64,
    #[schema(example = "read write")]
    pub scope: String,
}

impl TokenResponse {
    pub fn new(
        access_token: String,
        expires_in: i64,
        refresh_token: String,
        refresh_expires_in: i64,
        scope: String,
    ) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in,
            refresh_token,
            refresh_expires_in,
            scope,
        }
    }
}
