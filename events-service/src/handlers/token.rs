//! OAuth token endpoint.

use axum::{
    extract::State,
    http::{header, HeaderMap, StatusCode},
    response::IntoResponse,
    Form, Json,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};

use crate::{
    dtos::TokenRequest,
    error::AppError,
    models::GrantType,
    services::ClientCredentials,
    utils::Password,
    AppState,
};

/// Exchange credentials for tokens (password and refresh_token grants)
#[utoipa::path(
    post,
    path = "/oauth/token",
    request_body(content = TokenRequest, content_type = "application/x-www-form-urlencoded"),
    responses(
        (status = 200, description = "Tokens issued", body = TokenResponse),
        (status = 400, description = "Invalid grant or scope", body = OAuthErrorResponse),
        (status = 401, description = "Invalid client", body = OAuthErrorResponse)
    ),
    tag = "Authentication"
)]
pub async fn token(
    State(state): State<AppState>,
    headers: HeaderMap,
    Form(req): Form<TokenRequest>,
) -> Result<impl IntoResponse, AppError> {
    let credentials = client_credentials(&headers, &req)?;

    // Unknown grant_type strings fall under "disallowed grant"
    let grant_type: GrantType = req
        .grant_type
        .parse()
        .map_err(|e: String| AppError::InvalidClient(anyhow::anyhow!(e)))?;

    let response = match grant_type {
        GrantType::Password => {
            let username = req
                .username
                .as_deref()
                .ok_or_else(|| missing_parameter("username"))?;
            let password = req
                .password
                .clone()
                .ok_or_else(|| missing_parameter("password"))?;

            state.token_issuer.password_grant(
                &credentials,
                username,
                &Password::new(password),
                req.scope.as_deref(),
            )?
        }
        GrantType::RefreshToken => {
            let refresh_token = req
                .refresh_token
                .as_deref()
                .ok_or_else(|| missing_parameter("refresh_token"))?;

            state.token_issuer.refresh_grant(&credentials, refresh_token)?
        }
    };

    Ok((StatusCode::OK, Json(response)))
}

fn missing_parameter(name: &str) -> AppError {
    AppError::InvalidGrant(anyhow::anyhow!("Missing parameter: {}", name))
}

/// Extract client credentials from HTTP Basic or the form body; Basic takes
/// precedence when both are present.
fn client_credentials(headers: &HeaderMap, req: &TokenRequest) -> Result<ClientCredentials, AppError> {
    if let Some(encoded) = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Basic "))
    {
        let decoded = BASE64
            .decode(encoded)
            .map_err(|_| bad_client_credentials())?;
        let decoded = String::from_utf8(decoded).map_err(|_| bad_client_credentials())?;
        let (client_id, secret) = decoded.split_once(':').ok_or_else(bad_client_credentials)?;

        return Ok(ClientCredentials {
            client_id: client_id.to_string(),
            secret: Password::new(secret.to_string()),
        });
    }

    match (req.client_id.as_deref(), req.client_secret.as_deref()) {
        (Some(client_id), Some(secret)) => Ok(ClientCredentials {
            client_id: client_id.to_string(),
            secret: Password::new(secret.to_string()),
        }),
        _ => Err(bad_client_credentials()),
    }
}

fn bad_client_credentials() -> AppError {
    AppError::InvalidClient(anyhow::anyhow!("Missing or malformed client credentials"))
}
