pub mod config;
pub mod dtos;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod observability;
pub mod services;
pub mod store;
pub mod utils;

use axum::{
    extract::State,
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post},
    Json, Router,
};
use std::collections::HashSet;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::{
    openapi::security::SecurityScheme,
    Modify, OpenApi,
};
use utoipa_swagger_ui::SwaggerUi;

use crate::config::EventsConfig;
use crate::error::AppError;
use crate::models::{Client, GrantType, Role, Scope};
use crate::services::{AuthService, TokenIssuer};
use crate::store::{AccountStore, ClientRegistry, EventStore, TokenStore};
use crate::utils::{Hasher, Password};

#[derive(OpenApi)]
#[openapi(
    paths(
        health_check,
        handlers::token::token,
        handlers::events::query_events,
        handlers::events::get_event,
        handlers::events::create_event,
        handlers::events::update_event,
    ),
    components(
        schemas(
            dtos::auth::TokenRequest,
            dtos::auth::TokenResponse,
            dtos::events::EventRequest,
            dtos::events::EventResponse,
            dtos::events::EventListResponse,
            error::ErrorResponse,
            error::OAuthErrorResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Authentication", description = "Token issuance"),
        (name = "Events", description = "Event resources"),
        (name = "Observability", description = "Service health")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    utoipa::openapi::security::HttpBuilder::new()
                        .scheme(utoipa::openapi::security::HttpAuthScheme::Bearer)
                        .build(),
                ),
            );
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub config: EventsConfig,
    pub accounts: AccountStore,
    pub clients: Arc<ClientRegistry>,
    pub tokens: TokenStore,
    pub events: EventStore,
    pub auth_service: AuthService,
    pub token_issuer: TokenIssuer,
}

impl AppState {
    /// Build every component once and wire them explicitly; no ambient
    /// singletons.
    pub fn from_config(config: EventsConfig) -> Result<Self, AppError> {
        let hasher = Arc::new(Hasher::new());

        let accounts = AccountStore::new();
        let tokens = TokenStore::new();
        let events = EventStore::new();

        // The statically configured client; its secret is hashed with the
        // same discipline as account passwords.
        let secret_hash = hasher
            .hash(&Password::new(config.oauth.client_secret.clone()))
            .map_err(AppError::Internal)?;
        let mut registry = ClientRegistry::new(hasher.clone());
        registry.register(Client::new(
            config.oauth.client_id.clone(),
            secret_hash,
            HashSet::from([GrantType::Password, GrantType::RefreshToken]),
            HashSet::from([Scope::Read, Scope::Write]),
            config.oauth.access_token_ttl_seconds,
            config.oauth.refresh_token_ttl_seconds,
        ));
        let clients = Arc::new(registry);

        let auth_service = AuthService::new(accounts.clone(), hasher)?;
        let token_issuer = TokenIssuer::new(clients.clone(), auth_service.clone(), tokens.clone());

        Ok(Self {
            config,
            accounts,
            clients,
            tokens,
            events,
            auth_service,
            token_issuer,
        })
    }

    /// Seed the administrative account (hash before save).
    pub fn seed(&self) -> Result<(), AppError> {
        self.auth_service.register(
            &self.config.admin.email,
            &Password::new(self.config.admin.password.clone()),
            HashSet::from([Role::Admin, Role::User]),
        )?;
        Ok(())
    }
}

pub async fn build_router(state: AppState) -> Result<Router, AppError> {
    let mut app = Router::new().route("/health", get(health_check));

    let swagger_enabled = match state.config.environment {
        config::Environment::Dev => true,
        config::Environment::Prod => state.config.swagger.enabled == config::SwaggerMode::Public,
    };

    if swagger_enabled {
        app =
            app.merge(SwaggerUi::new("/docs").url("/.well-known/openapi.json", ApiDoc::openapi()));
    } else {
        // Keep the OpenAPI JSON available for programmatic access
        app = app.route(
            "/.well-known/openapi.json",
            get(|| async { Json(ApiDoc::openapi()) }),
        );
    }

    let cors_origins: Vec<HeaderValue> = state
        .config
        .security
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::error!("Invalid CORS origin '{}': {}", origin, e);
                None
            }
        })
        .collect();

    let app = app
        .route("/oauth/token", post(handlers::token::token))
        .route(
            "/api/events",
            get(handlers::events::query_events).post(handlers::events::create_event),
        )
        .route(
            "/api/events/:id",
            get(handlers::events::get_event).put(handlers::events::update_event),
        )
        .layer(from_fn_with_state(
            state.clone(),
            middleware::resolve_principal,
        ))
        .with_state(state)
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                    version = ?request.version(),
                )
            }),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(cors_origins)
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
                .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]),
        );

    Ok(app)
}

/// Service health check
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy")
    ),
    tag = "Observability"
)]
pub async fn health_check(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "healthy",
        "service": state.config.service_name,
        "version": state.config.service_version,
        "environment": format!("{:?}", state.config.environment),
        "stores": {
            "accounts": state.accounts.len(),
            "clients": state.clients.len(),
            "tokens": state.tokens.len(),
            "events": state.events.len(),
        }
    }))
}
