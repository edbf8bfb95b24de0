//! Test helper module for events-service integration tests.

#![allow(dead_code)]

use events_service::{
    build_router,
    config::{
        AdminSeedConfig, Environment, EventsConfig, OAuthConfig, SecurityConfig, SwaggerConfig,
        SwaggerMode,
    },
    dtos::TokenResponse,
    models::Role,
    utils::Password,
    AppState,
};
use std::collections::{HashMap, HashSet};
use std::net::SocketAddr;
use tokio::net::TcpListener;

pub const TEST_CLIENT_ID: &str = "c1";
pub const TEST_CLIENT_SECRET: &str = "s1";
pub const TEST_USER_EMAIL: &str = "a@x.com";
pub const TEST_USER_PASSWORD: &str = "pw1";

/// Test application with a running HTTP server on a random port.
pub struct TestApp {
    pub address: String,
    pub state: AppState,
    pub client: reqwest::Client,
}

impl TestApp {
    /// Spawn the test application with fresh in-memory stores.
    pub async fn spawn() -> Self {
        let config = create_test_config();
        let state = AppState::from_config(config).expect("Failed to build app state");
        state.seed().expect("Failed to seed bootstrap data");

        // A regular user account alongside the seeded admin
        state
            .auth_service
            .register(
                TEST_USER_EMAIL,
                &Password::new(TEST_USER_PASSWORD.to_string()),
                HashSet::from([Role::User]),
            )
            .expect("Failed to register test account");

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to random port");
        let addr: SocketAddr = listener.local_addr().unwrap();

        let app = build_router(state.clone())
            .await
            .expect("Failed to build router");
        tokio::spawn(async move {
            axum::serve(listener, app).await.expect("Server error");
        });

        TestApp {
            address: format!("http://{}", addr),
            state,
            client: reqwest::Client::new(),
        }
    }

    /// POST the token endpoint with form-encoded parameters.
    pub async fn token_request(&self, params: &HashMap<&str, &str>) -> reqwest::Response {
        self.client
            .post(format!("{}/oauth/token", self.address))
            .form(params)
            .send()
            .await
            .expect("Failed to execute token request")
    }

    /// Run a password grant with the standard test client and account.
    pub async fn password_grant(&self, scope: Option<&str>) -> reqwest::Response {
        let mut params = HashMap::from([
            ("grant_type", "password"),
            ("client_id", TEST_CLIENT_ID),
            ("client_secret", TEST_CLIENT_SECRET),
            ("username", TEST_USER_EMAIL),
            ("password", TEST_USER_PASSWORD),
        ]);
        if let Some(scope) = scope {
            params.insert("scope", scope);
        }
        self.token_request(&params).await
    }

    /// Password grant that must succeed; returns the parsed token pair.
    pub async fn grant_tokens(&self, scope: Option<&str>) -> TokenResponse {
        let response = self.password_grant(scope).await;
        assert_eq!(response.status(), 200, "password grant should succeed");
        response
            .json()
            .await
            .expect("Failed to parse token response")
    }

    pub async fn refresh_grant(&self, refresh_token: &str) -> reqwest::Response {
        let params = HashMap::from([
            ("grant_type", "refresh_token"),
            ("client_id", TEST_CLIENT_ID),
            ("client_secret", TEST_CLIENT_SECRET),
            ("refresh_token", refresh_token),
        ]);
        self.token_request(&params).await
    }

    pub async fn create_event(
        &self,
        access_token: Option<&str>,
        body: serde_json::Value,
    ) -> reqwest::Response {
        let mut request = self
            .client
            .post(format!("{}/api/events", self.address))
            .json(&body);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    pub async fn update_event(
        &self,
        access_token: Option<&str>,
        event_id: &str,
        body: serde_json::Value,
    ) -> reqwest::Response {
        let mut request = self
            .client
            .put(format!("{}/api/events/{}", self.address, event_id))
            .json(&body);
        if let Some(token) = access_token {
            request = request.bearer_auth(token);
        }
        request.send().await.expect("Failed to execute request")
    }

    /// Register an extra account and return an access token for it.
    pub async fn access_token_for(&self, email: &str, password: &str) -> String {
        self.state
            .auth_service
            .register(
                email,
                &Password::new(password.to_string()),
                HashSet::from([Role::User]),
            )
            .expect("Failed to register account");

        let params = HashMap::from([
            ("grant_type", "password"),
            ("client_id", TEST_CLIENT_ID),
            ("client_secret", TEST_CLIENT_SECRET),
            ("username", email),
            ("password", password),
        ]);
        let response = self.token_request(&params).await;
        assert_eq!(response.status(), 200);
        let tokens: TokenResponse = response.json().await.expect("Failed to parse tokens");
        tokens.access_token
    }
}

pub fn event_body(name: &str, base_price: u32) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "description": "integration test event",
        "location": "Gangnam station",
        "base_price": base_price,
    })
}

/// Create a test configuration with the TTLs from the end-to-end scenario
/// (access 600s, refresh 3600s).
pub fn create_test_config() -> EventsConfig {
    EventsConfig {
        environment: Environment::Dev,
        service_name: "events-service-test".to_string(),
        service_version: "0.0.0".to_string(),
        log_level: "debug".to_string(),
        port: 0,
        oauth: OAuthConfig {
            client_id: TEST_CLIENT_ID.to_string(),
            client_secret: TEST_CLIENT_SECRET.to_string(),
            access_token_ttl_seconds: 600,
            refresh_token_ttl_seconds: 3600,
            sweep_interval_seconds: 60,
        },
        admin: AdminSeedConfig {
            email: "admin@events.local".to_string(),
            password: "admin-test-password".to_string(),
        },
        security: SecurityConfig {
            allowed_origins: vec!["http://localhost:3000".to_string()],
        },
        swagger: SwaggerConfig {
            enabled: SwaggerMode::Disabled,
        },
    }
}
