use std::env;

use crate::error::AppError;

/// Service configuration, loaded from the environment.
///
/// Token TTLs are configuration inputs rather than hard-coded constants;
/// defaults match the historical values (600s access, 3600s refresh).
#[derive(Debug, Clone)]
pub struct EventsConfig {
    pub environment: Environment,
    pub service_name: String,
    pub service_version: String,
    pub log_level: String,
    pub port: u16,
    pub oauth: OAuthConfig,
    pub admin: AdminSeedConfig,
    pub security: SecurityConfig,
    pub swagger: SwaggerConfig,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Environment {
    Dev,
    Prod,
}

/// The statically registered API client and its token TTLs.
#[derive(Debug, Clone)]
pub struct OAuthConfig {
    pub client_id: String,
    pub client_secret: String,
    pub access_token_ttl_seconds: u64,
    pub refresh_token_ttl_seconds: u64,
    /// Interval between background sweeps of dead token records.
    pub sweep_interval_seconds: u64,
}

/// Administrative account seeded at bootstrap.
#[derive(Debug, Clone)]
pub struct AdminSeedConfig {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct SecurityConfig {
    pub allowed_origins: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct SwaggerConfig {
    pub enabled: SwaggerMode,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SwaggerMode {
    Public,
    Disabled,
}

impl EventsConfig {
    pub fn from_env() -> Result<Self, AppError> {
        let env_str = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string());
        let environment: Environment = env_str
            .parse()
            .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?;

        let is_prod = environment == Environment::Prod;

        let config = EventsConfig {
            environment: environment.clone(),
            service_name: get_env("SERVICE_NAME", Some("events-service"), is_prod)?,
            service_version: get_env("SERVICE_VERSION", Some(env!("CARGO_PKG_VERSION")), is_prod)?,
            log_level: get_env("LOG_LEVEL", Some("info"), is_prod)?,
            port: get_env("PORT", Some("8080"), is_prod)?
                .parse()
                .map_err(|e: std::num::ParseIntError| {
                    AppError::ConfigError(anyhow::anyhow!(e.to_string()))
                })?,
            oauth: OAuthConfig {
                client_id: get_env("OAUTH_CLIENT_ID", Some("events-app"), is_prod)?,
                client_secret: get_env("OAUTH_CLIENT_SECRET", Some("dev-secret"), is_prod)?,
                access_token_ttl_seconds: parse_u64(
                    "ACCESS_TOKEN_TTL_SECONDS",
                    get_env("ACCESS_TOKEN_TTL_SECONDS", Some("600"), is_prod)?,
                )?,
                refresh_token_ttl_seconds: parse_u64(
                    "REFRESH_TOKEN_TTL_SECONDS",
                    get_env("REFRESH_TOKEN_TTL_SECONDS", Some("3600"), is_prod)?,
                )?,
                sweep_interval_seconds: parse_u64(
                    "TOKEN_SWEEP_INTERVAL_SECONDS",
                    get_env("TOKEN_SWEEP_INTERVAL_SECONDS", Some("60"), is_prod)?,
                )?,
            },
            admin: AdminSeedConfig {
                email: get_env("ADMIN_EMAIL", Some("admin@events.local"), is_prod)?,
                password: get_env("ADMIN_PASSWORD", Some("admin-dev-password"), is_prod)?,
            },
            security: SecurityConfig {
                allowed_origins: get_env("ALLOWED_ORIGINS", Some("http://localhost:3000"), is_prod)?
                    .split(',')
                    .map(|s| s.trim().to_string())
                    .collect(),
            },
            swagger: SwaggerConfig {
                enabled: get_env("ENABLE_SWAGGER", Some("public"), is_prod)?
                    .parse()
                    .map_err(|e: String| AppError::ConfigError(anyhow::anyhow!(e)))?,
            },
        };

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), AppError> {
        if self.port == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "PORT must be greater than 0"
            )));
        }

        if self.oauth.access_token_ttl_seconds == 0 || self.oauth.refresh_token_ttl_seconds == 0 {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "Token TTLs must be positive"
            )));
        }

        // Access tokens must never outlive the refresh token of the same issuance
        if self.oauth.access_token_ttl_seconds > self.oauth.refresh_token_ttl_seconds {
            return Err(AppError::ConfigError(anyhow::anyhow!(
                "ACCESS_TOKEN_TTL_SECONDS must not exceed REFRESH_TOKEN_TTL_SECONDS"
            )));
        }

        if self.environment == Environment::Prod {
            if self.security.allowed_origins.iter().any(|o| o == "*") {
                return Err(AppError::ConfigError(anyhow::anyhow!(
                    "Wildcard CORS origin not allowed in production"
                )));
            }

            if self.swagger.enabled == SwaggerMode::Public {
                tracing::warn!("Swagger is publicly accessible in production");
            }
        }

        Ok(())
    }
}

fn parse_u64(key: &str, value: String) -> Result<u64, AppError> {
    value
        .parse()
        .map_err(|_| AppError::ConfigError(anyhow::anyhow!("{} must be a positive integer", key)))
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required in production but not set",
                    key
                ))))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(format!(
                    "{} is required but not set",
                    key
                ))))
            }
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "dev" => Ok(Environment::Dev),
            "prod" => Ok(Environment::Prod),
            _ => Err(format!("Invalid environment: {}", s)),
        }
    }
}

impl std::str::FromStr for SwaggerMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "public" => Ok(SwaggerMode::Public),
            "disabled" => Ok(SwaggerMode::Disabled),
            _ => Err(format!("Invalid swagger mode: {}", s)),
        }
    }
}
