use events_service::{build_router, config::EventsConfig, error::AppError, observability, AppState};
use std::net::SocketAddr;
use tokio::signal;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    // Load configuration - fail fast if invalid
    let config = EventsConfig::from_env()?;

    observability::init_tracing(&config.log_level);

    tracing::info!(
        service = %config.service_name,
        version = %config.service_version,
        environment = ?config.environment,
        "Starting events service"
    );

    // Build each component once and pass references explicitly
    let state = AppState::from_config(config.clone())?;

    // Register the configured client and seed the administrative account
    state.seed()?;
    tracing::info!(
        client_id = %config.oauth.client_id,
        admin = %config.admin.email,
        "Bootstrap data seeded"
    );

    // Background reclamation of expired/revoked tokens. Lookups never rely
    // on this; it only frees memory.
    let tokens = state.tokens.clone();
    let sweep_interval = std::time::Duration::from_secs(config.oauth.sweep_interval_seconds);
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(sweep_interval);
        loop {
            interval.tick().await;
            let reclaimed = tokens.sweep();
            if reclaimed > 0 {
                tracing::debug!(reclaimed, "Token store swept");
            }
        }
    });

    let app = build_router(state).await?;

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    tracing::info!(address = %addr, "Listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Service shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received SIGINT, starting graceful shutdown");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        },
    }
}
