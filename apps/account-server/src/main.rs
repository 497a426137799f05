//! Account Server binary.

use std::net::SocketAddr;

use account_server::{
    config::Config, create_app, create_state, create_store, init_tracing, seed,
    services::spawn_birthday_sweep,
};
use tokio::signal;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;

    init_tracing(&config.log_level);

    if config.uses_default_secret() {
        warn!("Using the default JWT secret; set ACCOUNTS_JWT_SECRET");
    }

    info!(
        unique_key = %config.unique_key,
        expiry_policy = ?config.expiry_policy,
        "Starting Account Server"
    );

    let store = create_store(&config);
    let state = create_state(&config, store);

    if config.seed_users {
        seed::seed_users(&state.accounts).await;
    }

    if let Some(period) = config.birthday_sweep_interval {
        spawn_birthday_sweep(state.clone(), period);
    }

    let app = create_app(state);

    let addr: SocketAddr = config.server_addr().parse()?;
    info!(addr = %addr, "Server listening");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        }
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        }
    }
}
