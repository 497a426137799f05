//! Account Server
//!
//! HTTP front end for the account directory: registration, login with
//! session tokens, birthday listings and the subscription graph between
//! users.

pub mod api;
pub mod config;
pub mod error;
pub mod middleware;
pub mod seed;
pub mod services;
pub mod state;

use std::sync::Arc;

use account_store::{AccountService, AccountStore, MemoryAccountStore};
use auth::{JwtConfig, JwtManager};
use axum::Router;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::state::{AppState, create_shared_state};

/// Creates the application router with all routes configured.
pub fn create_app<S: AccountStore + 'static>(state: Arc<AppState<S>>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    api::create_router()
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

/// Creates the in-memory store keyed by the configured field.
pub fn create_store(config: &Config) -> MemoryAccountStore {
    MemoryAccountStore::with_unique_key(config.unique_key)
}

/// Creates the application state with the given configuration and store.
pub fn create_state<S: AccountStore>(config: &Config, store: S) -> Arc<AppState<S>> {
    let jwt_config = JwtConfig::new(config.jwt_secret.as_str())
        .with_expiration_hours(config.jwt_expiration_hours)
        .with_expiry_policy(config.expiry_policy);
    let accounts = AccountService::new(store, JwtManager::new(jwt_config));

    create_shared_state(accounts)
}

/// Initializes tracing with the given log level.
pub fn init_tracing(log_level: &str) {
    use tracing_subscriber::{EnvFilter, fmt, prelude::*};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();
}
