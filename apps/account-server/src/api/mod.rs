//! API endpoints.

pub mod users;

use std::sync::Arc;

use account_store::AccountStore;
use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Creates the API router with all endpoints.
pub fn create_router<S: AccountStore + 'static>() -> Router<Arc<AppState<S>>> {
    Router::new()
        // Account endpoints
        .route("/user/register", post(users::register))
        .route("/user/login", post(users::login))
        .route("/user/info", get(users::get_user_info))
        // Listing endpoints
        .route("/user/all", get(users::list_all))
        .route("/user/list-today", get(users::list_today))
        .route("/user/list", get(users::list_profiles))
        // Subscription and settings endpoints
        .route("/user/subscribe", post(users::subscribe))
        .route("/user/unsubscribe", post(users::unsubscribe))
        .route("/user/settings", post(users::update_settings))
        // Health check
        .route("/health", get(health_check))
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
