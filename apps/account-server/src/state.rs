//! Application state.

use std::sync::Arc;

use account_store::{AccountService, AccountStore};

/// Shared application state.
#[derive(Debug)]
pub struct AppState<S: AccountStore> {
    /// Account directory.
    pub accounts: AccountService<S>,
}

impl<S: AccountStore> AppState<S> {
    /// Creates new application state.
    pub fn new(accounts: AccountService<S>) -> Self {
        Self { accounts }
    }
}

/// Type alias for shared state.
pub type SharedState<S> = Arc<AppState<S>>;

/// Creates shared state from the account service.
pub fn create_shared_state<S: AccountStore>(accounts: AccountService<S>) -> SharedState<S> {
    Arc::new(AppState::new(accounts))
}
