//! Account store trait definitions.

use async_trait::async_trait;
use entities::{NewUser, Settings, UniqueKey, User, UserId};

use crate::AccountResult;

/// Trait for account storage operations.
///
/// Each method is atomic: an implementation must never let two mutations
/// interleave or expose a half-applied one.
#[async_trait]
pub trait AccountStore: Send + Sync {
    /// Returns the field users are keyed by.
    fn unique_key(&self) -> UniqueKey;

    // =========================================================================
    // User operations
    // =========================================================================

    /// Inserts a new user, assigning the next id.
    ///
    /// Fails with `AlreadyExists` if another user has the same unique key.
    async fn insert_user(&self, user: NewUser) -> AccountResult<User>;

    /// Gets a user by unique key.
    async fn get_user_by_key(&self, key: &str) -> AccountResult<Option<User>>;

    /// Gets a user by id.
    async fn get_user(&self, id: UserId) -> AccountResult<Option<User>>;

    /// Lists all users in insertion order.
    async fn list_users(&self) -> AccountResult<Vec<User>>;

    /// Returns the number of users.
    async fn count_users(&self) -> AccountResult<usize>;

    // =========================================================================
    // Token operations
    // =========================================================================

    /// Stores `token` on the user with the given unique key, replacing any
    /// previous token.
    async fn set_token(&self, key: &str, token: String) -> AccountResult<()>;

    /// Gets the user currently holding exactly this token.
    async fn get_user_by_token(&self, token: &str) -> AccountResult<Option<User>>;

    // =========================================================================
    // Actor operations (the acting user is identified by token)
    // =========================================================================

    /// Adds `target` to the token holder's subscriptions.
    async fn subscribe(&self, token: &str, target: UserId) -> AccountResult<()>;

    /// Removes `target` from the token holder's subscriptions.
    async fn unsubscribe(&self, token: &str, target: UserId) -> AccountResult<()>;

    /// Applies notification settings to the token holder.
    async fn update_settings(&self, token: &str, settings: Settings) -> AccountResult<User>;
}
