//! In-memory account store implementation.

use std::{collections::HashMap, sync::Arc};

use async_trait::async_trait;
use entities::{NewUser, Settings, UniqueKey, User, UserId, DEFAULT_DAYS_TO_NOTIFICATION};
use tokio::sync::RwLock;

use crate::{AccountError, AccountResult, AccountStore};

/// User records plus lookup indices, guarded as one unit.
#[derive(Debug, Default)]
struct Directory {
    /// Users in insertion order. Never shrinks, so indices stay valid.
    users: Vec<User>,
    /// Unique key -> position in `users`.
    by_key: HashMap<String, usize>,
    /// Current token -> position in `users`.
    by_token: HashMap<String, usize>,
}

impl Directory {
    fn next_id(&self) -> UserId {
        self.users.iter().map(|u| u.id).max().map_or(1, |id| id + 1)
    }

    fn contains_id(&self, id: UserId) -> bool {
        self.users.iter().any(|u| u.id == id)
    }

    fn position_of_token(&self, token: &str) -> AccountResult<usize> {
        self.by_token
            .get(token)
            .copied()
            .ok_or(AccountError::Unauthorized)
    }
}

/// In-memory account store.
///
/// A single lock guards the whole collection and its indices: every mutation
/// runs inside one write-lock critical section.
#[derive(Debug, Default, Clone)]
pub struct MemoryAccountStore {
    unique_key: UniqueKey,
    directory: Arc<RwLock<Directory>>,
}

impl MemoryAccountStore {
    /// Creates a new store keyed by email.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new store keyed by the given field.
    pub fn with_unique_key(unique_key: UniqueKey) -> Self {
        Self {
            unique_key,
            ..Self::default()
        }
    }
}

#[async_trait]
impl AccountStore for MemoryAccountStore {
    fn unique_key(&self) -> UniqueKey {
        self.unique_key
    }

    // =========================================================================
    // User operations
    // =========================================================================

    async fn insert_user(&self, user: NewUser) -> AccountResult<User> {
        let key = user.key(self.unique_key).unwrap_or_default().to_string();

        let mut directory = self.directory.write().await;
        if directory.by_key.contains_key(&key) {
            return Err(AccountError::already_exists("User", key));
        }

        let record = User {
            id: directory.next_id(),
            email: user.email,
            handle: user.handle,
            name: user.name,
            password: user.password,
            date_of_birth: user.date_of_birth,
            token: None,
            days_to_notification: DEFAULT_DAYS_TO_NOTIFICATION,
            subscriptions: Vec::new(),
        };

        let position = directory.users.len();
        directory.users.push(record.clone());
        directory.by_key.insert(key, position);

        Ok(record)
    }

    async fn get_user_by_key(&self, key: &str) -> AccountResult<Option<User>> {
        let directory = self.directory.read().await;
        Ok(directory
            .by_key
            .get(key)
            .map(|&position| directory.users[position].clone()))
    }

    async fn get_user(&self, id: UserId) -> AccountResult<Option<User>> {
        let directory = self.directory.read().await;
        Ok(directory.users.iter().find(|u| u.id == id).cloned())
    }

    async fn list_users(&self) -> AccountResult<Vec<User>> {
        let directory = self.directory.read().await;
        Ok(directory.users.clone())
    }

    async fn count_users(&self) -> AccountResult<usize> {
        let directory = self.directory.read().await;
        Ok(directory.users.len())
    }

    // =========================================================================
    // Token operations
    // =========================================================================

    async fn set_token(&self, key: &str, token: String) -> AccountResult<()> {
        let mut directory = self.directory.write().await;
        let position = directory
            .by_key
            .get(key)
            .copied()
            .ok_or(AccountError::NotFound)?;

        if let Some(previous) = directory.users[position].token.take() {
            directory.by_token.remove(&previous);
        }
        directory.users[position].token = Some(token.clone());
        directory.by_token.insert(token, position);

        Ok(())
    }

    async fn get_user_by_token(&self, token: &str) -> AccountResult<Option<User>> {
        let directory = self.directory.read().await;
        Ok(directory
            .by_token
            .get(token)
            .map(|&position| directory.users[position].clone()))
    }

    // =========================================================================
    // Actor operations
    // =========================================================================

    async fn subscribe(&self, token: &str, target: UserId) -> AccountResult<()> {
        let mut directory = self.directory.write().await;
        let position = directory.position_of_token(token)?;
        if !directory.contains_id(target) {
            return Err(AccountError::not_exists("User", target.to_string()));
        }

        let actor = &mut directory.users[position];
        if actor.id == target {
            return Err(AccountError::SelfSubscription);
        }
        if actor.is_subscribed_to(target) {
            return Err(AccountError::already_exists(
                "Subscription",
                target.to_string(),
            ));
        }

        actor.subscriptions.push(target);
        Ok(())
    }

    async fn unsubscribe(&self, token: &str, target: UserId) -> AccountResult<()> {
        let mut directory = self.directory.write().await;
        let position = directory.position_of_token(token)?;
        if !directory.contains_id(target) {
            return Err(AccountError::not_exists("User", target.to_string()));
        }

        let actor = &mut directory.users[position];
        let index = actor
            .subscriptions
            .iter()
            .position(|&id| id == target)
            .ok_or_else(|| AccountError::not_exists("Subscription", target.to_string()))?;

        actor.subscriptions.remove(index);
        Ok(())
    }

    async fn update_settings(&self, token: &str, settings: Settings) -> AccountResult<User> {
        let mut directory = self.directory.write().await;
        let position = directory.position_of_token(token)?;

        if let Some(email) = settings.new_email() {
            let rekey = self.unique_key == UniqueKey::Email
                && directory.users[position].email != email;

            if rekey {
                if directory.by_key.contains_key(email) {
                    return Err(AccountError::already_exists("User", email));
                }
                let previous =
                    std::mem::replace(&mut directory.users[position].email, email.to_string());
                directory.by_key.remove(&previous);
                directory.by_key.insert(email.to_string(), position);
            } else {
                directory.users[position].email = email.to_string();
            }
        }

        let actor = &mut directory.users[position];
        actor.days_to_notification = settings.days_to_notification;

        Ok(actor.clone())
    }
}
