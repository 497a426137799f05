//! Account service: the directory's rules on top of an [`AccountStore`].

use std::collections::HashMap;

use auth::JwtManager;
use chrono::{Local, NaiveDate};
use entities::{
    days_until_birthday, format_date, parse_date_of_birth, NewUser, Profile, Reminder, Settings,
    UniqueKey, User, UserId, UserSummary, UserView,
};
use tracing::{debug, info};

use crate::{AccountError, AccountResult, AccountStore};

/// Account directory service.
///
/// Validates input, checks credentials and mints session tokens, then
/// delegates to the store. Store errors are passed through unchanged.
#[derive(Debug)]
pub struct AccountService<S: AccountStore> {
    store: S,
    jwt: JwtManager,
}

impl<S: AccountStore> AccountService<S> {
    /// Creates a new service over `store`, minting tokens with `jwt`.
    pub fn new(store: S, jwt: JwtManager) -> Self {
        Self { store, jwt }
    }

    /// Returns the underlying store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Returns the field users are keyed by.
    pub fn unique_key(&self) -> UniqueKey {
        self.store.unique_key()
    }

    /// Registers a new user.
    pub async fn register(&self, user: NewUser) -> AccountResult<User> {
        if !user.has_required_fields(self.unique_key()) {
            return Err(AccountError::FieldsRequired);
        }

        let user = self.store.insert_user(user).await?;
        info!(user_id = user.id, "Registered user");

        Ok(user)
    }

    /// Checks a credential (the unique key) and password.
    pub async fn authenticate(&self, credential: &str, password: &str) -> AccountResult<UserView> {
        let user = self
            .store
            .get_user_by_key(credential)
            .await?
            .ok_or(AccountError::NotFound)?;

        if user.password != password {
            debug!(user_id = user.id, "Password mismatch");
            return Err(AccountError::BadCredentials);
        }

        Ok(user.view())
    }

    /// Mints a token for the user with the given unique key and stores it,
    /// replacing any previous one.
    pub async fn issue_token(&self, key: &str) -> AccountResult<String> {
        let token = self
            .jwt
            .generate_token(key)
            .map_err(|e| AccountError::TokenIssuanceFailed(e.to_string()))?;

        self.store.set_token(key, token.clone()).await?;

        Ok(token)
    }

    /// Authenticates and issues a token in one step.
    pub async fn login(&self, credential: &str, password: &str) -> AccountResult<(UserView, String)> {
        let view = self.authenticate(credential, password).await?;
        let token = self.issue_token(credential).await?;
        info!("User logged in");

        Ok((view, token))
    }

    /// Returns the view of the user currently holding `token`.
    pub async fn resolve_token(&self, token: &str) -> AccountResult<UserView> {
        Ok(self.actor(token).await?.view())
    }

    /// Lists every user in insertion order.
    pub async fn list_all(&self) -> AccountResult<Vec<UserSummary>> {
        let users = self.store.list_users().await?;
        Ok(users.iter().map(User::summary).collect())
    }

    /// Lists users whose date of birth is today's local date.
    pub async fn list_born_today(&self) -> AccountResult<Vec<UserSummary>> {
        self.list_born_on(Local::now().date_naive()).await
    }

    /// Lists users whose stored date of birth equals `date`.
    pub async fn list_born_on(&self, date: NaiveDate) -> AccountResult<Vec<UserSummary>> {
        let wanted = format_date(date);
        let users = self.store.list_users().await?;

        Ok(users
            .iter()
            .filter(|u| u.date_of_birth == wanted)
            .map(User::summary)
            .collect())
    }

    /// Lists every other user's profile as seen by the token holder.
    pub async fn list_profiles(&self, token: &str) -> AccountResult<Vec<Profile>> {
        let actor = self.actor(token).await?;
        let users = self.store.list_users().await?;

        Ok(users
            .iter()
            .filter(|u| u.id != actor.id)
            .map(|u| u.profile_for(&actor))
            .collect())
    }

    /// Subscribes the token holder to `target`.
    pub async fn subscribe(&self, token: &str, target: UserId) -> AccountResult<()> {
        self.admit(token)?;
        self.store.subscribe(token, target).await?;
        debug!(target_id = target, "Subscribed");
        Ok(())
    }

    /// Unsubscribes the token holder from `target`.
    pub async fn unsubscribe(&self, token: &str, target: UserId) -> AccountResult<()> {
        self.admit(token)?;
        self.store.unsubscribe(token, target).await?;
        debug!(target_id = target, "Unsubscribed");
        Ok(())
    }

    /// Updates the token holder's notification settings.
    pub async fn update_settings(&self, token: &str, settings: Settings) -> AccountResult<UserView> {
        self.admit(token)?;
        let user = self.store.update_settings(token, settings).await?;
        info!(user_id = user.id, "Updated settings");
        Ok(user.view())
    }

    /// Collects the birthday reminders due on `date`.
    ///
    /// Every user is reminded of each subscription whose birthday is at most
    /// their `days_to_notification` days away.
    pub async fn reminders_on(&self, date: NaiveDate) -> AccountResult<Vec<Reminder>> {
        let users = self.store.list_users().await?;
        let by_id: HashMap<UserId, &User> = users.iter().map(|u| (u.id, u)).collect();

        let mut reminders = Vec::new();
        for user in &users {
            for target in &user.subscriptions {
                let Some(celebrant) = by_id.get(target) else {
                    continue;
                };
                let Some(born) = parse_date_of_birth(&celebrant.date_of_birth) else {
                    continue;
                };
                let Some(days_until) = days_until_birthday(born, date) else {
                    continue;
                };

                if days_until <= user.days_to_notification {
                    reminders.push(Reminder {
                        recipient: user.email.clone(),
                        celebrant: celebrant.summary(),
                        days_until,
                    });
                }
            }
        }

        Ok(reminders)
    }

    /// Applies the expiry policy to a presented token.
    fn admit(&self, token: &str) -> AccountResult<()> {
        self.jwt
            .check_presented(token)
            .map_err(|_| AccountError::Unauthorized)
    }

    /// Returns the user holding `token`.
    async fn actor(&self, token: &str) -> AccountResult<User> {
        self.admit(token)?;
        self.store
            .get_user_by_token(token)
            .await?
            .ok_or(AccountError::Unauthorized)
    }
}
