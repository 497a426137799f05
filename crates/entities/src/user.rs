//! User-related entity definitions.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{Profile, UserSummary, UserView};

/// Notification lead time given to newly registered users, in days.
pub const DEFAULT_DAYS_TO_NOTIFICATION: u32 = 2;

/// Numeric user identifier. Assigned sequentially starting at 1.
pub type UserId = u64;

/// The field that identifies a user for login and uniqueness checks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueKey {
    /// Users are keyed by email address.
    #[default]
    Email,
    /// Users are keyed by handle name.
    Handle,
}

impl UniqueKey {
    /// Returns the field name as used in configuration and error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Handle => "handle",
        }
    }
}

impl fmt::Display for UniqueKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UniqueKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "email" => Ok(Self::Email),
            "handle" => Ok(Self::Handle),
            other => Err(format!("unknown unique key field: {other}")),
        }
    }
}

/// A registered user.
///
/// The password is kept verbatim; the directory performs no hashing.
#[derive(Clone, PartialEq, Eq)]
pub struct User {
    /// Sequential identifier, never reused.
    pub id: UserId,
    /// Email address.
    pub email: String,
    /// Handle name, required only when handles are the unique key.
    pub handle: Option<String>,
    /// Display name.
    pub name: String,
    /// Plaintext password.
    pub password: String,
    /// Date of birth in `YYYY-MM-DD` form.
    pub date_of_birth: String,
    /// Current session token, overwritten on every login.
    pub token: Option<String>,
    /// How many days ahead of a birthday to notify this user.
    pub days_to_notification: u32,
    /// Ids of the users this user is subscribed to, without duplicates.
    pub subscriptions: Vec<UserId>,
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("handle", &self.handle)
            .field("name", &self.name)
            .field("date_of_birth", &self.date_of_birth)
            .field("days_to_notification", &self.days_to_notification)
            .field("subscriptions", &self.subscriptions)
            .finish_non_exhaustive()
    }
}

impl User {
    /// Returns the value of the given unique key field, if set.
    pub fn key(&self, field: UniqueKey) -> Option<&str> {
        match field {
            UniqueKey::Email => Some(self.email.as_str()),
            UniqueKey::Handle => self.handle.as_deref(),
        }
    }

    /// Returns true if this user is subscribed to `target`.
    pub fn is_subscribed_to(&self, target: UserId) -> bool {
        self.subscriptions.contains(&target)
    }

    /// Returns the view handed out after login or token lookup.
    pub fn view(&self) -> UserView {
        UserView {
            email: self.email.clone(),
            name: self.name.clone(),
            days_to_notification: self.days_to_notification,
        }
    }

    /// Returns the minimal view used in listings.
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            email: self.email.clone(),
            name: self.name.clone(),
        }
    }

    /// Returns this user's profile as seen by `viewer`.
    pub fn profile_for(&self, viewer: &User) -> Profile {
        Profile {
            id: self.id,
            email: self.email.clone(),
            name: self.name.clone(),
            is_subscribed: viewer.is_subscribed_to(self.id),
        }
    }
}
