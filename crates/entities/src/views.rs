//! Public views of a user. None of them carry the password or token.

use serde::{Deserialize, Serialize};

use crate::UserId;

/// What a user sees about themselves after login or token lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub email: String,
    pub name: String,
    pub days_to_notification: u32,
}

/// Entry in a user listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSummary {
    pub email: String,
    pub name: String,
}

/// Another user's profile as seen by the requesting user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub id: UserId,
    pub email: String,
    pub name: String,
    /// Whether the requesting user is subscribed to this one.
    pub is_subscribed: bool,
}

/// An upcoming birthday that `recipient` should be told about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reminder {
    /// Email of the subscriber receiving the reminder.
    pub recipient: String,
    /// The user whose birthday is coming up.
    pub celebrant: UserSummary,
    /// Days from the sweep date until the birthday; 0 means today.
    pub days_until: u32,
}
