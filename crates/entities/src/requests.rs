//! Payloads accepted by the account directory.

use serde::{Deserialize, Serialize};

use crate::UniqueKey;

/// Registration input.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub date_of_birth: String,
    #[serde(default)]
    pub handle: Option<String>,
}

impl NewUser {
    /// Creates a registration request without a handle.
    pub fn new(
        email: impl Into<String>,
        name: impl Into<String>,
        password: impl Into<String>,
        date_of_birth: impl Into<String>,
    ) -> Self {
        Self {
            email: email.into(),
            name: name.into(),
            password: password.into(),
            date_of_birth: date_of_birth.into(),
            handle: None,
        }
    }

    /// Sets the handle.
    pub fn with_handle(mut self, handle: impl Into<String>) -> Self {
        self.handle = Some(handle.into());
        self
    }

    /// Returns true if every field required under `key` is non-empty.
    pub fn has_required_fields(&self, key: UniqueKey) -> bool {
        let base = !self.email.is_empty()
            && !self.name.is_empty()
            && !self.password.is_empty()
            && !self.date_of_birth.is_empty();

        match key {
            UniqueKey::Email => base,
            UniqueKey::Handle => base && self.handle.as_deref().is_some_and(|h| !h.is_empty()),
        }
    }

    /// Returns the value of the unique key field.
    pub fn key(&self, field: UniqueKey) -> Option<&str> {
        match field {
            UniqueKey::Email => Some(self.email.as_str()),
            UniqueKey::Handle => self.handle.as_deref(),
        }
    }
}

/// Notification settings update.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Settings {
    #[serde(default)]
    pub days_to_notification: u32,
    /// New email; `None` or empty keeps the current one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl Settings {
    /// Returns the requested email change, ignoring empty values.
    pub fn new_email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.is_empty())
    }
}
