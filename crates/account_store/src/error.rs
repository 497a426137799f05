//! Account directory error types.

use thiserror::Error;

/// Errors that can occur during account directory operations.
#[derive(Debug, Error)]
pub enum AccountError {
    /// A required registration field is empty.
    #[error("all required fields must have values")]
    FieldsRequired,

    /// Duplicate entity.
    #[error("{entity} already exists: {key}")]
    AlreadyExists { entity: &'static str, key: String },

    /// Password does not match.
    #[error("credential or password is incorrect")]
    BadCredentials,

    /// No user has the given unique key.
    #[error("user not found")]
    NotFound,

    /// Referenced entity does not exist.
    #[error("{entity} doesn't exist: {key}")]
    NotExists { entity: &'static str, key: String },

    /// The presented token does not belong to any user.
    #[error("unauthorized")]
    Unauthorized,

    /// A user tried to subscribe to themselves.
    #[error("users cannot subscribe to themselves")]
    SelfSubscription,

    /// Signing a new token failed.
    #[error("token was not created: {0}")]
    TokenIssuanceFailed(String),
}

impl AccountError {
    /// Creates an already exists error.
    pub fn already_exists(entity: &'static str, key: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            key: key.into(),
        }
    }

    /// Creates a not exists error.
    pub fn not_exists(entity: &'static str, key: impl Into<String>) -> Self {
        Self::NotExists {
            entity,
            key: key.into(),
        }
    }
}

/// Result type for account directory operations.
pub type AccountResult<T> = Result<T, AccountError>;
