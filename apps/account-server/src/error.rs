//! Server error types.

use account_store::AccountError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    /// No bearer token was presented.
    #[error("need to login")]
    AuthenticationRequired,

    /// Account directory error.
    #[error(transparent)]
    Account(#[from] AccountError),
}

impl ServerError {
    /// Returns the status code and machine-readable code for this error.
    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            ServerError::AuthenticationRequired => {
                (StatusCode::UNAUTHORIZED, "authentication_required")
            }
            ServerError::Account(e) => match e {
                AccountError::FieldsRequired => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "fields_required")
                }
                AccountError::AlreadyExists { .. } => (StatusCode::CONFLICT, "already_exists"),
                AccountError::BadCredentials => (StatusCode::BAD_REQUEST, "bad_credentials"),
                AccountError::NotFound => (StatusCode::CONFLICT, "not_found"),
                AccountError::NotExists { .. } => (StatusCode::CONFLICT, "not_exists"),
                AccountError::Unauthorized => (StatusCode::UNAUTHORIZED, "unauthorized"),
                AccountError::SelfSubscription => (StatusCode::CONFLICT, "self_subscription"),
                AccountError::TokenIssuanceFailed(_) => {
                    (StatusCode::INTERNAL_SERVER_ERROR, "token_issuance_failed")
                }
            },
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, code) = self.status_and_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        } else {
            tracing::debug!(error = %self, "Request rejected");
        }

        let message = match &self {
            ServerError::Account(AccountError::NotFound) => "user doesn't exist".to_string(),
            // Keep signing details out of responses.
            ServerError::Account(AccountError::TokenIssuanceFailed(_)) => {
                "unexpected error".to_string()
            }
            other => other.to_string(),
        };

        let body = json!({
            "error": {
                "code": code,
                "message": message,
            }
        });

        (status, Json(body)).into_response()
    }
}

/// Result type alias for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (AccountError::FieldsRequired, StatusCode::UNPROCESSABLE_ENTITY),
            (
                AccountError::already_exists("User", "a@example.com"),
                StatusCode::CONFLICT,
            ),
            (AccountError::BadCredentials, StatusCode::BAD_REQUEST),
            (AccountError::NotFound, StatusCode::CONFLICT),
            (AccountError::not_exists("User", "7"), StatusCode::CONFLICT),
            (AccountError::Unauthorized, StatusCode::UNAUTHORIZED),
            (AccountError::SelfSubscription, StatusCode::CONFLICT),
            (
                AccountError::TokenIssuanceFailed("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            let response = ServerError::from(error).into_response();
            assert_eq!(response.status(), expected);
        }

        let response = ServerError::AuthenticationRequired.into_response();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}
