//! Request extractors and middleware.

mod auth;

pub use auth::{AUTH_COOKIE_NAME, BearerToken, session_cookie};
