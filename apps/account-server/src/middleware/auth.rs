//! Bearer token extraction.

use axum::{
    extract::FromRequestParts,
    http::{HeaderMap, header::AUTHORIZATION, request::Parts},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::error::ServerError;

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE_NAME: &str = "token";

/// The session token presented with a request.
///
/// Read from the `token` cookie, falling back to an
/// `Authorization: Bearer` header. Rejects with 401 when neither is present.
#[derive(Debug, Clone)]
pub struct BearerToken(pub String);

/// Extracts the session token from the request headers.
fn extract_token(headers: &HeaderMap) -> Option<String> {
    let jar = CookieJar::from_headers(headers);
    if let Some(cookie) = jar.get(AUTH_COOKIE_NAME) {
        if !cookie.value().is_empty() {
            return Some(cookie.value().to_string());
        }
    }

    headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

impl<S> FromRequestParts<S> for BearerToken
where
    S: Send + Sync,
{
    type Rejection = ServerError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        extract_token(&parts.headers)
            .map(Self)
            .ok_or(ServerError::AuthenticationRequired)
    }
}

/// Builds the cookie handed out on login.
pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE_NAME, token))
        .path("/")
        .same_site(SameSite::Lax)
        .permanent()
        .build()
}
