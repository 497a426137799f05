//! Session tokens for the account service.
//!
//! This crate provides:
//! - HS256 JWT generation and validation
//! - The expiry policy applied when a stored token is presented again

mod error;
mod jwt;
mod policy;

pub use error::*;
pub use jwt::*;
pub use policy::*;

/// Default JWT expiration time in hours.
pub const DEFAULT_JWT_EXPIRATION_HOURS: u64 = 72;

/// Default JWT issuer.
pub const DEFAULT_JWT_ISSUER: &str = "accounts";
