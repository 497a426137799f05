//! Core entity definitions for the account service.
//!
//! This crate defines the user record kept by the account directory, the
//! public views handed out to callers, and the request payloads accepted by
//! the directory's operations.

mod birthday;
mod requests;
mod user;
mod views;

pub use birthday::*;
pub use requests::*;
pub use user::*;
pub use views::*;
