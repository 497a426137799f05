//! Account directory for the account service.
//!
//! This crate provides a storage abstraction for user records together with
//! the service that enforces the directory's rules on top of it: field
//! validation, credential checks, session token issuance and lookup, and the
//! subscription graph between users.

mod error;
mod memory;
mod service;
mod traits;

pub use error::*;
pub use memory::*;
pub use service::*;
pub use traits::*;
