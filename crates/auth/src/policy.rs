//! Expiry policy for presented tokens.

use serde::{Deserialize, Serialize};

/// What to do with the `exp` claim when a stored token is presented again.
///
/// The directory always looks tokens up by exact string match. `Ignore`
/// stops there, so a token stays usable until the next login replaces it.
/// `Enforce` additionally verifies signature, issuer and expiry first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ExpiryPolicy {
    /// Lookup by string equality only; `exp` is never checked.
    Ignore,
    /// Reject tokens that fail signature, issuer or expiry checks.
    #[default]
    Enforce,
}

impl ExpiryPolicy {
    /// Returns `Enforce` when `enforce` is set, `Ignore` otherwise.
    pub fn from_flag(enforce: bool) -> Self {
        if enforce {
            Self::Enforce
        } else {
            Self::Ignore
        }
    }

    /// Returns true if presented tokens must pass validation.
    pub fn is_enforced(&self) -> bool {
        matches!(self, Self::Enforce)
    }
}
