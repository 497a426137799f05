//! Server configuration.

use std::env;
use std::time::Duration;

use auth::{DEFAULT_JWT_EXPIRATION_HOURS, ExpiryPolicy};
use entities::UniqueKey;

/// Secret used when none is configured. Only fit for local testing.
pub const DEFAULT_JWT_SECRET: &str = "very-secret-key";

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
    /// Secret for signing session tokens.
    pub jwt_secret: String,
    /// Session token lifetime in hours.
    pub jwt_expiration_hours: u64,
    /// Whether presented tokens are checked for expiry.
    pub expiry_policy: ExpiryPolicy,
    /// Field users are keyed by.
    pub unique_key: UniqueKey,
    /// Whether to register fixture users at startup.
    pub seed_users: bool,
    /// Interval of the birthday sweep; `None` disables it.
    pub birthday_sweep_interval: Option<Duration>,
    /// Log level.
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            jwt_secret: DEFAULT_JWT_SECRET.to_string(),
            jwt_expiration_hours: DEFAULT_JWT_EXPIRATION_HOURS,
            expiry_policy: ExpiryPolicy::Enforce,
            unique_key: UniqueKey::Email,
            seed_users: true,
            birthday_sweep_interval: Some(Duration::from_secs(3600)),
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    ///
    /// Unparseable numbers and flags fall back to defaults; an unknown
    /// unique key field is an error. Flags accept `true`/`1`/`yes`/`on` and
    /// `false`/`0`/`no`/`off`.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let defaults = Self::default();

        let flag = |key: &str, default: bool| {
            lookup(key)
                .and_then(|v| parse_flag(&v))
                .unwrap_or(default)
        };

        let unique_key = match lookup("ACCOUNTS_UNIQUE_KEY") {
            Some(value) => value.parse::<UniqueKey>().map_err(|e: String| anyhow::anyhow!(e))?,
            None => defaults.unique_key,
        };

        let sweep_secs = lookup("ACCOUNTS_BIRTHDAY_SWEEP_SECS")
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(3600);

        Ok(Self {
            host: lookup("ACCOUNTS_SERVER_HOST").unwrap_or(defaults.host),
            port: lookup("ACCOUNTS_SERVER_PORT")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.port),
            jwt_secret: lookup("ACCOUNTS_JWT_SECRET").unwrap_or(defaults.jwt_secret),
            jwt_expiration_hours: lookup("ACCOUNTS_JWT_EXPIRATION_HOURS")
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.jwt_expiration_hours),
            expiry_policy: ExpiryPolicy::from_flag(flag(
                "ACCOUNTS_ENFORCE_TOKEN_EXPIRY",
                defaults.expiry_policy.is_enforced(),
            )),
            unique_key,
            seed_users: flag("ACCOUNTS_SEED_USERS", defaults.seed_users),
            birthday_sweep_interval: (sweep_secs > 0).then(|| Duration::from_secs(sweep_secs)),
            log_level: lookup("ACCOUNTS_LOG_LEVEL").unwrap_or(defaults.log_level),
        })
    }

    /// Returns true if tokens are signed with [`DEFAULT_JWT_SECRET`].
    pub fn uses_default_secret(&self) -> bool {
        self.jwt_secret == DEFAULT_JWT_SECRET
    }

    /// Returns the server address.
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Parses a boolean flag. Unrecognised values yield `None`.
fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Some(true),
        "false" | "0" | "no" | "off" => Some(false),
        _ => None,
    }
}
