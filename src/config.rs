//! Server configuration
//!
//! All moderation tunables live in `ServerConfig`, passed at startup so the
//! coordinator stays testable with tiny intervals. Each field can be
//! overridden through a `CHAT_*` environment variable.

use std::env;
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

/// Runtime configuration for the relay
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// TCP port the listener binds on
    pub port: u16,
    /// Redact addresses and raw error text in log output
    pub safe_mode: bool,
    /// Minimum interval between accepted messages per client
    pub message_rate: Duration,
    /// How long a ban on an IP lasts
    pub ban_timeout: Duration,
    /// Consecutive violations before a ban is issued
    pub strike_limit: u32,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: 6969,
            safe_mode: true,
            message_rate: Duration::from_secs(1),
            ban_timeout: Duration::from_secs(10 * 60),
            strike_limit: 10,
        }
    }
}

impl ServerConfig {
    /// Build a config from the environment, falling back to defaults.
    ///
    /// Recognized variables: `CHAT_PORT`, `CHAT_SAFE_MODE`,
    /// `CHAT_MESSAGE_RATE_SECS`, `CHAT_BAN_SECS`, `CHAT_STRIKE_LIMIT`.
    /// Unset or unparsable values fall back to the default.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            port: env_or("CHAT_PORT", defaults.port),
            safe_mode: env_or("CHAT_SAFE_MODE", defaults.safe_mode),
            message_rate: Duration::from_secs_f64(env_or(
                "CHAT_MESSAGE_RATE_SECS",
                defaults.message_rate.as_secs_f64(),
            )),
            ban_timeout: Duration::from_secs_f64(env_or(
                "CHAT_BAN_SECS",
                defaults.ban_timeout.as_secs_f64(),
            )),
            strike_limit: env_or("CHAT_STRIKE_LIMIT", defaults.strike_limit),
        }
    }

    /// Address string for the TCP listener
    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }

    /// Wrap a value for logging, honoring the safe-mode redaction flag
    pub fn sens<T>(&self, value: T) -> Sens<T> {
        Sens::new(value, self.safe_mode)
    }
}

fn env_or<T: FromStr>(name: &str, default: T) -> T {
    match env::var(name) {
        Ok(raw) => raw.parse().unwrap_or(default),
        Err(_) => default,
    }
}

/// Display wrapper that hides potentially sensitive data in log output
///
/// Prints `[REDACTED]` instead of the wrapped value when safe mode is on.
/// Applied to remote addresses and raw OS error text.
pub struct Sens<T> {
    value: T,
    redact: bool,
}

impl<T> Sens<T> {
    pub fn new(value: T, redact: bool) -> Self {
        Self { value, redact }
    }
}

impl<T: fmt::Display> fmt::Display for Sens<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.redact {
            "[REDACTED]".fmt(f)
        } else {
            self.value.fmt(f)
        }
    }
}
