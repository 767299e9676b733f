//! # Runtime Configuration Module
//!
//! Environment-variable configuration for how commands are invoked.
//!
//! ## Environment Variables
//!
//! ### `CMDW_CATCH_PANICS`
//!
//! When `true` (the default) a panic inside an action body is caught and
//! reported as an invocation failure. Set to `false` to let panics unwind to
//! the caller, which is useful when debugging an action under a test harness.
//!
//! Accepts `true`/`false`, `1`/`0`, `yes`/`no`, `on`/`off`. Anything else
//! keeps the default.
//!
//! ## Usage
//!
//! ```rust
//! use commandwire::runtime_config::RuntimeConfig;
//!
//! let config = RuntimeConfig::from_env();
//! println!("Catch panics: {}", config.catch_panics);
//! ```
//!
//! Logging is configured separately through `CMDW_LOG_*`, see
//! [`telemetry`](crate::telemetry).

use std::env;

/// Runtime configuration loaded from environment variables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeConfig {
    /// Convert action panics into invocation failures (default: true)
    pub catch_panics: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self { catch_panics: true }
    }
}

impl RuntimeConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let catch_panics = lookup("CMDW_CATCH_PANICS")
            .and_then(|val| parse_flag(&val))
            .unwrap_or(defaults.catch_panics);
        RuntimeConfig { catch_panics }
    }
}

pub(crate) fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_unset() {
        let config = RuntimeConfig::from_lookup(|_| None);
        assert_eq!(config, RuntimeConfig::default());
        assert!(config.catch_panics);
    }

    #[test]
    fn test_catch_panics_flag() {
        let off = RuntimeConfig::from_lookup(|key| {
            (key == "CMDW_CATCH_PANICS").then(|| "OFF".to_string())
        });
        assert!(!off.catch_panics);

        let garbage = RuntimeConfig::from_lookup(|_| Some("maybe".to_string()));
        assert!(garbage.catch_panics);
    }
}
