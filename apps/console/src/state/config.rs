//! # Configuration State
//!
//! Console configuration loaded at startup.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`MEEM_*`)
//! 2. Defaults (this file)
//!
//! Configuration is read-only after initialization.

use serde::{Deserialize, Serialize};
use tracing::warn;

use meem_core::money::{DEFAULT_DECIMALS, MAX_DECIMALS};
use meem_core::ValidationOptions;

/// Console configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigState {
    /// Currency code (ISO 4217) sent with product payloads
    pub currency_code: String,

    /// Fractional digits accepted in price inputs
    pub currency_decimals: u8,

    /// Default tracing filter when `RUST_LOG` is not set
    pub log_filter: String,
}

impl Default for ConfigState {
    /// Returns default configuration suitable for development.
    fn default() -> Self {
        ConfigState {
            currency_code: "SAR".to_string(),
            currency_decimals: DEFAULT_DECIMALS,
            log_filter: "info,meem_core=debug,meem_console=debug".to_string(),
        }
    }
}

impl ConfigState {
    /// Creates a ConfigState from environment variables and defaults.
    ///
    /// ## Environment Variables
    /// - `MEEM_CURRENCY_CODE`: Override currency code (e.g. "AED")
    /// - `MEEM_CURRENCY_DECIMALS`: Override price scale (0-9)
    /// - `MEEM_LOG`: Override the default tracing filter
    pub fn from_env() -> Self {
        ConfigState::from_vars(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    pub fn from_vars(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = ConfigState::default();

        if let Some(code) = lookup("MEEM_CURRENCY_CODE") {
            let code = code.trim().to_ascii_uppercase();
            if code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic()) {
                config.currency_code = code;
            } else {
                warn!(%code, "Ignoring invalid MEEM_CURRENCY_CODE");
            }
        }

        if let Some(raw) = lookup("MEEM_CURRENCY_DECIMALS") {
            match raw.trim().parse::<u8>() {
                Ok(decimals) if decimals <= MAX_DECIMALS => config.currency_decimals = decimals,
                _ => warn!(%raw, "Ignoring invalid MEEM_CURRENCY_DECIMALS"),
            }
        }

        if let Some(filter) = lookup("MEEM_LOG") {
            if !filter.trim().is_empty() {
                config.log_filter = filter;
            }
        }

        config
    }

    /// Options for the validation pipeline.
    pub fn validation_options(&self) -> ValidationOptions {
        ValidationOptions {
            currency_decimals: self.currency_decimals,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = ConfigState::from_vars(|_| None);
        assert_eq!(config, ConfigState::default());
        assert_eq!(config.validation_options().currency_decimals, 2);
    }

    #[test]
    fn test_overrides() {
        let config = ConfigState::from_vars(lookup(&[
            ("MEEM_CURRENCY_CODE", "kwd"),
            ("MEEM_CURRENCY_DECIMALS", "3"),
            ("MEEM_LOG", "warn"),
        ]));
        assert_eq!(config.currency_code, "KWD");
        assert_eq!(config.currency_decimals, 3);
        assert_eq!(config.log_filter, "warn");
    }

    #[test]
    fn test_invalid_overrides_are_ignored() {
        let config = ConfigState::from_vars(lookup(&[
            ("MEEM_CURRENCY_CODE", "dollars"),
            ("MEEM_CURRENCY_DECIMALS", "12"),
            ("MEEM_LOG", "  "),
        ]));
        assert_eq!(config, ConfigState::default());
    }
}
