//! # Runtime Configuration Module
//!
//! Environment-based configuration for the ambient parts of the crate. The
//! registry itself reads no environment; only logging is configured here.
//!
//! ## Environment Variables
//!
//! | Variable | Values | Default |
//! |----------|--------|---------|
//! | `BRRTPLUS_LOG_LEVEL` | `trace`, `debug`, `info`, `warn`, `error` | `info` |
//! | `BRRTPLUS_LOG_FORMAT` | `json`, `pretty` | `json` |
//! | `BRRTPLUS_LOG_FILTER` | comma-separated directives (`brrtplus::registry=debug`) | unset |
//! | `BRRTPLUS_LOG_LOCATION` | `true`, `false` | `false` |
//!
//! ```rust
//! use brrtplus::runtime_config::LogConfig;
//!
//! let config = LogConfig::from_env();
//! println!("log level: {}", config.log_level);
//! ```

use std::env;

/// Log format: JSON for production, pretty-print for development
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    pub fn parse(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "pretty" => LogFormat::Pretty,
            _ => LogFormat::Json,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogConfig {
    /// Log level: trace/debug/info/warn/error
    pub log_level: String,
    pub format: LogFormat,
    /// Extra filter directives (comma-separated)
    pub target_filter: Option<String>,
    /// Include file:line location (dev only)
    pub include_location: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            format: LogFormat::Json,
            target_filter: None,
            include_location: false,
        }
    }
}

impl LogConfig {
    /// Parse configuration from environment variables with defaults
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`LogConfig::from_env`] over an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_level: lookup("BRRTPLUS_LOG_LEVEL").unwrap_or(defaults.log_level),
            format: lookup("BRRTPLUS_LOG_FORMAT")
                .map(|s| LogFormat::parse(&s))
                .unwrap_or(defaults.format),
            target_filter: lookup("BRRTPLUS_LOG_FILTER").filter(|s| !s.trim().is_empty()),
            include_location: lookup("BRRTPLUS_LOG_LOCATION")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.include_location),
        }
    }

    /// Create a default configuration for development
    pub fn default_dev() -> Self {
        Self {
            log_level: "debug".to_string(),
            format: LogFormat::Pretty,
            target_filter: None,
            include_location: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults_when_unset() {
        assert_eq!(LogConfig::from_lookup(|_| None), LogConfig::default());
    }

    #[test]
    fn test_values_from_lookup() {
        let vars: HashMap<&str, &str> = [
            ("BRRTPLUS_LOG_LEVEL", "debug"),
            ("BRRTPLUS_LOG_FORMAT", "Pretty"),
            ("BRRTPLUS_LOG_FILTER", "brrtplus::registry=trace"),
            ("BRRTPLUS_LOG_LOCATION", "true"),
        ]
        .into_iter()
        .collect();
        let config = LogConfig::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.format, LogFormat::Pretty);
        assert_eq!(config.target_filter.as_deref(), Some("brrtplus::registry=trace"));
        assert!(config.include_location);
    }

    #[test]
    fn test_bad_values_fall_back() {
        let config = LogConfig::from_lookup(|k| match k {
            "BRRTPLUS_LOG_FORMAT" => Some("xml".to_string()),
            "BRRTPLUS_LOG_LOCATION" => Some("sometimes".to_string()),
            "BRRTPLUS_LOG_FILTER" => Some("  ".to_string()),
            _ => None,
        });
        assert_eq!(config.format, LogFormat::Json);
        assert!(!config.include_location);
        assert!(config.target_filter.is_none());
    }
}
