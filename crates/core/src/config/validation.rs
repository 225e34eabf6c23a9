//! Configuration validation rules.

use crate::config::AppConfig;
use crate::pedigree::PEDIGREE_DEPTH;
use thiserror::Error;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to load configuration: {0}")]
    LoadFailed(String),

    #[error("invalid configuration: {field} - {reason}")]
    Invalid { field: String, reason: String },
}

fn invalid(field: &str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid { field: field.into(), reason: reason.into() }
}

impl AppConfig {
    /// Validate configuration values after loading.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Invalid` if:
    /// - `sheet_name` or `user_agent` is empty
    /// - `timeout_ms` is under 100ms or over 5 minutes
    /// - `max_bytes` is 0 or exceeds 50MB
    /// - `request_delay_ms` exceeds 1 minute
    /// - `pedigree_depth` is outside 1-5
    /// - a base URL does not parse as http(s)
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.sheet_name.trim().is_empty() {
            return Err(invalid("sheet_name", "must not be empty"));
        }
        if self.user_agent.is_empty() {
            return Err(invalid("user_agent", "must not be empty"));
        }

        if self.timeout_ms < 100 {
            return Err(invalid("timeout_ms", "must be at least 100ms"));
        }
        if self.timeout_ms > 300_000 {
            return Err(invalid("timeout_ms", "must not exceed 5 minutes (300000ms)"));
        }

        if self.max_bytes == 0 {
            return Err(invalid("max_bytes", "must be greater than 0"));
        }
        if self.max_bytes > 50 * 1024 * 1024 {
            return Err(invalid("max_bytes", "must not exceed 50MB"));
        }

        if self.request_delay_ms > 60_000 {
            return Err(invalid("request_delay_ms", "must not exceed 1 minute (60000ms)"));
        }

        if self.pedigree_depth == 0 || self.pedigree_depth > PEDIGREE_DEPTH {
            return Err(invalid("pedigree_depth", format!("must be between 1 and {PEDIGREE_DEPTH}")));
        }

        for (field, value) in [
            ("entrants_base_url", &self.entrants_base_url),
            ("horse_base_url", &self.horse_base_url),
            ("pedigree_base_url", &self.pedigree_base_url),
        ] {
            match url::Url::parse(value) {
                Ok(parsed) if matches!(parsed.scheme(), "http" | "https") => {}
                Ok(parsed) => return Err(invalid(field, format!("unsupported scheme: {}", parsed.scheme()))),
                Err(e) => return Err(invalid(field, e.to_string())),
            }
        }

        if self.request_delay_ms == 0 {
            tracing::warn!("request_delay_ms is 0; pedigree pages will be fetched back to back");
        }

        Ok(())
    }
}
