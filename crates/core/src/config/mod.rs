//! Application configuration with layered loading.
//!
//! Configuration is loaded with figment from, in increasing precedence:
//!
//! 1. Built-in defaults
//! 2. TOML config file (if KETTO_CONFIG_FILE set)
//! 3. Environment variables (KETTO_*)

use std::path::PathBuf;
use std::time::Duration;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};

use crate::pedigree::PEDIGREE_DEPTH;

mod validation;

pub use validation::ConfigError;

/// Application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Path to the SQLite database holding the result cache.
    ///
    /// Set via KETTO_DB_PATH.
    #[serde(default = "default_db_path")]
    pub db_path: PathBuf,

    /// Worksheet (table) name inside the database.
    ///
    /// Set via KETTO_SHEET_NAME.
    #[serde(default = "default_sheet_name")]
    pub sheet_name: String,

    /// User-Agent string for HTTP requests.
    ///
    /// Set via KETTO_USER_AGENT.
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    /// HTTP request timeout in milliseconds.
    ///
    /// Set via KETTO_TIMEOUT_MS.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum bytes to read per page.
    ///
    /// Set via KETTO_MAX_BYTES.
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,

    /// Pause between pedigree fetches in milliseconds.
    ///
    /// Set via KETTO_REQUEST_DELAY_MS.
    #[serde(default = "default_request_delay_ms")]
    pub request_delay_ms: u64,

    /// Generations of pedigree to search (1-5).
    ///
    /// Set via KETTO_PEDIGREE_DEPTH.
    #[serde(default = "default_pedigree_depth")]
    pub pedigree_depth: usize,

    /// Race card page; the race id is passed as `?race_id=`.
    #[serde(default = "default_entrants_base_url")]
    pub entrants_base_url: String,

    /// Base that relative horse links on the race card resolve against.
    #[serde(default = "default_horse_base_url")]
    pub horse_base_url: String,

    /// Pedigree pages live at `{pedigree_base_url}/{horse_id}/`.
    #[serde(default = "default_pedigree_base_url")]
    pub pedigree_base_url: String,
}

fn default_db_path() -> PathBuf {
    PathBuf::from("./ketto-cache.sqlite")
}

fn default_sheet_name() -> String {
    "cache_UMA".into()
}

fn default_user_agent() -> String {
    "Mozilla/5.0 (compatible; ketto/0.1)".into()
}

fn default_timeout_ms() -> u64 {
    20_000
}

fn default_max_bytes() -> usize {
    2_097_152 // 2MB
}

fn default_request_delay_ms() -> u64 {
    300
}

fn default_pedigree_depth() -> usize {
    PEDIGREE_DEPTH
}

fn default_entrants_base_url() -> String {
    "https://race.netkeiba.com/race/shutuba.html".into()
}

fn default_horse_base_url() -> String {
    "https://db.netkeiba.com".into()
}

fn default_pedigree_base_url() -> String {
    "https://db.netkeiba.com/horse/ped".into()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: default_db_path(),
            sheet_name: default_sheet_name(),
            user_agent: default_user_agent(),
            timeout_ms: default_timeout_ms(),
            max_bytes: default_max_bytes(),
            request_delay_ms: default_request_delay_ms(),
            pedigree_depth: default_pedigree_depth(),
            entrants_base_url: default_entrants_base_url(),
            horse_base_url: default_horse_base_url(),
            pedigree_base_url: default_pedigree_base_url(),
        }
    }
}

impl AppConfig {
    /// Timeout as Duration for use with reqwest/tokio.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    pub fn request_delay(&self) -> Duration {
        Duration::from_millis(self.request_delay_ms)
    }

    /// Load configuration from all sources with layered precedence.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Configuration file cannot be read
    /// - Environment variables cannot be parsed
    /// - Validation fails after loading
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_figment(Self::figment())
    }

    /// The layered figment used by [`AppConfig::load`].
    pub fn figment() -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Ok(config_path) = std::env::var("KETTO_CONFIG_FILE") {
            figment = figment.merge(Toml::file(&config_path));
        }

        figment.merge(
            Env::prefixed("KETTO_")
                .ignore(&["CONFIG_FILE"])
                .map(|key| key.as_str().to_lowercase().into()),
        )
    }

    /// Extract and validate a configuration from `figment`.
    pub fn from_figment(figment: Figment) -> Result<Self, ConfigError> {
        let config: Self = figment.extract().map_err(|e| ConfigError::LoadFailed(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }
}
