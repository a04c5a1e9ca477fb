//! # Configuration
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     FOLIO_API_URL=https://books.example.com                            │
//! │     FOLIO_SYNC_MODE=offline                                            │
//! │     FOLIO_QUANTITY_MODE=absolute                                       │
//! │     FOLIO_HTTP_TIMEOUT=5                                               │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     --config <path>, or                                                │
//! │     ~/.config/folio-cart/folio.toml (Linux)                            │
//! │     ~/Library/Application Support/com.folio.cart/folio.toml (macOS)    │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:8000, sync enabled, delta quantities              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://localhost:8000"
//! timeout_secs = 10
//!
//! [sync]
//! mode = "enabled"          # enabled | offline
//! quantity_mode = "delta"   # delta | absolute
//! hydrate_on_start = true
//!
//! [session]
//! name = "default"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

// =============================================================================
// Sync Mode
// =============================================================================

/// Whether cart changes are mirrored to the server at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SyncMode {
    /// Mirror changes to the server cart in the background.
    #[default]
    Enabled,

    /// Local cart only. Nothing is sent.
    Offline,
}

impl SyncMode {
    pub fn is_sync_enabled(&self) -> bool {
        matches!(self, SyncMode::Enabled)
    }
}

impl std::fmt::Display for SyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SyncMode::Enabled => write!(f, "enabled"),
            SyncMode::Offline => write!(f, "offline"),
        }
    }
}

impl std::str::FromStr for SyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enabled" | "on" | "online" => Ok(SyncMode::Enabled),
            "offline" | "off" | "disabled" => Ok(SyncMode::Offline),
            other => Err(SyncError::InvalidConfig(format!(
                "Unknown sync mode: '{}'. Valid options: enabled, offline",
                other
            ))),
        }
    }
}

// =============================================================================
// Quantity Sync Mode
// =============================================================================

/// How a quantity change is expressed in the upsert body.
///
/// ```text
///   local: qty 2 ──increase──► qty 3
///
///   Delta    → POST /cart { quantity: 1 }   server adds to its line
///   Absolute → POST /cart { quantity: 3 }   server overwrites its line
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuantitySyncMode {
    #[default]
    Delta,
    Absolute,
}

impl std::fmt::Display for QuantitySyncMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            QuantitySyncMode::Delta => write!(f, "delta"),
            QuantitySyncMode::Absolute => write!(f, "absolute"),
        }
    }
}

impl std::str::FromStr for QuantitySyncMode {
    type Err = SyncError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "delta" => Ok(QuantitySyncMode::Delta),
            "absolute" | "set" => Ok(QuantitySyncMode::Absolute),
            other => Err(SyncError::InvalidConfig(format!(
                "Unknown quantity mode: '{}'. Valid options: delta, absolute",
                other
            ))),
        }
    }
}

// =============================================================================
// Sections
// =============================================================================

/// REST API settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL of the bookstore API.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    10
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Sync behavior settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SyncSettings {
    #[serde(default)]
    pub mode: SyncMode,

    #[serde(default)]
    pub quantity_mode: QuantitySyncMode,

    /// Load the server cart when a session starts.
    #[serde(default = "default_true")]
    pub hydrate_on_start: bool,
}

fn default_true() -> bool {
    true
}

impl Default for SyncSettings {
    fn default() -> Self {
        SyncSettings {
            mode: SyncMode::default(),
            quantity_mode: QuantitySyncMode::default(),
            hydrate_on_start: true,
        }
    }
}

/// Session labelling (shows up in logs).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    #[serde(default = "default_session_name")]
    pub name: String,
}

fn default_session_name() -> String {
    "default".to_string()
}

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            name: default_session_name(),
        }
    }
}

// =============================================================================
// Main Configuration
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FolioConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub sync: SyncSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl FolioConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (folio.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading config from file");
                let contents = std::fs::read_to_string(&path)?;
                config = toml::from_str(&contents)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_env_overrides();
        config.validate()?;

        Ok(config)
    }

    /// Loads config or returns default if load fails.
    pub fn load_or_default(config_path: Option<PathBuf>) -> Self {
        Self::load(config_path).unwrap_or_else(|e| {
            warn!("Failed to load config: {}. Using defaults.", e);
            Self::default()
        })
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> SyncResult<()> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| SyncError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| SyncError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Config saved");
        Ok(())
    }

    pub fn validate(&self) -> SyncResult<()> {
        let url = Url::parse(&self.api.base_url)?;
        if url.scheme() != "http" && url.scheme() != "https" {
            return Err(SyncError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        if self.api.timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        Ok(())
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Applies overrides from any key lookup (the process environment in production).
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(url) = lookup("FOLIO_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(mode) = lookup("FOLIO_SYNC_MODE") {
            match mode.parse() {
                Ok(parsed) => self.sync.mode = parsed,
                Err(_) => warn!(mode = %mode, "Unknown sync mode in environment"),
            }
        }

        if let Some(mode) = lookup("FOLIO_QUANTITY_MODE") {
            match mode.parse() {
                Ok(parsed) => self.sync.quantity_mode = parsed,
                Err(_) => warn!(mode = %mode, "Unknown quantity mode in environment"),
            }
        }

        if let Some(timeout) = lookup("FOLIO_HTTP_TIMEOUT") {
            if let Ok(secs) = timeout.parse::<u64>() {
                self.api.timeout_secs = secs;
            }
        }
    }

    fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("com", "folio", "cart")
            .map(|dirs| dirs.config_dir().join("folio.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub fn is_sync_enabled(&self) -> bool {
        self.sync.mode.is_sync_enabled()
    }

    pub fn quantity_mode(&self) -> QuantitySyncMode {
        self.sync.quantity_mode
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Parsed base URL, always ending in `/` so relative joins keep any path prefix.
    pub fn api_url(&self) -> SyncResult<Url> {
        let mut raw = self.api.base_url.clone();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        Ok(Url::parse(&raw)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_mode_parsing() {
        assert_eq!("enabled".parse::<SyncMode>().unwrap(), SyncMode::Enabled);
        assert_eq!("OFF".parse::<SyncMode>().unwrap(), SyncMode::Offline);
        assert!("sometimes".parse::<SyncMode>().is_err());

        assert_eq!(
            "set".parse::<QuantitySyncMode>().unwrap(),
            QuantitySyncMode::Absolute
        );
        assert!("double".parse::<QuantitySyncMode>().is_err());
    }

    #[test]
    fn test_default_config() {
        let config = FolioConfig::default();
        assert!(config.is_sync_enabled());
        assert_eq!(config.quantity_mode(), QuantitySyncMode::Delta);
        assert_eq!(config.timeout(), Duration::from_secs(10));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = FolioConfig::default();

        config.api.base_url = "ws://localhost:8000".into();
        assert!(config.validate().is_err());

        config.api.base_url = "not a url".into();
        assert!(config.validate().is_err());

        config.api.base_url = "https://books.example.com/api".into();
        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());

        config.api.timeout_secs = 3;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("FOLIO_API_URL", "https://shop.example.com"),
            ("FOLIO_SYNC_MODE", "offline"),
            ("FOLIO_QUANTITY_MODE", "absolute"),
            ("FOLIO_HTTP_TIMEOUT", "4"),
        ]
        .into_iter()
        .collect();

        let mut config = FolioConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));

        assert_eq!(config.api.base_url, "https://shop.example.com");
        assert_eq!(config.sync.mode, SyncMode::Offline);
        assert_eq!(config.sync.quantity_mode, QuantitySyncMode::Absolute);
        assert_eq!(config.api.timeout_secs, 4);
    }

    #[test]
    fn test_bad_override_keeps_previous_value() {
        let mut config = FolioConfig::default();
        config.apply_overrides(|k| (k == "FOLIO_SYNC_MODE").then(|| "maybe".to_string()));
        assert_eq!(config.sync.mode, SyncMode::Enabled);
    }

    #[test]
    fn test_api_url_keeps_prefix() {
        let mut config = FolioConfig::default();
        config.api.base_url = "https://books.example.com/api".into();
        let url = config.api_url().unwrap().join("cart").unwrap();
        assert_eq!(url.as_str(), "https://books.example.com/api/cart");
    }

    #[test]
    fn test_file_roundtrip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("folio.toml");

        let mut config = FolioConfig::default();
        config.sync.quantity_mode = QuantitySyncMode::Absolute;
        config.session.name = "till-2".into();
        config.sync.hydrate_on_start = false;
        config.save(Some(path.clone())).unwrap();

        let contents = std::fs::read_to_string(&path).unwrap();
        assert!(contents.contains("[api]"));
        assert!(contents.contains("quantity_mode = \"absolute\""));

        let loaded = FolioConfig::load(Some(path)).unwrap();
        assert_eq!(loaded.sync.quantity_mode, QuantitySyncMode::Absolute);
        assert_eq!(loaded.session.name, "till-2");
        assert!(!loaded.sync.hydrate_on_start);
    }

    #[test]
    fn test_load_rejects_bad_files() {
        let dir = tempfile::tempdir().unwrap();

        let malformed = dir.path().join("malformed.toml");
        std::fs::write(&malformed, "[api\nbase_url = ").unwrap();
        assert!(matches!(
            FolioConfig::load(Some(malformed)),
            Err(SyncError::ConfigLoadFailed(_))
        ));

        let zero_timeout = dir.path().join("zero.toml");
        std::fs::write(&zero_timeout, "[api]\ntimeout_secs = 0\n").unwrap();
        let err = FolioConfig::load(Some(zero_timeout)).unwrap_err();
        assert!(err.is_config_error());
    }

    #[test]
    fn test_missing_file_loads_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = FolioConfig::load(Some(dir.path().join("absent.toml"))).unwrap();
        assert_eq!(config.session.name, "default");
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: FolioConfig = toml::from_str("[sync]\nmode = \"offline\"\n").unwrap();
        assert_eq!(config.sync.mode, SyncMode::Offline);
        assert!(config.sync.hydrate_on_start);
        assert_eq!(config.api.base_url, "http://localhost:8000");
    }
}
