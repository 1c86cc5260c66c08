//! # Client Configuration
//!
//! Where the remote API lives, whether to use it at all, pagination limits
//! and where the local database file goes.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     ESTOQUE_API_URL=http://192.168.0.10:5136                           │
//! │     ESTOQUE_USE_API=false                                              │
//! │     ESTOQUE_TIMEOUT_SECS=5                                             │
//! │     ESTOQUE_PAGE_SIZE=20                                               │
//! │     ESTOQUE_DB_PATH=/data/estoque.db                                   │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/estoque/estoque.toml (Linux)                             │
//! │     ~/Library/Application Support/com.estoque.estoque/estoque.toml     │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     Android emulator host, remote enabled, 10 s timeout                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! [api]
//! base_url = "http://10.0.2.2:5136"
//! products_path = "/api/produtos"
//! login_path = "/api/auth/login"
//! timeout_secs = 10
//! use_api = true
//! enable_logs = true
//!
//! [pagination]
//! default_page = 1
//! default_page_size = 50
//! max_page_size = 100
//!
//! [storage]
//! database_path = "/data/estoque.db"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{SyncError, SyncResult};

const CONFIG_FILE_NAME: &str = "estoque.toml";
const DATABASE_FILE_NAME: &str = "estoque.db";

// =============================================================================
// API Settings
// =============================================================================

/// Remote API settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Scheme, host and port of the API. The default is the host machine
    /// as seen from the Android emulator.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Collection path for products.
    #[serde(default = "default_products_path")]
    pub products_path: String,

    /// Sign-in endpoint.
    #[serde(default = "default_login_path")]
    pub login_path: String,

    /// Per-request timeout (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// When false every operation runs against the local store only.
    #[serde(default = "default_true")]
    pub use_api: bool,

    /// Log each request and response at debug level.
    #[serde(default = "default_true")]
    pub enable_logs: bool,
}

fn default_base_url() -> String {
    "http://10.0.2.2:5136".to_string()
}

fn default_products_path() -> String {
    "/api/produtos".to_string()
}

fn default_login_path() -> String {
    "/api/auth/login".to_string()
}

fn default_timeout() -> u64 {
    10
}

fn default_true() -> bool {
    true
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            base_url: default_base_url(),
            products_path: default_products_path(),
            login_path: default_login_path(),
            timeout_secs: default_timeout(),
            use_api: true,
            enable_logs: true,
        }
    }
}

impl ApiSettings {
    /// Request timeout as a Duration.
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Resolves `path` against the base URL.
    pub fn endpoint(&self, path: &str) -> SyncResult<Url> {
        let base = Url::parse(&self.base_url)?;
        Ok(base.join(path)?)
    }

    /// URL of the product collection.
    pub fn products_url(&self) -> SyncResult<Url> {
        self.endpoint(&self.products_path)
    }

    /// URL of a single product. The id is percent-encoded as one segment.
    pub fn product_url(&self, id: &str) -> SyncResult<Url> {
        let mut url = self.products_url()?;
        url.path_segments_mut()
            .map_err(|_| SyncError::InvalidUrl(format!("{} cannot have a path", self.base_url)))?
            .pop_if_empty()
            .push(id);
        Ok(url)
    }

    /// URL of the sign-in endpoint.
    pub fn login_url(&self) -> SyncResult<Url> {
        self.endpoint(&self.login_path)
    }
}

// =============================================================================
// Pagination Settings
// =============================================================================

/// Pagination defaults for list requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationSettings {
    #[serde(default = "default_page")]
    pub default_page: u32,

    #[serde(default = "default_page_size")]
    pub default_page_size: u32,

    #[serde(default = "default_max_page_size")]
    pub max_page_size: u32,
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    50
}

fn default_max_page_size() -> u32 {
    100
}

impl Default for PaginationSettings {
    fn default() -> Self {
        PaginationSettings {
            default_page: default_page(),
            default_page_size: default_page_size(),
            max_page_size: default_max_page_size(),
        }
    }
}

impl PaginationSettings {
    /// Fills in defaults and clamps to the allowed range.
    ///
    /// Page is at least 1; page size is within `1..=max_page_size`.
    pub fn resolve(&self, page: Option<u32>, page_size: Option<u32>) -> (u32, u32) {
        let page = page.unwrap_or(self.default_page).max(1);
        let size = page_size
            .unwrap_or(self.default_page_size)
            .clamp(1, self.max_page_size.max(1));
        (page, size)
    }
}

// =============================================================================
// Storage Settings
// =============================================================================

/// Local storage settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StorageSettings {
    /// SQLite file. Defaults to the platform data directory.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_path: Option<PathBuf>,
}

impl StorageSettings {
    /// The configured path, or `estoque.db` in the platform data directory.
    pub fn resolved_database_path(&self) -> PathBuf {
        if let Some(path) = &self.database_path {
            return path.clone();
        }

        project_dirs()
            .map(|dirs| dirs.data_dir().join(DATABASE_FILE_NAME))
            .unwrap_or_else(|| PathBuf::from(DATABASE_FILE_NAME))
    }
}

// =============================================================================
// Main Client Configuration
// =============================================================================

/// Complete client configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub pagination: PaginationSettings,

    #[serde(default)]
    pub storage: StorageSettings,
}

impl ClientConfig {
    /// Creates a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from file, environment, and defaults.
    ///
    /// ## Load Order (later overrides earlier)
    /// 1. Default values
    /// 2. Config file (estoque.toml)
    /// 3. Environment variables
    pub fn load(config_path: Option<PathBuf>) -> SyncResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
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
            warn!("Failed to load client config: {}. Using defaults.", e);
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

        info!(?path, "Client config saved");
        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> SyncResult<()> {
        let base = Url::parse(&self.api.base_url)
            .map_err(|e| SyncError::InvalidUrl(format!("{}: {}", self.api.base_url, e)))?;
        if base.scheme() != "http" && base.scheme() != "https" {
            return Err(SyncError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got: {}",
                self.api.base_url
            )));
        }

        for (name, path) in [
            ("products_path", &self.api.products_path),
            ("login_path", &self.api.login_path),
        ] {
            if !path.starts_with('/') {
                return Err(SyncError::InvalidConfig(format!(
                    "{name} must start with '/', got: {path}"
                )));
            }
        }

        if self.api.timeout_secs == 0 {
            return Err(SyncError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }

        let pagination = &self.pagination;
        if pagination.default_page == 0 {
            return Err(SyncError::InvalidConfig(
                "default_page must be greater than 0".into(),
            ));
        }
        if pagination.max_page_size == 0 {
            return Err(SyncError::InvalidConfig(
                "max_page_size must be greater than 0".into(),
            ));
        }
        if pagination.default_page_size == 0
            || pagination.default_page_size > pagination.max_page_size
        {
            return Err(SyncError::InvalidConfig(format!(
                "default_page_size must be between 1 and {}",
                pagination.max_page_size
            )));
        }

        Ok(())
    }

    /// Applies environment variable overrides.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Applies overrides from any variable source.
    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(url) = var("ESTOQUE_API_URL") {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.base_url = url;
        }

        if let Some(flag) = var("ESTOQUE_USE_API") {
            match parse_flag(&flag) {
                Some(enabled) => {
                    debug!(enabled, "Overriding use_api from environment");
                    self.api.use_api = enabled;
                }
                None => warn!(value = %flag, "Unknown ESTOQUE_USE_API value"),
            }
        }

        if let Some(secs) = var("ESTOQUE_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(s) => self.api.timeout_secs = s,
                Err(_) => warn!(value = %secs, "Invalid ESTOQUE_TIMEOUT_SECS"),
            }
        }

        if let Some(size) = var("ESTOQUE_PAGE_SIZE") {
            match size.parse::<u32>() {
                Ok(s) => self.pagination.default_page_size = s,
                Err(_) => warn!(value = %size, "Invalid ESTOQUE_PAGE_SIZE"),
            }
        }

        if let Some(path) = var("ESTOQUE_DB_PATH") {
            self.storage.database_path = Some(PathBuf::from(path));
        }
    }

    /// Returns the default config file path.
    fn default_config_path() -> Option<PathBuf> {
        project_dirs().map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Returns true if operations should try the remote API first.
    pub fn is_remote_enabled(&self) -> bool {
        self.api.use_api
    }

    /// Where the local database lives.
    pub fn database_path(&self) -> PathBuf {
        self.storage.resolved_database_path()
    }
}

fn project_dirs() -> Option<directories::ProjectDirs> {
    directories::ProjectDirs::from("com", "estoque", "estoque")
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
