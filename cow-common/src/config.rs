//! Configuration loading and root folder resolution
//!
//! Bootstrap configuration only: where the data lives, which port to serve
//! on, logging, and the optional remote image service. A missing or broken
//! TOML file never stops startup; compiled defaults are used instead.
//!
//! Root folder priority:
//! 1. Command-line argument (highest priority)
//! 2. Environment variable (`COW_ROOT_FOLDER`)
//! 3. TOML config file (`root_folder`)
//! 4. OS-dependent compiled default (fallback)

use crate::{Error, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Environment variable overriding the root folder
pub const ROOT_FOLDER_ENV: &str = "COW_ROOT_FOLDER";

/// Environment variable carrying the remote image service token
pub const REMOTE_TOKEN_ENV: &str = "COW_REMOTE_TOKEN";

/// Database file name inside the root folder
pub const DATABASE_FILE: &str = "cow.db";

/// Config file name inside the platform config directory
pub const CONFIG_FILE: &str = "cow.toml";

/// Default review service port
pub const DEFAULT_PORT: u16 = 5780;

/// Default rendered image size in pixels
pub const DEFAULT_IMAGE_SIZE: u32 = 350;

pub const DEFAULT_REMOTE_BASE_URL: &str = "https://us-central1-colours-of-wine.cloudfunctions.net";

/// Bootstrap configuration loaded from TOML
#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    /// Folder holding the database (optional)
    #[serde(default)]
    pub root_folder: Option<PathBuf>,

    /// HTTP server port
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub image: ImageConfig,

    #[serde(default)]
    pub remote_image: RemoteImageConfig,
}

impl Default for TomlConfig {
    fn default() -> Self {
        Self {
            root_folder: None,
            port: default_port(),
            logging: LoggingConfig::default(),
            image: ImageConfig::default(),
            remote_image: RemoteImageConfig::default(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level or EnvFilter directive (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log file path (optional, logs to stderr if not specified)
    #[serde(default)]
    pub file: Option<PathBuf>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file: None,
        }
    }
}

/// Primary image synthesizer settings
#[derive(Debug, Clone, Deserialize)]
pub struct ImageConfig {
    /// Edge length of rendered swatches in pixels
    #[serde(default = "default_image_size")]
    pub size: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            size: default_image_size(),
        }
    }
}

/// Secondary (remote) image service settings
#[derive(Debug, Clone, Deserialize)]
pub struct RemoteImageConfig {
    #[serde(default = "default_true")]
    pub enabled: bool,

    #[serde(default = "default_remote_base_url")]
    pub base_url: String,

    /// Opaque authorization token; remote rendering is skipped without one
    #[serde(default)]
    pub token: Option<String>,

    #[serde(default = "default_remote_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for RemoteImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: default_remote_base_url(),
            token: None,
            timeout_secs: default_remote_timeout_secs(),
        }
    }
}

impl RemoteImageConfig {
    /// Token to use, environment first, then TOML
    ///
    /// Returns `None` when disabled or when no non-blank token is configured.
    pub fn resolve_token(&self) -> Option<String> {
        if !self.enabled {
            return None;
        }
        std::env::var(REMOTE_TOKEN_ENV)
            .ok()
            .filter(|t| !t.trim().is_empty())
            .or_else(|| self.token.clone().filter(|t| !t.trim().is_empty()))
    }
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_image_size() -> u32 {
    DEFAULT_IMAGE_SIZE
}

fn default_true() -> bool {
    true
}

fn default_remote_base_url() -> String {
    DEFAULT_REMOTE_BASE_URL.to_string()
}

fn default_remote_timeout_secs() -> u64 {
    30
}

impl TomlConfig {
    /// Parse a TOML config file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_toml_str(&content)
    }

    /// Parse TOML config text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(format!("Failed to parse TOML: {}", e)))
    }

    /// Load config from an explicit path or the platform default location
    ///
    /// Never fails: a missing file is logged at info level, a broken one at
    /// warn level, and compiled defaults are returned in both cases.
    pub fn load_or_default(explicit: Option<&Path>) -> Self {
        let path = match explicit {
            Some(p) => Some(p.to_path_buf()),
            None => default_config_file(),
        };

        match path {
            Some(path) if path.exists() => match Self::from_file(&path) {
                Ok(config) => {
                    info!("Loaded configuration from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("{}; using defaults", e);
                    Self::default()
                }
            },
            Some(path) => {
                info!("No config file at {}, using defaults", path.display());
                Self::default()
            }
            None => {
                info!("No config directory on this platform, using defaults");
                Self::default()
            }
        }
    }
}

/// Platform config file location
///
/// Linux: `~/.config/cow/cow.toml`, then `/etc/cow/cow.toml`.
/// Elsewhere: `<platform config dir>/cow/cow.toml`.
pub fn default_config_file() -> Option<PathBuf> {
    let user_config = dirs::config_dir().map(|d| d.join("cow").join(CONFIG_FILE));

    if cfg!(target_os = "linux") {
        let system_config = PathBuf::from("/etc/cow").join(CONFIG_FILE);
        match user_config {
            Some(path) if path.exists() => Some(path),
            _ if system_config.exists() => Some(system_config),
            other => other,
        }
    } else {
        user_config
    }
}

/// Get OS-dependent default root folder path
pub fn default_root_folder() -> PathBuf {
    dirs::data_local_dir()
        .map(|d| d.join("cow"))
        .unwrap_or_else(|| PathBuf::from("./cow_data"))
}

/// Resolves the root folder from CLI, environment, TOML and defaults
#[derive(Debug, Clone)]
pub struct RootFolderResolver {
    module_name: String,
    cli_arg: Option<PathBuf>,
    toml_root: Option<PathBuf>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_arg: None,
            toml_root: None,
        }
    }

    pub fn with_cli_arg(mut self, path: Option<PathBuf>) -> Self {
        self.cli_arg = path;
        self
    }

    pub fn with_toml(mut self, config: &TomlConfig) -> Self {
        self.toml_root = config.root_folder.clone();
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_arg {
            info!("[{}] Root folder from command line: {}", self.module_name, path.display());
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                info!("[{}] Root folder from {}: {}", self.module_name, ROOT_FOLDER_ENV, path);
                return PathBuf::from(path);
            }
        }

        if let Some(path) = &self.toml_root {
            info!("[{}] Root folder from config file: {}", self.module_name, path.display());
            return path.clone();
        }

        let path = default_root_folder();
        info!("[{}] Root folder (default): {}", self.module_name, path.display());
        path
    }
}

/// Creates the root folder and names the files inside it
#[derive(Debug, Clone)]
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    pub fn ensure_directory_exists(&self) -> Result<()> {
        if !self.root_folder.exists() {
            std::fs::create_dir_all(&self.root_folder)?;
            info!("Created root folder: {}", self.root_folder.display());
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn database_path(&self) -> PathBuf {
        self.root_folder.join(DATABASE_FILE)
    }
}
