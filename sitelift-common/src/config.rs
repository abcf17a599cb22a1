//! Configuration loading and root folder resolution
//!
//! Resolution priority (highest first):
//! 1. Command-line argument
//! 2. Environment variable
//! 3. TOML config file (`<config dir>/sitelift/<module>.toml`)
//! 4. OS-dependent compiled default
//!
//! A missing or broken TOML file never aborts startup: compiled defaults are
//! used instead. Loading happens before logging is set up, so the outcome is
//! returned as a [`ConfigSource`] and logged once the subscriber exists.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable naming the root folder
pub const ROOT_FOLDER_ENV: &str = "SITELIFT_ROOT_FOLDER";

/// Default HTTP port for the conversion service
pub const DEFAULT_PORT: u16 = 3001;

/// Default per-upload ceiling (100 MiB)
pub const DEFAULT_MAX_UPLOAD_BYTES: u64 = 100 * 1024 * 1024;

/// Compiled-in fallback values for the current platform
#[derive(Debug, Clone)]
pub struct CompiledDefaults {
    pub root_folder: PathBuf,
    pub port: u16,
    pub bind_address: String,
    pub max_upload_bytes: u64,
    pub log_level: String,
}

impl CompiledDefaults {
    pub fn for_current_platform() -> Self {
        Self {
            root_folder: default_root_folder(),
            port: DEFAULT_PORT,
            bind_address: "127.0.0.1".to_string(),
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            log_level: "info".to_string(),
        }
    }
}

/// Logging section of the TOML config
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive when `RUST_LOG` is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// Per-module TOML configuration file
///
/// Every field is optional so a partial file is valid.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    pub root_folder: Option<String>,
    pub port: Option<u16>,
    pub bind_address: Option<String>,
    /// Upload ceiling in MiB
    pub max_upload_mb: Option<u64>,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl TomlConfig {
    /// Parse a config file
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
        toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))
    }

    /// Load the module's config file without logging
    ///
    /// Falls back to defaults on any problem; the returned source says why.
    pub fn load_with_source(module_name: &str) -> (Self, ConfigSource) {
        Self::load_from(config_file_path(module_name))
    }

    /// Load an optional config path, falling back to defaults
    pub fn load_from(path: Option<PathBuf>) -> (Self, ConfigSource) {
        let Some(path) = path else {
            return (Self::default(), ConfigSource::NoConfigDir);
        };

        if !path.exists() {
            return (Self::default(), ConfigSource::NotFound(path));
        }

        match Self::load(&path) {
            Ok(config) => (config, ConfigSource::File(path)),
            Err(e) => (Self::default(), ConfigSource::Invalid(e)),
        }
    }

    /// Load the module's config file and log the outcome immediately
    pub fn load_or_default(module_name: &str) -> Self {
        let (config, source) = Self::load_with_source(module_name);
        source.log();
        config
    }

    /// Upload ceiling in bytes, if configured
    pub fn max_upload_bytes(&self) -> Option<u64> {
        self.max_upload_mb.map(|mb| mb.saturating_mul(1024 * 1024))
    }
}

/// Where the loaded configuration came from
#[derive(Debug)]
pub enum ConfigSource {
    /// Parsed from this file
    File(PathBuf),
    /// The file does not exist
    NotFound(PathBuf),
    /// The platform has no config directory
    NoConfigDir,
    /// The file exists but could not be read or parsed
    Invalid(Error),
}

impl ConfigSource {
    pub fn is_defaults(&self) -> bool {
        !matches!(self, ConfigSource::File(_))
    }

    /// Report the outcome; call after the tracing subscriber is installed
    pub fn log(&self) {
        match self {
            ConfigSource::File(path) => info!("Loaded configuration from {}", path.display()),
            ConfigSource::NotFound(path) => {
                debug!("Config file {} not found; using compiled defaults", path.display())
            }
            ConfigSource::NoConfigDir => {
                debug!("No config directory available; using compiled defaults")
            }
            ConfigSource::Invalid(e) => warn!("{}; using compiled defaults", e),
        }
    }
}

/// Path of `<config dir>/sitelift/<module>.toml`
pub fn config_file_path(module_name: &str) -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("sitelift").join(format!("{}.toml", module_name)))
}

/// Resolves the root folder holding uploads, scratch space and downloads
pub struct RootFolderResolver {
    module_name: String,
    cli_override: Option<PathBuf>,
    toml_config: Option<TomlConfig>,
}

impl RootFolderResolver {
    pub fn new(module_name: &str) -> Self {
        Self {
            module_name: module_name.to_string(),
            cli_override: None,
            toml_config: None,
        }
    }

    /// Highest-priority value from the command line
    pub fn with_cli_override(mut self, path: Option<PathBuf>) -> Self {
        self.cli_override = path;
        self
    }

    /// Use an already-loaded TOML config instead of reading the file again
    pub fn with_toml_config(mut self, config: TomlConfig) -> Self {
        self.toml_config = Some(config);
        self
    }

    pub fn resolve(&self) -> PathBuf {
        if let Some(path) = &self.cli_override {
            return path.clone();
        }

        if let Ok(path) = std::env::var(ROOT_FOLDER_ENV) {
            if !path.trim().is_empty() {
                return PathBuf::from(path);
            }
        }

        let toml_root = match &self.toml_config {
            Some(config) => config.root_folder.clone(),
            None => TomlConfig::load_or_default(&self.module_name).root_folder,
        };
        if let Some(root) = toml_root {
            return PathBuf::from(root);
        }

        CompiledDefaults::for_current_platform().root_folder
    }
}

/// Creates the root folder layout on startup
pub struct RootFolderInitializer {
    root_folder: PathBuf,
}

impl RootFolderInitializer {
    pub fn new(root_folder: PathBuf) -> Self {
        Self { root_folder }
    }

    /// Create root, `uploads/`, `temp/` and `downloads/` (no-op when present)
    pub fn ensure_directory_exists(&self) -> Result<()> {
        for dir in [
            self.root_folder.clone(),
            self.uploads_dir(),
            self.scratch_dir(),
            self.downloads_dir(),
        ] {
            std::fs::create_dir_all(&dir).map_err(|e| {
                Error::Config(format!("Cannot create {}: {}", dir.display(), e))
            })?;
        }
        Ok(())
    }

    pub fn root_folder(&self) -> &Path {
        &self.root_folder
    }

    pub fn uploads_dir(&self) -> PathBuf {
        self.root_folder.join("uploads")
    }

    pub fn scratch_dir(&self) -> PathBuf {
        self.root_folder.join("temp")
    }

    pub fn downloads_dir(&self) -> PathBuf {
        self.root_folder.join("downloads")
    }
}

/// OS-dependent default root folder
fn default_root_folder() -> PathBuf {
    if cfg!(target_os = "linux") {
        // ~/.local/share/sitelift
        dirs::data_local_dir()
            .map(|d| d.join("sitelift"))
            .unwrap_or_else(|| PathBuf::from("/var/lib/sitelift"))
    } else if cfg!(target_os = "macos") {
        dirs::data_dir()
            .map(|d| d.join("sitelift"))
            .unwrap_or_else(|| PathBuf::from("/Library/Application Support/sitelift"))
    } else if cfg!(target_os = "windows") {
        dirs::data_local_dir()
            .map(|d| d.join("sitelift"))
            .unwrap_or_else(|| PathBuf::from("C:\\ProgramData\\sitelift"))
    } else {
        PathBuf::from("./sitelift_data")
    }
}
