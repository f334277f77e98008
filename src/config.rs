//! Configuration management for the compatibility checker
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (compat.toml)
//! - Environment variables (COMPAT_*)
//!
//! ## Example config file (compat.toml):
//! ```toml
//! [registry]
//! url = "http://localhost:8081"
//! subject = "store-orders"
//! timeout_secs = 5
//! default_mode = "BACKWARD"
//!
//! [report]
//! format = "text"
//! show_diff = false
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

use crate::compatibility::CompatibilityMode;

/// Main configuration for the compatibility checker
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CheckerConfig {
    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Report settings
    #[serde(default)]
    pub report: ReportConfig,
}

/// Schema registry configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Base URL of the schema registry
    #[serde(default = "default_registry_url")]
    pub url: String,

    /// Subject whose compatibility mode governs the check
    #[serde(default)]
    pub subject: Option<String>,

    /// Request timeout in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Mode to fall back to when the registry cannot answer
    #[serde(default = "default_mode")]
    pub default_mode: String,
}

/// Report configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportConfig {
    /// Output format (text or json)
    #[serde(default)]
    pub format: OutputFormat,

    /// Include the full field diff listing in text output
    #[serde(default)]
    pub show_diff: bool,
}

/// Output format for reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

// Default value functions
fn default_registry_url() -> String {
    "http://localhost:8081".to_string()
}

fn default_timeout_secs() -> u64 {
    5
}

fn default_mode() -> String {
    "BACKWARD".to_string()
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: default_registry_url(),
            subject: None,
            timeout_secs: default_timeout_secs(),
            default_mode: default_mode(),
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
            show_diff: false,
        }
    }
}

impl CheckerConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["compat.toml", ".compat.toml", "config/compat.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "familiar", "compat") {
            let xdg_config = config_dir.config_dir().join("compat.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (COMPAT_*)
        builder = builder.add_source(
            Environment::with_prefix("COMPAT")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// The mode to use when the registry is not consulted or cannot answer.
    /// An unparseable configured value lands in the conservative UNKNOWN mode.
    pub fn fallback_mode(&self) -> CompatibilityMode {
        CompatibilityMode::parse(&self.registry.default_mode)
    }
}
