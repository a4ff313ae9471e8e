//! Configuration management for the YANG runtime
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (yang-runtime.toml)
//! - Environment variables (YANG_RUNTIME__*)
//!
//! ## Example config file (yang-runtime.toml):
//! ```toml
//! [logging]
//! filter = "yang_runtime=debug"
//!
//! [registry]
//! strict_bindings = true
//!
//! [serializer]
//! default_format = "json-tree"
//! pretty = false
//! ```

use config_crate::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::Result;

/// Main configuration for the runtime
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RuntimeConfig {
    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Registry settings
    #[serde(default)]
    pub registry: RegistryConfig,

    /// Serializer settings
    #[serde(default)]
    pub serializer: SerializerConfig,
}

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default `tracing` filter directive, used when RUST_LOG is unset
    #[serde(default = "default_filter")]
    pub filter: String,
}

/// Registry configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Reject class bindings that name no schema node
    #[serde(default = "default_true")]
    pub strict_bindings: bool,
}

/// Serializer configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SerializerConfig {
    /// Format used when the caller names none
    #[serde(default = "default_format")]
    pub default_format: String,

    /// Pretty-print textual encodings
    #[serde(default)]
    pub pretty: bool,
}

// Default value functions
fn default_filter() -> String {
    "warn".to_string()
}

fn default_true() -> bool {
    true
}

fn default_format() -> String {
    "json-tree".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: default_filter(),
        }
    }
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self { strict_bindings: true }
    }
}

impl Default for SerializerConfig {
    fn default() -> Self {
        Self {
            default_format: default_format(),
            pretty: false,
        }
    }
}

impl RuntimeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration from a specific file
    pub fn load_from(config_path: Option<&str>) -> Result<Self> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = [
            "yang-runtime.toml",
            ".yang-runtime.toml",
            "config/yang-runtime.toml",
        ];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("org", "yang", "yang-runtime") {
            let xdg_config = config_dir.config_dir().join("yang-runtime.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (YANG_RUNTIME__SECTION__KEY)
        builder = builder.add_source(
            Environment::with_prefix("YANG_RUNTIME")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        Ok(config.try_deserialize()?)
    }

    /// Save configuration to a file
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)?;
        Ok(())
    }
}
