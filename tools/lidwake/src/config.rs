//! Configuration loading from `lidwake.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use lidwake_core::log::LogLevel;
use lidwake_driver_api::{DmiField, SystemIdentity};
use serde::Deserialize;

use crate::sysfs;

/// Configuration file looked up in the current directory.
const DEFAULT_CONFIG: &str = "lidwake.toml";

/// Level used when neither the CLI nor the configuration sets one.
const DEFAULT_LOG_LEVEL: LogLevel = LogLevel::Warn;

/// Tool configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
    /// Log level name.
    log_level: Option<String>,
    /// Root of the sysfs tree.
    sysfs_root: Option<PathBuf>,
    /// Fixed identity used instead of sysfs.
    pub identity: Option<IdentityFile>,
}

/// DMI identity strings, as written in `[identity]` or an identity file.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct IdentityFile {
    sys_vendor: Option<String>,
    product_name: Option<String>,
    product_sku: Option<String>,
}

impl Config {
    /// Loads `path`, or `lidwake.toml` from the current directory if it
    /// exists. Without either, every setting keeps its default.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let path = match path {
            Some(path) => path,
            None if Path::new(DEFAULT_CONFIG).is_file() => Path::new(DEFAULT_CONFIG),
            None => return Ok(Self::default()),
        };

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Returns the configured log level.
    pub fn log_level(&self) -> Result<LogLevel> {
        match &self.log_level {
            Some(name) => LogLevel::from_name(name)
                .ok_or_else(|| anyhow!("Invalid log-level '{name}' in configuration")),
            None => Ok(DEFAULT_LOG_LEVEL),
        }
    }

    /// Returns the sysfs root to read DMI attributes from.
    pub fn sysfs_root(&self) -> PathBuf {
        self.sysfs_root
            .clone()
            .unwrap_or_else(|| PathBuf::from(sysfs::SYSFS_PATH))
    }
}

impl IdentityFile {
    /// Loads a standalone identity file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Converts into a [`SystemIdentity`]; absent keys stay unknown.
    pub fn into_identity(self) -> SystemIdentity {
        let mut identity = SystemIdentity::new();
        for (field, value) in [
            (DmiField::SysVendor, self.sys_vendor),
            (DmiField::ProductName, self.product_name),
            (DmiField::ProductSku, self.product_sku),
        ] {
            if let Some(value) = value {
                identity.set(field, &value);
            }
        }
        identity
    }
}
