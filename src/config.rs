//! Bridge configuration loaded from `vmbridge.toml`

use std::fs;
use std::path::Path;

use once_cell::sync::{Lazy, OnceCell};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "vmbridge.toml";

static INSTALLED: OnceCell<BridgeConfig> = OnceCell::new();
static DEFAULT: Lazy<BridgeConfig> = Lazy::new(BridgeConfig::default);

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default)]
    pub logging: LogSettings,

    #[serde(default)]
    pub frames: FrameConfig,

    #[serde(default)]
    pub unbox: UnboxConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSettings {
    #[serde(default = "default_level")]
    pub level: String,

    #[serde(default)]
    pub json: bool,

    #[serde(default)]
    pub spans: bool,

    #[serde(default)]
    pub file: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameConfig {
    /// Deepest handle mark nesting allowed per thread
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,

    /// Initial reference capacity of each handle block
    #[serde(default = "default_block_capacity")]
    pub block_capacity: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnboxConfig {
    /// Check each boxed argument's kind against its signature tag
    #[serde(default = "default_true")]
    pub verify_box_types: bool,
}

impl Default for LogSettings {
    fn default() -> Self {
        Self {
            level: default_level(),
            json: false,
            spans: false,
            file: None,
        }
    }
}

impl Default for FrameConfig {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            block_capacity: default_block_capacity(),
        }
    }
}

impl Default for UnboxConfig {
    fn default() -> Self {
        Self {
            verify_box_types: true,
        }
    }
}

fn default_level() -> String { "info".to_string() }
fn default_max_depth() -> usize { 256 }
fn default_block_capacity() -> usize { 32 }
fn default_true() -> bool { true }

impl BridgeConfig {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    /// Parse configuration from TOML string
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Find and load `vmbridge.toml` from the current directory or its parents
    pub fn discover() -> Self {
        let mut current = std::env::current_dir().ok();

        while let Some(dir) = current {
            if let Some(config) = Self::discover_in(&dir) {
                return config;
            }
            current = dir.parent().map(|p| p.to_path_buf());
        }

        Self::default()
    }

    fn discover_in(dir: &Path) -> Option<Self> {
        let config_path = dir.join(CONFIG_FILE_NAME);
        if !config_path.exists() {
            return None;
        }
        match Self::load(&config_path) {
            Ok(config) => Some(config),
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring unreadable config");
                None
            }
        }
    }
}

/// Install the process-wide configuration; the first install wins
pub fn install(config: BridgeConfig) -> Result<(), BridgeConfig> {
    INSTALLED.set(config)
}

/// Installed configuration, or defaults when nothing was installed
#[inline]
pub fn current() -> &'static BridgeConfig {
    INSTALLED.get().unwrap_or_else(|| &*DEFAULT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = BridgeConfig::default();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.frames.max_depth, 256);
        assert_eq!(config.frames.block_capacity, 32);
        assert!(config.unbox.verify_box_types);
    }

    #[test]
    fn test_parse_partial_sections() {
        let config = BridgeConfig::parse(
            r#"
            [frames]
            max_depth = 8

            [unbox]
            verify_box_types = false
            "#,
        )
        .unwrap();

        assert_eq!(config.frames.max_depth, 8);
        assert_eq!(config.frames.block_capacity, 32);
        assert!(!config.unbox.verify_box_types);
        assert_eq!(config.logging, LogSettings::default());
    }

    #[test]
    fn test_parse_empty_is_default() {
        assert_eq!(BridgeConfig::parse("").unwrap(), BridgeConfig::default());
    }

    #[test]
    fn test_parse_rejects_bad_types() {
        let err = BridgeConfig::parse("[frames]\nmax_depth = \"deep\"\n").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[logging]\nlevel = \"debug\"\njson = true").unwrap();

        let config = BridgeConfig::load(file.path()).unwrap();
        assert_eq!(config.logging.level, "debug");
        assert!(config.logging.json);
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = BridgeConfig::load(&dir.path().join("absent.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_discover_in_directory() {
        let dir = tempfile::tempdir().unwrap();
        assert!(BridgeConfig::discover_in(dir.path()).is_none());

        fs::write(dir.path().join(CONFIG_FILE_NAME), "[frames]\nmax_depth = 4\n").unwrap();
        let config = BridgeConfig::discover_in(dir.path()).unwrap();
        assert_eq!(config.frames.max_depth, 4);
    }
}
