//! Configuration for CS2Kit
//!
//! The core config is a TOML file at `{base}/configs/core.toml`. A missing
//! file is created with defaults on first load.
//!
//! ```toml
//! version = 1
//! debug = false
//! log_prefix = "CS2Kit"
//! gamedata = "gamedata/cs2kit.jsonc"
//! ```

mod loader;

use serde::{Deserialize, Serialize};

pub use loader::Paths;

/// Configuration system errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Failed to read or write config file
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse TOML content
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Failed to serialize config to TOML
    #[error("Failed to serialize config: {0}")]
    SerializeError(#[from] toml::ser::Error),
}

/// Result type for config operations
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Core framework configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Config version for future migration support
    pub version: u32,

    /// Enable debug logging
    pub debug: bool,

    /// Prefix attached to every log line
    pub log_prefix: String,

    /// Gamedata file, relative to the base directory
    pub gamedata: String,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            version: 1,
            debug: false,
            log_prefix: "CS2Kit".to_string(),
            gamedata: "gamedata/cs2kit.jsonc".to_string(),
        }
    }
}

impl CoreConfig {
    /// Load core config from file, creating default if missing.
    pub fn load(paths: &Paths) -> ConfigResult<Self> {
        let path = paths.core_config_path();

        if path.exists() {
            let content = std::fs::read_to_string(&path)?;
            let config: Self = toml::from_str(&content)?;
            tracing::debug!("Loaded core config from {:?}", path);
            Ok(config)
        } else {
            let default = Self::default();
            default.save(paths)?;
            tracing::info!("Created default core config at {:?}", path);
            Ok(default)
        }
    }

    /// Load core config, falling back to defaults on any error
    pub fn load_or_default(paths: &Paths) -> Self {
        Self::load(paths).unwrap_or_else(|e| {
            tracing::warn!("Using default core config: {}", e);
            Self::default()
        })
    }

    /// Save core config to file.
    pub fn save(&self, paths: &Paths) -> ConfigResult<()> {
        let path = paths.core_config_path();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = toml::to_string_pretty(self)?;
        std::fs::write(&path, content)?;
        tracing::debug!("Saved core config to {:?}", path);
        Ok(())
    }

    /// Reload core config from file.
    pub fn reload(&mut self, paths: &Paths) -> ConfigResult<()> {
        let path = paths.core_config_path();
        let content = std::fs::read_to_string(&path)?;
        *self = toml::from_str(&content)?;
        tracing::debug!("Reloaded core config from {:?}", path);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_paths(name: &str) -> Paths {
        let dir = std::env::temp_dir().join(format!("cs2kit-{}-{}", name, std::process::id()));
        std::fs::remove_dir_all(&dir).ok();
        Paths::new(dir)
    }

    #[test]
    fn test_core_config_default() {
        let config = CoreConfig::default();
        assert_eq!(config.version, 1);
        assert!(!config.debug);
        assert_eq!(config.log_prefix, "CS2Kit");
        assert_eq!(config.gamedata, "gamedata/cs2kit.jsonc");
    }

    #[test]
    fn test_core_config_serialize() {
        let config = CoreConfig {
            version: 2,
            debug: true,
            ..Default::default()
        };

        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("version = 2"));
        assert!(toml_str.contains("debug = true"));
    }

    #[test]
    fn test_missing_keys_use_defaults() {
        let config: CoreConfig = toml::from_str("debug = true").unwrap();
        assert!(config.debug);
        assert_eq!(config.gamedata, "gamedata/cs2kit.jsonc");
    }

    #[test]
    fn test_load_creates_default() {
        let paths = temp_paths("create");
        let config = CoreConfig::load(&paths).unwrap();
        assert_eq!(config, CoreConfig::default());
        assert!(paths.core_config_path().exists());

        std::fs::remove_dir_all(paths.base_dir()).ok();
    }

    #[test]
    fn test_reload_picks_up_changes() {
        let paths = temp_paths("reload");
        let mut config = CoreConfig::load(&paths).unwrap();

        std::fs::write(paths.core_config_path(), "debug = true\nlog_prefix = \"Kit\"\n").unwrap();
        config.reload(&paths).unwrap();
        assert!(config.debug);
        assert_eq!(config.log_prefix, "Kit");

        std::fs::remove_dir_all(paths.base_dir()).ok();
    }

    #[test]
    fn test_malformed_falls_back_to_default() {
        let paths = temp_paths("malformed");
        std::fs::create_dir_all(paths.configs_dir()).unwrap();
        std::fs::write(paths.core_config_path(), "debug = \"maybe\"").unwrap();

        assert!(matches!(CoreConfig::load(&paths), Err(ConfigError::ParseError(_))));
        assert_eq!(CoreConfig::load_or_default(&paths), CoreConfig::default());

        std::fs::remove_dir_all(paths.base_dir()).ok();
    }
}
