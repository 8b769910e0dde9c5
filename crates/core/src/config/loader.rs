//! Path resolution against the host-provided base directory
//!
//! The host tells the kit where it is installed during load (e.g.
//! `game/csgo/addons/cs2kit/`). Relative paths in configuration are resolved
//! against that directory; absolute paths are used as-is.

use std::path::{Path, PathBuf};

/// The kit's base directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Paths {
    base_dir: PathBuf,
}

impl Paths {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }

    /// Resolve `path` against the base directory unless it is absolute
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }

    /// Returns the base configs directory.
    ///
    /// Path: `{base}/configs/`
    pub fn configs_dir(&self) -> PathBuf {
        self.base_dir.join("configs")
    }

    /// Returns the core config path.
    ///
    /// Path: `{base}/configs/core.toml`
    pub fn core_config_path(&self) -> PathBuf {
        self.configs_dir().join("core.toml")
    }
}
