//! Host platform identifier
//!
//! Gamedata entries are keyed by platform name, and module files follow the
//! platform's shared-library naming convention.

use std::fmt;

/// Platforms the gamedata format carries values for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    Linux,
    Windows,
}

impl Platform {
    /// The platform this binary was compiled for
    ///
    /// Anything that is not Windows uses the Linux naming convention.
    pub const fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else {
            Self::Linux
        }
    }

    /// Key used for this platform in gamedata files
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Linux => "linux",
            Self::Windows => "windows",
        }
    }

    /// Shared-library file name for a logical library name
    ///
    /// `"server"` becomes `libserver.so` on Linux and `server.dll` on Windows.
    pub fn module_file_name(&self, library: &str) -> String {
        match self {
            Self::Linux => format!("lib{}.so", library),
            Self::Windows => format!("{}.dll", library),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_file_name() {
        assert_eq!(Platform::Linux.module_file_name("server"), "libserver.so");
        assert_eq!(Platform::Windows.module_file_name("server"), "server.dll");
    }

    #[test]
    fn test_current_matches_target() {
        #[cfg(target_os = "windows")]
        assert_eq!(Platform::current(), Platform::Windows);

        #[cfg(not(target_os = "windows"))]
        assert_eq!(Platform::current(), Platform::Linux);
    }

    #[test]
    fn test_display() {
        assert_eq!(Platform::Linux.to_string(), "linux");
        assert_eq!(Platform::Windows.to_string(), "windows");
    }
}
