//! Offset and signature catalog
//!
//! The catalog is loaded once from a gamedata file deployed next to the
//! plugin, so offsets and signatures can be updated without recompiling:
//!
//! ```jsonc
//! {
//!   "offsets": {
//!     "GameEntitySystem": { "windows": 88, "linux": 80 }
//!   },
//!   "signatures": {
//!     "UTIL_ClientPrint": {
//!       "library": "server",
//!       "linux":   { "pattern": "55 48 8D 05 ? ? ? ?", "offset": 3 },
//!       "windows": { "pattern": "48 85 C9 0F 84" }
//!     }
//!   }
//! }
//! ```
//!
//! Only the values for the catalog's platform are kept. Lookups never cache;
//! see [`SignatureCache`](super::SignatureCache) for memoized resolution.

use std::collections::HashMap;
use std::path::Path;

use cs2kit_sdk::Platform;
use serde::Deserialize;
use serde_json::Value;

use super::jsonc::strip_comments;
use super::pattern::{BytePattern, PatternError};
use super::scanner::SignatureScanner;

/// Errors that can occur when loading or resolving gamedata
#[derive(Debug, thiserror::Error)]
pub enum GamedataError {
    #[error("Failed to read gamedata file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse gamedata JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Signature not found: {0}")]
    SignatureNotFound(String),

    #[error("Invalid signature '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: PatternError,
    },

    #[error("Failed to find signature in memory: {0}")]
    ScanFailed(String),

    #[error("Relative address of signature '{0}' did not resolve")]
    RelativeFailed(String),
}

/// A signature for the catalog's platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignatureEntry {
    /// Logical library to scan (e.g. `"server"`, `"engine2"`)
    pub library: String,
    /// Hex/wildcard pattern text
    pub pattern: String,
    /// Where the 4-byte relative displacement sits after the match, 0 for none
    pub offset: i64,
}

#[derive(Debug, Deserialize)]
struct PlatformSignature {
    #[serde(default)]
    pattern: String,
    #[serde(default)]
    offset: i64,
}

fn default_library() -> String {
    "server".to_string()
}

/// Loaded gamedata
pub struct GameData {
    scanner: SignatureScanner,
    offsets: HashMap<String, i64>,
    signatures: HashMap<String, SignatureEntry>,
    loaded: bool,
}

impl Default for GameData {
    fn default() -> Self {
        Self::new(SignatureScanner::default())
    }
}

impl GameData {
    /// Create an empty catalog scanning through `scanner`
    ///
    /// Entries are selected for the scanner's platform.
    pub fn new(scanner: SignatureScanner) -> Self {
        Self {
            scanner,
            offsets: HashMap::new(),
            signatures: HashMap::new(),
            loaded: false,
        }
    }

    /// Platform the catalog keeps values for
    pub fn platform(&self) -> Platform {
        self.scanner.platform()
    }

    /// Load a gamedata file, replacing any previous content
    ///
    /// Failures are logged and leave the catalog empty; every later lookup
    /// then reports "not found".
    pub fn load(&mut self, path: impl AsRef<Path>) -> bool {
        let path = path.as_ref();
        match self.try_load(path) {
            Ok(()) => true,
            Err(GamedataError::Io(e)) => {
                tracing::warn!("GameData file not readable: {} ({})", path.display(), e);
                false
            }
            Err(e) => {
                tracing::warn!("Failed to parse GameData {}: {}", path.display(), e);
                false
            }
        }
    }

    /// Load a gamedata file, returning the error instead of logging it
    pub fn try_load(&mut self, path: impl AsRef<Path>) -> Result<(), GamedataError> {
        self.clear();
        let content = std::fs::read_to_string(path)?;
        self.load_from_str(&content)
    }

    /// Load gamedata from text, replacing any previous content
    pub fn load_from_str(&mut self, text: &str) -> Result<(), GamedataError> {
        self.clear();

        let root: Value = serde_json::from_str(&strip_comments(text))?;
        let platform = self.platform().as_str();

        let mut offsets = HashMap::new();
        if let Some(section) = root.get("offsets").and_then(Value::as_object) {
            for (name, entry) in section {
                if let Some(value) = entry.get(platform) {
                    offsets.insert(name.clone(), i64::deserialize(value)?);
                }
            }
        }

        let mut signatures = HashMap::new();
        if let Some(section) = root.get("signatures").and_then(Value::as_object) {
            for (name, entry) in section {
                let Some(value) = entry.get(platform) else {
                    continue;
                };
                let sig = PlatformSignature::deserialize(value)?;
                let library = match entry.get("library") {
                    Some(library) => String::deserialize(library)?,
                    None => default_library(),
                };
                signatures.insert(
                    name.clone(),
                    SignatureEntry {
                        library,
                        pattern: sig.pattern,
                        offset: sig.offset,
                    },
                );
            }
        }

        tracing::info!(
            "GameData loaded: {} offsets, {} signatures.",
            offsets.len(),
            signatures.len()
        );

        self.offsets = offsets;
        self.signatures = signatures;
        self.loaded = true;
        Ok(())
    }

    fn clear(&mut self) {
        self.offsets.clear();
        self.signatures.clear();
        self.loaded = false;
    }

    /// Check if the last load succeeded
    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// Get an offset by name
    pub fn offset(&self, name: &str) -> Option<i64> {
        self.offsets.get(name).copied()
    }

    /// Get a signature entry by name
    pub fn signature(&self, name: &str) -> Option<&SignatureEntry> {
        self.signatures.get(name)
    }

    /// Library a signature is scanned in
    pub fn signature_library(&self, name: &str) -> Option<&str> {
        self.signature(name).map(|e| e.library.as_str())
    }

    /// Pattern text of a signature
    pub fn signature_pattern(&self, name: &str) -> Option<&str> {
        self.signature(name).map(|e| e.pattern.as_str())
    }

    pub fn offset_count(&self) -> usize {
        self.offsets.len()
    }

    pub fn signature_count(&self) -> usize {
        self.signatures.len()
    }

    /// Scan for a named signature and return the raw match address
    pub fn find_signature(&self, name: &str) -> Option<usize> {
        self.try_find_signature(name).map(|(address, _)| address).ok()
    }

    /// Scan for a named signature, following its relative displacement if it has one
    pub fn resolve_signature(&self, name: &str) -> Option<usize> {
        let result = self.try_find_signature(name).and_then(|(address, entry)| {
            if entry.offset == 0 {
                return Ok(address);
            }
            address
                .checked_add_signed(entry.offset as isize)
                .and_then(|disp| self.scanner.resolve_relative(disp, 0, 4))
                .ok_or_else(|| GamedataError::RelativeFailed(name.to_string()))
        });

        match result {
            Ok(address) => Some(address),
            Err(GamedataError::RelativeFailed(_)) => {
                tracing::warn!("Signature {} matched but its target did not resolve", name);
                None
            }
            Err(_) => None,
        }
    }

    fn try_find_signature(&self, name: &str) -> Result<(usize, &SignatureEntry), GamedataError> {
        let entry = self
            .signatures
            .get(name)
            .ok_or_else(|| GamedataError::SignatureNotFound(name.to_string()))?;

        let pattern = BytePattern::parse(&entry.pattern)
            .map_err(|source| GamedataError::InvalidPattern {
                name: name.to_string(),
                source,
            })
            .inspect_err(|e| tracing::error!("{}", e))?;

        self.scanner
            .find_pattern(&entry.library, &pattern)
            .map(|address| (address, entry))
            .ok_or_else(|| GamedataError::ScanFailed(name.to_string()))
    }
}
