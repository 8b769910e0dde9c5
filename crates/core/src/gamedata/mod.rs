//! Gamedata: byte signatures and platform offsets loaded from a data file
//!
//! - [`BytePattern`] parses and scans hex/wildcard signatures
//! - [`SignatureScanner`] finds patterns inside loaded modules
//! - [`GameData`] maps names to offsets and signatures for one platform
//! - [`SignatureCache`] memoizes resolved signatures for the process lifetime

mod cache;
mod catalog;
mod jsonc;
mod pattern;
mod scanner;

pub use cache::SignatureCache;
pub use catalog::{GameData, GamedataError, SignatureEntry};
pub use jsonc::strip_comments;
pub use pattern::{BytePattern, PatternError};
pub use scanner::SignatureScanner;

#[cfg(test)]
pub(crate) use scanner::testing;
