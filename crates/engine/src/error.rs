//! Error types for engine interface loading

/// Error type for interface loading operations
#[derive(Debug, thiserror::Error)]
pub enum InterfaceError {
    /// Factory function returned null for the requested interface
    #[error("Factory returned null for: {0}")]
    NullPointer(String),

    /// Invalid interface version string (not null-terminated)
    #[error("Invalid version string: {0}")]
    InvalidVersionString(String),
}
