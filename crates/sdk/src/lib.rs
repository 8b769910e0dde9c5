//! CS2Kit SDK - Source 2 Engine Type Definitions
//!
//! This crate contains opaque type definitions for the Source 2 engine
//! objects the kit touches, plus the handful of layout facts that are not
//! discoverable at run time. It has no dependencies and compiles quickly,
//! allowing parallel compilation of dependent crates.
//!
//! # Modules
//!
//! - [`interfaces`] - Opaque C++ interface and object types
//! - [`versions`] - Interface version strings for CreateInterface
//! - [`platform`] - Host platform identifier and library naming
//! - [`layout`] - Fixed engine layout constants (entity table geometry)

pub mod interfaces;
pub mod layout;
pub mod platform;
pub mod versions;

pub use interfaces::*;
pub use platform::Platform;
