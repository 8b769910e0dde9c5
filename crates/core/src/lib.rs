//! CS2Kit core services
//!
//! Gamedata-driven signature scanning, schema offset resolution, entity and
//! player access, and per-frame input tracking. Everything hangs off a
//! [`Kit`] value created once at plugin load.
//!
//! # Re-exports
//!
//! - [`sdk`] - Source 2 opaque types, interface versions and table layout
//! - [`engine`] - Interface loading, module lookup and raw memory access

// Allow the crate to refer to itself as `cs2kit_core` for proc macro output
extern crate self as cs2kit_core;

pub use cs2kit_engine as engine;
pub use cs2kit_sdk as sdk;

pub mod config;
pub mod entities;
pub mod gamedata;
pub mod input;
pub mod kit;
pub mod schema;

pub use config::{ConfigError, ConfigResult, CoreConfig, Paths};
pub use entities::{BaseEntity, EntityDirectory, EntityHandle, Player, PlayerController, PlayerPawn};
pub use gamedata::{BytePattern, GameData, GamedataError, SignatureCache, SignatureScanner};
pub use input::{ButtonEvent, InputButtons, InputTracker};
pub use kit::{InitParams, Kit};
pub use schema::{SchemaError, SchemaField, SchemaObject, SchemaOffsets};
