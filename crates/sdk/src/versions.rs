//! Interface version strings for CreateInterface
//!
//! These strings must match exactly what the engine exports.

/// Schema system for runtime type info
pub const SCHEMA_SYSTEM: &[u8] = b"SchemaSystem_001\0";

/// Game resource service (owner of the entity system)
pub const GAME_RESOURCE_SERVICE: &[u8] = b"GameResourceServiceServerV001\0";
