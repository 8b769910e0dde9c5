//! Host-supplied engine interfaces
//!
//! The host hands these pointers to the kit once during plugin load. Every
//! one of them is optional: a missing interface disables the features that
//! depend on it instead of failing the load.

use std::ptr::NonNull;

use cs2kit_sdk::{CGameResourceService, CSchemaSystem};

/// Engine interfaces the kit consumes
#[derive(Debug, Clone, Copy, Default)]
pub struct HostInterfaces {
    /// Schema system for field offset lookup
    pub schema_system: Option<NonNull<CSchemaSystem>>,

    /// Game resource service, owner of the entity system pointer
    pub game_resource_service: Option<NonNull<CGameResourceService>>,
}

// SAFETY: All pointers are to engine interfaces that live for the entire plugin lifetime.
// The kit only dereferences them from the game-update thread.
unsafe impl Send for HostInterfaces {}
unsafe impl Sync for HostInterfaces {}

impl HostInterfaces {
    /// Create an empty set of interfaces
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the schema system
    pub fn with_schema_system(mut self, ptr: Option<NonNull<CSchemaSystem>>) -> Self {
        self.schema_system = ptr;
        self
    }

    /// Set the game resource service
    pub fn with_game_resource_service(
        mut self,
        ptr: Option<NonNull<CGameResourceService>>,
    ) -> Self {
        self.game_resource_service = ptr;
        self
    }
}
