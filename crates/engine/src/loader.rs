//! Engine interface loading via CreateInterface pattern

use std::ffi::CStr;
use std::ptr::NonNull;

use cs2kit_sdk::{versions, CGameResourceService, CSchemaSystem, CreateInterfaceFn};

use crate::error::InterfaceError;
use crate::interfaces::HostInterfaces;

/// Wrapper around a CreateInterface factory function
pub struct InterfaceFactory {
    factory: CreateInterfaceFn,
    name: &'static str,
}

impl InterfaceFactory {
    /// Create a new factory wrapper
    ///
    /// # Arguments
    /// * `factory` - The CreateInterface function pointer
    /// * `name` - Human-readable name for error messages (e.g., "server", "engine")
    pub fn new(factory: CreateInterfaceFn, name: &'static str) -> Self {
        Self { factory, name }
    }

    /// Get an interface by version string
    ///
    /// # Arguments
    /// * `version` - Null-terminated version string (e.g., b"SchemaSystem_001\0")
    ///
    /// # Safety
    /// The returned pointer is only valid if T matches the actual interface type
    pub unsafe fn get<T>(&self, version: &[u8]) -> Result<NonNull<T>, InterfaceError> {
        let version_str = CStr::from_bytes_with_nul(version).map_err(|_| {
            InterfaceError::InvalidVersionString(String::from_utf8_lossy(version).into_owned())
        })?;

        let mut ret_code: i32 = 0;
        let ptr = (self.factory)(version_str.as_ptr(), &mut ret_code);

        NonNull::new(ptr as *mut T).ok_or_else(|| {
            InterfaceError::NullPointer(format!(
                "{} from {}",
                version_str.to_string_lossy(),
                self.name
            ))
        })
    }

    /// Try to get an interface, returning None on failure instead of error
    ///
    /// # Safety
    /// Same as `get`
    pub unsafe fn try_get<T>(&self, version: &[u8]) -> Option<NonNull<T>> {
        match self.get(version) {
            Ok(ptr) => Some(ptr),
            Err(e) => {
                tracing::debug!("{}", e);
                None
            }
        }
    }
}

/// Load the engine interfaces the kit consumes
///
/// Every interface is optional. A missing one is logged and left as `None`
/// so the features depending on it degrade instead of failing the load.
///
/// # Safety
/// `engine_factory` must be a callable CreateInterface function.
#[tracing::instrument(skip_all)]
pub unsafe fn load_interfaces(engine_factory: CreateInterfaceFn) -> HostInterfaces {
    let engine = InterfaceFactory::new(engine_factory, "engine");

    let schema_system = engine.try_get::<CSchemaSystem>(versions::SCHEMA_SYSTEM);
    match schema_system {
        Some(ss) => tracing::info!("CSchemaSystem: {:p}", ss.as_ptr()),
        None => tracing::warn!("CSchemaSystem: not available"),
    }

    let game_resource_service =
        engine.try_get::<CGameResourceService>(versions::GAME_RESOURCE_SERVICE);
    match game_resource_service {
        Some(grs) => tracing::info!("IGameResourceService: {:p}", grs.as_ptr()),
        None => tracing::warn!("IGameResourceService: not available"),
    }

    HostInterfaces::new()
        .with_schema_system(schema_system)
        .with_game_resource_service(game_resource_service)
}
