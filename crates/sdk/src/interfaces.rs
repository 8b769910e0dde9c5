//! Source 2 engine interface type definitions
//!
//! These are opaque types representing C++ engine objects.
//! We don't need their internal structure - just pointers.
//! Fields are reached through offsets (gamedata or schema) and vtables
//! are called through the engine crate's virtual invoker.

use std::ffi::c_void;

/// Opaque type for CSchemaSystem
/// Used for runtime type information and field offset lookup
#[repr(C)]
pub struct CSchemaSystem {
    _opaque: [u8; 0],
}

/// Opaque type for CSchemaSystemTypeScope
/// Per-module scope returned by FindTypeScopeForModule
#[repr(C)]
pub struct CSchemaSystemTypeScope {
    _opaque: [u8; 0],
}

/// Opaque type for CSchemaClassInfo
/// Declared class metadata (name, size, field array)
#[repr(C)]
pub struct CSchemaClassInfo {
    _opaque: [u8; 0],
}

/// Opaque type for IGameResourceService
/// Owns the entity system pointer at a gamedata-provided offset
#[repr(C)]
pub struct CGameResourceService {
    _opaque: [u8; 0],
}

/// Opaque type for CGameEntitySystem
/// Entity system (derived from the game resource service, not CreateInterface)
#[repr(C)]
pub struct CGameEntitySystem {
    _opaque: [u8; 0],
}

/// Opaque type for CEntityIdentity
/// One slot of the chunked entity table
#[repr(C)]
pub struct CEntityIdentity {
    _opaque: [u8; 0],
}

/// Opaque type for CEntityInstance
/// A live entity (controller, pawn, ...)
#[repr(C)]
pub struct CEntityInstance {
    _opaque: [u8; 0],
}

/// CreateInterface function signature
///
/// This is the standard Source engine pattern for acquiring interfaces.
/// Each module (server.dll, engine2.dll, etc.) exports a CreateInterface function.
///
/// # Arguments
/// * `name` - Interface version string (e.g., "SchemaSystem_001")
/// * `return_code` - Optional pointer to receive error code (0 = success)
///
/// # Returns
/// Pointer to the interface, or null if not found
pub type CreateInterfaceFn =
    unsafe extern "C" fn(name: *const std::ffi::c_char, return_code: *mut i32) -> *mut c_void;
