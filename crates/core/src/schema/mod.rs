//! Schema System - Runtime field offset lookup for Source 2 classes
//!
//! ```text
//! CSchemaSystem::FindTypeScopeForModule("libserver.so")
//!     -> CSchemaSystemTypeScope::FindDeclaredClass("CBaseEntity")
//!         -> CSchemaClassInfo::m_pFields[..]  (first name match wins)
//! ```
//!
//! [`SchemaOffsets`] caches every resolved `(class, field)` pair. Failed
//! lookups are not cached and are retried on the next call.

pub mod field;
pub mod reflection;
pub mod system;

pub use field::SchemaField;
pub use reflection::{DeclaredClass, DeclaredField, NativeSchemaSystem, SchemaReflection};
pub use system::{SchemaError, SchemaOffsets};

/// Trait for types that wrap schema objects
///
/// Implemented by `#[derive(SchemaClass)]`.
pub trait SchemaObject: Sized {
    /// Get the raw pointer to the native object
    fn ptr(&self) -> *mut std::ffi::c_void;

    /// Get the class name
    fn class_name(&self) -> &'static str;

    /// Check if the pointer is valid
    fn is_valid(&self) -> bool;

    /// Create an instance from a raw pointer
    ///
    /// # Safety
    /// The pointer must be valid and point to an instance of this class.
    unsafe fn from_ptr(ptr: *mut std::ffi::c_void) -> Option<Self>;
}
