//! Typed schema field descriptor
//!
//! A `SchemaField<T>` names a `(class, field)` pair and the Rust type stored
//! there. It holds no offset itself; every access goes through the
//! [`SchemaOffsets`] cache, so clearing that cache also resets the field.

use std::ffi::c_void;
use std::marker::PhantomData;

use cs2kit_engine::memory;

use super::system::SchemaOffsets;

/// A typed accessor for one schema field
///
/// ```ignore
/// static HEALTH: SchemaField<i32> = SchemaField::new("CBaseEntity", "m_iHealth");
///
/// let hp = unsafe { HEALTH.get(&schema, pawn_ptr) };
/// ```
pub struct SchemaField<T: Copy> {
    class_name: &'static str,
    field_name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T: Copy> SchemaField<T> {
    pub const fn new(class_name: &'static str, field_name: &'static str) -> Self {
        Self {
            class_name,
            field_name,
            _marker: PhantomData,
        }
    }

    /// Resolve the field's offset
    pub fn offset(&self, schema: &SchemaOffsets) -> Option<i32> {
        schema.get_offset(self.class_name, self.field_name)
    }

    /// Read the field, `None` if `base` is null or the offset is unresolved
    ///
    /// # Safety
    /// A non-null `base` must point to an instance of the field's class and
    /// `T` must match the field's type.
    #[inline]
    pub unsafe fn get(&self, schema: &SchemaOffsets, base: *mut c_void) -> Option<T> {
        if base.is_null() {
            return None;
        }
        memory::read_field(base, self.offset(schema)?)
    }

    /// Write the field, returning whether anything was written
    ///
    /// # Safety
    /// Same requirements as [`get`](Self::get).
    #[inline]
    pub unsafe fn set(&self, schema: &SchemaOffsets, base: *mut c_void, value: T) -> bool {
        if base.is_null() {
            return false;
        }
        match self.offset(schema) {
            Some(offset) => memory::write_field(base, offset, value),
            None => false,
        }
    }

    pub const fn class_name(&self) -> &'static str {
        self.class_name
    }

    pub const fn field_name(&self) -> &'static str {
        self.field_name
    }
}
