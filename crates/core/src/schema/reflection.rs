//! Reflection backends for the schema offset resolver
//!
//! The resolver only needs one question answered: which fields does a class
//! declare, in order, and at what offsets. [`NativeSchemaSystem`] answers it
//! from the engine's `CSchemaSystem`; tests answer it from plain data.

use std::ffi::{c_char, c_void, CStr, CString};
use std::ptr::NonNull;

use cs2kit_engine::{call_virtual, memory};
use cs2kit_sdk::{CSchemaClassInfo, CSchemaSystem, CSchemaSystemTypeScope};

use super::SchemaError;

/// A field as declared by its class
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredField {
    pub name: String,
    /// Offset from the object base, already adjusted for single inheritance
    pub offset: i32,
}

/// A class and its declared fields, in reflection order
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DeclaredClass {
    pub name: String,
    pub fields: Vec<DeclaredField>,
}

/// Source of declared-class metadata
pub trait SchemaReflection: Send + Sync {
    /// Look up a declared class inside the type scope of `module`
    fn find_declared_class(&self, module: &str, class: &str) -> Result<DeclaredClass, SchemaError>;
}

/// Virtual function indices
///
/// CSchemaSystem inherits IAppSystem, so its own methods start after the
/// base interface's slots.
mod vfunc {
    /// CSchemaSystem::FindTypeScopeForModule
    pub const FIND_TYPE_SCOPE_FOR_MODULE: usize = 12;
    /// CSchemaSystemTypeScope::FindDeclaredClass
    pub const FIND_DECLARED_CLASS: usize = 2;
}

/// CSchemaClassInfo layout
///
/// - 0x08: m_pszName (const char*)
/// - 0x1c: m_nFieldCount (u16)
/// - 0x28: m_pFields (SchemaClassFieldData_t*)
mod class_info {
    pub const NAME: usize = 0x08;
    pub const FIELD_COUNT: usize = 0x1c;
    pub const FIELDS: usize = 0x28;
}

/// SchemaClassFieldData_t layout, 0x20 bytes per entry
///
/// - 0x00: m_pszName (const char*)
/// - 0x08: m_pType (CSchemaType*)
/// - 0x10: m_nSingleInheritanceOffset (i32)
mod field_data {
    pub const NAME: usize = 0x00;
    pub const OFFSET: usize = 0x10;
    pub const SIZE: usize = 0x20;
}

/// Reflection through the engine's `SchemaSystem_001` interface
pub struct NativeSchemaSystem {
    schema_system: NonNull<CSchemaSystem>,
}

// SAFETY: CSchemaSystem lives for the whole plugin lifetime and is only
// queried from the game-update thread.
unsafe impl Send for NativeSchemaSystem {}
unsafe impl Sync for NativeSchemaSystem {}

impl NativeSchemaSystem {
    /// Wrap a schema system pointer obtained from CreateInterface
    ///
    /// # Safety
    /// `schema_system` must be the engine's CSchemaSystem and stay valid
    /// for the lifetime of this value.
    pub unsafe fn new(schema_system: NonNull<CSchemaSystem>) -> Self {
        Self { schema_system }
    }

    unsafe fn type_scope(
        &self,
        module: &str,
    ) -> Result<NonNull<CSchemaSystemTypeScope>, SchemaError> {
        let module_cstr = CString::new(module).map_err(|e| SchemaError::FfiError(e.to_string()))?;

        let scope: *mut CSchemaSystemTypeScope = call_virtual(
            vfunc::FIND_TYPE_SCOPE_FOR_MODULE,
            self.schema_system.cast::<c_void>(),
            (module_cstr.as_ptr(),),
        );

        NonNull::new(scope).ok_or_else(|| SchemaError::TypeScopeNotFound(module.to_string()))
    }

    unsafe fn class_info(
        scope: NonNull<CSchemaSystemTypeScope>,
        class: &str,
    ) -> Result<NonNull<CSchemaClassInfo>, SchemaError> {
        let class_cstr = CString::new(class).map_err(|e| SchemaError::FfiError(e.to_string()))?;

        let info: *mut CSchemaClassInfo = call_virtual(
            vfunc::FIND_DECLARED_CLASS,
            scope.cast::<c_void>(),
            (class_cstr.as_ptr(),),
        );

        NonNull::new(info).ok_or_else(|| SchemaError::ClassNotFound(class.to_string()))
    }
}

/// Read a C string pointer field, `None` when null
unsafe fn read_cstr(base: NonNull<c_void>, offset: usize) -> Option<String> {
    let ptr = memory::read_ptr::<c_char>(base, offset)?;
    Some(CStr::from_ptr(ptr.as_ptr()).to_string_lossy().into_owned())
}

/// Walk a CSchemaClassInfo's field array
///
/// # Safety
/// `info` must point to a live CSchemaClassInfo.
pub(crate) unsafe fn read_declared_class(
    info: NonNull<c_void>,
    fallback_name: &str,
) -> DeclaredClass {
    let name = read_cstr(info, class_info::NAME).unwrap_or_else(|| fallback_name.to_string());
    let count = memory::read::<u16>(info, class_info::FIELD_COUNT) as usize;

    let Some(fields_ptr) = memory::read_ptr::<c_void>(info, class_info::FIELDS) else {
        if count > 0 {
            tracing::warn!("Fields pointer is null for class {} (field_count={})", name, count);
        }
        return DeclaredClass { name, fields: Vec::new() };
    };

    let fields = (0..count)
        .filter_map(|i| {
            let entry = fields_ptr.byte_add(i * field_data::SIZE);
            let field_name = read_cstr(entry, field_data::NAME)?;
            Some(DeclaredField {
                name: field_name,
                offset: memory::read::<i32>(entry, field_data::OFFSET),
            })
        })
        .collect();

    DeclaredClass { name, fields }
}

impl SchemaReflection for NativeSchemaSystem {
    fn find_declared_class(&self, module: &str, class: &str) -> Result<DeclaredClass, SchemaError> {
        // SAFETY: schema_system is valid per `new`; the vtable slots and
        // structure offsets match the shipped engine build.
        unsafe {
            let scope = self.type_scope(module)?;
            let info = Self::class_info(scope, class)?;
            Ok(read_declared_class(info.cast::<c_void>(), class))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[repr(C)]
    struct FieldData {
        name: *const c_char,
        schema_type: *const c_void,
        offset: i32,
        metadata_count: i32,
        metadata: *const c_void,
    }

    #[repr(C)]
    struct ClassInfo {
        binding: *const c_void,
        name: *const c_char,
        project: *const c_char,
        size: i32,
        field_count: u16,
        metadata_count: u16,
        alignment: u8,
        base_count: u8,
        multi_depth: u16,
        single_depth: u16,
        _pad: u16,
        fields: *const FieldData,
    }

    fn field(name: &'static CStr, offset: i32) -> FieldData {
        FieldData {
            name: name.as_ptr(),
            schema_type: std::ptr::null(),
            offset,
            metadata_count: 0,
            metadata: std::ptr::null(),
        }
    }

    fn class(name: &'static CStr, fields: &[FieldData]) -> ClassInfo {
        ClassInfo {
            binding: std::ptr::null(),
            name: name.as_ptr(),
            project: std::ptr::null(),
            size: 0,
            field_count: fields.len() as u16,
            metadata_count: 0,
            alignment: 8,
            base_count: 0,
            multi_depth: 0,
            single_depth: 0,
            _pad: 0,
            fields: if fields.is_empty() { std::ptr::null() } else { fields.as_ptr() },
        }
    }

    #[test]
    fn test_fake_layout_matches_engine() {
        assert_eq!(std::mem::size_of::<FieldData>(), field_data::SIZE);
        assert_eq!(std::mem::offset_of!(FieldData, offset), field_data::OFFSET);
        assert_eq!(std::mem::offset_of!(ClassInfo, name), class_info::NAME);
        assert_eq!(std::mem::offset_of!(ClassInfo, field_count), class_info::FIELD_COUNT);
        assert_eq!(std::mem::offset_of!(ClassInfo, fields), class_info::FIELDS);
    }

    #[test]
    fn test_read_declared_class() {
        let fields = [
            field(c"m_iHealth", 0x344),
            FieldData { name: std::ptr::null(), ..field(c"skipped", 0) },
            field(c"m_iTeamNum", 0x3E3),
        ];
        let mut info = class(c"CBaseEntity", &fields);
        let ptr = NonNull::new(&mut info as *mut ClassInfo as *mut c_void).unwrap();

        let declared = unsafe { read_declared_class(ptr, "unused") };
        assert_eq!(declared.name, "CBaseEntity");
        assert_eq!(
            declared.fields,
            vec![
                DeclaredField { name: "m_iHealth".into(), offset: 0x344 },
                DeclaredField { name: "m_iTeamNum".into(), offset: 0x3E3 },
            ]
        );
    }

    #[test]
    fn test_read_declared_class_without_fields() {
        let mut info = class(c"CEmpty", &[]);
        info.field_count = 3;
        let ptr = NonNull::new(&mut info as *mut ClassInfo as *mut c_void).unwrap();

        let declared = unsafe { read_declared_class(ptr, "CEmpty") };
        assert!(declared.fields.is_empty());
    }
}
