//! CS2Kit Proc Macros
//!
//! - `#[derive(SchemaClass)]` - Generate schema-resolved field accessors
//!
//! # Example
//!
//! ```ignore
//! use cs2kit_macros::SchemaClass;
//! use std::ffi::c_void;
//! use std::marker::PhantomData;
//!
//! #[derive(SchemaClass)]
//! #[schema(class = "CCSPlayerPawn")]
//! pub struct PlayerPawn {
//!     ptr: *mut c_void,
//!
//!     #[schema(field = "m_ArmorValue")]
//!     armor: PhantomData<i32>,
//! }
//!
//! // Generated:
//! // - pawn.armor(&schema) -> Option<i32>
//! // - pawn.set_armor(&schema, 100) -> bool
//! ```
//!
//! # Attributes
//!
//! - `#[schema(class = "ClassName")]` - **Required.** The Source 2 class name.
//! - `#[schema(field = "m_fieldName")]` - Mark as a schema field with the given name.
//! - `#[schema(readonly)]` - Don't generate a setter.

mod parse;
mod schema_class;

use proc_macro::TokenStream;
use syn::{parse_macro_input, DeriveInput};

/// Derive macro for schema class wrappers
///
/// For each schema field the macro generates:
///
/// - A getter (`fn armor(&self, schema: &SchemaOffsets) -> Option<i32>`)
/// - A setter (`fn set_armor(&mut self, schema: &SchemaOffsets, value: i32) -> bool`)
///   unless `readonly`
/// - A `<NAME>_FIELD` constant holding the schema field name
///
/// Plus `CLASS_NAME`, `as_ptr()` and a `SchemaObject` implementation.
/// Accessors return `None`/`false` when the offset is unresolved; nothing panics.
#[proc_macro_derive(SchemaClass, attributes(schema))]
pub fn derive_schema_class(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    schema_class::derive_schema_class(input).into()
}
