//! Attribute parsing for SchemaClass derive macro

use darling::{FromDeriveInput, FromField};
use syn::{DeriveInput, Ident, Type};

/// Parsed #[schema(...)] attributes on the struct
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(schema), supports(struct_named))]
pub struct SchemaClassArgs {
    /// Struct identifier
    pub ident: Ident,

    /// Struct fields
    pub data: darling::ast::Data<(), SchemaFieldArgs>,

    /// Source 2 class name (e.g., "CCSPlayerPawn")
    #[darling(rename = "class")]
    pub class_name: String,
}

/// Parsed #[schema(...)] attributes on a field
#[derive(Debug, FromField)]
#[darling(attributes(schema))]
pub struct SchemaFieldArgs {
    /// Field identifier
    pub ident: Option<Ident>,

    /// Field type
    pub ty: Type,

    /// Source 2 field name (e.g., "m_iHealth")
    /// If not specified, this is not a schema field (e.g., the ptr field)
    #[darling(rename = "field")]
    pub field_name: Option<String>,

    /// Whether this field is read-only (no setter generated)
    #[darling(default)]
    pub readonly: bool,
}

impl SchemaFieldArgs {
    /// The field's identifier and schema name, if it is a schema field
    pub fn schema_field(&self) -> Option<(&Ident, &str)> {
        Some((self.ident.as_ref()?, self.field_name.as_deref()?))
    }

    /// Check if this is the base pointer field
    pub fn is_ptr_field(&self) -> bool {
        self.ident.as_ref().is_some_and(|i| i == "ptr")
    }
}

/// Parse a DeriveInput into SchemaClassArgs
pub fn parse_schema_class(input: &DeriveInput) -> darling::Result<SchemaClassArgs> {
    SchemaClassArgs::from_derive_input(input)
}
