//! SchemaClass derive macro implementation

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, GenericArgument, Ident, PathArguments, Type};

use crate::parse::{parse_schema_class, SchemaClassArgs, SchemaFieldArgs};

/// Extract the inner type from `PhantomData<T>` if present, otherwise return the type as-is
fn extract_inner_type(ty: &Type) -> &Type {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            if segment.ident == "PhantomData" {
                if let PathArguments::AngleBracketed(args) = &segment.arguments {
                    if let Some(GenericArgument::Type(inner)) = args.args.first() {
                        return inner;
                    }
                }
            }
        }
    }
    ty
}

/// Check if a type is PhantomData
fn is_phantom_data(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "PhantomData";
        }
    }
    false
}

/// Accessor base name: the field identifier without a leading underscore
fn clean_name(ident: &Ident) -> String {
    let name = ident.to_string();
    name.strip_prefix('_').unwrap_or(&name).to_string()
}

/// Generate the SchemaClass implementation
pub fn derive_schema_class(input: DeriveInput) -> TokenStream {
    match parse_schema_class(&input) {
        Ok(args) => generate_impl(args),
        Err(e) => e.write_errors(),
    }
}

fn generate_impl(args: SchemaClassArgs) -> TokenStream {
    let struct_name = &args.ident;
    let class_name = &args.class_name;

    let fields = match args.data {
        darling::ast::Data::Struct(fields) => fields.fields,
        _ => {
            return syn::Error::new_spanned(
                &args.ident,
                "SchemaClass can only be derived for structs",
            )
            .to_compile_error()
        }
    };

    if !fields.iter().any(SchemaFieldArgs::is_ptr_field) {
        return syn::Error::new_spanned(
            &args.ident,
            "SchemaClass requires a `ptr: *mut c_void` field",
        )
        .to_compile_error();
    }

    let constants = fields.iter().filter_map(|f| {
        let (ident, field_name) = f.schema_field()?;
        let clean = clean_name(ident);
        let const_name = format_ident!("{}_FIELD", clean.to_uppercase());
        let doc = format!("Schema field name for `{}`", clean);
        Some(quote! {
            #[doc = #doc]
            pub const #const_name: &'static str = #field_name;
        })
    });

    let accessors = fields.iter().filter_map(generate_accessors);

    let schema_object_impl = generate_schema_object_impl(struct_name, class_name, &fields);

    quote! {
        impl #struct_name {
            /// Source 2 class name
            pub const CLASS_NAME: &'static str = #class_name;

            #(#constants)*

            /// Get the raw pointer
            pub fn as_ptr(&self) -> *mut ::std::ffi::c_void {
                self.ptr
            }

            #(#accessors)*
        }

        #schema_object_impl
    }
}

fn generate_accessors(field: &SchemaFieldArgs) -> Option<TokenStream> {
    let (ident, field_name) = field.schema_field()?;
    let field_ty = extract_inner_type(&field.ty);

    let clean = clean_name(ident);
    let getter_name = format_ident!("{}", clean);
    let setter_name = format_ident!("set_{}", clean);
    let const_field_name = format_ident!("{}_FIELD", clean.to_uppercase());

    let getter_doc = format!("Read `{}`, `None` if the offset is unresolved", field_name);
    let setter_doc = format!("Write `{}`, returning whether the write happened", field_name);

    let getter = quote! {
        #[doc = #getter_doc]
        #[inline]
        pub fn #getter_name(
            &self,
            schema: &::cs2kit_core::schema::SchemaOffsets,
        ) -> ::std::option::Option<#field_ty> {
            let field = ::cs2kit_core::schema::SchemaField::<#field_ty>::new(
                Self::CLASS_NAME,
                Self::#const_field_name,
            );
            // SAFETY: `ptr` points to an instance of CLASS_NAME per `from_ptr`
            unsafe { field.get(schema, self.ptr) }
        }
    };

    let setter = if field.readonly {
        quote! {}
    } else {
        quote! {
            #[doc = #setter_doc]
            #[inline]
            pub fn #setter_name(
                &mut self,
                schema: &::cs2kit_core::schema::SchemaOffsets,
                value: #field_ty,
            ) -> bool {
                let field = ::cs2kit_core::schema::SchemaField::<#field_ty>::new(
                    Self::CLASS_NAME,
                    Self::#const_field_name,
                );
                // SAFETY: `ptr` points to an instance of CLASS_NAME per `from_ptr`
                unsafe { field.set(schema, self.ptr, value) }
            }
        }
    };

    Some(quote! {
        #getter
        #setter
    })
}

fn generate_schema_object_impl(
    struct_name: &Ident,
    class_name: &str,
    fields: &[SchemaFieldArgs],
) -> TokenStream {
    let field_inits: Vec<_> = fields
        .iter()
        .filter(|f| !f.is_ptr_field())
        .filter_map(|f| {
            let ident = f.ident.as_ref()?;
            if is_phantom_data(&f.ty) {
                Some(quote! { #ident: ::std::marker::PhantomData })
            } else {
                Some(quote! { #ident: ::std::default::Default::default() })
            }
        })
        .collect();

    quote! {
        impl ::cs2kit_core::schema::SchemaObject for #struct_name {
            fn ptr(&self) -> *mut ::std::ffi::c_void {
                self.ptr
            }

            fn class_name(&self) -> &'static str {
                #class_name
            }

            fn is_valid(&self) -> bool {
                !self.ptr.is_null()
            }

            unsafe fn from_ptr(ptr: *mut ::std::ffi::c_void) -> Option<Self> {
                if ptr.is_null() {
                    None
                } else {
                    Some(Self {
                        ptr,
                        #(#field_inits),*
                    })
                }
            }
        }
    }
}
