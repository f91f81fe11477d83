//! Implementation of the `#[derive(Specification)]` macro.
//!
//! Generates the `Specification` impl: the field descriptor table in
//! declaration order and the accessor returning each field's current value.
//! A field whose type is a known leaf filter, optionally inside `Option`,
//! is a Filter field without any marker.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, DeriveInput, GenericArgument, PathArguments, Result, Type};

use super::attrs::{parse_spec_attrs, RoleMarker};
use crate::case::to_screaming_snake_case;
use crate::named_fields;

/// Leaf filter types recognised by name.
const FILTER_TYPES: &[&str] = &[
    "StringFilter",
    "ComparableFilter",
    "BooleanFilter",
    "EnumFilter",
    "ListFilter",
    "IntegerFilter",
    "LongFilter",
    "ShortFilter",
    "FloatFilter",
    "DoubleFilter",
    "DateTimeFilter",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Role {
    Filter,
    Skip,
    Take,
    Plain,
}

/// Main implementation of the Specification derive macro.
pub fn specification_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "Specification")?;

    let mut descriptors: Vec<TokenStream> = Vec::new();
    let mut value_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new(field.span(), "expected named field"));
        };
        let attrs = parse_spec_attrs(&field.attrs)?;
        let (inner, optional) = unwrap_option(&field.ty);

        let role = match attrs.role {
            Some(RoleMarker::Ignore) => continue,
            Some(RoleMarker::Skip) => Role::Skip,
            Some(RoleMarker::Take) => Role::Take,
            Some(RoleMarker::Filter) => Role::Filter,
            None if is_filter_type(inner) => Role::Filter,
            None => Role::Plain,
        };

        let spec_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&spec_name));
        field_constants.push(quote! {
            /// Field name constant for use as a field selector.
            pub const #const_name: &'static str = #spec_name;
        });

        let role_variant = format_ident!("{}", format!("{role:?}"));
        descriptors.push(quote! {
            ::sift::FieldDescriptor::new(#spec_name, ::sift::FieldRole::#role_variant),
        });

        let value_expr = match (role, optional) {
            (Role::Filter, true) => quote! {
                ::sift::SpecValue::Filter(
                    self.#field_name.as_ref().map(|f| f as &dyn ::sift::Filter)
                )
            },
            (Role::Filter, false) => quote! {
                ::sift::SpecValue::Filter(
                    ::core::option::Option::Some(&self.#field_name as &dyn ::sift::Filter)
                )
            },
            _ => quote! {
                ::sift::SpecValue::Scalar(
                    ::core::option::Option::Some(&self.#field_name as &dyn ::sift::ScalarSource)
                )
            },
        };
        value_arms.push(quote! {
            #spec_name => #value_expr,
        });
    }

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::sift::Specification for #struct_name #ty_generics #where_clause {
            const FIELDS: &'static [::sift::FieldDescriptor] = &[
                #(#descriptors)*
            ];

            fn spec_value(&self, field: &str) -> ::sift::SpecValue<'_> {
                match field {
                    #(#value_arms)*
                    _ => ::sift::SpecValue::Missing,
                }
            }
        }
    })
}

/// Strips one `Option<..>` layer, reporting whether there was one.
fn unwrap_option(ty: &Type) -> (&Type, bool) {
    let Type::Path(path) = ty else {
        return (ty, false);
    };
    let Some(last) = path.path.segments.last() else {
        return (ty, false);
    };
    if last.ident != "Option" {
        return (ty, false);
    }
    match &last.arguments {
        PathArguments::AngleBracketed(args) => match args.args.first() {
            Some(GenericArgument::Type(inner)) => (inner, true),
            _ => (ty, false),
        },
        _ => (ty, false),
    }
}

fn is_filter_type(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|last| FILTER_TYPES.iter().any(|name| last.ident == name)),
        _ => false,
    }
}
