//! Implementation of the `#[derive(Searchable)]` macro.
//!
//! Generates the `Searchable` impl (field accessor, field kinds and list
//! element kinds) and the field name constants used as selectors.

use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{spanned::Spanned, DeriveInput, Result};

use super::attrs::{parse_search_attrs, FieldKind};
use crate::case::to_screaming_snake_case;
use crate::named_fields;

/// Main implementation of the Searchable derive macro.
pub fn searchable_derive_impl(input: DeriveInput) -> Result<TokenStream> {
    let struct_name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    let fields = named_fields(&input, "Searchable")?;

    let mut value_arms: Vec<TokenStream> = Vec::new();
    let mut kind_arms: Vec<TokenStream> = Vec::new();
    let mut element_arms: Vec<TokenStream> = Vec::new();
    let mut field_constants: Vec<TokenStream> = Vec::new();

    for field in fields {
        let Some(field_name) = field.ident.as_ref() else {
            return Err(syn::Error::new(field.span(), "expected named field"));
        };
        let attrs = parse_search_attrs(&field.attrs)?;
        if attrs.skip {
            continue;
        }
        // Fields without a declared kind are not searchable.
        let Some(kind) = attrs.kind else {
            continue;
        };

        let query_name = attrs.rename.unwrap_or_else(|| field_name.to_string());
        let const_name = format_ident!("{}", to_screaming_snake_case(&query_name));
        field_constants.push(quote! {
            /// Field name constant for use as a field selector.
            pub const #const_name: &'static str = #query_name;
        });

        let value_expr = match kind {
            FieldKind::String | FieldKind::Number | FieldKind::Timestamp | FieldKind::Bool => {
                quote! { ::sift::ToValue::to_value(&self.#field_name) }
            }
            FieldKind::Enum => quote! { ::sift::EnumValue::enum_value(&self.#field_name) },
            FieldKind::List => {
                let ty = &field.ty;
                element_arms.push(quote! {
                    #query_name => ::core::option::Option::Some(
                        <#ty as ::sift::ListValue>::ELEMENT_KIND
                    ),
                });
                quote! { ::sift::ListValue::list_value(&self.#field_name) }
            }
        };
        value_arms.push(quote! {
            #query_name => #value_expr,
        });

        let variant = format_ident!("{}", kind.variant());
        kind_arms.push(quote! {
            #query_name => ::core::option::Option::Some(::sift::FieldKind::#variant),
        });
    }

    Ok(quote! {
        impl #impl_generics #struct_name #ty_generics #where_clause {
            #(#field_constants)*
        }

        impl #impl_generics ::sift::Searchable for #struct_name #ty_generics #where_clause {
            fn field_value(&self, field: &str) -> ::sift::Value<'_> {
                match field {
                    #(#value_arms)*
                    _ => ::sift::Value::None,
                }
            }

            fn field_kind(field: &str) -> ::core::option::Option<::sift::FieldKind> {
                match field {
                    #(#kind_arms)*
                    _ => ::core::option::Option::None,
                }
            }

            fn element_kind(field: &str) -> ::core::option::Option<::sift::FieldKind> {
                match field {
                    #(#element_arms)*
                    _ => ::core::option::Option::None,
                }
            }
        }
    })
}
