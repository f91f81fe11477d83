//! Attribute parsing for the Searchable derive macro.
//!
//! Parses the `#[search(...)]` field attributes used by the `Searchable`
//! derive macro.

use proc_macro2::Span;
use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Ident, Lit, Meta, Result, Token,
};

/// The declared kind of a searchable record field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// `#[search(String)]`
    String,
    /// `#[search(Number)]`
    Number,
    /// `#[search(Timestamp)]`
    Timestamp,
    /// `#[search(Enum)]`, requires a `SearchEnum` impl
    Enum,
    /// `#[search(Bool)]`
    Bool,
    /// `#[search(List)]`, a collection of scalar values
    List,
}

const EXPECTED: &str = "String, Number, Timestamp, Enum, Bool, List";

impl FieldKind {
    fn parse(name: &str, span: Span) -> Result<Self> {
        match name {
            "String" | "string" => Ok(FieldKind::String),
            "Number" | "number" => Ok(FieldKind::Number),
            "Timestamp" | "timestamp" => Ok(FieldKind::Timestamp),
            "Enum" | "enum" | "enumeration" => Ok(FieldKind::Enum),
            "Bool" | "bool" | "boolean" => Ok(FieldKind::Bool),
            "List" | "list" => Ok(FieldKind::List),
            other => Err(Error::new(
                span,
                format!("unknown search kind: '{other}'. Expected one of: {EXPECTED}"),
            )),
        }
    }

    pub fn from_ident(ident: &Ident) -> Result<Self> {
        Self::parse(&ident.to_string(), ident.span())
    }

    /// The `sift::FieldKind` variant name.
    pub fn variant(self) -> &'static str {
        match self {
            FieldKind::String => "String",
            FieldKind::Number => "Number",
            FieldKind::Timestamp => "Timestamp",
            FieldKind::Enum => "Enum",
            FieldKind::Bool => "Bool",
            FieldKind::List => "List",
        }
    }
}

/// Field-level attributes from `#[search(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SearchAttr {
    pub kind: Option<FieldKind>,
    pub skip: bool,
    /// Field name used in predicates (default: the Rust field name).
    pub rename: Option<String>,
}

impl Parse for SearchAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SearchAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) if p.is_ident("skip") => attr.skip = true,
                Meta::Path(p) => {
                    let ident = p.get_ident().ok_or_else(|| {
                        Error::new(p.span(), format!("expected {EXPECTED}, or skip"))
                    })?;
                    attr.kind = Some(FieldKind::from_ident(ident)?);
                }
                Meta::NameValue(nv) => {
                    let Some(name) = nv.path.get_ident().map(Ident::to_string) else {
                        return Err(Error::new(nv.path.span(), "expected rename or ty"));
                    };
                    let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    else {
                        return Err(Error::new(
                            nv.value.span(),
                            format!("{name} must be a string literal"),
                        ));
                    };
                    match name.as_str() {
                        "rename" => attr.rename = Some(s.value()),
                        // ty = "enum" for kinds that are keywords
                        "ty" => attr.kind = Some(FieldKind::parse(&s.value(), s.span())?),
                        _ => {
                            return Err(Error::new(
                                nv.path.span(),
                                "unknown attribute. Expected: rename or ty",
                            ))
                        }
                    }
                }
                Meta::List(_) => {
                    return Err(Error::new(
                        meta.span(),
                        format!(
                            "unknown search attribute. Expected: {EXPECTED}, skip, rename = \"...\", or ty = \"...\""
                        ),
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[search(...)]` attributes from a field's attributes.
pub fn parse_search_attrs(attrs: &[Attribute]) -> Result<SearchAttr> {
    for attr in attrs {
        if attr.path().is_ident("search") {
            return attr.parse_args::<SearchAttr>();
        }
    }
    Ok(SearchAttr::default())
}
