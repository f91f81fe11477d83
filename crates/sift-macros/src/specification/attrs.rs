//! Attribute parsing for the Specification derive macro.

use syn::{
    parse::{Parse, ParseStream},
    punctuated::Punctuated,
    spanned::Spanned,
    Attribute, Error, Lit, Meta, Result, Token,
};

/// Role forced by a `#[spec(...)]` marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoleMarker {
    Filter,
    Skip,
    Take,
    Ignore,
}

/// Field-level attributes from `#[spec(...)]`.
#[derive(Debug, Clone, Default)]
pub struct SpecAttr {
    pub role: Option<RoleMarker>,
    /// Record field the spec field targets (default: the Rust field name).
    pub rename: Option<String>,
}

impl Parse for SpecAttr {
    fn parse(input: ParseStream) -> Result<Self> {
        let mut attr = SpecAttr::default();

        let content: Punctuated<Meta, Token![,]> = Punctuated::parse_terminated(input)?;

        for meta in content {
            match &meta {
                Meta::Path(p) => {
                    let role = match p.get_ident().map(|i| i.to_string()).as_deref() {
                        Some("filter") => RoleMarker::Filter,
                        Some("skip") => RoleMarker::Skip,
                        Some("take") => RoleMarker::Take,
                        Some("ignore") => RoleMarker::Ignore,
                        _ => {
                            return Err(Error::new(
                                p.span(),
                                "expected filter, skip, take, ignore, or rename = \"...\"",
                            ))
                        }
                    };
                    if attr.role.is_some_and(|existing| existing != role) {
                        return Err(Error::new(p.span(), "a field can carry only one role"));
                    }
                    attr.role = Some(role);
                }
                Meta::NameValue(nv) if nv.path.is_ident("rename") => {
                    if let syn::Expr::Lit(syn::ExprLit {
                        lit: Lit::Str(s), ..
                    }) = &nv.value
                    {
                        attr.rename = Some(s.value());
                    } else {
                        return Err(Error::new(
                            nv.value.span(),
                            "rename must be a string literal",
                        ));
                    }
                }
                _ => {
                    return Err(Error::new(
                        meta.span(),
                        "unknown spec attribute. Expected: filter, skip, take, ignore, or rename = \"...\"",
                    ));
                }
            }
        }

        Ok(attr)
    }
}

/// Extract `#[spec(...)]` attributes from a field's attributes.
pub fn parse_spec_attrs(attrs: &[Attribute]) -> Result<SpecAttr> {
    for attr in attrs {
        if attr.path().is_ident("spec") {
            return attr.parse_args::<SpecAttr>();
        }
    }
    Ok(SpecAttr::default())
}
