//! Parsing utilities for the props derive.
//!
//! This module turns a `DeriveInput` into a [`PropsStruct`]: the container
//! attributes, and for every field its name, type, type class and source.

use quote::ToTokens;
use syn::{
    ext::IdentExt, parse::ParseStream, spanned::Spanned, AngleBracketedGenericArguments, Attribute,
    Data, DeriveInput, Fields, GenericArgument, Generics, Ident, LitStr, Path, PathArguments, Token,
    Type,
};

/// Types that map onto a scalar field kind without arguments.
const SCALARS: &[&str] = &[
    "bool", "i8", "i16", "i32", "i64", "isize", "u8", "u16", "u32", "u64", "usize", "f32", "f64",
    "String", "Bytes",
];

/// Container attributes from `#[props(...)]`.
#[derive(Debug)]
pub struct PropsAttrs {
    /// Path to the `satchel-core` crate in generated code.
    pub krate: Path,
}

impl PropsAttrs {
    /// Reads `#[props(crate = "...")]`, defaulting to `::satchel_core`.
    pub fn from_attributes(attrs: &[Attribute]) -> syn::Result<Self> {
        let mut krate = None;
        for attr in attrs.iter().filter(|a| a.path().is_ident("props")) {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("crate") {
                    let lit: LitStr = meta.value()?.parse()?;
                    krate = Some(lit.parse::<Path>()?);
                    Ok(())
                } else {
                    Err(meta.error("unknown props attribute, expected `crate = \"...\"`"))
                }
            })?;
        }

        Ok(Self {
            krate: krate.unwrap_or_else(|| syn::parse_quote!(::satchel_core)),
        })
    }
}

/// Where a field's value comes from.
#[derive(Debug, PartialEq, Eq)]
pub enum FieldSource {
    /// A query parameter with the given key.
    Query(String),
}

/// Syntactic classification of a field type.
#[derive(Debug, PartialEq, Eq)]
pub enum TypeClass {
    /// A type with a `FromFieldValue` implementation.
    Scalar,
    /// Any other path type, treated as a nested structure.
    Composite(String),
    /// References, tuples, arrays, function pointers and the like.
    Unsupported(String),
}

/// One parsed field.
#[derive(Debug)]
pub struct PropsField {
    /// The field identifier.
    pub ident: Ident,
    /// The field name without any raw-identifier prefix.
    pub name: String,
    /// The declared type.
    pub ty: Type,
    /// Classification of `ty`.
    pub class: TypeClass,
    /// Declared source, if any.
    pub source: Option<FieldSource>,
}

/// A parsed props structure.
#[derive(Debug)]
pub struct PropsStruct {
    /// The struct identifier.
    pub ident: Ident,
    /// The struct generics.
    pub generics: Generics,
    /// Container attributes.
    pub attrs: PropsAttrs,
    /// Fields in declaration order.
    pub fields: Vec<PropsField>,
}

impl PropsStruct {
    /// Parses derive input.
    pub fn parse(input: DeriveInput) -> syn::Result<Self> {
        let attrs = PropsAttrs::from_attributes(&input.attrs)?;

        let fields = match &input.data {
            Data::Struct(data) => match &data.fields {
                Fields::Named(named) => named
                    .named
                    .iter()
                    .map(PropsField::from_field)
                    .collect::<syn::Result<Vec<_>>>()?,
                Fields::Unit => Vec::new(),
                Fields::Unnamed(_) => {
                    return Err(syn::Error::new(
                        input.ident.span(),
                        "Props cannot be derived for tuple structs, use named fields",
                    ))
                }
            },
            Data::Enum(_) | Data::Union(_) => {
                return Err(syn::Error::new(
                    input.ident.span(),
                    "Props can only be derived for structs",
                ))
            }
        };

        Ok(Self {
            ident: input.ident,
            generics: input.generics,
            attrs,
            fields,
        })
    }
}

impl PropsField {
    fn from_field(field: &syn::Field) -> syn::Result<Self> {
        let ident = field
            .ident
            .clone()
            .ok_or_else(|| syn::Error::new(field.span(), "expected a named field"))?;

        let mut source = None;
        for attr in field.attrs.iter().filter(|a| a.path().is_ident("param")) {
            if source.is_some() {
                return Err(syn::Error::new(attr.span(), "duplicate #[param] attribute"));
            }
            source = Some(parse_param(attr)?);
        }

        Ok(Self {
            name: ident.unraw().to_string(),
            ident,
            ty: field.ty.clone(),
            class: classify(&field.ty),
            source,
        })
    }
}

/// Parses `#[param("Key")]` or `#[param(query = "Key")]`.
fn parse_param(attr: &Attribute) -> syn::Result<FieldSource> {
    attr.parse_args_with(|input: ParseStream| {
        if input.peek(LitStr) {
            let key: LitStr = input.parse()?;
            return Ok(FieldSource::Query(key.value()));
        }

        let name = input.call(Ident::parse_any)?;
        input.parse::<Token![=]>()?;
        let key: LitStr = input.parse()?;

        match name.to_string().as_str() {
            "query" => Ok(FieldSource::Query(key.value())),
            other => Err(syn::Error::new(
                name.span(),
                format!("unsupported param source `{other}`, only `query` is supported"),
            )),
        }
    })
}

/// Classifies a field type by its syntax.
pub fn classify(ty: &Type) -> TypeClass {
    match ty {
        Type::Group(group) => classify(&group.elem),
        Type::Paren(paren) => classify(&paren.elem),
        Type::Path(type_path) if type_path.qself.is_none() => {
            let Some(last) = type_path.path.segments.last() else {
                return TypeClass::Unsupported(render(ty));
            };
            let ident = last.ident.to_string();
            match &last.arguments {
                PathArguments::None if SCALARS.contains(&ident.as_str()) => TypeClass::Scalar,
                PathArguments::AngleBracketed(args) if ident == "Vec" && is_single_u8(args) => {
                    TypeClass::Scalar
                }
                _ => TypeClass::Composite(render(ty)),
            }
        }
        _ => TypeClass::Unsupported(render(ty)),
    }
}

fn is_single_u8(args: &AngleBracketedGenericArguments) -> bool {
    args.args.len() == 1
        && matches!(
            args.args.first(),
            Some(GenericArgument::Type(Type::Path(p))) if p.qself.is_none() && p.path.is_ident("u8")
        )
}

/// Renders a type for diagnostics, without the token spacing `quote` adds.
fn render(ty: &Type) -> String {
    ty.to_token_stream()
        .to_string()
        .replace(" :: ", "::")
        .replace(" < ", "<")
        .replace("< ", "<")
        .replace(" >", ">")
        .replace(" ,", ",")
        .replace("& ", "&")
}
