//! Props derive implementation.
//!
//! Expands `#[derive(Props)]` into an implementation of `satchel_core::Props`
//! with one field descriptor per struct field and an index-based `assign`.

use proc_macro2::{Literal, TokenStream};
use quote::quote;
use syn::{DeriveInput, Path};

use crate::parse::{FieldSource, PropsField, PropsStruct, TypeClass};

/// Expands `#[derive(Props)]`.
pub fn expand_props(input: TokenStream) -> syn::Result<TokenStream> {
    let input: DeriveInput = syn::parse2(input)?;
    let props = PropsStruct::parse(input)?;
    Ok(generate_props_impl(&props))
}

fn generate_props_impl(props: &PropsStruct) -> TokenStream {
    let krate = &props.attrs.krate;
    let ident = &props.ident;
    let type_name = ident.to_string();
    let (impl_generics, ty_generics, where_clause) = props.generics.split_for_impl();

    let descriptors = props.fields.iter().map(|field| field_descriptor(krate, field));
    let arms = props
        .fields
        .iter()
        .enumerate()
        .map(|(index, field)| assign_arm(krate, index, field));

    quote! {
        impl #impl_generics #krate::Props for #ident #ty_generics #where_clause {
            fn fields() -> ::std::vec::Vec<#krate::FieldDescriptor> {
                ::std::vec![#(#descriptors),*]
            }

            #[allow(unused_variables, unreachable_code)]
            fn assign(
                &mut self,
                index: usize,
                value: #krate::FieldValue,
            ) -> ::std::result::Result<(), #krate::ExtractionError> {
                match index {
                    #(#arms)*
                    _ => ::std::result::Result::Err(#krate::ExtractionError::assignment(
                        ::std::format!("#{}", index),
                        "no such field",
                    )),
                }
            }

            fn type_name() -> &'static str {
                #type_name
            }
        }
    }
}

fn field_kind(krate: &Path, field: &PropsField) -> TokenStream {
    let ty = &field.ty;
    match &field.class {
        TypeClass::Scalar => quote! { <#ty as #krate::FromFieldValue>::KIND },
        TypeClass::Composite(name) => quote! { #krate::FieldKind::Composite(#name) },
        TypeClass::Unsupported(name) => quote! { #krate::FieldKind::Unsupported(#name) },
    }
}

fn field_descriptor(krate: &Path, field: &PropsField) -> TokenStream {
    let name = &field.name;
    let kind = field_kind(krate, field);
    let descriptor = quote! { #krate::FieldDescriptor::new(#name, #kind) };

    match &field.source {
        Some(FieldSource::Query(key)) => quote! {
            #descriptor.with_source(#krate::SourceDescriptor::query(#key))
        },
        None => descriptor,
    }
}

fn assign_arm(krate: &Path, index: usize, field: &PropsField) -> TokenStream {
    let index = Literal::usize_unsuffixed(index);
    let ident = &field.ident;
    let name = &field.name;
    let ty = &field.ty;

    match &field.class {
        TypeClass::Scalar => quote! {
            #index => {
                self.#ident = <#ty as #krate::FromFieldValue>::from_field_value(value)
                    .map_err(|e| #krate::ExtractionError::assignment(#name, e))?;
                ::std::result::Result::Ok(())
            }
        },
        TypeClass::Composite(_) | TypeClass::Unsupported(_) => {
            let kind = field_kind(krate, field);
            quote! {
                #index => ::std::result::Result::Err(
                    #krate::ExtractionError::unsupported_field_type(#name, #kind)
                ),
            }
        }
    }
}
