//! Entity derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs::{FieldAttr, SerdeField, field_name, secondary_tag, serde_rename_all};

pub fn expand(mut input: DeriveInput) -> Result<TokenStream> {
    let name = input.ident.clone();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "Entity can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "Entity can only be derived for structs",
            ));
        }
    };

    let rename_all = serde_rename_all(&input.attrs)?;

    let mut descriptors = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(rust_name) = field_name(field) else {
            continue;
        };
        let orm = FieldAttr::from_field(field)?;
        let serde = SerdeField::from_field(field);

        let mut descriptor = quote! { clausekit::FieldDescriptor::new(#rust_name) };
        if orm.skip {
            descriptor = quote! { #descriptor.skip() };
        } else if let Some(column) = &orm.column {
            descriptor = quote! { #descriptor.column(#column) };
        }

        if let Some(json) = secondary_tag(&orm, &serde, rename_all, &rust_name) {
            descriptor = quote! { #descriptor.json(#json) };
        }
        descriptors.push(descriptor);
    }

    let registration = if input.generics.params.is_empty() {
        // Runtime lookup by value needs a concrete TypeId.
        quote! { clausekit::register_entity!(#name); }
    } else {
        quote! {}
    };

    let type_params: Vec<_> = input
        .generics
        .type_params()
        .map(|param| param.ident.clone())
        .collect();
    if !type_params.is_empty() {
        let where_clause = input.generics.make_where_clause();
        for param in type_params {
            where_clause.predicates.push(syn::parse_quote!(#param: 'static));
        }
    }
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics clausekit::Entity for #name #ty_generics #where_clause {
            fn field_descriptors() -> &'static [clausekit::FieldDescriptor] {
                const FIELDS: &[clausekit::FieldDescriptor] = &[
                    #(#descriptors),*
                ];
                FIELDS
            }
        }

        #registration
    })
}
