//! FromRow derive macro implementation

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Fields, Result};

use crate::attrs::{row_column, serde_rename_all};

pub fn expand(input: DeriveInput) -> Result<TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            _ => {
                return Err(syn::Error::new_spanned(
                    &input,
                    "FromRow can only be derived for structs with named fields",
                ));
            }
        },
        _ => {
            return Err(syn::Error::new_spanned(
                &input,
                "FromRow can only be derived for structs",
            ));
        }
    };

    let rename_all = serde_rename_all(&input.attrs)?;

    let mut field_extracts = Vec::with_capacity(fields.len());
    for field in fields {
        let Some(ident) = &field.ident else {
            continue;
        };
        let column = row_column(field, rename_all)?;
        field_extracts.push(quote! { #ident: row.try_get_column(#column)? });
    }

    Ok(quote! {
        impl #impl_generics clausekit::FromRow for #name #ty_generics #where_clause {
            fn from_row(row: &clausekit::tokio_postgres::Row) -> clausekit::OrmResult<Self> {
                use clausekit::RowExt;
                Ok(Self {
                    #(#field_extracts),*
                })
            }
        }
    })
}
