use darling::ast::{Data, Style};
use darling::{FromDeriveInput, FromField};
use quote::quote;
use syn::{DeriveInput, parse_macro_input};

use proc_macro::TokenStream;

#[derive(FromField)]
struct ToBytesField {
    ident: Option<syn::Ident>,
}

#[derive(FromDeriveInput)]
#[darling(attributes(to_bytes), supports(struct_any))]
struct ToBytesInput {
    ident: syn::Ident,
    data: Data<(), ToBytesField>,
    /// Module holding the `WriteBytesLe`/`WriteBytesBe` traits.
    #[darling(default)]
    path: Option<syn::Path>,
}

/// Implements `WriteBytesLe` and `WriteBytesBe` by writing every field in
/// declaration order.
///
/// The traits are looked up in `crate::utils::byteorder` unless a
/// `#[to_bytes(path = "...")]` attribute names another module.
#[proc_macro_derive(ToBytes, attributes(to_bytes))]
pub fn derive_to_bytes(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let opts = match ToBytesInput::from_derive_input(&input) {
        Ok(opts) => opts,
        Err(e) => return TokenStream::from(e.write_errors()),
    };

    let name = opts.ident;
    let path = opts
        .path
        .unwrap_or_else(|| syn::parse_quote!(crate::utils::byteorder));

    let fields: Vec<syn::Member> = match opts.data {
        Data::Struct(s) => match s.style {
            Style::Struct => s
                .fields
                .into_iter()
                .filter_map(|f| f.ident.map(syn::Member::from))
                .collect(),
            Style::Tuple => (0..s.fields.len())
                .map(|i| syn::Index::from(i).into())
                .collect(),
            Style::Unit => Vec::new(),
        },
        Data::Enum(_) => unreachable!("ToBytes can only be derived for structs"),
    };

    let expanded = quote! {
        impl #path::WriteBytesBe for #name {
            fn write_be(&self, dst: &mut Vec<u8>) {
                #( #path::WriteBytesBe::write_be(&self.#fields, dst); )*
            }
        }

        impl #path::WriteBytesLe for #name {
            fn write_le(&self, dst: &mut Vec<u8>) {
                #( #path::WriteBytesLe::write_le(&self.#fields, dst); )*
            }
        }
    };

    TokenStream::from(expanded)
}
