//! Selection derive macro implementation

use darling::{ast, FromDeriveInput, FromMeta};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Meta};

use crate::utils;

/// Receiver for the struct that derives `Selection`
#[derive(Debug, FromDeriveInput)]
#[darling(supports(struct_named))]
struct SelectionReceiver {
    ident: syn::Ident,
    generics: syn::Generics,
    data: ast::Data<(), syn::Field>,
}

/// Options of a `#[param(...)]` attribute
#[derive(Debug, Default, FromMeta)]
struct ParamOptions {
    /// Variable name; defaults to the field name
    #[darling(default)]
    name: Option<String>,
}

/// Process the Selection derive macro
pub fn process_derive_selection(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match SelectionReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    let mut errors = darling::Error::accumulator();
    let mut variables = Vec::new();

    for field in &fields.fields {
        let Some(attr) = utils::find_attribute(field, "param") else {
            continue;
        };
        let options = match &attr.meta {
            Meta::Path(_) => Some(ParamOptions::default()),
            meta => errors.handle(ParamOptions::from_meta(meta)),
        };
        let (Some(options), Some(ident)) = (options, &field.ident) else {
            continue;
        };

        let name = options.name.unwrap_or_else(|| ident.to_string());
        variables.push(quote! {
            (#name, rowmap::IntoReportVariable::to_report_variable(&self.#ident))
        });
    }

    if let Err(err) = errors.finish() {
        return err.write_errors().into();
    }

    let struct_name = &receiver.ident;
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();

    let expanded = quote! {
        impl #impl_generics rowmap::Selection for #struct_name #ty_generics #where_clause {
            fn report_variables(
                &self,
            ) -> ::std::vec::Vec<(&'static str, ::std::option::Option<rowmap::VariableValue>)> {
                ::std::vec![#(#variables),*]
            }
        }
    };

    TokenStream::from(expanded)
}
