//! ReportRow derive macro implementation

use darling::{ast, FromDeriveInput, FromMeta};
use proc_macro::TokenStream;
use quote::quote;
use syn::{parse_macro_input, DeriveInput, Meta};

use crate::utils;

/// Receiver for the struct that derives `ReportRow`
#[derive(Debug, FromDeriveInput)]
#[darling(attributes(report), supports(struct_named))]
struct ReportRowReceiver {
    ident: syn::Ident,
    generics: syn::Generics,
    /// Catalog path of the report
    path: String,
    /// Function returning report-specific converters
    #[darling(default)]
    converters: Option<syn::Path>,
    data: ast::Data<(), syn::Field>,
}

/// Options of a `#[column(...)]` attribute
#[derive(Debug, FromMeta)]
struct ColumnOptions {
    table_heading: String,
    #[darling(default)]
    column_heading: Option<String>,
    #[darling(default)]
    scale: Option<u32>,
}

/// Process the ReportRow derive macro
pub fn process_derive_report_row(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    let receiver = match ReportRowReceiver::from_derive_input(&input) {
        Ok(receiver) => receiver,
        Err(err) => return err.write_errors().into(),
    };

    let ast::Data::Struct(fields) = &receiver.data else {
        unreachable!("Darling ensures this is a struct")
    };

    let mut errors = darling::Error::accumulator();
    let mut columns = Vec::new();

    for field in &fields.fields {
        let Some(attr) = utils::find_attribute(field, "column") else {
            continue;
        };
        let Some(options) = errors.handle(parse_column_options(&attr.meta)) else {
            continue;
        };
        let Some(ident) = &field.ident else {
            continue;
        };

        let field_name = ident.to_string();
        let table_heading = &options.table_heading;
        let column_heading = match &options.column_heading {
            Some(heading) => quote! { ::std::option::Option::Some(#heading) },
            None => quote! { ::std::option::Option::None },
        };
        let identity = quote! {
            rowmap::ColumnIdentity::for_field(#field_name, #table_heading, #column_heading)
        };

        let mut column = match utils::option_inner_type(&field.ty) {
            Some(inner) => quote! {
                rowmap::ReportColumn::optional::<#inner>(
                    #field_name,
                    #identity,
                    |row: &Self| row.#ident.as_ref(),
                    |row: &mut Self, value| row.#ident = value,
                )
            },
            None => {
                let ty = &field.ty;
                quote! {
                    rowmap::ReportColumn::required::<#ty>(
                        #field_name,
                        #identity,
                        |row: &Self| &row.#ident,
                        |row: &mut Self, value| row.#ident = value,
                    )
                }
            }
        };
        if let Some(scale) = options.scale {
            column = quote! { #column.with_scale(#scale) };
        }
        columns.push(column);
    }

    if let Err(err) = errors.finish() {
        return err.write_errors().into();
    }

    let struct_name = &receiver.ident;
    let (impl_generics, ty_generics, where_clause) = receiver.generics.split_for_impl();
    let report_path = &receiver.path;
    let converters = receiver.converters.as_ref().map(|converters| {
        quote! {
            fn converters() -> rowmap::ConverterRegistry {
                #converters()
            }
        }
    });

    let expanded = quote! {
        impl #impl_generics rowmap::ReportRow for #struct_name #ty_generics #where_clause {
            fn report_path() -> &'static str {
                #report_path
            }

            fn columns() -> ::std::vec::Vec<rowmap::ReportColumn<Self>> {
                ::std::vec![#(#columns),*]
            }

            #converters
        }
    };

    TokenStream::from(expanded)
}

fn parse_column_options(meta: &Meta) -> darling::Result<ColumnOptions> {
    match meta {
        Meta::List(_) => ColumnOptions::from_meta(meta),
        _ => Err(darling::Error::custom(
            "expected #[column(table_heading = \"...\")]",
        )
        .with_span(meta)),
    }
}
