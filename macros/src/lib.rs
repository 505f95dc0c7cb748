//! Procedural macros for the rowmap crate
//!
//! This crate provides the derives that turn a plain struct into a report row
//! declaration or a report filter, so that row types never spell out their
//! column table by hand.

use proc_macro::TokenStream;

// Import modules
mod utils;
mod report_row;
mod selection;

// Tests
#[cfg(test)]
mod tests;

/// Derive macro for declaring a report row type
///
/// Every field carrying a `#[column]` attribute becomes a column of the
/// report. The column heading defaults to the field name turned into words,
/// so `account_number` maps to `Account Number`. `Option<T>` fields accept
/// empty values; every other field requires one.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, ReportRow)]
/// #[report(path = "/shared/Reports/Donations/Designation Activity")]
/// struct DonationRow {
///     #[column(table_heading = "Designation")]
///     designation_number: String,
///
///     #[column(table_heading = "Transaction")]
///     transaction_date: Option<chrono::NaiveDate>,
///
///     #[column(table_heading = "Transaction Item", scale = 2)]
///     amount: Option<rust_decimal::Decimal>,
///
///     #[column(
///         table_heading = "Fact - Transaction Items",
///         column_heading = "# Transaction Items"
///     )]
///     number_of_transaction_items: Option<i32>,
/// }
/// ```
///
/// Report-specific converters are picked up from a function named with
/// `#[report(converters = "path::to_fn")]`, which must return a
/// `ConverterRegistry`.
#[proc_macro_derive(ReportRow, attributes(report, column))]
pub fn derive_report_row(input: TokenStream) -> TokenStream {
    report_row::process_derive_report_row(input)
}

/// Derive macro for declaring the variables a report is filtered by
///
/// Every field carrying a `#[param]` attribute is sent as a report variable
/// named after the field, or after `#[param(name = "...")]`. `None` values are
/// left out so the report's stored default applies.
///
/// # Example
///
/// ```ignore
/// #[derive(Debug, Default, Selection)]
/// struct DonationSelection {
///     #[param(name = "designationNumber")]
///     designation_number: Option<String>,
///
///     #[param(name = "transactionStartDate")]
///     start: Option<chrono::NaiveDate>,
///
///     #[param(name = "transactionEndDate")]
///     end: Option<chrono::NaiveDate>,
/// }
/// ```
#[proc_macro_derive(Selection, attributes(param))]
pub fn derive_selection(input: TokenStream) -> TokenStream {
    selection::process_derive_selection(input)
}
