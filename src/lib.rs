//! A Rust library for running parameterized Oracle BI Answers reports and
//! mapping their rowset responses onto typed rows.
//!
//! ```ignore
//! use rowmap::{ReportRow, Selection};
//!
//! #[derive(Debug, Default, ReportRow)]
//! #[report(path = "/shared/Reports/Donations")]
//! struct Donation {
//!     #[column(table_heading = "Designation")]
//!     designation_number: String,
//!     #[column(table_heading = "Transaction Item", scale = 2)]
//!     amount: Option<rust_decimal::Decimal>,
//! }
//!
//! #[derive(Selection)]
//! struct DonationFilter {
//!     #[param(name = "designationNumber")]
//!     designation: Option<String>,
//! }
//! ```

extern crate self as rowmap;

pub mod common;
pub mod config;
pub mod error;
pub mod manager;
pub mod query;
pub mod reader;
pub mod schema;
pub mod service;

// Core types
pub use config::RowmapConfig;
pub use error::{Result, RowmapError};
pub use manager::{AnalyticsManager, AnalyticsManagerFactory};
pub use query::params::{IntoReportVariable, ReportParams, Variable, VariableValue};
pub use query::{Query, SortDirection};

// Schema
pub use common::traits::{ReportRow, Selection};
pub use schema::{
    CodeConverter, CodedValue, ColumnIdentity, ConversionHints, ConvertedValue, Converter,
    ConverterRegistry, ReportColumn, ReportDefinition, ValueType,
};

// Service seam
pub use service::{
    AnswersService, Connector, ExecutionOptions, OutputFormat, QueryResults, ServiceError,
};

// Derive macros
pub use rowmap_macros::{ReportRow, Selection};
