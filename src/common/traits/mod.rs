//! Common traits used across the codebase
//!
//! Implemented by caller types, mostly through the derive macros.

pub mod row;
pub mod selection;

pub use row::ReportRow;
pub use selection::Selection;
