//! Declared row fields and report definitions

pub mod definition;
pub mod field;
pub mod mapping;

pub use definition::ReportDefinition;
pub use field::{ReportColumn, ValueType};
pub use mapping::{AssignError, RowGetter, RowGetters, RowSetter, RowSetters};
