//! Row schema: column identities, declared fields and value conversion.

pub mod adapt;
pub mod field_def;
pub mod identity;

pub use adapt::{CodeConverter, CodedValue, ConversionHints, ConvertedValue, Converter, ConverterRegistry};
pub use field_def::{ReportColumn, ReportDefinition, ValueType};
pub use identity::{ColumnIdentity, derive_column_heading};
