//! Conversion of raw column text into typed values.

pub mod code;
pub mod conversions;
pub mod date_utils;
pub mod registry;

pub use code::{CodeConverter, CodedValue};
pub use conversions::convert_decimal;
pub use date_utils::{parse_date_time, parse_local_date, parse_utc_date_time};
pub use registry::{ConversionHints, ConvertedValue, Converter, ConverterRegistry, FnConverter};
