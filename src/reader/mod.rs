//! Reading rowset responses into rows.

pub mod namespaces;
pub mod row_builder;
pub mod rowset;

pub use row_builder::RowBuilder;
pub use rowset::{PreambleColumn, Rowset, SchemaPreamble};
