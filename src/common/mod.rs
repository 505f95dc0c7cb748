//! Common traits
//!
//! Shared by the schema, query and manager modules.

pub mod traits;

pub use traits::*;
