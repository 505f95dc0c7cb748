//! Filter objects turned into report variables

use crate::query::params::VariableValue;

/// A filter object whose marked fields become report variables.
///
/// Implemented with `#[derive(Selection)]`. A field whose value is `None`
/// contributes no variable, which leaves the report's stored default in
/// effect.
pub trait Selection {
    /// Variable name and rendered value for every marked field, in
    /// declaration order
    fn report_variables(&self) -> Vec<(&'static str, Option<VariableValue>)>;
}
