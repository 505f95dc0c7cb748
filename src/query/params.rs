//! Report variables sent along with a query.

use std::collections::{BTreeSet, HashSet};
use std::fmt;
use std::hash::BuildHasher;

use chrono::{DateTime, NaiveDate, NaiveDateTime, SecondsFormat, Utc};
use itertools::Itertools;

use crate::common::traits::Selection;
use crate::error::{Result, RowmapError};
use crate::schema::adapt::date_utils::date_literal;

/// Value of one report variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VariableValue {
    /// Text substituted into the report's SQL as is
    Text(String),
    /// An instant, sent as a typed timestamp
    Timestamp(DateTime<Utc>),
}

impl fmt::Display for VariableValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text(text) => f.write_str(text),
            Self::Timestamp(instant) => {
                f.write_str(&instant.to_rfc3339_opts(SecondsFormat::Secs, true))
            }
        }
    }
}

/// A named report variable
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub name: String,
    pub value: VariableValue,
}

/// The variables applied to one report execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReportParams {
    variables: Vec<Variable>,
}

impl ReportParams {
    /// No variables; the report runs with its stored defaults
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Collect the variables of a filter object.
    ///
    /// Fails with a configuration error when the filter type marks no
    /// fields at all. Fields holding `None` are skipped.
    pub fn from_selection<S: Selection + ?Sized>(selection: &S) -> Result<Self> {
        let declared = selection.report_variables();
        if declared.is_empty() {
            return Err(RowmapError::configuration(format!(
                "{} has no fields marked as report variables",
                std::any::type_name::<S>()
            )));
        }

        let variables = declared
            .into_iter()
            .filter_map(|(name, value)| {
                value.map(|value| Variable {
                    name: name.to_string(),
                    value,
                })
            })
            .collect();
        Ok(Self { variables })
    }

    #[must_use]
    pub fn with_variable(mut self, name: impl Into<String>, value: VariableValue) -> Self {
        self.variables.push(Variable {
            name: name.into(),
            value,
        });
        self
    }

    #[must_use]
    pub fn variables(&self) -> &[Variable] {
        &self.variables
    }

    /// Value of the variable called `name`, if set
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&VariableValue> {
        self.variables
            .iter()
            .find(|variable| variable.name == name)
            .map(|variable| &variable.value)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl fmt::Display for ReportParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[variables={{{}}}]",
            self.variables
                .iter()
                .map(|variable| format!("{}={}", variable.name, variable.value))
                .join(", ")
        )
    }
}

/// Field types a filter object may mark as report variables
pub trait IntoReportVariable {
    /// The rendered variable, `None` to leave the report default in place
    fn to_report_variable(&self) -> Option<VariableValue>;
}

impl IntoReportVariable for String {
    fn to_report_variable(&self) -> Option<VariableValue> {
        Some(VariableValue::Text(self.clone()))
    }
}

/// Dates go out as SQL date literals; Answers mistranslates typed dates.
impl IntoReportVariable for NaiveDate {
    fn to_report_variable(&self) -> Option<VariableValue> {
        Some(VariableValue::Text(date_literal(*self)))
    }
}

/// Local timestamps are read as UTC, matching how the warehouse stores them.
impl IntoReportVariable for NaiveDateTime {
    fn to_report_variable(&self) -> Option<VariableValue> {
        Some(VariableValue::Timestamp(self.and_utc()))
    }
}

impl IntoReportVariable for DateTime<Utc> {
    fn to_report_variable(&self) -> Option<VariableValue> {
        Some(VariableValue::Timestamp(*self))
    }
}

impl<S: BuildHasher> IntoReportVariable for HashSet<String, S> {
    fn to_report_variable(&self) -> Option<VariableValue> {
        Some(VariableValue::Text(in_list(self.iter().sorted())))
    }
}

impl IntoReportVariable for BTreeSet<String> {
    fn to_report_variable(&self) -> Option<VariableValue> {
        Some(VariableValue::Text(in_list(self.iter())))
    }
}

impl<V: IntoReportVariable> IntoReportVariable for Option<V> {
    fn to_report_variable(&self) -> Option<VariableValue> {
        self.as_ref().and_then(IntoReportVariable::to_report_variable)
    }
}

/// Render strings as a parenthesized list of quoted SQL literals
fn in_list<'a>(values: impl Iterator<Item = &'a String>) -> String {
    format!(
        "({})",
        values
            .map(|value| format!("'{}'", value.replace('\'', "''")))
            .join(",")
    )
}
