//! Report definitions
//!
//! Associates a row type with the path of the report that fills it and the
//! columns it declares.

use std::fmt;

use itertools::Itertools;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::common::traits::ReportRow;
use crate::error::{Result, RowmapError};
use crate::schema::adapt::ConverterRegistry;
use crate::schema::field_def::field::ReportColumn;

/// A row type bound to an Answers report.
///
/// Definitions are validated once when built and are immutable afterwards;
/// callers typically build one per row type and keep it for the life of the
/// process.
pub struct ReportDefinition<T> {
    path: String,
    name: &'static str,
    columns: Vec<ReportColumn<T>>,
    converters: ConverterRegistry,
}

impl<T: ReportRow> ReportDefinition<T> {
    /// Build the definition declared by `T`
    pub fn new() -> Result<Self> {
        Ok(Self::from_columns(T::report_path(), T::columns())?.with_converters(T::converters()))
    }
}

impl<T: Default + 'static> ReportDefinition<T> {
    /// Build a definition from an explicit column list.
    ///
    /// Fails with a configuration error when the path is empty, when no
    /// columns are given, or when two columns share a field name or a
    /// column identity.
    pub fn from_columns(path: impl Into<String>, columns: Vec<ReportColumn<T>>) -> Result<Self> {
        let path = path.into();
        let name = short_type_name::<T>();

        if path.trim().is_empty() {
            return Err(RowmapError::configuration(format!(
                "{name} does not declare a report path"
            )));
        }
        if columns.is_empty() {
            return Err(RowmapError::configuration(format!(
                "{name} does not declare any report columns"
            )));
        }

        let mut names = FxHashSet::default();
        let mut by_identity = FxHashMap::default();
        for column in &columns {
            if !names.insert(column.name()) {
                return Err(RowmapError::configuration(format!(
                    "{name} declares field '{}' more than once",
                    column.name()
                )));
            }
            if let Some(previous) = by_identity.insert(column.identity(), column.name()) {
                return Err(RowmapError::configuration(format!(
                    "{name} has two fields mapped to column {}: '{previous}' and '{}'",
                    column.identity(),
                    column.name()
                )));
            }
        }

        log::debug!(
            "Defined report {path} for {name} with columns [{}]",
            columns.iter().map(ReportColumn::name).join(", ")
        );

        Ok(Self {
            path,
            name,
            columns,
            converters: ConverterRegistry::new(),
        })
    }
}

impl<T> ReportDefinition<T> {
    /// Layer report-specific converters over whatever registry the manager
    /// uses; entries here win on collision.
    #[must_use]
    pub fn with_converters(mut self, overlay: ConverterRegistry) -> Self {
        self.converters = self.converters.layer(&overlay);
        self
    }

    /// Path of the report in the Answers catalog
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Short name of the row type, for messages
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    #[must_use]
    pub fn columns(&self) -> &[ReportColumn<T>] {
        &self.columns
    }

    /// Report-specific converter overlay
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    /// Look up a declared column by field name
    pub fn column(&self, name: &str) -> Result<&ReportColumn<T>> {
        self.columns
            .iter()
            .find(|column| column.name() == name)
            .ok_or_else(|| {
                RowmapError::configuration(format!(
                    "No such column '{name}' in {}; declared columns are [{}]",
                    self.name,
                    self.columns.iter().map(ReportColumn::name).join(", ")
                ))
            })
    }

    /// Whether `column` is one of this definition's columns
    #[must_use]
    pub fn contains(&self, column: &ReportColumn<T>) -> bool {
        self.columns
            .iter()
            .any(|declared| declared.name() == column.name() && declared.identity() == column.identity())
    }
}

impl<T> fmt::Debug for ReportDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReportDefinition")
            .field("path", &self.path)
            .field("name", &self.name)
            .field("columns", &self.columns)
            .finish_non_exhaustive()
    }
}

impl<T> fmt::Display for ReportDefinition<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ReportDefinition[{}]", self.name)
    }
}

fn short_type_name<T>() -> &'static str {
    let full = std::any::type_name::<T>();
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}
