//! Binding declared columns to one response and building rows from it.

use std::sync::Arc;

use roxmltree::Node;

use crate::error::{Result, RowmapError};
use crate::reader::namespaces::{child_element, source_text, ROWSET_NS};
use crate::reader::rowset::{Rowset, SchemaPreamble};
use crate::schema::adapt::{ConversionHints, Converter, ConverterRegistry};
use crate::schema::field_def::{AssignError, ReportColumn, ReportDefinition};

struct Binding<'d, T> {
    column: &'d ReportColumn<T>,
    element_name: String,
    converter: Arc<dyn Converter>,
}

/// Builds rows of `T` from the rows of a single response.
///
/// Construction checks every declared column against the response's
/// preamble and the effective converter registry, so a mismatch fails the
/// query before any row is read.
pub struct RowBuilder<'d, T> {
    definition: &'d ReportDefinition<T>,
    bindings: Vec<Binding<'d, T>>,
}

impl<'d, T: Default + 'static> RowBuilder<'d, T> {
    /// Bind `definition` to `preamble`, converting with `converters`
    /// overlaid by the definition's own converters
    pub fn new(
        preamble: &SchemaPreamble,
        definition: &'d ReportDefinition<T>,
        converters: &ConverterRegistry,
    ) -> Result<Self> {
        if preamble.is_empty() {
            return Err(RowmapError::data_retrieval("No schema was returned in rowset"));
        }

        let converters = converters.layer(definition.converters());
        let mut bindings = Vec::with_capacity(definition.columns().len());

        for column in definition.columns() {
            let element_name = preamble.element_name(column.identity()).ok_or_else(|| {
                RowmapError::data_retrieval(format!(
                    "the schema returned from Answers does not match the given row type. \
                     There is no report column named '{}', as required by {}.{}",
                    column.identity(),
                    definition.name(),
                    column.name()
                ))
            })?;

            let converter = converters.get(&column.value_type()).ok_or_else(|| {
                RowmapError::configuration(format!(
                    "{}.{} is not of a type that this system can use ({}). \
                     If you need to convert to this type, add an appropriate converter",
                    definition.name(),
                    column.name(),
                    column.value_type()
                ))
            })?;

            bindings.push(Binding {
                column,
                element_name: element_name.to_string(),
                converter,
            });
        }

        log::trace!(
            "Bound {} columns of {} to the response schema",
            bindings.len(),
            definition.name()
        );

        Ok(Self {
            definition,
            bindings,
        })
    }

    /// Build one row from a `Row` element.
    ///
    /// A column whose element is absent or empty converts to no value.
    pub fn build_row(&self, row: Node<'_, '_>) -> Result<T> {
        let mut instance = T::default();

        for binding in &self.bindings {
            let text = child_element(row, ROWSET_NS, &binding.element_name)
                .and_then(|element| element.text())
                .unwrap_or("");
            let hints = ConversionHints {
                field: binding.column.name(),
                scale: binding.column.scale(),
            };

            let converted = ConverterRegistry::apply(binding.converter.as_ref(), text, &hints)
                .map_err(|e| {
                    let e = e.context(format!(
                        "unable to parse '{text}' for {}.{}",
                        self.definition.name(),
                        binding.column.name()
                    ));
                    RowmapError::data_retrieval_with_source(
                        format!("unable to parse row: {}", source_text(row)),
                        e,
                    )
                })?;

            (binding.column.setter())(&mut instance, converted)
                .map_err(|e| self.assign_error(binding, e))?;
        }

        Ok(instance)
    }

    /// Build every row of `rowset`, failing on the first bad row
    pub fn build_rows(&self, rowset: &Rowset<'_>) -> Result<Vec<T>> {
        rowset.rows().map(|row| self.build_row(row)).collect()
    }

    fn assign_error(&self, binding: &Binding<'d, T>, error: AssignError) -> RowmapError {
        let returned = match error {
            AssignError::Null => "no value".to_string(),
            AssignError::Mismatch {
                value,
                returned_type,
            } => format!("{value}, of type {returned_type}"),
        };
        RowmapError::configuration(format!(
            "converter {} returned {returned}, which is not assignable to {}.{}, which is of type {}",
            binding.converter.name(),
            self.definition.name(),
            binding.column.name(),
            binding.column.value_type()
        ))
    }
}
