//! Row types filled from report output

use crate::error::Result;
use crate::schema::adapt::ConverterRegistry;
use crate::schema::field_def::{ReportColumn, ReportDefinition};

/// A type whose instances are built one per rowset row.
///
/// Usually implemented with `#[derive(ReportRow)]`; a handwritten impl lists
/// its columns with [`ReportColumn::required`] and [`ReportColumn::optional`].
pub trait ReportRow: Default + Sized + 'static {
    /// Catalog path of the report, e.g. `/shared/Reports/Donations`
    fn report_path() -> &'static str;

    /// The declared columns, one per mapped field
    fn columns() -> Vec<ReportColumn<Self>>;

    /// Converters this row type needs beyond the manager's registry
    fn converters() -> ConverterRegistry {
        ConverterRegistry::new()
    }

    /// Build and validate the report definition for this type
    fn definition() -> Result<ReportDefinition<Self>> {
        ReportDefinition::new()
    }
}
