//! Queries against a report definition
//!
//! An unsorted query is a single request returning the preamble and the rows
//! together. A sorted query first probes the stored report for its preamble,
//! resolves the sort column's server id from it, patches the report's XML
//! definition with a sort directive and then fetches the rows of the patched
//! report. The probe's preamble is used to read those rows.

pub mod params;
pub mod rewrite;

use std::time::Instant;

use crate::common::traits::Selection;
use crate::error::{Result, RowmapError};
use crate::manager::AnalyticsManager;
use crate::query::params::ReportParams;
use crate::query::rewrite::{find_sort_column_id, replace_sort_directive};
use crate::reader::RowBuilder;
use crate::schema::field_def::{ReportColumn, ReportDefinition};
use crate::schema::identity::ColumnIdentity;
use crate::service::{AnswersService, ExecutionOptions, OutputFormat};

/// Whether results are sorted ascending or descending
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    /// Short code, `asc` or `desc`
    #[must_use]
    pub fn code(self) -> &'static str {
        match self {
            Self::Ascending => "asc",
            Self::Descending => "desc",
        }
    }

    #[must_use]
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "asc" => Some(Self::Ascending),
            "desc" => Some(Self::Descending),
            _ => None,
        }
    }

    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Ascending => Self::Descending,
            Self::Descending => Self::Ascending,
        }
    }

    /// Value of the `direction` attribute in a sort directive
    #[must_use]
    pub fn xml_name(self) -> &'static str {
        match self {
            Self::Ascending => "ascending",
            Self::Descending => "descending",
        }
    }
}

/// A query for rows of `T`, created by [`AnalyticsManager::create_query`]
pub struct Query<'m, T, S> {
    manager: &'m AnalyticsManager<S>,
    definition: &'m ReportDefinition<T>,
    params: ReportParams,
    sort: Option<(ColumnIdentity, SortDirection)>,
    max_results: Option<u32>,
}

impl<'m, T: Default + 'static, S: AnswersService> Query<'m, T, S> {
    pub(crate) fn new(manager: &'m AnalyticsManager<S>, definition: &'m ReportDefinition<T>) -> Self {
        Self {
            manager,
            definition,
            params: ReportParams::new(),
            sort: None,
            max_results: None,
        }
    }

    /// Filter the report with the marked fields of `selection`
    pub fn with_selection<F: Selection + ?Sized>(mut self, selection: &F) -> Result<Self> {
        self.params = ReportParams::from_selection(selection)?;
        Ok(self)
    }

    /// Sort by `column`, ascending unless a direction is given.
    ///
    /// Fails with a configuration error when `column` is not a column of
    /// this query's report definition.
    pub fn order_by(
        mut self,
        column: &ReportColumn<T>,
        direction: impl Into<Option<SortDirection>>,
    ) -> Result<Self> {
        if !self.definition.contains(column) {
            return Err(RowmapError::configuration(format!(
                "Sort column {} does not appear to be a column of report {}",
                column.identity(),
                self.definition.name()
            )));
        }
        let direction = direction.into().unwrap_or_default();
        self.sort = Some((column.identity().clone(), direction));
        Ok(self)
    }

    /// Return at most `max_results` rows
    #[must_use]
    pub fn set_max_results(mut self, max_results: u32) -> Self {
        self.max_results = Some(max_results);
        self
    }

    #[must_use]
    pub fn params(&self) -> &ReportParams {
        &self.params
    }

    /// Run the query.
    ///
    /// Rows come back in server order. When both a sort and a maximum are
    /// set, the server sorts before capping, so the rows are the first
    /// `max_results` of the fully sorted report.
    pub fn get_result_list(&self) -> Result<Vec<T>> {
        self.manager.check_open()?;
        let start = Instant::now();

        let rows = match &self.sort {
            Some((identity, direction)) => self.sorted(identity, *direction)?,
            None => self.unsorted()?,
        };

        log::debug!(
            "Retrieved {} rows of {} from {} with {} in {:?}",
            rows.len(),
            self.definition.name(),
            self.definition.path(),
            self.params,
            start.elapsed()
        );
        Ok(rows)
    }

    /// Run the query, expecting exactly one row
    pub fn get_single_result(&self) -> Result<T> {
        let mut rows = self.get_result_list()?;
        match rows.len() {
            0 => Err(RowmapError::data_retrieval(format!(
                "No rows were returned by report {} with {}",
                self.definition.path(),
                self.params
            ))),
            1 => Ok(rows.remove(0)),
            n => Err(RowmapError::data_retrieval(format!(
                "More than one row was returned by report {}: {n} rows",
                self.definition.path()
            ))),
        }
    }

    fn unsorted(&self) -> Result<Vec<T>> {
        let results = self.manager.query_report(
            self.definition.path(),
            OutputFormat::RowsetSchemaAndData,
            &ExecutionOptions::paged(self.max_results),
            &self.params,
        )?;
        let xml = self.manager.finish(results);

        let rowset = self.manager.parse_rowset(&xml)?;
        if rowset.is_empty() {
            return Ok(Vec::new());
        }

        let preamble = rowset.preamble()?;
        let builder = RowBuilder::new(&preamble, self.definition, self.manager.converters())?;
        builder.build_rows(&rowset)
    }

    fn sorted(&self, identity: &ColumnIdentity, direction: SortDirection) -> Result<Vec<T>> {
        let path = self.definition.path();

        // Probe with the stored defaults, never the caller's variables
        let probe = self.manager.query_report(
            path,
            OutputFormat::RowsetSchema,
            &ExecutionOptions::default(),
            &ReportParams::new(),
        )?;
        let probe_xml = self.manager.finish(probe);
        log::debug!("Probed {path} for its rowset schema");
        let probe = self.manager.parse_rowset(&probe_xml)?;
        if probe.is_empty() {
            return Err(RowmapError::configuration(format!(
                "the report '{path}', as stored in Answers, appears to return zero results. \
                 Please adjust the default parameters in Answers so that it returns at least one."
            )));
        }

        let preamble = probe.preamble()?;
        let column_id = find_sort_column_id(&preamble, identity)?;
        log::debug!("Sorting {path} by {identity} ({column_id}) {}", direction.xml_name());

        let report_xml = self.manager.report_xml(path, &self.params)?;
        let sorted_xml = replace_sort_directive(&report_xml, column_id, direction)?;

        let results = self.manager.query_report_xml(
            &sorted_xml,
            OutputFormat::RowsetData,
            &ExecutionOptions::paged(self.max_results),
            &self.params,
        )?;
        let xml = self.manager.finish(results);

        let rowset = self.manager.parse_rowset(&xml)?;
        if rowset.is_empty() {
            return Ok(Vec::new());
        }

        let builder = RowBuilder::new(&preamble, self.definition, self.manager.converters())?;
        builder.build_rows(&rowset)
    }
}
