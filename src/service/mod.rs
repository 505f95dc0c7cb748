//! The Answers web services, as seen by the manager.
//!
//! Session establishment and the SOAP transport live behind these traits;
//! the manager only issues calls and interprets results and faults.

use crate::config::RowmapConfig;
use crate::query::params::ReportParams;

/// Which parts of a rowset a query should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Preamble only
    RowsetSchema,
    /// Rows only
    RowsetData,
    /// Preamble followed by rows
    RowsetSchemaAndData,
}

/// Execution options sent with a query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExecutionOptions {
    /// Page size cap; `None` returns every row
    pub max_rows_per_page: Option<u32>,
    /// Asynchronous execution; Answers ignores the page size without it
    pub asynchronous: bool,
    /// Include column headings in the preamble
    pub presentation_info: bool,
}

impl ExecutionOptions {
    /// Options for a query returning at most `max_rows` rows, or all rows
    #[must_use]
    pub fn paged(max_rows: Option<u32>) -> Self {
        Self {
            max_rows_per_page: max_rows,
            asynchronous: max_rows.is_some(),
            presentation_info: true,
        }
    }
}

impl Default for ExecutionOptions {
    fn default() -> Self {
        Self::paged(None)
    }
}

/// What a query execution returned
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults {
    /// The rowset document
    pub rowset: String,
    /// Server id of the query, needed to cancel an unfinished one
    pub query_id: Option<String>,
    /// Whether every row has been returned
    pub finished: bool,
}

impl QueryResults {
    /// A complete result holding `rowset`
    pub fn finished(rowset: impl Into<String>) -> Self {
        Self {
            rowset: rowset.into(),
            query_id: None,
            finished: true,
        }
    }
}

/// Failure of a remote call
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// The service answered with a fault
    #[error("SOAP fault: {message}")]
    Fault {
        message: String,
        detail: Option<String>,
    },

    /// The call did not complete
    #[error(transparent)]
    Transport(#[from] anyhow::Error),
}

impl ServiceError {
    pub fn fault(message: impl Into<String>, detail: Option<String>) -> Self {
        Self::Fault {
            message: message.into(),
            detail,
        }
    }

    /// Fault detail for error messages, falling back to the fault message
    #[must_use]
    pub fn details(&self) -> String {
        match self {
            Self::Fault {
                detail: Some(detail),
                ..
            } => detail.clone(),
            Self::Fault { message, .. } => message.clone(),
            Self::Transport(e) => format!("{e:#}"),
        }
    }

    #[must_use]
    pub fn is_fault(&self) -> bool {
        matches!(self, Self::Fault { .. })
    }
}

/// A logged-on Answers session
pub trait AnswersService {
    /// Run the report stored at `path`
    fn execute_report(
        &self,
        path: &str,
        format: OutputFormat,
        options: &ExecutionOptions,
        params: &ReportParams,
    ) -> Result<QueryResults, ServiceError>;

    /// Run a report given as an XML definition
    fn execute_report_xml(
        &self,
        report_xml: &str,
        format: OutputFormat,
        options: &ExecutionOptions,
        params: &ReportParams,
    ) -> Result<QueryResults, ServiceError>;

    /// The XML definition of the report at `path` with `params` applied
    fn apply_report_params(&self, path: &str, params: &ReportParams) -> Result<String, ServiceError>;

    /// Stop an unfinished query
    fn cancel_query(&self, query_id: &str) -> Result<(), ServiceError>;

    /// Name of the logged-on user; doubles as a session liveness check
    fn current_user(&self) -> Result<String, ServiceError>;

    /// End the session
    fn logoff(&self) -> Result<(), ServiceError>;
}

/// Opens Answers sessions
pub trait Connector {
    type Service: AnswersService;

    /// Log on with the credentials in `config`
    fn connect(&self, config: &RowmapConfig) -> Result<Self::Service, ServiceError>;
}
