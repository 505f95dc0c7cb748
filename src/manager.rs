//! Answers sessions and their lifecycle.
//!
//! An [`AnalyticsManagerFactory`] logs on and hands out
//! [`AnalyticsManager`]s. A manager wraps one session: it creates queries,
//! remembers remote failures so a pool can discard a session that went bad,
//! and logs off when closed.

use std::cell::RefCell;
use std::time::Instant;

use crate::config::RowmapConfig;
use crate::error::{Result, RowmapError};
use crate::query::Query;
use crate::query::params::ReportParams;
use crate::reader::Rowset;
use crate::schema::adapt::ConverterRegistry;
use crate::schema::field_def::ReportDefinition;
use crate::service::{AnswersService, Connector, ExecutionOptions, OutputFormat, QueryResults, ServiceError};

/// Creates logged-on managers from a connector and configuration
pub struct AnalyticsManagerFactory<C> {
    connector: C,
    config: RowmapConfig,
    converters: ConverterRegistry,
}

impl<C: Connector> AnalyticsManagerFactory<C> {
    /// A factory whose managers convert with the default converters
    pub fn new(connector: C, config: RowmapConfig) -> Self {
        Self {
            connector,
            config,
            converters: ConverterRegistry::with_defaults(),
        }
    }

    /// Add converters every manager from this factory will use
    #[must_use]
    pub fn with_converters(mut self, overlay: &ConverterRegistry) -> Self {
        self.converters = self.converters.layer(overlay);
        self
    }

    #[must_use]
    pub fn config(&self) -> &RowmapConfig {
        &self.config
    }

    /// Log on and wrap the new session in a manager
    pub fn create_analytics_manager(&self) -> Result<AnalyticsManager<C::Service>> {
        let start = Instant::now();
        let service = self
            .connector
            .connect(&self.config)
            .map_err(|source| RowmapError::Connection {
                username: self.config.username.clone(),
                source,
            })?;

        log::debug!(
            "Created Answers session for {} in {:?}",
            self.config.username,
            start.elapsed()
        );

        Ok(AnalyticsManager::new(
            service,
            self.converters.clone(),
            self.config.validation_report_path.clone(),
        ))
    }
}

/// One Answers session.
///
/// Not shareable between threads; give each thread its own manager.
pub struct AnalyticsManager<S> {
    service: S,
    converters: ConverterRegistry,
    validation_report_path: Option<String>,
    closed: bool,
    recent_failure: RefCell<Option<String>>,
}

impl<S: AnswersService> AnalyticsManager<S> {
    /// Wrap an already logged-on session
    pub fn new(service: S, converters: ConverterRegistry, validation_report_path: Option<String>) -> Self {
        Self {
            service,
            converters,
            validation_report_path,
            closed: false,
            recent_failure: RefCell::new(None),
        }
    }

    /// Start a query for rows of `T`
    pub fn create_query<'m, T: Default + 'static>(
        &'m self,
        definition: &'m ReportDefinition<T>,
    ) -> Result<Query<'m, T, S>> {
        self.check_open()?;
        Ok(Query::new(self, definition))
    }

    /// Log off. The manager cannot be used afterwards.
    pub fn close(&mut self) -> Result<()> {
        self.check_open()?;
        self.closed = true;
        self.service
            .logoff()
            .map_err(|e| RowmapError::data_retrieval_with_source("unable to log off from Answers", e))?;
        log::debug!("Logged off Answers session");
        Ok(())
    }

    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Check that the session is still usable.
    ///
    /// Fails when an earlier remote call failed, when Answers no longer
    /// recognizes the session, or when the configured validation report
    /// cannot be run.
    pub fn validate(&self) -> Result<()> {
        self.check_open()?;

        if let Some(failure) = self.recent_failure.borrow().as_ref() {
            return Err(RowmapError::invalid_state(format!(
                "a recent error has occurred. Because long-running Answers sessions can \
                 sometimes experience unusual errors, this session should be discarded. \
                 The recent error was: {failure}"
            )));
        }

        self.service
            .current_user()
            .map_err(|e| RowmapError::invalid_state_with_source("manager is no longer usable", e))?;

        if let Some(path) = &self.validation_report_path {
            let options = ExecutionOptions {
                max_rows_per_page: Some(1),
                asynchronous: false,
                presentation_info: true,
            };
            self.service
                .execute_report(path, OutputFormat::RowsetSchemaAndData, &options, &ReportParams::new())
                .map_err(|e| {
                    self.failed(RowmapError::data_retrieval_with_source(
                        format!("unable to query report {path}; details follow:\n{}", e.details()),
                        e,
                    ))
                })?;
        }

        Ok(())
    }

    /// The underlying session
    #[must_use]
    pub fn service(&self) -> &S {
        &self.service
    }

    /// Converters applied beneath each report's own converters
    #[must_use]
    pub fn converters(&self) -> &ConverterRegistry {
        &self.converters
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.closed {
            return Err(RowmapError::invalid_state("already closed"));
        }
        Ok(())
    }

    pub(crate) fn query_report(
        &self,
        path: &str,
        format: OutputFormat,
        options: &ExecutionOptions,
        params: &ReportParams,
    ) -> Result<QueryResults> {
        self.service
            .execute_report(path, format, options, params)
            .map_err(|e| {
                let message = match &e {
                    ServiceError::Fault { .. } => format!(
                        "unable to query report {path} with {params}; details follow:\n{}",
                        e.details()
                    ),
                    ServiceError::Transport(_) => format!("unable to query report {path} with {params}"),
                };
                self.failed(RowmapError::data_retrieval_with_source(message, e))
            })
    }

    pub(crate) fn query_report_xml(
        &self,
        report_xml: &str,
        format: OutputFormat,
        options: &ExecutionOptions,
        params: &ReportParams,
    ) -> Result<QueryResults> {
        self.service
            .execute_report_xml(report_xml, format, options, params)
            .map_err(|e| {
                let message = match &e {
                    ServiceError::Fault { .. } => format!(
                        "unable to query with xml:\n{report_xml}\n\nsoapfault details follow:\n{}",
                        e.details()
                    ),
                    ServiceError::Transport(_) => format!("unable to query with xml:\n{report_xml}"),
                };
                self.failed(RowmapError::data_retrieval_with_source(message, e))
            })
    }

    pub(crate) fn report_xml(&self, path: &str, params: &ReportParams) -> Result<String> {
        self.service.apply_report_params(path, params).map_err(|e| {
            self.failed(RowmapError::data_retrieval_with_source(
                format!(
                    "unable to generate xml for report {path} with {params}; details follow:\n{}",
                    e.details()
                ),
                e,
            ))
        })
    }

    /// Take the rowset out of `results`, cancelling the query on the server
    /// if it still has rows to give
    pub(crate) fn finish(&self, results: QueryResults) -> String {
        if !results.finished {
            if let Some(query_id) = &results.query_id {
                match self.service.cancel_query(query_id) {
                    Ok(()) => log::trace!("Cancelled unfinished query {query_id}"),
                    Err(e) => log::warn!("Unable to cancel unfinished query {query_id}: {e}"),
                }
            }
        }
        results.rowset
    }

    pub(crate) fn parse_rowset<'x>(&self, xml: &'x str) -> Result<Rowset<'x>> {
        Rowset::parse(xml, "rowset from Answers").map_err(|e| self.failed(e))
    }

    fn failed(&self, error: RowmapError) -> RowmapError {
        log::warn!("Answers call failed: {error}");
        *self.recent_failure.borrow_mut() = Some(error.to_string());
        error
    }
}
