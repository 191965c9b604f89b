//! Upload to chart, end to end
//!
//! normalize -> select -> persist -> generate -> execute -> render
//!
//! Stages return `Result`s; this module decides what to show and whether
//! to keep going. Input, selection and store failures stop the run. A
//! failed query or chart only loses its own branch.

use std::path::PathBuf;

use arrow_schema::Schema;

use crate::normalize::{UploadedFile, normalize};
use crate::query::{AggregateResult, CountResult, generate};
use crate::render::{count_chart, sum_chart};
use crate::select::{ColumnChooser, select_columns};
use crate::session::Session;
use crate::store::Store;
use crate::surface::Surface;
use crate::table::Table;
use crate::{Error, ErrorKind, Severity};

/// What a run produced, for callers that need more than the displayed messages
#[derive(Debug, Default)]
pub struct RunReport {
    /// Comma-delimited file the upload was normalized to
    pub normalized: Option<PathBuf>,
    /// Columns persisted
    pub columns: Vec<String>,
    pub rows_written: Option<usize>,
    pub count: Option<CountResult>,
    pub aggregate: Option<AggregateResult>,
    /// Kind of every failure reported, in order
    pub failures: Vec<ErrorKind>,
    /// Set when the run stopped early
    pub halted: Option<ErrorKind>,
}

impl RunReport {
    pub fn succeeded(&self) -> bool {
        self.failures.is_empty() && self.halted.is_none()
    }
}

pub struct Pipeline<'a> {
    store: &'a Store,
    session: &'a Session,
    workdir: PathBuf,
}

impl<'a> Pipeline<'a> {
    pub fn new(store: &'a Store, session: &'a Session, workdir: PathBuf) -> Self {
        Self {
            store,
            session,
            workdir,
        }
    }

    fn report_error(surface: &mut dyn Surface, report: &mut RunReport, err: &Error) {
        match err.severity() {
            Severity::Warning => {
                diagnostics::warn!("{reason}", reason: err.to_string());
            }
            _ => {
                diagnostics::error!("{reason}", reason: err.to_string());
            }
        }
        surface.message(err.severity(), &err.to_string());
        report.failures.push(err.kind());
    }

    fn halt(surface: &mut dyn Surface, mut report: RunReport, err: Error) -> RunReport {
        Self::report_error(surface, &mut report, &err);
        report.halted = Some(err.kind());
        report
    }

    /// Make sure the session's table exists; failures are shown, not fatal
    pub fn initialize(&self, surface: &mut dyn Surface) -> bool {
        match self.store.ensure_schema(self.session.table()) {
            Ok(()) => true,
            Err(e) => {
                diagnostics::error!("Schema initialization failed: {reason}", reason: e.to_string());
                surface.message(
                    Severity::Error,
                    &format!("Error occurred while defining database schema: {e}"),
                );
                false
            }
        }
    }

    /// Run the whole pipeline for one upload
    pub fn run(
        &self,
        upload: Option<&UploadedFile>,
        chooser: &mut dyn ColumnChooser,
        surface: &mut dyn Surface,
    ) -> RunReport {
        let mut report = RunReport::default();

        let normalized = match normalize(upload, &self.workdir) {
            Ok(n) => n,
            Err(e) => return Self::halt(surface, report, e),
        };
        report.normalized = Some(normalized.path.clone());

        let selected = match select_columns(&normalized.table, chooser) {
            Ok(t) => t,
            Err(e) => return Self::halt(surface, report, e),
        };
        report.columns = selected.column_names();

        match self.store.replace_table(self.session.table(), &selected) {
            Ok(rows) => {
                report.rows_written = Some(rows);
                surface.message(
                    Severity::Success,
                    "Player data has been successfully converted and stored in the database.",
                );
            }
            Err(e) => return Self::halt(surface, report, e),
        }

        self.query_and_render(selected.schema(), surface, report)
    }

    /// Re-run both queries against whatever the session's table holds now
    pub fn report(&self, surface: &mut dyn Surface) -> RunReport {
        let mut report = RunReport::default();
        let schema = match self.store.table_schema(self.session.table()) {
            Ok(s) => s,
            Err(e) => return Self::halt(surface, report, e),
        };
        report.columns = schema.fields().iter().map(|f| f.name().clone()).collect();
        self.query_and_render(&schema, surface, report)
    }

    fn query_and_render(
        &self,
        schema: &Schema,
        surface: &mut dyn Surface,
        mut report: RunReport,
    ) -> RunReport {
        let queries = match generate(self.session.table(), schema) {
            Ok(q) => q,
            Err(e) => return Self::halt(surface, report, e),
        };

        surface.message(Severity::Info, "Query Results:");

        match queries.count.run(self.store) {
            Ok(result) => {
                self.show_table(surface, &mut report, "Query 1 Result:", &result.table);
                match count_chart(&result) {
                    Ok(chart) => surface.chart("count", &chart),
                    Err(e) => Self::report_error(surface, &mut report, &e),
                }
                report.count = Some(result);
            }
            Err(e) => Self::report_error(surface, &mut report, &e),
        }

        match queries.grouped.run(self.store) {
            Ok(result) => {
                self.show_table(surface, &mut report, "Query 2 Result:", &result.table);
                match sum_chart(&result) {
                    Ok(chart) => surface.chart("sum", &chart),
                    Err(e) => Self::report_error(surface, &mut report, &e),
                }
                report.aggregate = Some(result);
            }
            Err(e) => Self::report_error(surface, &mut report, &e),
        }

        report
    }

    fn show_table(
        &self,
        surface: &mut dyn Surface,
        report: &mut RunReport,
        title: &str,
        table: &Table,
    ) {
        if table.num_rows() == 0 {
            surface.table(title, "No data available.");
            return;
        }
        match table.pretty() {
            Ok(rendered) => surface.table(title, &rendered),
            Err(e) => Self::report_error(surface, report, &e),
        }
    }
}
