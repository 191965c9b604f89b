use std::io;
use std::path::Path;

use anyhow::Result;
use playerstats::{
    AllColumns, ColumnChooser, FixedColumns, PromptChooser, RunReport, Surface, UploadedFile,
};

use crate::common::StatsContext;
use crate::error_utils::{ErrorContext, check_report};

/// How the columns of an upload are picked
#[derive(Debug, Clone)]
pub enum ColumnChoice {
    /// Names given on the command line
    Named(Vec<String>),
    All,
    /// Ask on the terminal
    Prompt,
}

/// Upload, select, store, query and chart in one go
pub fn ingest_command(
    ctx: &StatsContext,
    file: &Path,
    choice: ColumnChoice,
    surface: &mut dyn Surface,
) -> Result<RunReport> {
    diagnostics::info!(
        "ingest {file} into {table}",
        file: file.display().to_string(),
        table: ctx.session.table()
    );

    let upload = UploadedFile::from_path(file).file_context("read", &file.display().to_string())?;

    let mut chooser: Box<dyn ColumnChooser> = match choice {
        ColumnChoice::Named(names) => Box::new(FixedColumns(names)),
        ColumnChoice::All => Box::new(AllColumns),
        ColumnChoice::Prompt => Box::new(PromptChooser::new(io::stdin().lock(), io::stdout())),
    };

    let store = ctx.store();
    let pipeline = ctx.pipeline(&store);
    pipeline.initialize(surface);
    let report = pipeline.run(Some(&upload), chooser.as_mut(), surface);

    check_report("ingest", &report)?;
    Ok(report)
}
