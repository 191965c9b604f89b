use std::io::{self, Stdout};
use std::path::PathBuf;

use anyhow::Result;
use playerstats::{Config, Pipeline, Session, Store, TerminalSurface};

use crate::error_utils::ErrorContext;

/// Settings shared by every subcommand, after layering config file,
/// environment and command-line overrides
#[derive(Debug, Clone)]
pub struct StatsContext {
    pub config: Config,
    pub session: Session,
}

impl StatsContext {
    pub fn new(
        config_file: Option<PathBuf>,
        database: Option<PathBuf>,
        workdir: Option<PathBuf>,
        session: Option<String>,
    ) -> Result<Self> {
        let mut config = Config::load(config_file.as_deref()).with_context_msg("Failed to load configuration")?;
        if let Some(database) = database {
            config.database = database;
        }
        if let Some(workdir) = workdir {
            config.workdir = workdir;
        }
        let session =
            Session::resolve(&config.table, session.as_deref()).with_context_msg("Invalid session")?;

        diagnostics::debug!(
            "Using database {db}, table {table}",
            db: config.database.display().to_string(),
            table: session.table()
        );

        Ok(Self { config, session })
    }

    /// Context rooted at an explicit database, as tests build it
    pub fn for_database(database: PathBuf, workdir: PathBuf) -> Self {
        Self {
            config: Config {
                database,
                workdir,
                ..Config::default()
            },
            session: Session::default(),
        }
    }

    pub fn store(&self) -> Store {
        Store::new(&self.config.database)
    }

    pub fn pipeline<'a>(&'a self, store: &'a Store) -> Pipeline<'a> {
        Pipeline::new(store, &self.session, self.config.workdir.clone())
    }

    /// Stdout surface; `chart_dir` overrides the configured chart directory
    pub fn terminal(&self, chart_dir: Option<PathBuf>) -> TerminalSurface<Stdout> {
        TerminalSurface::new(io::stdout(), self.config.chart_width)
            .with_chart_dir(chart_dir.or_else(|| self.config.chart_dir.clone()))
    }
}

/// Split a `--columns a,b,c` argument; blank entries are dropped
pub fn parse_column_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
