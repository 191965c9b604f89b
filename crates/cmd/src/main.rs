use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use cmd::commands::{self, ColumnChoice};
use cmd::common::{StatsContext, parse_column_list};

/// Load player statistics into a local database and chart two summaries
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
#[command(name = "playerstats")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Database file (defaults to PLAYERSTATS_DB, then player_data.db)
    #[arg(long, global = true)]
    database: Option<PathBuf>,

    /// Keep this session's data in its own table
    #[arg(long, global = true)]
    session: Option<String>,

    /// YAML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Directory for normalized .csv files
    #[arg(long, global = true)]
    workdir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Create the player table with its placeholder schema
    Init,

    /// List the columns of a .txt or .csv upload
    Columns {
        /// Upload to inspect
        file: PathBuf,
    },

    /// Upload a file, store the chosen columns and show both queries
    Ingest {
        /// Tab-delimited .txt or comma-delimited .csv
        file: PathBuf,

        /// Comma separated column names to keep
        #[arg(short, long, conflicts_with = "all")]
        columns: Option<String>,

        /// Keep every column
        #[arg(short, long)]
        all: bool,

        /// Also write Vega-Lite chart documents here
        #[arg(long)]
        chart_dir: Option<PathBuf>,
    },

    /// Show both queries over the stored table
    Report {
        /// Also write Vega-Lite chart documents here
        #[arg(long)]
        chart_dir: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    diagnostics::init_diagnostics();

    let args: Vec<String> = std::env::args().collect();
    let cli = Cli::parse();

    diagnostics::debug!("playerstats {args}", args: args.join(" ").as_str());

    let ctx = StatsContext::new(cli.config, cli.database, cli.workdir, cli.session)?;

    match cli.command {
        Commands::Init => {
            let mut surface = ctx.terminal(None);
            commands::init_command(&ctx, &mut surface).map(|_| ())
        }
        Commands::Columns { file } => {
            let mut surface = ctx.terminal(None);
            commands::columns_command(&ctx, &file, &mut surface).map(|_| ())
        }
        Commands::Ingest {
            file,
            columns,
            all,
            chart_dir,
        } => {
            let choice = match (columns, all) {
                (Some(raw), _) => ColumnChoice::Named(parse_column_list(&raw)),
                (None, true) => ColumnChoice::All,
                (None, false) => ColumnChoice::Prompt,
            };
            let mut surface = ctx.terminal(chart_dir);
            commands::ingest_command(&ctx, &file, choice, &mut surface).map(|_| ())
        }
        Commands::Report { chart_dir } => {
            let mut surface = ctx.terminal(chart_dir);
            commands::report_command(&ctx, &mut surface).map(|_| ())
        }
    }
}
