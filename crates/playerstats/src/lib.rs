//! playerstats - load player statistics into DuckDB and chart two summaries
//!
//! An upload (`.txt` tab-delimited or `.csv`) is normalized to CSV, narrowed
//! to the chosen columns and written over the session's table. Two fixed
//! queries then run against it: a row count, and every column grouped by
//! the first. Both are shown as tables and bar charts.

pub mod config;
mod error;
pub mod ident;
pub mod normalize;
pub mod pipeline;
pub mod query;
pub mod render;
pub mod select;
pub mod session;
pub mod store;
pub mod surface;
pub mod table;

pub use config::Config;
pub use error::{Error, ErrorKind, Result, Severity};
pub use normalize::{NormalizedFile, UploadFormat, UploadedFile};
pub use pipeline::{Pipeline, RunReport};
pub use query::{AggregateResult, CountResult, GeneratedQueries};
pub use render::{Bar, BarChart};
pub use select::{AllColumns, ColumnChooser, FixedColumns, PromptChooser};
pub use session::Session;
pub use store::Store;
pub use surface::{MemorySurface, Surface, TerminalSurface};
pub use table::Table;
