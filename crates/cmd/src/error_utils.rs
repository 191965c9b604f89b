// Error mapping helpers for the command line

use anyhow::{Result, anyhow};
use playerstats::{ErrorKind, RunReport};

/// Extension trait for Results to give "Failed to ..." style messages
pub trait ErrorContext<T> {
    /// Map error with a context message
    fn with_context_msg(self, msg: &str) -> Result<T>;

    /// Map error for file operations
    fn file_context(self, operation: &str, path: &str) -> Result<T>;

    /// Map error for store operations
    fn store_context(self, operation: &str) -> Result<T>;
}

impl<T, E> ErrorContext<T> for std::result::Result<T, E>
where
    E: std::fmt::Display,
{
    fn with_context_msg(self, msg: &str) -> Result<T> {
        self.map_err(|e| anyhow!("{}: {}", msg, e))
    }

    fn file_context(self, operation: &str, path: &str) -> Result<T> {
        self.map_err(|e| anyhow!("Failed to {} {}: {}", operation, path, e))
    }

    fn store_context(self, operation: &str) -> Result<T> {
        self.with_context_msg(&format!("Failed to {} store", operation))
    }
}

fn stage_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::Store => "store",
        ErrorKind::Input => "upload",
        ErrorKind::Selection => "column selection",
        ErrorKind::Query => "query",
        ErrorKind::Render => "rendering",
        ErrorKind::Config => "configuration",
    }
}

/// Turn a halted run into a process failure; messages were already shown
pub fn check_report(command: &str, report: &RunReport) -> Result<()> {
    match report.halted {
        Some(kind) => Err(anyhow!("{} stopped at the {} stage", command, stage_name(kind))),
        None => Ok(()),
    }
}
