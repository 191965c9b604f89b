use std::path::PathBuf;

/// Result type for playerstats operations
pub type Result<T> = std::result::Result<T, Error>;

/// Broad classes of failure, one per pipeline stage
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Connecting to the store, creating or replacing tables
    Store,
    /// Missing, unsupported or malformed upload
    Input,
    /// Column selection problems
    Selection,
    /// Executing a generated statement
    Query,
    /// Turning a result into a table or chart
    Render,
    /// Loading configuration
    Config,
}

/// How a failure is presented on the user surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("No file uploaded")]
    NoUpload,

    #[error("Unsupported file format '{name}'. Please upload a .txt or .csv file")]
    UnsupportedFormat { name: String },

    #[error("Failed to parse {name}: {message}")]
    Parse { name: String, message: String },

    #[error("Please select at least one column")]
    EmptySelection,

    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    #[error("Column '{0}' selected more than once")]
    DuplicateColumn(String),

    #[error("Invalid column name '{name}': {reason}")]
    InvalidColumnName { name: String, reason: String },

    #[error("Invalid identifier '{0}'")]
    InvalidIdentifier(String),

    #[error("Store error: {0}")]
    Store(#[from] duckdb::Error),

    #[error("Query failed: {sql}: {source}")]
    Query {
        sql: String,
        #[source]
        source: duckdb::Error,
    },

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow_schema::ArrowError),

    #[error("Render error: {0}")]
    Render(String),

    #[error("Configuration error in {path}: {message}")]
    Config { path: PathBuf, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    pub fn parse<S: Into<String>, M: std::fmt::Display>(name: S, message: M) -> Self {
        Error::Parse {
            name: name.into(),
            message: message.to_string(),
        }
    }

    pub fn render<M: Into<String>>(message: M) -> Self {
        Error::Render(message.into())
    }

    pub fn query<S: Into<String>>(sql: S, source: duckdb::Error) -> Self {
        Error::Query {
            sql: sql.into(),
            source,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::NoUpload
            | Error::UnsupportedFormat { .. }
            | Error::Parse { .. }
            | Error::InvalidColumnName { .. }
            | Error::Io(_) => ErrorKind::Input,
            Error::EmptySelection | Error::UnknownColumn(_) | Error::DuplicateColumn(_) => {
                ErrorKind::Selection
            }
            Error::InvalidIdentifier(_) | Error::Store(_) => ErrorKind::Store,
            Error::Query { .. } => ErrorKind::Query,
            Error::Arrow(_) | Error::Render(_) => ErrorKind::Render,
            Error::Config { .. } => ErrorKind::Config,
        }
    }

    /// User mistakes that leave nothing broken are warnings
    pub fn severity(&self) -> Severity {
        match self {
            Error::NoUpload | Error::EmptySelection => Severity::Warning,
            _ => Severity::Error,
        }
    }
}
