pub mod columns;
pub mod ingest;
pub mod init;
pub mod report;

pub use columns::columns_command;
pub use ingest::{ColumnChoice, ingest_command};
pub use init::init_command;
pub use report::report_command;
