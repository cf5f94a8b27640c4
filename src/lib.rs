pub mod discovery;
pub mod executor;
pub mod init_loader;
pub mod reader;
pub mod statement_splitter;
pub mod stats;

// Re-export main types for convenient access
pub use statement_splitter::{
    detect_statements, normalize_statement, split_statements, DetectedStatement, LexMode, Span,
};

pub use executor::{DryRunExecutor, SqliteExecutor, StatementExecutor};
pub use init_loader::{InitLoader, LoaderConfig};
pub use stats::{FileStats, FileStatus, RunStats};
