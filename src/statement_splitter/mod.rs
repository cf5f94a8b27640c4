// WHY: Statement splitter interface - plain Vec<String> contract plus a located variant with spans
// The scanner itself lives in scanner.rs; normalization.rs renders statements for logs

use anyhow::Result;
use tracing::debug;

pub mod normalization;
pub mod scanner;

// Re-export core types
pub use normalization::{
    collapse_whitespace, collapse_whitespace_into, normalize_statement, normalize_statement_into,
};
pub use scanner::LexMode;

/// Character that ends one executable unit outside strings and comments
pub const STATEMENT_TERMINATOR: char = ';';

/// Position of a statement in the source text, 1-based, counted in Unicode scalar values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start_line: usize,
    pub start_col: usize,
    pub end_line: usize,
    pub end_col: usize,
}

/// A statement produced by the splitter together with where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedStatement {
    /// 0-based position in split order
    pub index: usize,
    /// Statement text with comments removed and surrounding whitespace trimmed
    pub sql: String,
    /// First through last non-whitespace character that contributed to `sql`
    pub span: Span,
}

impl DetectedStatement {
    /// Statement text exactly as it will be executed
    pub fn sql(&self) -> &str {
        &self.sql
    }

    /// Single-line rendering bounded to `max_len` characters
    pub fn preview(&self, max_len: usize) -> String {
        normalize_statement(&self.sql, max_len)
    }

    /// Single-line rendering into a reusable buffer
    pub fn preview_into(&self, max_len: usize, buffer: &mut String) {
        normalize_statement_into(&self.sql, max_len, buffer);
    }
}

impl From<DetectedStatement> for String {
    fn from(statement: DetectedStatement) -> Self {
        statement.sql
    }
}

/// Split SQL text into independently executable statements.
///
/// Terminators inside single-quoted strings and comments are ignored, comments
/// are removed, and empty statements are dropped. Unterminated strings and
/// comments run to end of input; this never returns an error.
pub fn split_statements(text: &str) -> Result<Vec<String>> {
    let statements = detect_statements(text)?;
    Ok(statements.into_iter().map(String::from).collect())
}

/// Split SQL text and keep each statement's index and source span
pub fn detect_statements(text: &str) -> Result<Vec<DetectedStatement>> {
    debug!("Starting statement split on {} bytes", text.len());

    let statements = scanner::scan(text);

    debug!("Split {} statements", statements.len());
    Ok(statements)
}
