// WHY: the loader only needs "run this statement text"; engines plug in behind this trait

use anyhow::{Context, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::str::FromStr;
use tracing::{debug, info};

use crate::statement_splitter::collapse_whitespace;

/// Runs one statement produced by the splitter against a database
#[allow(async_fn_in_trait)]
pub trait StatementExecutor {
    /// Execute `sql` as a single statement. Errors carry the engine's cause.
    async fn execute(&mut self, sql: &str) -> Result<()>;
}

/// Executes statements on a SQLite database through a single-connection pool
#[derive(Debug, Clone)]
pub struct SqliteExecutor {
    pool: SqlitePool,
}

impl SqliteExecutor {
    /// Open `url` (e.g. `sqlite://app.db` or `sqlite::memory:`), creating the file if missing
    pub async fn connect(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)
            .with_context(|| format!("Invalid SQLite database URL {url}"))?
            .create_if_missing(true);

        // WHY: one connection so in-memory databases and session settings (PRAGMA) persist
        // across every statement of the run
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database {url}"))?;

        info!("Connected to SQLite database {}", url);
        Ok(Self { pool })
    }

    pub fn from_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl StatementExecutor for SqliteExecutor {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        let result = sqlx::query(sql).execute(&self.pool).await?;
        debug!("Statement affected {} rows", result.rows_affected());
        Ok(())
    }
}

/// Executes nothing; records statements and optionally echoes them to stdout.
///
/// Echoed lines are numbered by position in the whole run, not within a file.
#[derive(Debug, Default)]
pub struct DryRunExecutor {
    echo: bool,
    statements: Vec<String>,
}

impl DryRunExecutor {
    pub fn new(echo: bool) -> Self {
        Self {
            echo,
            statements: Vec::new(),
        }
    }

    /// Statements seen so far, in execution order
    pub fn statements(&self) -> &[String] {
        &self.statements
    }
}

impl StatementExecutor for DryRunExecutor {
    async fn execute(&mut self, sql: &str) -> Result<()> {
        if self.echo {
            println!("{}\t{}", self.statements.len(), collapse_whitespace(sql));
        }
        self.statements.push(sql.to_string());
        Ok(())
    }
}
