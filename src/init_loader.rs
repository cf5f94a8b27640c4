// WHY: Runs init files statement by statement, stopping at the first failure
// Every error names the file, the 1-based statement index, and a truncated preview

use anyhow::{Context, Result};
use indicatif::ProgressBar;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, error, info};

use crate::executor::StatementExecutor;
use crate::reader::{InitFileReader, ReaderConfig};
use crate::stats::{FileStats, FileStatus, RunStats};
use crate::statement_splitter::{self, normalize_statement, DetectedStatement};

/// Configuration for init file execution
#[derive(Debug, Clone)]
pub struct LoaderConfig {
    /// Deadline for all statements of one init file
    pub query_timeout: Duration,
    /// Preview length for per-statement debug logs
    pub debug_preview_len: usize,
    /// Preview length in error messages
    pub error_preview_len: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            query_timeout: Duration::from_secs(30),
            debug_preview_len: 100,
            error_preview_len: 50,
        }
    }
}

/// Loads init files into a database through a [`StatementExecutor`]
pub struct InitLoader<E> {
    executor: E,
    reader: InitFileReader,
    config: LoaderConfig,
    progress: ProgressBar,
}

impl<E: StatementExecutor> InitLoader<E> {
    pub fn new(executor: E, config: LoaderConfig) -> Self {
        Self {
            executor,
            reader: InitFileReader::new(ReaderConfig::default()),
            config,
            progress: ProgressBar::hidden(),
        }
    }

    pub fn with_reader_config(mut self, reader_config: ReaderConfig) -> Self {
        self.reader = InitFileReader::new(reader_config);
        self
    }

    /// Report per-statement progress on `progress` (length is reset per file)
    pub fn with_progress(mut self, progress: ProgressBar) -> Self {
        self.progress = progress;
        self
    }

    pub fn executor(&self) -> &E {
        &self.executor
    }

    pub fn into_executor(self) -> E {
        self.executor
    }

    /// Read, split and execute one init file
    pub async fn load_init_file<P: AsRef<Path>>(&mut self, path: P) -> Result<FileStats> {
        let path = path.as_ref();
        let mut stats = FileStats::new(path.display().to_string());
        self.run_file(path, &mut stats).await?;
        Ok(stats)
    }

    /// Execute already-read init SQL; `label` stands in for the file path in logs and errors
    pub async fn load_init_sql(&mut self, label: &str, text: &str) -> Result<FileStats> {
        let mut stats = FileStats::new(label);
        stats.bytes_read = text.len() as u64;
        let start = Instant::now();

        let result = self.run_text(label, text, &mut stats).await;
        stats.processing_time_ms = start.elapsed().as_millis() as u64;
        result?;
        Ok(stats)
    }

    /// Load init files in order, stopping at the first file that fails.
    /// Every attempted file, including the failed one, is recorded in `run_stats`.
    pub async fn load_init_files<P: AsRef<Path>>(
        &mut self,
        paths: &[P],
        run_stats: &mut RunStats,
    ) -> Result<()> {
        info!("Loading {} init files", paths.len());

        for path in paths {
            let path = path.as_ref();
            let mut stats = FileStats::new(path.display().to_string());
            let result = self.run_file(path, &mut stats).await;

            if let Err(ref e) = result {
                stats.error = Some(format!("{e:#}"));
            }
            run_stats.record(stats);
            result?;
        }

        info!(
            "Loaded {} init files, {} statements executed",
            run_stats.file_stats.len(),
            run_stats.total_statements_executed
        );
        Ok(())
    }

    async fn run_file(&mut self, path: &Path, stats: &mut FileStats) -> Result<()> {
        let start = Instant::now();
        let result = self.read_and_run(path, stats).await;
        stats.processing_time_ms = start.elapsed().as_millis() as u64;
        result
    }

    async fn read_and_run(&mut self, path: &Path, stats: &mut FileStats) -> Result<()> {
        let label = path.display().to_string();
        let (text, read_stats) = self
            .reader
            .read_init_file(path)
            .await
            .with_context(|| format!("failed to read init file '{label}'"))?;
        stats.bytes_read = read_stats.bytes_read;

        self.run_text(&label, &text, stats).await
    }

    async fn run_text(&mut self, label: &str, text: &str, stats: &mut FileStats) -> Result<()> {
        stats.status = FileStatus::Failed;

        let statements = statement_splitter::detect_statements(text)
            .with_context(|| format!("failed to parse init file '{label}'"))?;
        stats.statements_detected = statements.len() as u64;

        if statements.is_empty() {
            info!(path = label, "Init file is empty, skipping");
            stats.status = FileStatus::Skipped;
            return Ok(());
        }

        info!(path = label, statements = statements.len(), "Executing init SQL file");

        self.execute_statements(&statements, stats)
            .await
            .with_context(|| format!("failed to load init file '{label}'"))?;

        info!(
            path = label,
            statements_executed = stats.statements_executed,
            "Init SQL file executed successfully"
        );
        stats.status = FileStatus::Success;
        Ok(())
    }

    async fn execute_statements(
        &mut self,
        statements: &[DetectedStatement],
        stats: &mut FileStats,
    ) -> Result<()> {
        let timeout = self.config.query_timeout;
        let deadline = tokio::time::Instant::now() + timeout;
        let mut preview = String::new();

        self.progress.set_length(statements.len() as u64);
        self.progress.set_position(0);

        for statement in statements {
            let index = statement.index + 1;
            statement.preview_into(self.config.debug_preview_len, &mut preview);
            debug!(index, statement = %preview, "Executing init statement");

            match tokio::time::timeout_at(deadline, self.executor.execute(statement.sql())).await {
                Ok(Ok(())) => {
                    stats.statements_executed += 1;
                    self.progress.inc(1);
                }
                Ok(Err(e)) => {
                    let short = normalize_statement(statement.sql(), self.config.error_preview_len);
                    error!(
                        index,
                        line = statement.span.start_line,
                        statement = %short,
                        error = %format!("{e:#}"),
                        "Init statement failed"
                    );
                    return Err(e.context(format!(
                        "failed to execute init statement {index} at line {} ({short})",
                        statement.span.start_line
                    )));
                }
                Err(_) => {
                    let short = normalize_statement(statement.sql(), self.config.error_preview_len);
                    error!(
                        index,
                        line = statement.span.start_line,
                        statement = %short,
                        ?timeout,
                        "Init statement timed out"
                    );
                    anyhow::bail!(
                        "init statement {index} at line {} ({short}) timed out after {timeout:?}",
                        statement.span.start_line
                    );
                }
            }
        }

        Ok(())
    }
}
