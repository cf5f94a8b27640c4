// WHY: Run statistics written by the CLI after every run, including failed ones
// Adapted from the per-file stats of the batch pipeline

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::io::{AsyncWriteExt, BufWriter};

/// Outcome of loading one init file
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FileStatus {
    Success,
    Skipped,
    Failed,
}

/// Per-file load statistics
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct FileStats {
    /// Init file path as given to the loader
    pub path: String,
    /// Bytes of SQL text read
    pub bytes_read: u64,
    /// Statements produced by the splitter
    pub statements_detected: u64,
    /// Statements that completed successfully
    pub statements_executed: u64,
    /// Wall time for read, split and execute
    pub processing_time_ms: u64,
    pub status: FileStatus,
    /// Full error chain if loading failed
    pub error: Option<String>,
}

impl FileStats {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            bytes_read: 0,
            statements_detected: 0,
            statements_executed: 0,
            processing_time_ms: 0,
            status: FileStatus::Failed,
            error: None,
        }
    }
}

/// Aggregate statistics for one CLI run
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RunStats {
    /// Seconds since the UNIX epoch when the run started
    pub run_start: u64,
    pub total_processing_time_ms: u64,
    pub total_statements_executed: u64,
    pub files_processed: u64,
    pub files_skipped: u64,
    pub files_failed: u64,
    pub file_stats: Vec<FileStats>,
}

impl Default for RunStats {
    fn default() -> Self {
        Self::new()
    }
}

impl RunStats {
    pub fn new() -> Self {
        let run_start = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        Self {
            run_start,
            total_processing_time_ms: 0,
            total_statements_executed: 0,
            files_processed: 0,
            files_skipped: 0,
            files_failed: 0,
            file_stats: Vec::new(),
        }
    }

    /// Fold one file's outcome into the totals
    pub fn record(&mut self, file: FileStats) {
        match file.status {
            FileStatus::Success => self.files_processed += 1,
            FileStatus::Skipped => self.files_skipped += 1,
            FileStatus::Failed => self.files_failed += 1,
        }
        self.total_statements_executed += file.statements_executed;
        self.total_processing_time_ms += file.processing_time_ms;
        self.file_stats.push(file);
    }

    /// Write stats as pretty JSON, creating parent directories as needed
    pub async fn write_json(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create stats directory {}", parent.display()))?;
        }

        let content = serde_json::to_string_pretty(self)?;
        let file = tokio::fs::File::create(path)
            .await
            .with_context(|| format!("Failed to create stats file {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        writer.write_all(content.as_bytes()).await?;
        writer.write_all(b"\n").await?;
        writer.flush().await?;
        Ok(())
    }
}
