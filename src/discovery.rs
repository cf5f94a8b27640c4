use anyhow::{Context, Result};
use glob::{glob, Pattern};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info};

/// Extension of init files picked up from directory arguments
pub const INIT_FILE_EXTENSION: &str = "sql";

/// Resolve CLI path arguments into an ordered list of init files.
///
/// # Arguments
/// * `paths` - Files are taken as-is; directories contribute their `*.sql`
///   files (non-recursive), sorted by file name
///
/// # Returns
/// Init files in argument order with duplicates dropped (first occurrence wins).
/// A path that does not exist is an error naming that path.
pub async fn discover_init_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut seen = HashSet::new();
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let metadata = fs::metadata(path)
            .await
            .with_context(|| format!("Cannot access init path {}", path.display()))?;

        let candidates = if metadata.is_dir() {
            sql_files_in_dir(path)?
        } else {
            vec![path.to_path_buf()]
        };

        for candidate in candidates {
            if seen.insert(candidate.clone()) {
                debug!("Found init file: {}", candidate.display());
                files.push(candidate);
            } else {
                debug!("Skipping duplicate init file: {}", candidate.display());
            }
        }
    }

    info!("Discovered {} init files", files.len());
    Ok(files)
}

/// `*.sql` regular files directly inside `dir`, sorted by file name
fn sql_files_in_dir(dir: &Path) -> Result<Vec<PathBuf>> {
    // WHY: escape the directory so brackets or stars in its name are literal
    let pattern = format!(
        "{}/*.{}",
        Pattern::escape(&dir.to_string_lossy()),
        INIT_FILE_EXTENSION
    );

    let mut files = Vec::new();
    for entry in glob(&pattern).with_context(|| format!("Invalid glob pattern {pattern}"))? {
        let path = entry.with_context(|| format!("Cannot read entry in {}", dir.display()))?;
        if path.is_file() {
            files.push(path);
        }
    }

    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
