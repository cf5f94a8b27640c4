use anyhow::{Context, Result};
use memmap2::Mmap;
use std::path::Path;
use tokio::fs::File;
use tokio::io::{AsyncReadExt, BufReader};
use tracing::{debug, info};

/// Configuration for init file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Map the file into memory instead of buffered async reads
    pub use_mmap: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            use_mmap: false,
            buffer_size: 8192,
        }
    }
}

/// Statistics for one init file read
#[derive(Debug, Clone)]
pub struct ReadStats {
    pub file_path: String,
    pub bytes_read: u64,
    pub chars_read: u64,
    pub duration_ms: u64,
}

/// Reads whole init files as UTF-8 text
#[derive(Debug, Clone, Default)]
pub struct InitFileReader {
    config: ReaderConfig,
}

impl InitFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read the full contents of an init file.
    /// Fails if the file cannot be opened or is not valid UTF-8.
    pub async fn read_init_file<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting read of init file: {}", path.display());

        let bytes = if self.config.use_mmap {
            read_mmap(path).await?
        } else {
            self.read_buffered(path).await?
        };

        let text = String::from_utf8(bytes).map_err(|e| {
            let valid_up_to = e.utf8_error().valid_up_to();
            anyhow::anyhow!(
                "UTF-8 decoding error in {} at byte {}",
                path.display(),
                valid_up_to
            )
        })?;

        let stats = ReadStats {
            file_path: path.display().to_string(),
            bytes_read: text.len() as u64,
            chars_read: text.chars().count() as u64,
            duration_ms: start_time.elapsed().as_millis() as u64,
        };

        info!(
            "Read init file {}: {} bytes in {}ms",
            path.display(),
            stats.bytes_read,
            stats.duration_ms
        );

        Ok((text, stats))
    }

    async fn read_buffered(&self, path: &Path) -> Result<Vec<u8>> {
        let file = File::open(path)
            .await
            .with_context(|| format!("Failed to open file {}", path.display()))?;

        // WHY: capacity hint from metadata avoids regrowth for large init scripts
        let size_hint = file.metadata().await.map(|m| m.len() as usize).unwrap_or(0);
        let mut reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut bytes = Vec::with_capacity(size_hint);
        reader
            .read_to_end(&mut bytes)
            .await
            .with_context(|| format!("Failed to read file {}", path.display()))?;

        Ok(bytes)
    }
}

async fn read_mmap(path: &Path) -> Result<Vec<u8>> {
    let owned_path = path.to_path_buf();
    tokio::task::spawn_blocking(move || -> Result<Vec<u8>> {
        let file = std::fs::File::open(&owned_path)
            .with_context(|| format!("Failed to open file {}", owned_path.display()))?;

        // Zero-length files cannot be mapped
        if file.metadata()?.len() == 0 {
            return Ok(Vec::new());
        }

        // SAFETY: the map is copied out before it is dropped; concurrent truncation of
        // the init file by another process is outside what this reader supports
        let mmap = unsafe { Mmap::map(&file) }
            .with_context(|| format!("Failed to map file {}", owned_path.display()))?;
        Ok(mmap.to_vec())
    })
    .await?
}

/// Convenience function for reading a single init file with default configuration
pub async fn read_init_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = InitFileReader::new(ReaderConfig::default());
    let (text, _stats) = reader.read_init_file(file_path).await?;
    Ok(text)
}
