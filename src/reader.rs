use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, File};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{debug, info, warn};

use crate::error::Result;

/// Configuration for file reading behavior
#[derive(Debug, Clone)]
pub struct ReaderConfig {
    /// Fail on a missing or undecodable file instead of reading it as empty
    pub fail_fast: bool,
    /// Buffer size for async reading (default: 8KB)
    pub buffer_size: usize,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            // WHY: a table read as empty would silently drop every mention downstream
            fail_fast: true,
            buffer_size: 8192,
        }
    }
}

/// Statistics for one input file, included in the stats report
#[derive(Debug, Clone, Serialize)]
pub struct ReadStats {
    pub file_path: String,
    pub lines_read: u64,
    pub bytes_read: u64,
    pub duration_ms: u64,
    pub read_error: Option<String>,
}

impl ReadStats {
    fn failed(path: &Path, lines_read: u64, bytes_read: u64, duration_ms: u64, error: String) -> Self {
        Self {
            file_path: path.display().to_string(),
            lines_read,
            bytes_read,
            duration_ms,
            read_error: Some(error),
        }
    }
}

/// Async reader for tables and resource files
pub struct AsyncFileReader {
    config: ReaderConfig,
}

impl AsyncFileReader {
    pub fn new(config: ReaderConfig) -> Self {
        Self { config }
    }

    /// Read a whole file line by line and return it newline-joined,
    /// together with read statistics.
    ///
    /// Lines are decoded one at a time, so a decoding error names the line.
    pub async fn read_text<P: AsRef<Path>>(&self, file_path: P) -> Result<(String, ReadStats)> {
        let path = file_path.as_ref();
        let start_time = std::time::Instant::now();

        debug!("Starting async read of file: {}", path.display());

        let file = match File::open(path).await {
            Ok(file) => file,
            Err(e) => {
                warn!("Failed to open file {}: {}", path.display(), e);
                if self.config.fail_fast {
                    return Err(e.into());
                }
                let stats = ReadStats::failed(
                    path,
                    0,
                    0,
                    start_time.elapsed().as_millis() as u64,
                    e.to_string(),
                );
                return Ok((String::new(), stats));
            }
        };

        let reader = BufReader::with_capacity(self.config.buffer_size, file);
        let mut lines = reader.lines();
        let mut result_lines = Vec::new();
        let mut line_count = 0u64;
        let mut byte_count = 0u64;

        loop {
            match lines.next_line().await {
                Ok(Some(line)) => {
                    byte_count += line.len() as u64 + 1;
                    line_count += 1;
                    result_lines.push(line);
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(
                        "UTF-8 decoding error in {} at line {}: {}",
                        path.display(),
                        line_count + 1,
                        e
                    );
                    if self.config.fail_fast {
                        return Err(e.into());
                    }
                    let stats = ReadStats::failed(
                        path,
                        line_count,
                        byte_count,
                        start_time.elapsed().as_millis() as u64,
                        e.to_string(),
                    );
                    return Ok((result_lines.join("\n"), stats));
                }
            }
        }

        let stats = ReadStats {
            file_path: path.display().to_string(),
            lines_read: line_count,
            bytes_read: byte_count,
            duration_ms: start_time.elapsed().as_millis() as u64,
            read_error: None,
        };

        info!(
            "Read {}: {} lines, {} bytes in {}ms",
            path.display(),
            line_count,
            byte_count,
            stats.duration_ms
        );
        Ok((result_lines.join("\n"), stats))
    }
}

/// Convenience function for reading a single file with default configuration
pub async fn read_file_async<P: AsRef<Path>>(file_path: P) -> Result<String> {
    let reader = AsyncFileReader::new(ReaderConfig::default());
    let (text, _stats) = reader.read_text(file_path).await?;
    Ok(text)
}

/// Write `contents` to `path` through a sibling temp file and a rename, so
/// readers never observe a half-written table.
pub async fn write_atomic<P: AsRef<Path>>(path: P, contents: &str) -> Result<()> {
    let path = path.as_ref();
    let temp_path = temp_sibling(path);

    let mut file = File::create(&temp_path).await?;
    let written = async {
        file.write_all(contents.as_bytes()).await?;
        file.sync_all().await
    }
    .await;
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path).await;
        return Err(e.into());
    }
    drop(file);

    fs::rename(&temp_path, path).await?;
    debug!("Wrote {} bytes to {}", contents.len(), path.display());
    Ok(())
}

fn temp_sibling(path: &Path) -> PathBuf {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!(".{name}.tmp"))
}
