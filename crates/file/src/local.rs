//! Local filesystem reader implementation

use anyhow::{Context, Result};
use std::io::Read;
use std::path::Path;

/// Reads a local file
pub struct LocalFileReader;

impl LocalFileReader {
    /// Open a local file and return a streaming, sync-compatible reader
    ///
    /// The file is opened eagerly so that a missing or unreadable path fails
    /// here rather than on the first read.
    pub async fn open(path: &Path) -> Result<Box<dyn Read + Send>> {
        let file = tokio::fs::File::open(path)
            .await
            .with_context(|| format!("Failed to open file: {}", path.display()))?;
        Ok(Box::new(std::io::BufReader::new(file.into_std().await)))
    }

    /// Read the whole file into memory
    pub async fn read_all(path: &Path) -> Result<Vec<u8>> {
        let contents = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        tracing::debug!("Read {} bytes from: {}", contents.len(), path.display());
        Ok(contents)
    }
}
