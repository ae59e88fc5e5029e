//! Standard input reader implementation

use anyhow::{Context, Result};
use std::io::Read;
use tokio::io::AsyncReadExt;

/// Reads from the process's standard input
pub struct StdinReader;

impl StdinReader {
    /// Streaming reader over stdin
    pub fn open() -> Box<dyn Read + Send> {
        Box::new(std::io::stdin())
    }

    /// Read stdin until end-of-input
    pub async fn read_all() -> Result<Vec<u8>> {
        let mut contents = Vec::new();
        tokio::io::stdin()
            .read_to_end(&mut contents)
            .await
            .context("Failed to read standard input")?;
        tracing::debug!("Read {} bytes from stdin", contents.len());
        Ok(contents)
    }
}
