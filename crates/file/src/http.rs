//! HTTP/HTTPS reader implementation

use anyhow::{Context, Result};
use std::io::Read;

/// Reads a file from HTTP/HTTPS
pub struct HttpFileReader;

impl HttpFileReader {
    /// Fetch an HTTP or HTTPS URL and return a sync-compatible reader over the body
    pub async fn open(url: &str) -> Result<Box<dyn Read + Send>> {
        let bytes = Self::fetch(url).await?;
        Ok(Box::new(std::io::Cursor::new(bytes)))
    }

    /// Fetch the full response body
    pub async fn fetch(url: &str) -> Result<Vec<u8>> {
        let response = reqwest::Client::new()
            .get(url)
            .send()
            .await
            .with_context(|| format!("Failed to fetch URL: {url}"))?;

        let status = response.status();
        if !status.is_success() {
            anyhow::bail!("HTTP request failed with status {status} for URL: {url}");
        }

        let bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read response body from: {url}"))?;

        tracing::debug!("Fetched {} bytes from: {}", bytes.len(), url);

        Ok(bytes.to_vec())
    }
}
