//! Input origins for the ingestion pipeline.
//!
//! An [`Origin`] names where records come from:
//!
//! - **Stdin**: `-` or an empty string
//! - **Local**: any other path on the local filesystem
//! - **HTTP/HTTPS**: `http://` and `https://` URLs
//!
//! Local files and stdin are streamed; HTTP bodies are fetched in full before
//! reading starts.
//!
//! # Example
//!
//! ```ignore
//! use ingest_file::Origin;
//!
//! let origin = Origin::parse("data.csv");
//! let reader = origin.open().await?;
//! // Hand the reader to a record source...
//! ```

mod http;
mod local;
mod stdin;

use anyhow::Result;
use std::io::Read;
use std::path::PathBuf;

pub use http::HttpFileReader;
pub use local::LocalFileReader;
pub use stdin::StdinReader;

/// Where input records are read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Origin {
    /// Standard input
    Stdin,
    /// Local filesystem path
    Local(PathBuf),
    /// HTTP/HTTPS URL
    Http(String),
}

impl Origin {
    /// Parse a string into an Origin, auto-detecting its type
    ///
    /// - `""` or `-` -> Stdin
    /// - `http://` or `https://` -> Http
    /// - Everything else -> Local
    pub fn parse(uri: &str) -> Self {
        if uri.is_empty() || uri == "-" {
            Origin::Stdin
        } else if uri.starts_with("http://") || uri.starts_with("https://") {
            Origin::Http(uri.to_string())
        } else {
            Origin::Local(PathBuf::from(uri))
        }
    }

    /// Origin for an optional path argument; `None` means stdin.
    pub fn from_arg(arg: Option<&std::path::Path>) -> Self {
        match arg {
            Some(path) => Self::parse(&path.to_string_lossy()),
            None => Origin::Stdin,
        }
    }

    /// Open this origin for reading
    pub async fn open(&self) -> Result<Box<dyn Read + Send>> {
        match self {
            Origin::Stdin => Ok(StdinReader::open()),
            Origin::Local(path) => LocalFileReader::open(path).await,
            Origin::Http(url) => HttpFileReader::open(url).await,
        }
    }

    /// Open this origin and read it to the end.
    pub async fn read_all(&self) -> Result<Vec<u8>> {
        match self {
            Origin::Stdin => StdinReader::read_all().await,
            Origin::Local(path) => LocalFileReader::read_all(path).await,
            Origin::Http(url) => HttpFileReader::fetch(url).await,
        }
    }

    /// Get a display name for logging
    pub fn display_name(&self) -> String {
        match self {
            Origin::Stdin => "<stdin>".to_string(),
            Origin::Local(path) => path.display().to_string(),
            Origin::Http(url) => url.clone(),
        }
    }
}
