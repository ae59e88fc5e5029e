//! Core types for the mapr-ingest pipeline.
//!
//! This crate holds everything both input formats share:
//!
//! - [`Document`] - the mutable unit of storage
//! - [`RawRecord`] and [`Header`] - what record sources produce
//! - [`IdSynthesizer`] - timestamp-based document identifiers
//! - [`DocumentStore`] and [`StoreConnection`] - the database boundary
//! - [`BatchLoader`] - the read, map, insert loop and its failure isolation
//! - [`MemoryConnection`] - an in-process store for dry runs and tests
//!
//! ```text
//! ingest-core (this crate)
//!    │
//!    ├─── ingest-csv-source   (delimited source + mapper)
//!    ├─── ingest-json-source  (JSON source + mapper)
//!    └─── surreal-store       (DocumentStore backed by SurrealDB)
//! ```

pub mod counters;
pub mod document;
pub mod error;
pub mod id;
pub mod loader;
pub mod mapper;
pub mod memory;
pub mod record;
pub mod store;

pub use counters::IngestCounters;
pub use document::Document;
pub use error::{ConfigError, DecodeError, MappingError, ShapeError, SourceReadError, StoreError};
pub use id::{Clock, IdSynthesizer, SystemClock, TIMESTAMP_FORMAT};
pub use loader::{
    BatchLoader, LoadSummary, LoaderOptions, LogProgress, ProgressReporter, PROGRESS_INTERVAL,
};
pub use mapper::RecordMapper;
pub use memory::{MemoryConnection, MemoryStore};
pub use record::{Header, RawRecord};
pub use store::{open_or_create, DocumentStore, StoreConnection};
