//! MapR Ingest Library
//!
//! Loads delimited text rows or JSON objects into a document store, one
//! document per record, with failures isolated to the record that caused them.
//!
//! # Crates
//!
//! - `ingest_core` - documents, identifiers, the batch loader and store traits
//! - `ingest_file` - input origins (stdin, local files, HTTP)
//! - `ingest_csv_source` - header-led delimited text
//! - `ingest_json_source` - a JSON object or an array of objects
//! - `surreal_store` - the store backed by SurrealDB
//!
//! # CLI Usage
//!
//! ```bash
//! # Delimited text from a file
//! mapr-ingest csv --filename people.csv --password secret --mapr-tablename /apps/people
//!
//! # Semicolon separated text from stdin
//! cat people.ssv | mapr-ingest csv --separator ';' --password secret --mapr-tablename /apps/people
//!
//! # JSON array from a file, checked against an in-process store first
//! mapr-ingest json people.json --password secret --mapr-tablename /apps/people --dry-run
//! ```

pub mod config;
pub mod ingest;

pub use config::{parse_duration, StoreOpts};
pub use ingest::{run_job, Job, LoadSettings};

// Re-export the pipeline crates for convenience
pub use ingest_csv_source as csv;
pub use ingest_file as file;
pub use ingest_json_source as json;
