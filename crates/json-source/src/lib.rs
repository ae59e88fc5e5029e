//! JSON input for mapr-ingest
//!
//! The whole input is decoded once as a single JSON value. An object becomes
//! one record, an array of objects becomes one record per element. Any other
//! shape is rejected before a single record is produced.

mod decode;
mod mapper;

pub use decode::{decode, JsonInputError, JsonRecords};
pub use mapper::JsonMapper;
