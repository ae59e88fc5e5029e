//! Delimited text input for mapr-ingest
//!
//! This crate reads header-led delimited text (CSV and friends) into
//! [`ingest_core::RawRecord::OrderedFields`] rows and maps those rows onto
//! document fields by header position.

mod mapper;
mod source;
mod strict;

pub use mapper::DelimitedMapper;
pub use source::{DelimitedOptions, DelimitedSource};
