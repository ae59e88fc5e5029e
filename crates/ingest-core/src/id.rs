//! Document identifier synthesis.
//!
//! Identifiers embed the wall-clock time at which the record was processed, so
//! re-ingesting the same input produces new identifiers. Delimited rows prefix
//! the timestamp with their first column; JSON records use the timestamp alone.

use crate::error::MappingError;
use crate::record::RawRecord;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Layout used to render timestamps inside identifiers,
/// e.g. `2019-05-01 12:34:56.123456789 +0000 UTC`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.9f %z UTC";

/// Source of the current time.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// The system wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[derive(Clone)]
pub struct IdSynthesizer {
    clock: Arc<dyn Clock>,
}

impl Default for IdSynthesizer {
    fn default() -> Self {
        Self::new(Arc::new(SystemClock))
    }
}

impl IdSynthesizer {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self { clock }
    }

    /// Current time rendered with [`TIMESTAMP_FORMAT`].
    pub fn timestamp(&self) -> String {
        self.clock.now().format(TIMESTAMP_FORMAT).to_string()
    }

    /// `<key>_<timestamp>`
    pub fn keyed(&self, key: &str) -> String {
        format!("{key}_{}", self.timestamp())
    }

    /// Identifier for `record`.
    ///
    /// Rows use column 0 as the natural key. JSON objects never consult their
    /// own fields, including any `id`-like field.
    pub fn synthesize(&self, record: &RawRecord) -> Result<String, MappingError> {
        match record {
            RawRecord::OrderedFields(fields) => fields
                .first()
                .map(|key| self.keyed(key))
                .ok_or(MappingError::EmptyRow),
            RawRecord::Object(_) => Ok(self.timestamp()),
        }
    }
}

impl std::fmt::Debug for IdSynthesizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IdSynthesizer").finish_non_exhaustive()
    }
}
