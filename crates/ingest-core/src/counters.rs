//! Per-run tallies.

use std::fmt;

/// Counts for a single ingestion run, owned by the batch loader.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestCounters {
    /// Records handed to the store.
    pub attempted: u64,
    /// Records the store accepted.
    pub succeeded: u64,
    /// Records rejected by the mapper and never handed to the store.
    pub skipped: u64,
}

impl IngestCounters {
    pub fn failed(&self) -> u64 {
        self.attempted - self.succeeded
    }

    /// True when every record that was read made it into the store.
    pub fn is_clean(&self) -> bool {
        self.failed() == 0 && self.skipped == 0
    }
}

impl fmt::Display for IngestCounters {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} attempted, {} succeeded, {} failed, {} skipped",
            self.attempted,
            self.succeeded,
            self.failed(),
            self.skipped
        )
    }
}
