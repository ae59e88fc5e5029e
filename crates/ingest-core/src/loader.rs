//! The batch loader: pulls records, maps them, assigns identifiers and inserts
//! them one at a time.
//!
//! A source read error ends the run early but keeps what was inserted. Mapping
//! and insert failures are logged, counted, and the loop moves on to the next
//! record. The working document is cleaned after every record whatever the
//! outcome.

use crate::counters::IngestCounters;
use crate::document::Document;
use crate::error::{MappingError, SourceReadError, StoreError};
use crate::id::IdSynthesizer;
use crate::mapper::RecordMapper;
use crate::record::RawRecord;
use crate::store::DocumentStore;
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// Successes between two progress reports in JSON array mode.
pub const PROGRESS_INTERVAL: u64 = 1000;

/// Receives the running success count at every progress interval.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, succeeded: u64);
}

impl<P: ProgressReporter + ?Sized> ProgressReporter for std::sync::Arc<P> {
    fn report(&self, succeeded: u64) {
        (**self).report(succeeded);
    }
}

/// Reports progress through `tracing`.
#[derive(Debug, Default)]
pub struct LogProgress;

impl ProgressReporter for LogProgress {
    fn report(&self, succeeded: u64) {
        info!("Ingested {succeeded} documents");
    }
}

#[derive(Debug, Clone, Default)]
pub struct LoaderOptions {
    /// Emit progress every this many successes. `None` disables progress.
    pub progress_every: Option<u64>,
    /// Upper bound on a single insert.
    pub insert_timeout: Option<Duration>,
}

/// Result of a completed run.
#[derive(Debug)]
pub struct LoadSummary {
    pub counters: IngestCounters,
    /// Set when the source failed before it was exhausted.
    pub stopped_by: Option<SourceReadError>,
}

#[derive(Debug)]
enum RecordFailure {
    Mapping(MappingError),
    Insert { id: String, error: StoreError },
}

pub struct BatchLoader<'a, S: DocumentStore, M: RecordMapper> {
    store: &'a S,
    mapper: M,
    ids: IdSynthesizer,
    options: LoaderOptions,
    progress: Box<dyn ProgressReporter + 'a>,
    document: Document,
    counters: IngestCounters,
}

impl<'a, S: DocumentStore, M: RecordMapper> BatchLoader<'a, S, M> {
    pub fn new(store: &'a S, mapper: M) -> Self {
        Self {
            store,
            mapper,
            ids: IdSynthesizer::default(),
            options: LoaderOptions::default(),
            progress: Box::new(LogProgress),
            document: Document::empty(),
            counters: IngestCounters::default(),
        }
    }

    pub fn with_ids(mut self, ids: IdSynthesizer) -> Self {
        self.ids = ids;
        self
    }

    pub fn with_options(mut self, options: LoaderOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_progress(mut self, progress: impl ProgressReporter + 'a) -> Self {
        self.progress = Box::new(progress);
        self
    }

    /// Drain `records` into the store.
    pub async fn run<I>(mut self, records: I) -> LoadSummary
    where
        I: IntoIterator<Item = Result<RawRecord, SourceReadError>>,
    {
        debug!("Loading into store '{}'", self.store.name());

        let mut stopped_by = None;
        for (position, next) in records.into_iter().enumerate() {
            match next {
                Ok(record) => self.process(position as u64 + 1, &record).await,
                Err(e) => {
                    warn!("Stopping after read error: {e}");
                    stopped_by = Some(e);
                    break;
                }
            }
        }

        LoadSummary {
            counters: self.counters,
            stopped_by,
        }
    }

    async fn process(&mut self, position: u64, record: &RawRecord) {
        let outcome = self.load_one(record).await;
        self.document.clean();

        match outcome {
            Ok(()) => {
                if let Some(every) = self.options.progress_every {
                    if every > 0 && self.counters.succeeded % every == 0 {
                        self.progress.report(self.counters.succeeded);
                    }
                }
            }
            Err(RecordFailure::Mapping(e)) => {
                self.counters.skipped += 1;
                warn!("Skipping record {position}: {e}");
            }
            Err(RecordFailure::Insert { id, error: e }) => {
                error!("Failed to insert record {position} as '{id}': {e}");
            }
        }
    }

    async fn load_one(&mut self, record: &RawRecord) -> Result<(), RecordFailure> {
        self.mapper
            .map(record, &mut self.document)
            .map_err(RecordFailure::Mapping)?;
        let id = self
            .ids
            .synthesize(record)
            .map_err(RecordFailure::Mapping)?;
        self.document.set_id_string(id.clone());

        self.counters.attempted += 1;
        let insert = self.store.insert(&self.document);
        let result = match self.options.insert_timeout {
            Some(timeout) => match tokio::time::timeout(timeout, insert).await {
                Ok(result) => result,
                Err(_) => Err(StoreError::Timeout {
                    id: id.clone(),
                    timeout,
                }),
            },
            None => insert.await,
        };
        result.map_err(|error| RecordFailure::Insert { id, error })?;

        self.counters.succeeded += 1;
        Ok(())
    }
}
