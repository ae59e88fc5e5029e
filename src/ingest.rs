//! Pipeline wiring: origin, source, mapper, batch loader, store.
//!
//! Every entry point takes the connection by value and closes it before
//! returning, whether the run succeeded or not. JSON input is decoded in full
//! before the store is opened, so malformed input never creates a store.

use anyhow::Context;
use ingest_core::{
    open_or_create, BatchLoader, IdSynthesizer, IngestCounters, LoaderOptions, LogProgress,
    ProgressReporter, StoreConnection, PROGRESS_INTERVAL,
};
use ingest_csv_source::{DelimitedMapper, DelimitedOptions, DelimitedSource};
use ingest_file::Origin;
use ingest_json_source::{JsonMapper, JsonRecords};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// One ingestion run: which input and in which format.
#[derive(Debug, Clone)]
pub enum Job {
    Delimited {
        origin: Origin,
        options: DelimitedOptions,
    },
    Json {
        origin: Origin,
    },
}

impl Job {
    pub fn origin(&self) -> &Origin {
        match self {
            Job::Delimited { origin, .. } | Job::Json { origin } => origin,
        }
    }
}

#[derive(Clone)]
pub struct LoadSettings {
    pub insert_timeout: Option<Duration>,
    pub ids: IdSynthesizer,
    /// Receives progress during JSON array runs.
    pub progress: Arc<dyn ProgressReporter>,
}

impl Default for LoadSettings {
    fn default() -> Self {
        Self {
            insert_timeout: None,
            ids: IdSynthesizer::default(),
            progress: Arc::new(LogProgress),
        }
    }
}

impl fmt::Debug for LoadSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadSettings")
            .field("insert_timeout", &self.insert_timeout)
            .field("ids", &self.ids)
            .finish_non_exhaustive()
    }
}

/// Run `job` against the store called `store_name`, then close `connection`.
pub async fn run_job<C: StoreConnection>(
    connection: C,
    store_name: &str,
    job: &Job,
    settings: &LoadSettings,
) -> anyhow::Result<IngestCounters> {
    let result = match job {
        Job::Delimited { origin, options } => {
            load_delimited(&connection, store_name, origin, options, settings).await
        }
        Job::Json { origin } => load_json(&connection, store_name, origin, settings).await,
    };
    if result.is_err() {
        warn!("Ingested 0 documents into {store_name}: run aborted");
    }
    connection.close().await;
    result
}

async fn load_delimited<C: StoreConnection>(
    connection: &C,
    store_name: &str,
    origin: &Origin,
    options: &DelimitedOptions,
    settings: &LoadSettings,
) -> anyhow::Result<IngestCounters> {
    let store = open_or_create(connection, store_name)
        .await
        .with_context(|| format!("Failed to open store '{store_name}'"))?;

    let reader = origin
        .open()
        .await
        .with_context(|| format!("Failed to open input {}", origin.display_name()))?;
    info!("Reading delimited records from {}", origin.display_name());

    let mut source = DelimitedSource::new(reader, options);
    let header = match source.read_header() {
        Ok(Some(header)) => header,
        Ok(None) => {
            warn!("Input {} has no header row", origin.display_name());
            return Ok(IngestCounters::default());
        }
        Err(e) => {
            warn!("Stopping before the first row: {e}");
            return Ok(IngestCounters::default());
        }
    };

    let summary = BatchLoader::new(&store, DelimitedMapper::new(header))
        .with_ids(settings.ids.clone())
        .with_options(LoaderOptions {
            progress_every: None,
            insert_timeout: settings.insert_timeout,
        })
        .with_progress(settings.progress.clone())
        .run(source)
        .await;

    Ok(summary.counters)
}

async fn load_json<C: StoreConnection>(
    connection: &C,
    store_name: &str,
    origin: &Origin,
    settings: &LoadSettings,
) -> anyhow::Result<IngestCounters> {
    let bytes = origin
        .read_all()
        .await
        .with_context(|| format!("Failed to read input {}", origin.display_name()))?;
    let records = ingest_json_source::decode(&bytes)
        .with_context(|| format!("Invalid JSON input from {}", origin.display_name()))?;

    info!(
        "Loading {} JSON records from {}",
        records.len(),
        origin.display_name()
    );
    let progress_every = match &records {
        JsonRecords::Many(_) => Some(PROGRESS_INTERVAL),
        JsonRecords::Single(_) => None,
    };

    let store = open_or_create(connection, store_name)
        .await
        .with_context(|| format!("Failed to open store '{store_name}'"))?;

    let summary = BatchLoader::new(&store, JsonMapper)
        .with_ids(settings.ids.clone())
        .with_options(LoaderOptions {
            progress_every,
            insert_timeout: settings.insert_timeout,
        })
        .with_progress(settings.progress.clone())
        .run(records.into_records())
        .await;

    Ok(summary.counters)
}
