//! Command-line interface for mapr-ingest
//!
//! # Usage Examples
//!
//! ## Delimited text
//! ```bash
//! # Comma separated file with a header row
//! mapr-ingest csv --filename people.csv \
//!   --mapr-url localhost:5678 --password secret \
//!   --mapr-tablename /apps/people
//!
//! # Tab separated text from stdin, strict quoting requested
//! cat people.tsv | mapr-ingest csv --separator $'\t' --lazyQuotes=false \
//!   --password secret --mapr-tablename /apps/people
//! ```
//!
//! ## JSON
//! ```bash
//! # One object or an array of objects from a file
//! mapr-ingest json people.json --password secret --mapr-tablename /apps/people
//!
//! # From stdin
//! curl -s https://example.com/people.json | mapr-ingest json \
//!   --password secret --mapr-tablename /apps/people
//! ```

use anyhow::Context;
use clap::{ArgAction, Parser, Subcommand};
use ingest_core::{ConfigError, MemoryConnection};
use mapr_ingest::csv::DelimitedOptions;
use mapr_ingest::file::Origin;
use mapr_ingest::{run_job, Job, LoadSettings, StoreOpts};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "mapr-ingest")]
#[command(about = "Load delimited text or JSON records into a document store")]
#[command(long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Load header-led delimited text, one document per row
    Csv {
        /// File to read; "-" or absent reads stdin, http(s) URLs are fetched
        #[arg(long, default_value = "-")]
        filename: String,

        /// Field separator
        #[arg(long, default_value = ",")]
        separator: char,

        /// Lines starting with this character are skipped
        #[arg(long, default_value = "#")]
        comment: char,

        /// Tolerate quotes that are not escaped correctly
        #[arg(
            long = "lazyQuotes",
            default_value_t = true,
            default_missing_value = "true",
            num_args = 0..=1,
            require_equals = true,
            action = ArgAction::Set
        )]
        lazy_quotes: bool,

        /// Target store options
        #[command(flatten)]
        store: StoreOpts,
    },

    /// Load a JSON object or an array of JSON objects
    Json {
        /// File to read; stdin when omitted
        #[arg(value_name = "FILE")]
        files: Vec<PathBuf>,

        /// Target store options
        #[command(flatten)]
        store: StoreOpts,
    },
}

// Rows are read with blocking I/O between inserts, one record in flight at a
// time, so the whole pipeline runs on a single thread.
#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    if let Err(e) = run().await {
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Csv {
            filename,
            separator,
            comment,
            lazy_quotes,
            store,
        } => {
            let options = DelimitedOptions::from_chars(separator, comment, lazy_quotes)?;
            let job = Job::Delimited {
                origin: Origin::parse(&filename),
                options,
            };
            execute(store, job).await
        }
        Commands::Json { files, store } => {
            if files.len() > 1 {
                return Err(ConfigError::TooManyInputs(files.len()).into());
            }
            let job = Job::Json {
                origin: Origin::from_arg(files.first().map(PathBuf::as_path)),
            };
            execute(store, job).await
        }
    }
}

async fn execute(store: StoreOpts, job: Job) -> anyhow::Result<()> {
    // Everything that can be checked locally is checked before connecting
    let connection_string = store.connection_string()?;
    let store_name = store.store_name()?.to_string();
    let settings = LoadSettings {
        insert_timeout: store.insert_timeout()?,
        ..LoadSettings::default()
    };

    let counters = if store.dry_run {
        info!("Dry run: loading into an in-process store");
        run_job(MemoryConnection::new(), &store_name, &job, &settings).await?
    } else {
        info!("Connecting to {}", store.redacted_connection_string());
        let connection =
            surreal_store::connect(&connection_string, &store.namespace, &store.database)
                .await
                .context("Failed to connect to the store")?;
        run_job(connection, &store_name, &job, &settings).await?
    };

    info!("Finished reading {}: {counters}", job.origin().display_name());
    println!(
        "Ingested {} of {} documents into {}",
        counters.succeeded, counters.attempted, store_name
    );

    if store.fail_on_errors && !counters.is_clean() {
        anyhow::bail!(
            "{} of {} attempted records failed and {} were skipped",
            counters.failed(),
            counters.attempted,
            counters.skipped
        );
    }
    Ok(())
}
