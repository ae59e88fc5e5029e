//! End-to-end pipeline tests against the in-memory store and the embedded
//! SurrealDB engine.

use chrono::{DateTime, TimeZone, Utc};
use ingest_core::{
    Clock, DocumentStore, IdSynthesizer, MemoryConnection, ProgressReporter, StoreConnection,
};
use mapr_ingest::csv::DelimitedOptions;
use mapr_ingest::file::Origin;
use mapr_ingest::{run_job, Job, LoadSettings};
use serde_json::json;
use std::io::Write;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use surreal_store::SurrealConnection;
use tempfile::NamedTempFile;

const STORE: &str = "/apps/people";

struct FrozenClock(DateTime<Utc>);

impl Clock for FrozenClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}

fn frozen_settings() -> LoadSettings {
    let instant = Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap();
    LoadSettings {
        insert_timeout: Some(Duration::from_secs(5)),
        ids: IdSynthesizer::new(Arc::new(FrozenClock(instant))),
        ..LoadSettings::default()
    }
}

/// Advances one millisecond per reading, so every identifier is distinct.
struct SteppingClock(AtomicI64);

impl Clock for SteppingClock {
    fn now(&self) -> DateTime<Utc> {
        let step = self.0.fetch_add(1, Ordering::SeqCst);
        Utc::now() + chrono::Duration::milliseconds(step)
    }
}

fn stepping_settings() -> LoadSettings {
    LoadSettings {
        insert_timeout: Some(Duration::from_secs(5)),
        ids: IdSynthesizer::new(Arc::new(SteppingClock(AtomicI64::new(0)))),
        ..LoadSettings::default()
    }
}

#[derive(Default)]
struct RecordingProgress(Mutex<Vec<u64>>);

impl ProgressReporter for RecordingProgress {
    fn report(&self, succeeded: u64) {
        self.0.lock().unwrap().push(succeeded);
    }
}

impl RecordingProgress {
    fn reports(&self) -> Vec<u64> {
        self.0.lock().unwrap().clone()
    }
}

fn recording_settings() -> (LoadSettings, Arc<RecordingProgress>) {
    let progress = Arc::new(RecordingProgress::default());
    let settings = LoadSettings {
        progress: progress.clone(),
        ..stepping_settings()
    };
    (settings, progress)
}

const FROZEN_TS: &str = "2024-03-01 12:00:00.000000000 +0000 UTC";

fn input_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

fn delimited_job(file: &NamedTempFile) -> Job {
    Job::Delimited {
        origin: Origin::Local(file.path().to_path_buf()),
        options: DelimitedOptions::default(),
    }
}

fn json_job(file: &NamedTempFile) -> Job {
    Job::Json {
        origin: Origin::Local(file.path().to_path_buf()),
    }
}

async fn embedded_surreal() -> SurrealConnection {
    surreal_store::connect_with_retries(
        "mem://?auth=basic;user=root;password=root;ssl=false",
        "mapr",
        "ingest",
        1,
        0,
    )
    .await
    .unwrap()
}

#[tokio::test]
async fn test_delimited_rows_become_documents() {
    let file = input_file("id,name,age\n1,Alice,30\n2,Bob,25\n");
    let connection = MemoryConnection::new();

    let counters = run_job(
        connection.clone(),
        STORE,
        &delimited_job(&file),
        &frozen_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.attempted, 2);
    assert_eq!(counters.succeeded, 2);
    assert!(connection.is_closed());

    let docs = connection.documents(STORE);
    assert_eq!(docs.len(), 2);
    assert_eq!(docs[0].id(), Some(format!("1_{FROZEN_TS}").as_str()));
    assert_eq!(docs[0].get_str("name"), Some("Alice"));
    assert_eq!(docs[0].get_str("age"), Some("30"));
    assert_eq!(docs[1].id(), Some(format!("2_{FROZEN_TS}").as_str()));
    assert_eq!(docs[1].get_str("name"), Some("Bob"));
    assert_eq!(docs[1].get_str("age"), Some("25"));
}

#[tokio::test]
async fn test_comment_lines_and_long_rows() {
    let file = input_file("# export\nid,name\n1,Alice\n2,Bob,extra\n3,Carol\n");
    let connection = MemoryConnection::new();

    let counters = run_job(
        connection.clone(),
        STORE,
        &delimited_job(&file),
        &frozen_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.attempted, 2);
    assert_eq!(counters.succeeded, 2);
    assert_eq!(counters.skipped, 1);
    assert!(!counters.is_clean());

    let names: Vec<_> = connection
        .documents(STORE)
        .iter()
        .filter_map(|d| d.get_str("name").map(str::to_string))
        .collect();
    assert_eq!(names, vec!["Alice", "Carol"]);
}

#[tokio::test]
async fn test_header_only_input_loads_nothing() {
    let file = input_file("id,name\n");
    let connection = MemoryConnection::new();

    let counters = run_job(
        connection.clone(),
        STORE,
        &delimited_job(&file),
        &frozen_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.attempted, 0);
    assert_eq!(connection.store_names(), vec![STORE.to_string()]);
    assert!(connection.is_closed());
}

#[tokio::test]
async fn test_json_array_loads_every_object() {
    let file = input_file(r#"[{"a":1},{"a":2},{"a":3}]"#);
    let connection = MemoryConnection::new();

    let counters = run_job(
        connection.clone(),
        STORE,
        &json_job(&file),
        &stepping_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.attempted, 3);
    assert_eq!(counters.succeeded, 3);

    let mut values: Vec<_> = connection
        .documents(STORE)
        .iter()
        .filter_map(|d| d.get("a").cloned())
        .collect();
    values.sort_by_key(|v| v.as_i64());
    assert_eq!(values, vec![json!(1), json!(2), json!(3)]);
}

#[tokio::test]
async fn test_json_object_keeps_nested_values() {
    let file = input_file(r#"{"name":"x","tags":["a","b"],"meta":{"n":1},"id":"ignored"}"#);
    let connection = MemoryConnection::new();

    let counters = run_job(
        connection.clone(),
        STORE,
        &json_job(&file),
        &frozen_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.succeeded, 1);
    let docs = connection.documents(STORE);
    assert_eq!(docs.len(), 1);
    assert_eq!(docs[0].id(), Some(FROZEN_TS));
    assert_eq!(docs[0].get("tags"), Some(&json!(["a", "b"])));
    assert_eq!(docs[0].get("meta"), Some(&json!({"n": 1})));
}

#[tokio::test]
async fn test_json_timestamp_collision_fails_only_the_duplicate() {
    let file = input_file(r#"[{"a":1},{"a":2}]"#);
    let connection = MemoryConnection::new();

    let counters = run_job(
        connection.clone(),
        STORE,
        &json_job(&file),
        &frozen_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.attempted, 2);
    assert_eq!(counters.succeeded, 1);
    assert_eq!(counters.failed(), 1);
}

#[tokio::test]
async fn test_json_array_reports_progress_every_thousand_documents() {
    let array: Vec<_> = (0..2000).map(|n| json!({ "n": n })).collect();
    let file = input_file(&serde_json::to_string(&array).unwrap());
    let connection = MemoryConnection::new();
    let (settings, progress) = recording_settings();

    let counters = run_job(connection.clone(), STORE, &json_job(&file), &settings)
        .await
        .unwrap();

    assert_eq!(counters.succeeded, 2000);
    assert_eq!(progress.reports(), vec![1000, 2000]);
}

#[tokio::test]
async fn test_single_json_object_reports_no_progress() {
    let file = input_file(r#"{"n":1}"#);
    let (settings, progress) = recording_settings();

    let counters = run_job(MemoryConnection::new(), STORE, &json_job(&file), &settings)
        .await
        .unwrap();

    assert_eq!(counters.succeeded, 1);
    assert!(progress.reports().is_empty());
}

#[tokio::test]
async fn test_delimited_input_reports_no_progress() {
    let mut contents = String::from("id,n\n");
    for n in 0..1500 {
        contents.push_str(&format!("{n},{n}\n"));
    }
    let file = input_file(&contents);
    let (settings, progress) = recording_settings();

    let counters = run_job(
        MemoryConnection::new(),
        STORE,
        &delimited_job(&file),
        &settings,
    )
    .await
    .unwrap();

    assert_eq!(counters.succeeded, 1500);
    assert!(progress.reports().is_empty());
}

#[tokio::test]
async fn test_stray_quote_stops_strict_delimited_run() {
    let file = input_file("id,q\n1,a\"b\n2,\"x\"y\n3,z\n");
    let job = |lazy_quotes| Job::Delimited {
        origin: Origin::Local(file.path().to_path_buf()),
        options: DelimitedOptions {
            lazy_quotes,
            ..DelimitedOptions::default()
        },
    };

    let lazy = MemoryConnection::new();
    let counters = run_job(lazy.clone(), STORE, &job(true), &stepping_settings())
        .await
        .unwrap();
    assert_eq!(counters.succeeded, 3);

    let strict = MemoryConnection::new();
    let counters = run_job(strict.clone(), STORE, &job(false), &stepping_settings())
        .await
        .unwrap();
    assert_eq!(counters.attempted, 0);
    assert!(strict.documents(STORE).is_empty());
    assert!(strict.is_closed());
}

#[tokio::test]
async fn test_invalid_json_aborts_before_any_insert() {
    let file = input_file(r#"{"a":1,"#);
    let connection = MemoryConnection::new();

    let result = run_job(
        connection.clone(),
        STORE,
        &json_job(&file),
        &LoadSettings::default(),
    )
    .await;

    assert!(result.is_err());
    assert!(connection.documents(STORE).is_empty());
    assert!(connection.store_names().is_empty());
    assert!(connection.is_closed());
}

#[tokio::test]
async fn test_unsupported_json_shape_aborts() {
    for input in ["42", r#""text""#, r#"[{"a":1},7]"#] {
        let file = input_file(input);
        let connection = MemoryConnection::new();

        let result = run_job(
            connection.clone(),
            STORE,
            &json_job(&file),
            &LoadSettings::default(),
        )
        .await;

        assert!(result.is_err(), "expected {input} to be rejected");
        assert!(connection.documents(STORE).is_empty());
        assert!(connection.is_closed());
    }
}

#[tokio::test]
async fn test_missing_input_file_is_fatal_and_closes() {
    let connection = MemoryConnection::new();
    let job = Job::Delimited {
        origin: Origin::Local("/definitely/not/here.csv".into()),
        options: DelimitedOptions::default(),
    };

    let result = run_job(connection.clone(), STORE, &job, &frozen_settings()).await;

    assert!(result.is_err());
    assert!(connection.is_closed());
}

#[tokio::test]
async fn test_delimited_into_embedded_surreal() {
    let file = input_file("id,name,age\n1,Alice,30\n2,Bob,25\n");
    let connection = embedded_surreal().await;

    let counters = run_job(
        connection.clone(),
        STORE,
        &delimited_job(&file),
        &frozen_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.succeeded, 2);

    let store = connection.get_store(STORE).await.unwrap();
    assert!(store.exists(&format!("1_{FROZEN_TS}")).await.unwrap());
    assert!(store.exists(&format!("2_{FROZEN_TS}")).await.unwrap());
    assert!(!store.exists(&format!("3_{FROZEN_TS}")).await.unwrap());
}

#[tokio::test]
async fn test_rerun_into_existing_surreal_store() {
    let first = input_file("id,name\n1,Alice\n");
    let second = input_file("id,name\n1,Alice again\n");
    let connection = embedded_surreal().await;

    let counters = run_job(
        connection.clone(),
        STORE,
        &delimited_job(&first),
        &stepping_settings(),
    )
    .await
    .unwrap();
    assert_eq!(counters.succeeded, 1);

    // Same natural key, later timestamp: a new document rather than a conflict
    let counters = run_job(
        connection.clone(),
        STORE,
        &delimited_job(&second),
        &stepping_settings(),
    )
    .await
    .unwrap();
    assert_eq!(counters.succeeded, 1);
}

#[tokio::test]
async fn test_json_array_into_embedded_surreal() {
    let file = input_file(r#"[{"a":1},{"a":2},{"a":3}]"#);
    let connection = embedded_surreal().await;

    let counters = run_job(
        connection.clone(),
        STORE,
        &json_job(&file),
        &stepping_settings(),
    )
    .await
    .unwrap();

    assert_eq!(counters.attempted, 3);
    assert_eq!(counters.succeeded, 3);
}
