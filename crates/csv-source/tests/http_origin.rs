//! Integration tests for delimited input fetched over HTTP
//!
//! A throwaway axum server serves CSV text; the rows are read through
//! `ingest_file::Origin` and loaded into the in-memory store.

use axum::{
    extract::Path,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Router,
};
use ingest_core::{open_or_create, BatchLoader, MemoryConnection};
use ingest_csv_source::{DelimitedMapper, DelimitedOptions, DelimitedSource};
use ingest_file::Origin;
use tokio::net::TcpListener;
use tower::ServiceBuilder;

/// Test CSV data
const TEST_CSV_DATA: &str = "id,name,age,active
1,Alice,30,true
2,Bob,25,false
3,Charlie,35,true
4,Diana,28,false
5,Eve,32,true";

/// Same rows, semicolon separated and with a comment line
const TEST_SSV_DATA: &str = "# people export
id;name;age
1;Alice;30
2;Bob;25";

async fn serve_csv() -> Response {
    (StatusCode::OK, [("Content-Type", "text/csv")], TEST_CSV_DATA).into_response()
}

async fn serve_with_path(Path(filename): Path<String>) -> Response {
    if filename == "people.ssv" {
        (StatusCode::OK, [("Content-Type", "text/plain")], TEST_SSV_DATA).into_response()
    } else {
        (StatusCode::NOT_FOUND, "File not found").into_response()
    }
}

/// Start a test HTTP server serving delimited files
async fn start_test_server() -> anyhow::Result<(String, tokio::task::JoinHandle<()>)> {
    let app = Router::new()
        .route("/test.csv", get(serve_csv))
        .route("/data/:filename", get(serve_with_path))
        .layer(ServiceBuilder::new());

    // Bind to any available port
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let base_url = format!("http://{addr}");

    let server_handle = tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    Ok((base_url, server_handle))
}

#[tokio::test]
async fn test_csv_http_ingest() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("debug")
        .try_init();

    let (base_url, server_handle) = start_test_server().await.unwrap();
    let origin = Origin::parse(&format!("{base_url}/test.csv"));

    let conn = MemoryConnection::new();
    let store = open_or_create(&conn, "users").await.unwrap();

    let reader = origin.open().await.unwrap();
    let mut source = DelimitedSource::new(reader, &DelimitedOptions::default());
    let header = source.read_header().unwrap().unwrap();
    let summary = BatchLoader::new(&store, DelimitedMapper::new(header))
        .run(source)
        .await;

    assert_eq!(summary.counters.attempted, 5);
    assert_eq!(summary.counters.succeeded, 5);

    let docs = conn.documents("users");
    assert_eq!(docs.len(), 5, "Should have ingested 5 records");
    assert!(docs[0].id().unwrap().starts_with("1_"));
    assert_eq!(docs[0].get_str("name"), Some("Alice"));
    assert_eq!(docs[0].get_str("age"), Some("30"));
    assert_eq!(docs[0].get_str("active"), Some("true"));
    assert!(docs[4].id().unwrap().starts_with("5_"));
    assert_eq!(docs[4].get_str("name"), Some("Eve"));

    server_handle.abort();
}

#[tokio::test]
async fn test_custom_separator_http_ingest() {
    let (base_url, server_handle) = start_test_server().await.unwrap();
    let origin = Origin::parse(&format!("{base_url}/data/people.ssv"));

    let conn = MemoryConnection::new();
    let store = open_or_create(&conn, "people").await.unwrap();

    let reader = origin.open().await.unwrap();
    let options = DelimitedOptions::from_chars(';', '#', true).unwrap();
    let mut source = DelimitedSource::new(reader, &options);
    let header = source.read_header().unwrap().unwrap();
    assert_eq!(header.names(), ["id", "name", "age"]);

    let summary = BatchLoader::new(&store, DelimitedMapper::new(header))
        .run(source)
        .await;

    assert_eq!(summary.counters.succeeded, 2);
    let docs = conn.documents("people");
    assert_eq!(docs[1].get_str("name"), Some("Bob"));

    server_handle.abort();
}

#[tokio::test]
async fn test_missing_http_file_fails_to_open() {
    let (base_url, server_handle) = start_test_server().await.unwrap();
    let origin = Origin::parse(&format!("{base_url}/data/missing.csv"));

    let err = origin.open().await.err().unwrap();
    assert!(err.to_string().contains("404"));

    server_handle.abort();
}
