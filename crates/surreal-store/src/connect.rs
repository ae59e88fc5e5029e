use crate::connection_string::ConnectionString;
use crate::store::SurrealConnection;
use ingest_core::StoreError;
use std::time::Duration;

/// Default number of connection retry attempts
const DEFAULT_RETRY_ATTEMPTS: u32 = 5;
/// Default delay between retry attempts in seconds
const DEFAULT_RETRY_DELAY_SECS: u64 = 2;

pub async fn connect(
    connection_string: &str,
    ns: &str,
    db: &str,
) -> Result<SurrealConnection, StoreError> {
    connect_with_retries(
        connection_string,
        ns,
        db,
        DEFAULT_RETRY_ATTEMPTS,
        DEFAULT_RETRY_DELAY_SECS,
    )
    .await
}

/// Connect to SurrealDB with configurable retries.
///
/// Malformed connection strings and unsupported auth schemes fail at once;
/// only the network connection and sign-in are retried.
pub async fn connect_with_retries(
    connection_string: &str,
    ns: &str,
    db: &str,
    max_retries: u32,
    retry_delay_secs: u64,
) -> Result<SurrealConnection, StoreError> {
    let cs = ConnectionString::parse(connection_string)?;
    match cs.auth.as_deref() {
        None | Some("basic") => {}
        Some(other) => {
            return Err(StoreError::Connection(format!(
                "unsupported auth scheme '{other}'"
            )))
        }
    }

    let endpoint = cs.endpoint();
    tracing::debug!(
        "Connecting to SurrealDB at {} (namespace: {}, database: {})",
        endpoint,
        ns,
        db
    );

    let mut last_error = None;

    for attempt in 1..=max_retries.max(1) {
        match try_connect(&endpoint, &cs, ns, db).await {
            Ok(surreal) => {
                if attempt > 1 {
                    tracing::info!(
                        "Successfully connected to SurrealDB after {} attempts",
                        attempt
                    );
                }
                return Ok(SurrealConnection::new(surreal));
            }
            Err(e) => {
                if attempt < max_retries {
                    tracing::warn!(
                        "Failed to connect to SurrealDB at '{}' (attempt {}/{}): {}. Retrying in {}s...",
                        endpoint,
                        attempt,
                        max_retries,
                        e,
                        retry_delay_secs
                    );
                    tokio::time::sleep(Duration::from_secs(retry_delay_secs)).await;
                }
                last_error = Some(e);
            }
        }
    }

    Err(StoreError::Connection(format!(
        "failed to connect to '{}' after {} attempts: {}",
        endpoint,
        max_retries,
        last_error.map(|e| e.to_string()).unwrap_or_default()
    )))
}

/// Attempt a single connection to SurrealDB.
async fn try_connect(
    endpoint: &str,
    cs: &ConnectionString,
    ns: &str,
    db: &str,
) -> Result<surrealdb::Surreal<surrealdb::engine::any::Any>, StoreError> {
    let surreal = surrealdb::engine::any::connect(endpoint)
        .await
        .map_err(|e| StoreError::Connection(format!("connection to '{endpoint}' failed: {e}")))?;

    if !cs.is_embedded() {
        let username = cs.user.as_deref().unwrap_or_default();
        surreal
            .signin(surrealdb::opt::auth::Root {
                username,
                password: cs.password.as_deref().unwrap_or_default(),
            })
            .await
            .map_err(|e| {
                StoreError::Connection(format!("authentication failed (user: '{username}'): {e}"))
            })?;
    }

    surreal.use_ns(ns).use_db(db).await.map_err(|e| {
        StoreError::Connection(format!(
            "failed to select namespace '{ns}' / database '{db}': {e}"
        ))
    })?;

    // Stores are looked up with INFO FOR DB, which needs the database to exist.
    if let Err(e) = surreal
        .query(format!(
            "DEFINE NAMESPACE IF NOT EXISTS `{ns}`; DEFINE DATABASE IF NOT EXISTS `{db}`;"
        ))
        .await
        .and_then(|response| response.check())
    {
        tracing::warn!("Could not define namespace '{ns}' / database '{db}': {e}");
    }

    Ok(surreal)
}
