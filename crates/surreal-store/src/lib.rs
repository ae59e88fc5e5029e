//! SurrealDB document store.
//!
//! Implements the `ingest-core` store traits on top of the SurrealDB SDK.
//! Each store is a SurrealDB table; each document is a record whose key is
//! the document identifier and whose `fields` object holds the document's
//! fields.
//!
//! The connection is configured from the same connection string the CLI
//! assembles: `<url>?auth=<auth>;user=<user>;password=<password>;ssl=<bool>`.

mod connect;
mod connection_string;
mod store;

pub use connect::{connect, connect_with_retries};
pub use connection_string::ConnectionString;
pub use store::{SurrealConnection, SurrealStore};
