//! Command-line configuration shared by every input format.

mod duration;

pub use duration::parse_duration;

use clap::{ArgAction, Parser};
use ingest_core::ConfigError;
use std::time::Duration;

#[derive(Parser, Clone, Debug)]
pub struct StoreOpts {
    /// The URL of the store, in the form host:port
    #[arg(long = "mapr-url", default_value = "localhost:5678", env = "MAPR_URL")]
    pub mapr_url: String,

    /// Authentication scheme for the store
    #[arg(long, default_value = "basic")]
    pub auth: String,

    /// User name for the store
    #[arg(long, default_value = "mapr", env = "MAPR_USER")]
    pub user: String,

    /// Password for the store
    #[arg(long, default_value = "", env = "MAPR_PASSWORD", hide_env_values = true)]
    pub password: String,

    /// Use SSL when connecting to the store
    #[arg(
        long = "use-ssl",
        default_value_t = false,
        default_missing_value = "true",
        num_args = 0..=1,
        require_equals = true,
        action = ArgAction::Set
    )]
    pub use_ssl: bool,

    /// Name of the store to load documents into; created when missing
    #[arg(long = "mapr-tablename", default_value = "")]
    pub mapr_tablename: String,

    /// Namespace holding the store
    #[arg(long, default_value = "mapr", env = "MAPR_NAMESPACE")]
    pub namespace: String,

    /// Database holding the store
    #[arg(long, default_value = "ingest", env = "MAPR_DATABASE")]
    pub database: String,

    /// Maximum time for a single insert ("30s", "2m", "0" disables)
    #[arg(long, default_value = "30s")]
    pub insert_timeout: String,

    /// Dry run mode - load into an in-process store instead of connecting
    #[arg(long)]
    pub dry_run: bool,

    /// Exit with an error when any record fails to load
    #[arg(long)]
    pub fail_on_errors: bool,
}

impl StoreOpts {
    /// Connection string in the form
    /// `<url>?auth=<auth>;user=<user>;password=<password>;ssl=<bool>`.
    pub fn connection_string(&self) -> Result<String, ConfigError> {
        if self.password.is_empty() {
            return Err(ConfigError::MissingPassword);
        }
        Ok(self.format_connection_string(&self.password))
    }

    /// The connection string with the password masked, for logging.
    pub fn redacted_connection_string(&self) -> String {
        self.format_connection_string("*****")
    }

    fn format_connection_string(&self, password: &str) -> String {
        format!(
            "{}?auth={};user={};password={};ssl={}",
            self.mapr_url, self.auth, self.user, password, self.use_ssl
        )
    }

    pub fn store_name(&self) -> Result<&str, ConfigError> {
        let name = self.mapr_tablename.trim();
        if name.is_empty() {
            return Err(ConfigError::MissingStoreName);
        }
        Ok(name)
    }

    /// Per-insert timeout; `None` when disabled with zero.
    pub fn insert_timeout(&self) -> Result<Option<Duration>, ConfigError> {
        let timeout = parse_duration(&self.insert_timeout)?;
        Ok((!timeout.is_zero()).then_some(timeout))
    }
}
