use ingest_core::StoreError;
use tracing::debug;

/// A parsed `<url>?auth=..;user=..;password=..;ssl=..` connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectionString {
    pub base_url: String,
    pub auth: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub ssl: bool,
}

impl ConnectionString {
    pub fn parse(s: &str) -> Result<Self, StoreError> {
        let (base_url, params) = s.split_once('?').unwrap_or((s, ""));
        if base_url.is_empty() {
            return Err(StoreError::Connection(
                "connection string has no URL".to_string(),
            ));
        }

        let mut parsed = Self {
            base_url: base_url.to_string(),
            auth: None,
            user: None,
            password: None,
            ssl: false,
        };

        for param in params.split(';').filter(|p| !p.is_empty()) {
            let (key, value) = param.split_once('=').ok_or_else(|| {
                StoreError::Connection(format!("malformed connection parameter '{param}'"))
            })?;
            match key {
                "auth" => parsed.auth = Some(value.to_string()),
                "user" => parsed.user = Some(value.to_string()),
                "password" => parsed.password = Some(value.to_string()),
                "ssl" => {
                    parsed.ssl = value.parse().map_err(|_| {
                        StoreError::Connection(format!("ssl must be true or false, got '{value}'"))
                    })?
                }
                other => debug!("Ignoring unknown connection parameter '{other}'"),
            }
        }

        if parsed.password.as_deref().unwrap_or("").is_empty() {
            return Err(StoreError::Connection(
                "connection string has no password".to_string(),
            ));
        }

        Ok(parsed)
    }

    /// True for the embedded in-memory engine, which has no authentication.
    pub fn is_embedded(&self) -> bool {
        self.base_url.starts_with("mem://")
    }

    /// WebSocket endpoint for the SDK.
    ///
    /// `http(s)://` is rewritten to `ws(s)://`; a bare `host:port` gets `ws://`
    /// or `wss://` depending on `ssl`.
    pub fn endpoint(&self) -> String {
        let url = &self.base_url;
        if let Some(rest) = url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if let Some(rest) = url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if url.contains("://") {
            url.clone()
        } else if self.ssl {
            format!("wss://{url}")
        } else {
            format!("ws://{url}")
        }
    }
}
