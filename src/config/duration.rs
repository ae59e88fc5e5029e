//! Duration parsing utilities.

use ingest_core::ConfigError;
use std::time::Duration;

/// Parse a duration string like "1h", "30m", "300s", "300" into a [`Duration`].
/// Supports:
/// - Plain numbers (interpreted as seconds): "300"
/// - Seconds suffix: "300s"
/// - Minutes suffix: "30m"
/// - Hours suffix: "1h"
///
/// Zero means "no timeout" to callers, so it parses successfully.
pub fn parse_duration(s: &str) -> Result<Duration, ConfigError> {
    let s = s.trim();
    if s.is_empty() {
        return Err(invalid(s, "empty duration string"));
    }

    // Check for suffix
    if let Some(num_str) = s.strip_suffix('h') {
        let hours = parse_count(s, num_str, "hours")?;
        return Ok(Duration::from_secs(hours.saturating_mul(3600)));
    }
    if let Some(num_str) = s.strip_suffix('m') {
        let minutes = parse_count(s, num_str, "minutes")?;
        return Ok(Duration::from_secs(minutes.saturating_mul(60)));
    }
    if let Some(num_str) = s.strip_suffix('s') {
        let secs = parse_count(s, num_str, "seconds")?;
        return Ok(Duration::from_secs(secs));
    }

    // No suffix - treat as seconds
    parse_count(s, s, "duration").map(Duration::from_secs)
}

fn parse_count(full: &str, num_str: &str, unit: &str) -> Result<u64, ConfigError> {
    num_str
        .parse::<u64>()
        .map_err(|e| invalid(full, &format!("invalid {unit} value '{num_str}': {e}")))
}

fn invalid(value: &str, reason: &str) -> ConfigError {
    ConfigError::InvalidDuration {
        value: value.to_string(),
        reason: reason.to_string(),
    }
}
