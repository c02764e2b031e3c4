//! Endpoints file loading.
//!
//! # Format
//! ```text
//! 30                              ← optional interval in seconds
//! https://example.com             ← expects 200
//! http://10.0.0.5:8080/health 204 ← explicit expected code
//! ```

use std::collections::HashSet;
use std::path::Path;
use std::sync::LazyLock;

use regex::Regex;

use crate::config::schema::{EndpointConfig, DEFAULT_EXPECTED_CODE, DEFAULT_INTERVAL_SECS};
use crate::config::ConfigError;

static ENDPOINT_LINE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(https?://[a-zA-Z0-9._-]+(:\d+)?(?:/[^\s]*)?)\s*(\d{3})?$")
        .expect("endpoint pattern is valid")
});

/// Result of parsing an endpoints file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointsFile {
    /// Shared check interval in seconds.
    pub interval_secs: u64,
    /// True when the interval came from the file rather than the default.
    pub interval_from_file: bool,
    /// Valid, de-duplicated endpoints in file order.
    pub endpoints: Vec<EndpointConfig>,
    /// Lines that did not match the endpoint format.
    pub rejected: Vec<String>,
    /// URLs that appeared more than once (later copies are dropped).
    pub duplicates: Vec<String>,
}

/// Parse a single endpoint line. Returns `None` if it is malformed.
pub fn parse_endpoint_line(line: &str) -> Option<EndpointConfig> {
    let caps = ENDPOINT_LINE.captures(line)?;
    let url = caps.get(1)?.as_str().to_string();
    let expected_code = caps
        .get(3)
        .map_or(DEFAULT_EXPECTED_CODE, |m| m.as_str())
        .to_string();
    Some(EndpointConfig { url, expected_code })
}

/// Parse the full contents of an endpoints file.
pub fn parse_endpoints(content: &str) -> EndpointsFile {
    let mut lines = content.lines();
    let mut parsed = EndpointsFile {
        interval_secs: DEFAULT_INTERVAL_SECS,
        interval_from_file: false,
        endpoints: Vec::new(),
        rejected: Vec::new(),
        duplicates: Vec::new(),
    };
    let mut seen = HashSet::new();

    let mut first = lines.next();
    if let Some(line) = first {
        match line.parse::<i64>() {
            Ok(secs) if secs > 0 => {
                tracing::info!(interval_secs = secs, "Wait time is {} seconds", secs);
                parsed.interval_secs = secs as u64;
                parsed.interval_from_file = true;
                first = None;
            }
            Ok(secs) => {
                tracing::warn!(
                    interval_secs = secs,
                    "Wait time must be positive. Set to default {} seconds",
                    DEFAULT_INTERVAL_SECS
                );
                first = None;
            }
            Err(_) => {
                tracing::warn!(
                    "Wait time not found. Set to default {} seconds",
                    DEFAULT_INTERVAL_SECS
                );
            }
        }
    }

    for line in first.into_iter().chain(lines) {
        if line.is_empty() {
            continue;
        }
        match parse_endpoint_line(line) {
            Some(endpoint) if seen.insert(endpoint.url.clone()) => parsed.endpoints.push(endpoint),
            Some(endpoint) => {
                tracing::warn!(url = %endpoint.url, "Duplicate endpoint ignored");
                parsed.duplicates.push(endpoint.url);
            }
            None => {
                tracing::warn!(line = %line, "{} line is incorrect!", line);
                parsed.rejected.push(line.to_string());
            }
        }
    }

    parsed
}

/// Read and parse the endpoints file.
///
/// A missing file is created empty and reported as [`ConfigError::Created`]
/// so the caller can tell the user to fill it in.
pub fn load_endpoints(path: &Path) -> Result<EndpointsFile, ConfigError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            std::fs::File::create(path).map_err(|source| ConfigError::Create {
                path: path.to_path_buf(),
                source,
            })?;
            return Err(ConfigError::Created(path.to_path_buf()));
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };

    Ok(parse_endpoints(&content))
}
