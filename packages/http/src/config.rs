//! Client configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};

fn default_timeout_ms() -> u64 {
    30_000
}

/// Everything needed to build an [`HttpClient`](crate::HttpClient).
///
/// Deserializable so it can live in a config file:
///
/// ```json
/// { "endpoint": "https://oxygen.example.com", "token": "abc", "timeout_ms": 10000 }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the service. Its path, if any, prefixes every request.
    pub endpoint: String,

    /// Access token sent as the `Authorization` header. Empty means
    /// unauthenticated access to public content only.
    #[serde(default)]
    pub token: String,

    /// Deadline for one exchange in milliseconds. Zero disables it.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Log every request and response, bodies included.
    #[serde(default)]
    pub log_exchanges: bool,
}

impl ClientConfig {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            token: String::new(),
            timeout_ms: default_timeout_ms(),
            log_exchanges: false,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Set the exchange deadline. `None` or a zero duration disables it.
    ///
    /// Stored at millisecond resolution. A non-zero deadline never rounds
    /// down to zero, since zero would disable it.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout_ms = match timeout {
            None => 0,
            Some(t) if t.is_zero() => 0,
            Some(t) => u64::try_from(t.as_millis()).unwrap_or(u64::MAX).max(1),
        };
        self
    }

    pub fn with_exchange_logging(mut self, enabled: bool) -> Self {
        self.log_exchanges = enabled;
        self
    }

    pub fn timeout(&self) -> Option<Duration> {
        match self.timeout_ms {
            0 => None,
            ms => Some(Duration::from_millis(ms)),
        }
    }
}
