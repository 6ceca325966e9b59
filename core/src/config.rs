//! Endpoint and timeout settings.

use std::time::Duration;

/// Public endpoint of the Baby Stats service.
pub const DEFAULT_ENDPOINT: &str = "https://www.babystats.org/api/public";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// The service allows this many requests per `RATE_LIMIT_WINDOW`. The client
/// does not enforce it.
pub const RATE_LIMIT_REQUESTS: u32 = 50;
pub const RATE_LIMIT_WINDOW: Duration = Duration::from_secs(5 * 60);

/// Where requests go and how long a single exchange may take.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub endpoint: String,
    pub timeout: Option<Duration>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Some(DEFAULT_TIMEOUT),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Defaults overridden by `BABYSTATS_ENDPOINT` and `BABYSTATS_TIMEOUT_SECS`.
    ///
    /// A timeout of `0` disables the timeout; an unparsable value keeps the
    /// default.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = match lookup("BABYSTATS_ENDPOINT") {
            Some(endpoint) if !endpoint.trim().is_empty() => Self::new(endpoint.trim()),
            _ => Self::default(),
        };
        if let Some(secs) = lookup("BABYSTATS_TIMEOUT_SECS").and_then(|v| v.trim().parse::<u64>().ok()) {
            config.timeout = (secs > 0).then(|| Duration::from_secs(secs));
        }
        config
    }
}
