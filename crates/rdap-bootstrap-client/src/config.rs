//! Configuration types for the bootstrap client.

use std::time::Duration;

use rdap_bootstrap::DEFAULT_TIMEOUT;

/// Default location of the IANA bootstrap registries.
pub const DEFAULT_BASE_URL: &str = "https://data.iana.org/rdap/";

/// Configuration for the bootstrap client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base URL the registry files are fetched from
    /// (default: `https://data.iana.org/rdap/`).
    pub base_url: String,

    /// HTTP request timeout.
    pub timeout: Duration,

    /// User agent string.
    pub user_agent: String,

    /// Freshness window of the default in-memory cache.
    pub cache_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

impl ClientConfig {
    /// Creates a new client configuration with the given base URL.
    ///
    /// # Examples
    ///
    /// ```
    /// use rdap_bootstrap_client::ClientConfig;
    ///
    /// let config = ClientConfig::new("https://rdap.example.net/bootstrap/");
    /// assert_eq!(config.base_url, "https://rdap.example.net/bootstrap/");
    /// ```
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: Duration::from_secs(30),
            user_agent: format!("rdap-bootstrap/{}", env!("CARGO_PKG_VERSION")),
            cache_timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Sets the request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets the freshness window of the default cache.
    #[must_use]
    pub const fn with_cache_timeout(mut self, timeout: Duration) -> Self {
        self.cache_timeout = timeout;
        self
    }
}
