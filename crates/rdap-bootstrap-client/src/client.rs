//! Bootstrap registry client.
//!
//! Fetches the bootstrap registry files over HTTP and keeps them fresh
//! according to the state reported by a [`RegistryCache`].

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;

use parking_lot::RwLock;
use rdap_bootstrap::{
    Answer, BootstrapError, FileState, Logger, MemoryCache, NoopLogger, Registry, RegistryCache,
    RegistryType,
};
use reqwest::StatusCode;
use url::Url;

use crate::config::ClientConfig;
use crate::error::ClientError;

/// Client that downloads, caches and queries bootstrap registries.
///
/// Registries are built lazily on the first lookup of each type and shared
/// by concurrent lookups.
#[derive(Debug)]
pub struct Client {
    config: ClientConfig,
    base_url: Url,
    http: reqwest::Client,
    cache: Arc<dyn RegistryCache>,
    logger: Arc<dyn Logger>,
    dns_overrides: HashMap<String, Url>,
    registries: RwLock<HashMap<RegistryType, Arc<dyn Registry>>>,
    downloaded_at: RwLock<HashMap<RegistryType, Instant>>,
}

impl Client {
    /// Creates a new client with the given configuration.
    ///
    /// The client starts with an in-memory cache whose timeout is
    /// `config.cache_timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid or the HTTP client
    /// cannot be created.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use rdap_bootstrap::RegistryType;
    /// use rdap_bootstrap_client::{Client, ClientConfig};
    ///
    /// # async fn run() -> Result<(), rdap_bootstrap_client::ClientError> {
    /// let client = Client::new(ClientConfig::default())?;
    /// let answer = client.lookup(RegistryType::Dns, "example.br").await?;
    /// for url in &answer.urls {
    ///     println!("{url}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        let base_url = Self::parse_base_url(&config.base_url)?;

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(&config.user_agent)
            .build()?;

        let cache = MemoryCache::new();
        cache.set_timeout(config.cache_timeout);

        Ok(Self {
            config,
            base_url,
            http,
            cache: Arc::new(cache),
            logger: Arc::new(NoopLogger),
            dns_overrides: HashMap::new(),
            registries: RwLock::new(HashMap::new()),
            downloaded_at: RwLock::new(HashMap::new()),
        })
    }

    /// Uses the given cache instead of the default in-memory one.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<dyn RegistryCache>) -> Self {
        self.cache = cache;
        self
    }

    /// Sets the logger that receives verbose progress messages.
    #[must_use]
    pub fn with_logger(mut self, logger: Arc<dyn Logger>) -> Self {
        self.logger = logger;
        self
    }

    /// Sets RDAP server overrides applied to every DNS registry the client
    /// builds.
    #[must_use]
    pub fn with_dns_overrides(mut self, overrides: HashMap<String, Url>) -> Self {
        self.dns_overrides = overrides;
        self
    }

    /// Returns the client configuration.
    #[must_use]
    pub const fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Returns the cache in use.
    #[must_use]
    pub fn cache(&self) -> &dyn RegistryCache {
        self.cache.as_ref()
    }

    /// Returns the URL a registry file is downloaded from.
    ///
    /// # Errors
    ///
    /// Returns an error if the file name cannot be joined to the base URL.
    pub fn file_url(&self, registry: RegistryType) -> Result<Url, ClientError> {
        self.base_url
            .join(registry.filename())
            .map_err(|source| ClientError::InvalidUrl {
                url: format!("{}{}", self.base_url, registry.filename()),
                source,
            })
    }

    /// Returns the registry currently held for `registry`, if any.
    #[must_use]
    pub fn registry(&self, registry: RegistryType) -> Option<Arc<dyn Registry>> {
        self.registries.read().get(&registry).cloned()
    }

    /// Returns the cache state of the registry's file.
    #[must_use]
    pub fn state(&self, registry: RegistryType) -> FileState {
        self.cache.state(registry.filename())
    }

    /// Downloads a registry file, replacing the held registry.
    ///
    /// The document is parsed before it is saved, so a failed or invalid
    /// download never replaces a cached copy.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the server does not answer
    /// 200 OK, or the document is not a valid registry. A failure to save
    /// is only logged; the download then stays fresh in memory for the
    /// configured cache timeout.
    pub async fn download(&self, registry: RegistryType) -> Result<Arc<dyn Registry>, ClientError> {
        let url = self.file_url(registry)?;
        self.logger
            .log(format_args!("bootstrap: downloading {registry} registry from {url}"));

        let response = self.http.get(url.clone()).send().await?;

        if response.status() != StatusCode::OK {
            return Err(ClientError::Status {
                url: url.to_string(),
                status: response.status().as_u16(),
            });
        }

        let json = response.bytes().await?;
        let parsed = self.build(registry, &json)?;

        if let Err(e) = self.cache.save(registry.filename(), &json) {
            tracing::warn!(%registry, error = %e, "Failed to cache bootstrap registry");
        }

        self.registries.write().insert(registry, Arc::clone(&parsed));
        self.downloaded_at.write().insert(registry, Instant::now());

        tracing::info!(
            %registry,
            %url,
            entries = parsed.file().entries.len(),
            "Downloaded bootstrap registry"
        );

        Ok(parsed)
    }

    /// Looks up the RDAP servers for `query` in the `registry` registry.
    ///
    /// Reloads the registry from the cache when the cache holds a newer
    /// version, and downloads it when nothing usable is cached or the
    /// cached copy has expired or vanished. If such a refresh fails while a
    /// registry is already held, the held copy is used.
    ///
    /// # Errors
    ///
    /// Returns an error if no registry is held or cached and the download
    /// fails.
    pub async fn lookup(&self, registry: RegistryType, query: &str) -> Result<Answer, ClientError> {
        let current = self.fresh_registry(registry).await?;
        let answer = current.lookup(query);

        self.logger.log(format_args!(
            "bootstrap: {registry} lookup of {query:?} matched entry {:?} with {} URL(s)",
            answer.entry,
            answer.urls.len()
        ));

        Ok(answer)
    }

    async fn fresh_registry(&self, registry: RegistryType) -> Result<Arc<dyn Registry>, ClientError> {
        let state = self.cache.state(registry.filename());
        let mut current = self.registry(registry);

        self.logger
            .log(format_args!("bootstrap: {} is {state}", registry.filename()));

        let reload = match state {
            FileState::ShouldReload => true,
            FileState::Good | FileState::Expired => current.is_none(),
            FileState::Absent => false,
        };

        if reload {
            match self.reload_from_cache(registry) {
                Ok(reloaded) => current = Some(reloaded),
                Err(e) => {
                    tracing::warn!(%registry, error = %e, "Failed to reload bootstrap registry from cache");
                }
            }
        }

        match current {
            None => self.download(registry).await,
            Some(held) if self.needs_refresh(registry, state) => {
                match self.download(registry).await {
                    Ok(fresh) => Ok(fresh),
                    Err(e) => {
                        tracing::warn!(
                            %registry,
                            error = %e,
                            "Failed to refresh bootstrap registry, using held copy"
                        );
                        Ok(held)
                    }
                }
            }
            Some(current) => Ok(current),
        }
    }

    /// An `Absent` file with a held registry means the cache could not keep
    /// the last download; that download stays fresh for `cache_timeout`.
    fn needs_refresh(&self, registry: RegistryType, state: FileState) -> bool {
        match state {
            FileState::Expired => true,
            FileState::Absent => !self
                .downloaded_at
                .read()
                .get(&registry)
                .is_some_and(|at| at.elapsed() <= self.config.cache_timeout),
            FileState::Good | FileState::ShouldReload => false,
        }
    }

    fn reload_from_cache(&self, registry: RegistryType) -> Result<Arc<dyn Registry>, ClientError> {
        let json = self.cache.load(registry.filename())?;
        let parsed = self.build(registry, &json)?;

        self.logger
            .log(format_args!("bootstrap: reloaded {} from cache", registry.filename()));
        self.registries.write().insert(registry, Arc::clone(&parsed));

        Ok(parsed)
    }

    fn build(&self, registry: RegistryType, json: &[u8]) -> Result<Arc<dyn Registry>, BootstrapError> {
        let no_overrides = HashMap::new();
        let overrides = match registry {
            RegistryType::Dns => &self.dns_overrides,
            RegistryType::Asn | RegistryType::Ipv4 | RegistryType::Ipv6 => &no_overrides,
        };

        registry.build(json, overrides).map(Arc::from)
    }

    fn parse_base_url(raw: &str) -> Result<Url, ClientError> {
        let with_slash = if raw.ends_with('/') {
            raw.to_string()
        } else {
            format!("{raw}/")
        };

        Url::parse(&with_slash).map_err(|source| ClientError::InvalidUrl {
            url: raw.to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_creation() {
        let client = Client::new(ClientConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_invalid_base_url() {
        let err = Client::new(ClientConfig::new("not a url")).unwrap_err();
        assert!(matches!(err, ClientError::InvalidUrl { .. }));
    }

    #[test]
    fn test_file_url() {
        let client = Client::new(ClientConfig::default()).unwrap();
        assert_eq!(
            client.file_url(RegistryType::Dns).unwrap().as_str(),
            "https://data.iana.org/rdap/dns.json"
        );
    }

    #[test]
    fn test_file_url_without_trailing_slash() {
        let client = Client::new(ClientConfig::new("https://mirror.example/rdap")).unwrap();
        assert_eq!(
            client.file_url(RegistryType::Ipv6).unwrap().as_str(),
            "https://mirror.example/rdap/ipv6.json"
        );
    }

    #[test]
    fn test_default_cache_uses_configured_timeout() {
        let config = ClientConfig::default().with_cache_timeout(std::time::Duration::ZERO);
        let client = Client::new(config).unwrap();

        client.cache().save("dns.json", b"{}").unwrap();
        std::thread::sleep(std::time::Duration::from_millis(5));

        assert_eq!(client.state(RegistryType::Dns), FileState::Expired);
        assert_eq!(client.state(RegistryType::Asn), FileState::Absent);
    }

    #[test]
    fn test_nothing_held_initially() {
        let client = Client::new(ClientConfig::default()).unwrap();
        for registry in RegistryType::ALL {
            assert!(client.registry(registry).is_none());
        }
    }
}
