//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building the shared HTTP client (proxy, TLS verification, redirects off)
//! - Capping outstanding requests with a semaphore shared by every seed
//! - Turning transport failures into soft results
//! - Enforcing the optional page size limit

use crate::config::{CrawlSettings, HeaderList};
use crate::GossamerError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, Proxy, StatusCode};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;

/// User agent sent unless a `User-Agent` header is configured
pub const DEFAULT_USER_AGENT: &str = concat!("gossamer/", env!("CARGO_PKG_VERSION"));

/// Result of a fetch operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchResult {
    /// The server answered; redirects are returned as-is
    Response {
        /// HTTP status code
        status: u16,
        /// Page body, empty when the body was missing or over the size limit
        body: String,
    },

    /// Timeout, connection error or any other transport failure
    Failed {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// HTTP status code, if the server answered
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Response { status, .. } => Some(*status),
            Self::Failed { .. } => None,
        }
    }

    /// Returns the body only when it should be parsed for links:
    /// status 200 and a non-empty body
    pub fn page_body(&self) -> Option<&str> {
        match self {
            Self::Response { status, body }
                if *status == StatusCode::OK.as_u16() && !body.is_empty() =>
            {
                Some(body)
            }
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed { .. })
    }
}

/// Performs single HTTP GET requests for the crawl engine
///
/// Implementations never return errors: transport problems are logged and
/// reported as `FetchResult::Failed`.
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches `url` once, sending `headers` and honouring `timeout`
    async fn fetch(&self, url: &str, headers: &HeaderList, timeout: Option<Duration>)
        -> FetchResult;
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are never followed. The client negotiates HTTP/2 where the
/// server offers it.
///
/// # Arguments
///
/// * `settings` - The resolved crawl settings
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client (e.g. bad proxy URL)
///
/// # Example
///
/// ```no_run
/// use gossamer::config::CrawlSettings;
/// use gossamer::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlSettings::default()).unwrap();
/// ```
pub fn build_http_client(settings: &CrawlSettings) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(DEFAULT_USER_AGENT)
        .redirect(Policy::none())
        .danger_accept_invalid_certs(settings.insecure)
        .pool_max_idle_per_host(settings.threads)
        .gzip(true)
        .brotli(true);

    if let Some(timeout) = settings.timeout {
        builder = builder.timeout(timeout);
    }

    if let Some(proxy) = &settings.proxy {
        builder = builder.proxy(Proxy::all(proxy.as_str())?);
    }

    builder.build()
}

/// `Fetcher` backed by `reqwest`
///
/// One instance is shared by all crawl tasks so the concurrency cap applies
/// to the whole run.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    permits: Arc<Semaphore>,
    max_body_bytes: Option<usize>,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawl settings
    pub fn new(settings: &CrawlSettings) -> Result<Self, GossamerError> {
        let client = build_http_client(settings)?;
        Ok(Self::with_client(client, settings))
    }

    /// Creates a fetcher around an existing client
    pub fn with_client(client: Client, settings: &CrawlSettings) -> Self {
        Self {
            client,
            permits: Arc::new(Semaphore::new(settings.threads)),
            max_body_bytes: settings
                .max_page_size_kb
                .map(|kb| (kb as usize).saturating_mul(1024)),
        }
    }

    fn exceeds_limit(&self, len: u64) -> bool {
        match self.max_body_bytes {
            Some(limit) => len > limit as u64,
            None => false,
        }
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        headers: &HeaderList,
        timeout: Option<Duration>,
    ) -> FetchResult {
        // Held until the body has been read
        let _permit = match self.permits.acquire().await {
            Ok(permit) => permit,
            Err(e) => {
                tracing::warn!("[error] {}: {}", url, e);
                return FetchResult::Failed {
                    error: e.to_string(),
                };
            }
        };

        let mut request = self.client.get(url);
        for (name, value) in headers.iter() {
            request = request.header(name, value);
        }
        if let Some(timeout) = timeout {
            request = request.timeout(timeout);
        }

        let mut response = match request.send().await {
            Ok(response) => response,
            Err(e) => return transport_failure(url, e),
        };

        let status = response.status().as_u16();

        if response
            .content_length()
            .map_or(false, |len| self.exceeds_limit(len))
        {
            tracing::debug!("Skipping body of {}: over the page size limit", url);
            return FetchResult::Response {
                status,
                body: String::new(),
            };
        }

        if self.max_body_bytes.is_none() {
            return match response.text().await {
                Ok(body) => FetchResult::Response { status, body },
                Err(e) => transport_failure(url, e),
            };
        }

        // No trustworthy length up front, so stop reading once past the limit
        let mut bytes = Vec::new();
        loop {
            match response.chunk().await {
                Ok(Some(chunk)) => {
                    bytes.extend_from_slice(&chunk);
                    if self.exceeds_limit(bytes.len() as u64) {
                        tracing::debug!("Skipping body of {}: over the page size limit", url);
                        return FetchResult::Response {
                            status,
                            body: String::new(),
                        };
                    }
                }
                Ok(None) => break,
                Err(e) => return transport_failure(url, e),
            }
        }

        FetchResult::Response {
            status,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }
}

/// Logs a transport error and converts it into a soft failure
fn transport_failure(url: &str, e: reqwest::Error) -> FetchResult {
    if e.is_timeout() {
        tracing::warn!("[timeout] {}", url);
        FetchResult::Failed {
            error: "Request timeout".to_string(),
        }
    } else {
        tracing::warn!("[error] {}: {}", url, e);
        FetchResult::Failed {
            error: e.to_string(),
        }
    }
}
