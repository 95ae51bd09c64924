//! Crawler module for page fetching and link traversal
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching with a shared concurrency cap
//! - HTML parsing and link extraction
//! - The per-seed breadth-first engine
//! - Concurrent supervision of every seed

mod engine;
mod fetcher;
mod parser;
mod supervisor;

pub use engine::{CrawlEngine, QueueItem};
pub use fetcher::{build_http_client, FetchResult, Fetcher, HttpFetcher, DEFAULT_USER_AGENT};
pub use parser::{DiscoveredLink, HtmlLinkExtractor, LinkExtractor, LinkKind};
pub use supervisor::CrawlSupervisor;

use crate::config::CrawlSettings;
use crate::output::CrawlSummary;
use crate::GossamerError;

/// Runs a complete crawl over `seeds`
///
/// This is the main entry point for starting a crawl. It will:
/// 1. Build the shared HTTP client
/// 2. Start one breadth-first engine per seed
/// 3. Stream each newly discovered link to standard output
/// 4. Wait for every seed and log the run summary
///
/// # Returns
///
/// * `Ok(CrawlSummary)` - Every seed was crawled
/// * `Err(GossamerError)` - The client could not be built or a seed was rejected
pub async fn crawl(settings: CrawlSettings, seeds: Vec<String>) -> Result<CrawlSummary, GossamerError> {
    CrawlSupervisor::from_settings(settings)?.run(seeds).await
}
