//! Crawl supervisor - one concurrent engine per seed
//!
//! All engines share the fetcher (and therefore its concurrency cap), the link
//! extractor and the deduplicator. A seed that cannot be crawled is reported
//! without affecting its siblings.

use crate::config::CrawlSettings;
use crate::crawler::engine::CrawlEngine;
use crate::crawler::fetcher::{Fetcher, HttpFetcher};
use crate::crawler::parser::{HtmlLinkExtractor, LinkExtractor};
use crate::output::{CrawlSummary, Deduplicator};
use crate::GossamerError;
use chrono::Utc;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Runs and awaits one `CrawlEngine` per seed
pub struct CrawlSupervisor {
    settings: Arc<CrawlSettings>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    dedup: Arc<Deduplicator>,
}

impl CrawlSupervisor {
    /// Creates a supervisor from explicit collaborators
    pub fn new(
        settings: CrawlSettings,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        dedup: Arc<Deduplicator>,
    ) -> Self {
        Self {
            settings: Arc::new(settings),
            fetcher,
            extractor,
            dedup,
        }
    }

    /// Creates a supervisor that fetches over HTTP, parses HTML and prints
    /// results to standard output
    pub fn from_settings(settings: CrawlSettings) -> Result<Self, GossamerError> {
        let fetcher = Arc::new(HttpFetcher::new(&settings)?);
        Ok(Self::new(
            settings,
            fetcher,
            Arc::new(HtmlLinkExtractor::new()),
            Arc::new(Deduplicator::stdout()),
        ))
    }

    pub fn settings(&self) -> &CrawlSettings {
        &self.settings
    }

    pub fn deduplicator(&self) -> &Arc<Deduplicator> {
        &self.dedup
    }

    /// Crawls every seed concurrently and waits for all of them
    ///
    /// Seeds that are not absolute URLs with a host are logged and skipped;
    /// the remaining seeds still run to completion.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSummary)` - Every seed was crawled
    /// * `Err(GossamerError)` - The first seed error, returned after all other
    ///   seeds have finished
    pub async fn run(&self, seeds: Vec<String>) -> Result<CrawlSummary, GossamerError> {
        let mut summary = CrawlSummary::new(Utc::now());
        let mut first_error = None;
        let mut tasks = JoinSet::new();

        for seed in seeds {
            let engine = CrawlEngine::new(
                &seed,
                Arc::clone(&self.settings),
                Arc::clone(&self.fetcher),
                Arc::clone(&self.extractor),
                Arc::clone(&self.dedup),
            );

            match engine {
                Ok(engine) => {
                    tracing::debug!("Spawning crawl for {}", seed);
                    tasks.spawn(async move { engine.run().await });
                }
                Err(e) => {
                    tracing::error!("Skipping seed {}: {}", seed, e);
                    summary.seeds_rejected += 1;
                    first_error.get_or_insert(e);
                }
            }
        }

        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(report) => summary.add_report(&report),
                Err(e) => {
                    tracing::error!("Crawl task failed: {}", e);
                    first_error.get_or_insert(GossamerError::Task(e.to_string()));
                }
            }
        }

        summary.finished_at = Utc::now();
        summary.log();

        match first_error {
            Some(e) => Err(e),
            None => Ok(summary),
        }
    }
}
