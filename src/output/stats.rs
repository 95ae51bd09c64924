//! Crawl statistics
//!
//! Each crawl engine produces an `EngineReport`; the supervisor folds them into
//! a `CrawlSummary` logged once every seed has finished.

use crate::state::ItemState;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Counters for one engine's traversal of one seed
#[derive(Debug, Clone, Default)]
pub struct EngineReport {
    /// The seed URL this engine crawled
    pub seed: String,

    /// Queue items by terminal state
    pub items_by_state: HashMap<ItemState, u64>,

    /// Responses received with a status other than 200
    pub non_ok_responses: u64,

    /// Fetches that failed at the transport level
    pub transport_failures: u64,

    /// Links returned by the extractor
    pub links_found: u64,

    /// Links dropped by the scope policy
    pub out_of_scope: u64,

    /// Results this engine emitted first
    pub results_emitted: u64,
}

impl EngineReport {
    /// Creates an empty report for a seed
    pub fn new(seed: &str) -> Self {
        Self {
            seed: seed.to_string(),
            ..Default::default()
        }
    }

    /// Records that a queue item reached a terminal state
    pub fn record(&mut self, state: ItemState) {
        *self.items_by_state.entry(state).or_insert(0) += 1;
    }

    /// Number of items that reached the given state
    pub fn count(&self, state: ItemState) -> u64 {
        self.items_by_state.get(&state).copied().unwrap_or(0)
    }

    /// Number of pages actually requested
    pub fn pages_fetched(&self) -> u64 {
        self.count(ItemState::SkippedByFetchFailure) + self.count(ItemState::LinksExtracted)
    }
}

/// Summary of a whole run across all seeds
#[derive(Debug, Clone)]
pub struct CrawlSummary {
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,

    /// Seeds that were crawled
    pub seeds_crawled: u64,

    /// Seeds rejected before crawling (malformed URLs)
    pub seeds_rejected: u64,

    pub pages_fetched: u64,

    /// Fetched pages that yielded no links, for any reason
    pub fetch_failures: u64,

    /// Responses received with a status other than 200
    pub non_ok_responses: u64,

    /// Fetches that failed at the transport level (timeouts included)
    pub transport_failures: u64,

    pub links_found: u64,
    pub out_of_scope: u64,

    /// Distinct results emitted across all seeds
    pub results_emitted: u64,
}

impl CrawlSummary {
    /// Creates an empty summary for a run that started at `started_at`
    pub fn new(started_at: DateTime<Utc>) -> Self {
        Self {
            started_at,
            finished_at: started_at,
            seeds_crawled: 0,
            seeds_rejected: 0,
            pages_fetched: 0,
            fetch_failures: 0,
            non_ok_responses: 0,
            transport_failures: 0,
            links_found: 0,
            out_of_scope: 0,
            results_emitted: 0,
        }
    }

    /// Folds one engine's report into the summary
    pub fn add_report(&mut self, report: &EngineReport) {
        self.seeds_crawled += 1;
        self.pages_fetched += report.pages_fetched();
        self.fetch_failures += report.count(ItemState::SkippedByFetchFailure);
        self.non_ok_responses += report.non_ok_responses;
        self.transport_failures += report.transport_failures;
        self.links_found += report.links_found;
        self.out_of_scope += report.out_of_scope;
        self.results_emitted += report.results_emitted;
    }

    /// Wall-clock duration of the run in seconds
    pub fn duration_seconds(&self) -> i64 {
        (self.finished_at - self.started_at).num_seconds()
    }

    /// Logs the summary at info level
    pub fn log(&self) {
        tracing::info!(
            "Crawl finished in {}s: {} seeds crawled, {} rejected",
            self.duration_seconds(),
            self.seeds_crawled,
            self.seeds_rejected
        );
        tracing::info!(
            "Pages fetched: {} ({} without links), links found: {}, out of scope: {}, results: {}",
            self.pages_fetched,
            self.fetch_failures,
            self.links_found,
            self.out_of_scope,
            self.results_emitted
        );
        tracing::info!(
            "Fetch failures: {} non-200 responses, {} transport errors",
            self.non_ok_responses,
            self.transport_failures
        );
    }
}
