//! Crawl engine - breadth-first traversal of one seed
//!
//! Each engine owns its queue and visited set. Per dequeued item it:
//! 1. Drops the item if it is too deep or already visited
//! 2. Marks the URL visited, then fetches it
//! 3. Stops unless the response is a 200 with a body
//! 4. Extracts links and filters them through the scope policy
//! 5. Formats and emits each in-scope link through the shared deduplicator
//! 6. Queues each in-scope link one level deeper while within the depth limit
//!
//! The engine ends when its queue is empty. Since the visited set only grows,
//! every URL is fetched at most once and traversal always terminates.

use crate::config::CrawlSettings;
use crate::crawler::fetcher::Fetcher;
use crate::crawler::parser::LinkExtractor;
use crate::output::{format_result, Deduplicator, EngineReport};
use crate::state::ItemState;
use crate::url::{extract_hostname, ScopePolicy};
use crate::GossamerError;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

/// A URL waiting in an engine's queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueueItem {
    pub url: String,
    /// Distance from the seed, which is depth 0
    pub depth: u32,
}

/// Breadth-first crawler for a single seed URL
pub struct CrawlEngine {
    seed: String,
    seed_host: String,
    scope: ScopePolicy,
    settings: Arc<CrawlSettings>,
    fetcher: Arc<dyn Fetcher>,
    extractor: Arc<dyn LinkExtractor>,
    dedup: Arc<Deduplicator>,
}

impl CrawlEngine {
    /// Creates an engine for one seed
    ///
    /// # Arguments
    ///
    /// * `seed` - Absolute starting URL
    /// * `settings` - Resolved crawl settings
    /// * `fetcher` - Transport used for every request
    /// * `extractor` - Document parser producing links
    /// * `dedup` - Result set shared with every other engine
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlEngine)` - Engine ready to run
    /// * `Err(GossamerError)` - The seed is not an absolute URL with a host
    pub fn new(
        seed: &str,
        settings: Arc<CrawlSettings>,
        fetcher: Arc<dyn Fetcher>,
        extractor: Arc<dyn LinkExtractor>,
        dedup: Arc<Deduplicator>,
    ) -> Result<Self, GossamerError> {
        let seed_host = extract_hostname(seed)?;
        let scope =
            ScopePolicy::for_seed(&seed_host, settings.headers.host(), settings.subdomains)?;

        Ok(Self {
            seed: seed.to_string(),
            seed_host,
            scope,
            settings,
            fetcher,
            extractor,
            dedup,
        })
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn seed_host(&self) -> &str {
        &self.seed_host
    }

    pub fn scope(&self) -> &ScopePolicy {
        &self.scope
    }

    /// Runs the traversal to completion
    pub async fn run(&self) -> EngineReport {
        tracing::debug!("Starting crawl of {} (host {})", self.seed, self.seed_host);

        let mut queue = VecDeque::new();
        queue.push_back(QueueItem {
            url: self.seed.clone(),
            depth: 0,
        });
        let mut visited = HashSet::new();
        let mut report = EngineReport::new(&self.seed);

        while let Some(item) = queue.pop_front() {
            let outcome = self
                .process_item(item, &mut queue, &mut visited, &mut report)
                .await;
            report.record(outcome);
        }

        tracing::info!(
            "Finished {}: {} pages fetched, {} new results",
            self.seed,
            report.pages_fetched(),
            report.results_emitted
        );
        for state in ItemState::all_states().into_iter().filter(ItemState::is_terminal) {
            tracing::debug!("{}: {} items {}", self.seed, report.count(state), state);
        }

        report
    }

    /// Processes one dequeued item and returns its terminal state
    async fn process_item(
        &self,
        item: QueueItem,
        queue: &mut VecDeque<QueueItem>,
        visited: &mut HashSet<String>,
        report: &mut EngineReport,
    ) -> ItemState {
        let mut state = ItemState::Queued;
        advance(&mut state, ItemState::Dequeued, &item);

        if item.depth > self.settings.max_depth || visited.contains(&item.url) {
            advance(&mut state, ItemState::SkippedByDepthOrVisited, &item);
            return state;
        }

        // Marked before the fetch so a failing URL is never retried
        visited.insert(item.url.clone());

        let result = self
            .fetcher
            .fetch(&item.url, &self.settings.headers, self.settings.timeout)
            .await;
        advance(&mut state, ItemState::Fetched, &item);

        let body = match result.page_body() {
            Some(body) => body,
            None => {
                if result.is_failed() {
                    report.transport_failures += 1;
                } else if let Some(status) = result.status() {
                    tracing::debug!("{} returned {}, not parsing", item.url, status);
                    if status != 200 {
                        report.non_ok_responses += 1;
                    }
                }
                advance(&mut state, ItemState::SkippedByFetchFailure, &item);
                return state;
            }
        };

        let links = self.extractor.extract(body, &item.url, self.settings.inside);
        report.links_found += links.len() as u64;

        for link in links {
            if !self.scope.is_in_scope(&link.url) {
                report.out_of_scope += 1;
                continue;
            }

            match format_result(&link, &self.settings.output) {
                Ok(formatted) => match self.dedup.emit(formatted) {
                    Ok(true) => report.results_emitted += 1,
                    Ok(false) => {}
                    Err(e) => tracing::warn!("Failed to emit {}: {}", link.url, e),
                },
                Err(e) => tracing::warn!("Failed to format {}: {}", link.url, e),
            }

            // Queued even when already emitted; the visited set prunes repeats
            if item.depth < self.settings.max_depth {
                queue.push_back(QueueItem {
                    url: link.url,
                    depth: item.depth + 1,
                });
            }
        }

        advance(&mut state, ItemState::LinksExtracted, &item);
        state
    }
}

fn advance(state: &mut ItemState, next: ItemState, item: &QueueItem) {
    debug_assert!(
        state.can_transition_to(next),
        "illegal transition {} -> {}",
        state,
        next
    );
    tracing::trace!("[depth {}] {}: {} -> {}", item.depth, item.url, state, next);
    *state = next;
}
