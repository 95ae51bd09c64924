//! Process-wide deduplication of emitted results
//!
//! One `Deduplicator` is shared by every crawl task. The membership check,
//! insertion and emission happen under a single lock, so a formatted result
//! reaches the sink at most once even when two seeds discover it at the same
//! moment.

use crate::output::traits::{OutputResult, OutputSink, StdoutSink};
use std::collections::HashSet;
use std::sync::{Arc, Mutex, PoisonError};

/// Set of already-emitted results plus the sink they are emitted to
pub struct Deduplicator {
    seen: Mutex<HashSet<String>>,
    sink: Arc<dyn OutputSink>,
}

impl Deduplicator {
    /// Creates a deduplicator emitting to the given sink
    pub fn new(sink: Arc<dyn OutputSink>) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            sink,
        }
    }

    /// Creates a deduplicator emitting to standard output
    pub fn stdout() -> Self {
        Self::new(Arc::new(StdoutSink))
    }

    /// Emits `result` unless an equal result was emitted before
    ///
    /// # Returns
    ///
    /// * `Ok(true)` - The result was new and has been written to the sink
    /// * `Ok(false)` - The result was already emitted; nothing was written
    /// * `Err(OutputError)` - The result was new but the sink failed
    pub fn emit(&self, result: String) -> OutputResult<bool> {
        let mut seen = self.seen.lock().unwrap_or_else(PoisonError::into_inner);
        if seen.contains(&result) {
            return Ok(false);
        }

        // Once recorded the result counts as emitted, even if the write fails
        seen.insert(result.clone());
        self.sink.write_result(&result)?;
        Ok(true)
    }

    /// Number of distinct results emitted so far
    pub fn len(&self) -> usize {
        self.seen.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl std::fmt::Debug for Deduplicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Deduplicator")
            .field("emitted", &self.len())
            .finish()
    }
}
