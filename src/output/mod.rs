//! Output module for rendering and emitting crawl results
//!
//! This module handles:
//! - Formatting discovered links as plain, annotated or JSON lines
//! - Process-wide deduplication of emitted results
//! - Output sinks (stdout, in-memory)
//! - Per-seed and per-run crawl statistics

mod dedup;
mod formatter;
pub mod stats;
mod traits;

pub use dedup::Deduplicator;
pub use formatter::{format_result, OutputOptions};
pub use stats::{CrawlSummary, EngineReport};
pub use traits::{MemorySink, OutputError, OutputResult, OutputSink, StdoutSink};
