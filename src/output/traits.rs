//! Output sink traits and types
//!
//! A sink receives each newly discovered result as soon as the deduplicator
//! accepts it. Results stream out one per line; nothing is batched.

use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Failed to format output: {0}")]
    Format(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;

/// Destination for emitted results
///
/// Implementations must be thread-safe; every crawl task writes to the same
/// sink through the shared deduplicator.
pub trait OutputSink: Send + Sync {
    /// Writes one formatted result
    fn write_result(&self, result: &str) -> OutputResult<()>;
}

/// Writes each result as a line on standard output
#[derive(Debug, Default, Clone, Copy)]
pub struct StdoutSink;

impl OutputSink for StdoutSink {
    fn write_result(&self, result: &str) -> OutputResult<()> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        writeln!(out, "{}", result)?;
        out.flush()?;
        Ok(())
    }
}

/// Collects results in memory, in emission order
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<String>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of everything written so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl OutputSink for MemorySink {
    fn write_result(&self, result: &str) -> OutputResult<()> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(result.to_string());
        Ok(())
    }
}
