//! Gossamer: a scoped breadth-first link crawler
//!
//! This crate crawls outward from one or more seed URLs, extracting hyperlinks,
//! script sources and form targets, keeping only references that fall inside
//! the seed's scope, and streaming each newly discovered reference exactly once.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Gossamer operations
#[derive(Debug, Error)]
pub enum GossamerError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Crawl task failed: {0}")]
    Task(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    #[error("Invalid proxy: {0}")]
    InvalidProxy(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Input must be a valid absolute URL with a host: {0}")]
    MissingHost(String),
}

/// Result type alias for Gossamer operations
pub type Result<T> = std::result::Result<T, GossamerError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::CrawlSettings;
pub use crawler::{CrawlEngine, CrawlSupervisor};
pub use output::{Deduplicator, OutputOptions};
pub use state::ItemState;
pub use url::{extract_hostname, ScopePolicy};
