//! Configuration module for Gossamer
//!
//! Settings come from three layers: built-in defaults, an optional TOML file,
//! and command-line flags, applied in that order.
//!
//! # Example
//!
//! ```no_run
//! use gossamer::config::{load_config, resolve_settings, CliOverrides};
//! use std::path::Path;
//!
//! let file = load_config(Path::new("gossamer.toml")).unwrap();
//! let settings = resolve_settings(Some(file), &CliOverrides::default()).unwrap();
//! println!("Crawler will use max depth: {}", settings.max_depth);
//! ```

mod parser;
mod seeds;
mod types;
mod validation;

// Re-export types
pub use types::{
    CrawlSettings, CrawlerSection, FileConfig, HeaderList, OutputSection, RequestSection,
    DEFAULT_DEPTH, DEFAULT_THREADS,
};

// Re-export parser functions
pub use parser::{load_config, parse_headers, resolve_settings, CliOverrides};
pub use seeds::{read_seeds, SeedInput};
pub use validation::validate;
