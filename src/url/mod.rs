//! URL handling module for Gossamer
//!
//! This module provides hostname extraction, same-origin comparison and the
//! scope policy that decides which discovered references a crawl may follow.

mod domain;
mod scope;

// Re-export main functions
pub use domain::{authority, extract_hostname, host_of, same_origin};
pub use scope::ScopePolicy;
