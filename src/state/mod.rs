//! State module for tracking crawl progress
//!
//! `ItemState` describes the lifecycle of a single queued URL inside a crawl
//! engine, from being queued to one of its terminal outcomes.

mod item_state;

pub use item_state::ItemState;
