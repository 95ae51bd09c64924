/// Queue item lifecycle states
///
/// Every item taken off a crawl queue moves through these states exactly once.
use std::fmt;

/// Represents where a queued URL is in its processing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ItemState {
    // ===== Active States =====
    /// Waiting in the queue
    Queued,

    /// Taken off the queue, not yet checked
    Dequeued,

    /// Marked visited and fetched
    Fetched,

    // ===== Terminal States =====
    /// Dropped because it was too deep or already visited
    SkippedByDepthOrVisited,

    /// Fetch failed, returned a non-200 status, or an empty body
    SkippedByFetchFailure,

    /// Links were extracted from the page and processed
    LinksExtracted,
}

impl ItemState {
    /// Returns true if no further processing happens from this state
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::SkippedByDepthOrVisited | Self::SkippedByFetchFailure | Self::LinksExtracted
        )
    }

    /// Checks whether moving from this state to `next` is legal
    ///
    /// ```text
    /// Queued -> Dequeued -> SkippedByDepthOrVisited
    ///                    -> Fetched -> SkippedByFetchFailure
    ///                               -> LinksExtracted
    /// ```
    pub fn can_transition_to(&self, next: ItemState) -> bool {
        matches!(
            (self, next),
            (Self::Queued, Self::Dequeued)
                | (Self::Dequeued, Self::SkippedByDepthOrVisited)
                | (Self::Dequeued, Self::Fetched)
                | (Self::Fetched, Self::SkippedByFetchFailure)
                | (Self::Fetched, Self::LinksExtracted)
        )
    }

    /// Short lowercase name used in log output
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Dequeued => "dequeued",
            Self::Fetched => "fetched",
            Self::SkippedByDepthOrVisited => "skipped_depth_or_visited",
            Self::SkippedByFetchFailure => "skipped_fetch_failure",
            Self::LinksExtracted => "links_extracted",
        }
    }

    /// Returns all possible item states
    pub fn all_states() -> Vec<Self> {
        vec![
            Self::Queued,
            Self::Dequeued,
            Self::Fetched,
            Self::SkippedByDepthOrVisited,
            Self::SkippedByFetchFailure,
            Self::LinksExtracted,
        ]
    }
}

impl fmt::Display for ItemState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
