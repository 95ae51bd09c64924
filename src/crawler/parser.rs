//! HTML link extraction
//!
//! This module turns raw markup into absolute outbound references:
//! - `<a href="...">` targets
//! - `<script src="...">` sources
//! - `<form action="...">` targets
//!
//! Results are ordered by kind (all hyperlinks, then scripts, then forms) and
//! by document order within each kind.

use crate::url::same_origin;
use scraper::{Html, Selector};
use std::fmt;
use url::Url;

/// What kind of element a reference came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkKind {
    Href,
    Script,
    Form,
}

impl LinkKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Href => "href",
            Self::Script => "script",
            Self::Form => "form",
        }
    }
}

impl fmt::Display for LinkKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A reference found on a page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiscoveredLink {
    /// Absolute URL of the reference
    pub url: String,

    /// Element the reference came from
    pub kind: LinkKind,

    /// URL of the page it was found on
    pub origin: String,
}

impl DiscoveredLink {
    pub fn new(url: impl Into<String>, kind: LinkKind, origin: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            kind,
            origin: origin.into(),
        }
    }
}

/// Extracts outbound references from a fetched document
///
/// Implementations must not fail: malformed documents yield whatever links
/// could be recovered, possibly none.
pub trait LinkExtractor: Send + Sync {
    /// Extracts references from `body`, resolving them against `base_url`
    ///
    /// # Arguments
    ///
    /// * `body` - Raw document content
    /// * `base_url` - URL the document was fetched from
    /// * `inside` - Drop hyperlinks whose host differs from `base_url`'s host
    fn extract(&self, body: &str, base_url: &str, inside: bool) -> Vec<DiscoveredLink>;
}

/// `LinkExtractor` backed by the `scraper` HTML parser
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlLinkExtractor;

impl HtmlLinkExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl LinkExtractor for HtmlLinkExtractor {
    fn extract(&self, body: &str, base_url: &str, inside: bool) -> Vec<DiscoveredLink> {
        let base = match Url::parse(base_url) {
            Ok(base) => base,
            Err(e) => {
                tracing::debug!("Cannot resolve links against {}: {}", base_url, e);
                return Vec::new();
            }
        };

        let document = Html::parse_document(body);
        let mut links = Vec::new();

        // Hyperlinks, optionally restricted to the page's own host
        if let Ok(selector) = Selector::parse("a[href]") {
            for element in document.select(&selector) {
                if let Some(resolved) = element.value().attr("href").and_then(|h| resolve(&base, h))
                {
                    if inside && !same_origin(&resolved, &base) {
                        continue;
                    }
                    links.push(DiscoveredLink::new(resolved, LinkKind::Href, base_url));
                }
            }
        }

        if let Ok(selector) = Selector::parse("script[src]") {
            for element in document.select(&selector) {
                if let Some(resolved) = element.value().attr("src").and_then(|s| resolve(&base, s)) {
                    links.push(DiscoveredLink::new(resolved, LinkKind::Script, base_url));
                }
            }
        }

        if let Ok(selector) = Selector::parse("form[action]") {
            for element in document.select(&selector) {
                if let Some(resolved) = element
                    .value()
                    .attr("action")
                    .and_then(|a| resolve(&base, a))
                {
                    links.push(DiscoveredLink::new(resolved, LinkKind::Form, base_url));
                }
            }
        }

        links
    }
}

/// Resolves a reference against the page URL
///
/// References that cannot be joined (e.g. `http://[bad`) are dropped.
fn resolve(base: &Url, reference: &str) -> Option<Url> {
    base.join(reference.trim()).ok()
}
