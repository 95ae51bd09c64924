use crate::output::OutputOptions;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Duration;

/// Default maximum traversal depth
pub const DEFAULT_DEPTH: u32 = 2;

/// Default size of the fetch concurrency pool
pub const DEFAULT_THREADS: usize = 8;

/// Settings file structure for Gossamer
///
/// Every field is optional; anything missing falls back to the built-in
/// defaults and may be overridden again from the command line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub crawler: CrawlerSection,
    pub request: RequestSection,
    pub output: OutputSection,
}

/// Traversal settings in the `[crawler]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct CrawlerSection {
    /// Maximum depth to crawl from each seed
    pub depth: Option<u32>,

    /// Maximum number of outstanding fetches across all seeds
    pub threads: Option<usize>,

    /// Only follow hyperlinks on the exact host of the page they were found on
    pub inside: bool,

    /// Treat subdomains of the seed host as in scope
    pub subs: bool,

    /// Per-request timeout in seconds
    pub timeout: Option<u64>,

    /// Largest page body to parse, in kilobytes
    pub max_page_size: Option<u64>,
}

/// Transport settings in the `[request]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct RequestSection {
    /// Extra request headers
    pub headers: BTreeMap<String, String>,

    /// Outbound proxy URL
    pub proxy: Option<String>,

    /// Skip TLS certificate verification
    pub insecure: bool,
}

/// Output settings in the `[output]` table
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct OutputSection {
    pub json: bool,
    pub show_source: bool,
    pub show_where: bool,
}

/// Ordered list of request headers
///
/// Header names compare case-insensitively; inserting an existing name
/// replaces its value in place.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HeaderList(Vec<(String, String)>);

impl HeaderList {
    /// Creates an empty header list
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a header, replacing any existing value for the same name
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self
            .0
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(&name))
        {
            Some(entry) => entry.1 = value,
            None => self.0.push((name, value)),
        }
    }

    /// Appends every header from `other`, replacing duplicates
    pub fn merge(&mut self, other: HeaderList) {
        for (name, value) in other.0 {
            self.insert(name, value);
        }
    }

    /// Looks up a header value by name
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    /// Returns the `Host` override, if one was configured
    pub fn host(&self) -> Option<&str> {
        self.get("Host")
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<BTreeMap<String, String>> for HeaderList {
    fn from(map: BTreeMap<String, String>) -> Self {
        let mut list = HeaderList::new();
        for (name, value) in map {
            list.insert(name, value);
        }
        list
    }
}

/// Fully resolved settings for a crawl run
#[derive(Debug, Clone)]
pub struct CrawlSettings {
    /// Maximum traversal depth; seeds are depth 0
    pub max_depth: u32,

    /// Drop hyperlinks leaving the host of the page they were found on
    pub inside: bool,

    /// Use subdomain-suffix scope matching instead of exact hosts
    pub subdomains: bool,

    /// Fetch concurrency pool size shared by all seeds
    pub threads: usize,

    /// Headers sent with every request
    pub headers: HeaderList,

    /// Outbound proxy URL
    pub proxy: Option<String>,

    /// Per-request timeout
    pub timeout: Option<Duration>,

    /// Skip TLS certificate verification
    pub insecure: bool,

    /// Bodies above this many kilobytes are not parsed
    pub max_page_size_kb: Option<u64>,

    /// Output representation
    pub output: OutputOptions,
}

impl Default for CrawlSettings {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_DEPTH,
            inside: false,
            subdomains: false,
            threads: DEFAULT_THREADS,
            headers: HeaderList::new(),
            proxy: None,
            timeout: None,
            insecure: false,
            max_page_size_kb: None,
            output: OutputOptions::default(),
        }
    }
}
