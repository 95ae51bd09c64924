use crate::config::types::{CrawlSettings, FileConfig, HeaderList};
use crate::config::validation::validate;
use crate::output::OutputOptions;
use crate::ConfigError;
use std::path::Path;
use std::time::Duration;

/// Values supplied on the command line
///
/// Boolean switches can only turn a feature on. `timeout` and `size` treat
/// non-positive values as "disabled".
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub depth: Option<u32>,
    pub threads: Option<usize>,
    pub inside: bool,
    pub subs: bool,
    pub headers: Option<String>,
    pub proxy: Option<String>,
    pub timeout: Option<i64>,
    pub size: Option<i64>,
    pub insecure: bool,
    pub json: bool,
    pub show_source: bool,
    pub show_where: bool,
}

/// Loads and parses a settings file from the given path
///
/// # Arguments
///
/// * `path` - Path to the TOML settings file
///
/// # Returns
///
/// * `Ok(FileConfig)` - Successfully parsed file
/// * `Err(ConfigError)` - Failed to read or parse the file
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let content = std::fs::read_to_string(path)?;
    let config: FileConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Parses a raw header string of `key:value` pairs separated by `;;`
///
/// Each pair is split on its first `:` and both sides are trimmed. Pairs
/// without a `:` are ignored.
///
/// # Example
///
/// ```
/// use gossamer::config::parse_headers;
///
/// let headers = parse_headers("Cookie: a=b;;Host: internal.test");
/// assert_eq!(headers.get("cookie"), Some("a=b"));
/// assert_eq!(headers.host(), Some("internal.test"));
/// ```
pub fn parse_headers(raw: &str) -> HeaderList {
    let mut headers = HeaderList::new();
    if raw.is_empty() {
        return headers;
    }

    for pair in raw.split(";;") {
        if let Some((name, value)) = pair.split_once(':') {
            headers.insert(name.trim(), value.trim());
        }
    }

    headers
}

fn positive_secs(value: i64) -> Option<u64> {
    if value > 0 {
        Some(value as u64)
    } else {
        None
    }
}

/// Combines defaults, an optional settings file and command-line overrides
///
/// # Arguments
///
/// * `file` - Parsed settings file, if one was given
/// * `cli` - Values from the command line
///
/// # Returns
///
/// * `Ok(CrawlSettings)` - Resolved and validated settings
/// * `Err(ConfigError)` - The combined settings are invalid
pub fn resolve_settings(
    file: Option<FileConfig>,
    cli: &CliOverrides,
) -> Result<CrawlSettings, ConfigError> {
    let file = file.unwrap_or_default();
    let mut settings = CrawlSettings::default();

    // Settings file
    if let Some(depth) = file.crawler.depth {
        settings.max_depth = depth;
    }
    if let Some(threads) = file.crawler.threads {
        settings.threads = threads;
    }
    settings.inside = file.crawler.inside;
    settings.subdomains = file.crawler.subs;
    settings.timeout = file.crawler.timeout.map(Duration::from_secs);
    settings.max_page_size_kb = file.crawler.max_page_size;
    settings.headers = HeaderList::from(file.request.headers);
    settings.proxy = file.request.proxy.filter(|p| !p.is_empty());
    settings.insecure = file.request.insecure;
    settings.output = OutputOptions {
        json: file.output.json,
        show_source: file.output.show_source,
        show_where: file.output.show_where,
    };

    // Command line
    if let Some(depth) = cli.depth {
        settings.max_depth = depth;
    }
    if let Some(threads) = cli.threads {
        settings.threads = threads;
    }
    settings.inside |= cli.inside;
    settings.subdomains |= cli.subs;
    if let Some(raw) = &cli.headers {
        settings.headers.merge(parse_headers(raw));
    }
    if let Some(proxy) = &cli.proxy {
        settings.proxy = Some(proxy.clone()).filter(|p| !p.is_empty());
    }
    if let Some(timeout) = cli.timeout {
        settings.timeout = positive_secs(timeout).map(Duration::from_secs);
    }
    if let Some(size) = cli.size {
        settings.max_page_size_kb = positive_secs(size);
    }
    settings.insecure |= cli.insecure;
    settings.output.json |= cli.json;
    settings.output.show_source |= cli.show_source;
    settings.output.show_where |= cli.show_where;

    validate(&settings)?;

    Ok(settings)
}
