use crate::{UrlError, UrlResult};
use url::Url;

/// Returns the network location of a URL: the lowercase host, plus the port
/// when one is given explicitly and differs from the scheme default
///
/// # Examples
///
/// ```
/// use url::Url;
/// use gossamer::url::authority;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(authority(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(authority(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn authority(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host,
    })
}

/// Parses a URL string and returns its network location, if it has one
///
/// Unparseable URLs and URLs without a host (`mailto:`, `javascript:`) yield
/// `None`.
pub fn host_of(url_str: &str) -> Option<String> {
    Url::parse(url_str).ok().as_ref().and_then(authority)
}

/// Extracts the hostname of a seed URL
///
/// Seeds must be absolute URLs with a host; anything else is rejected.
///
/// # Arguments
///
/// * `url_str` - The seed URL as supplied on input
///
/// # Returns
///
/// * `Ok(String)` - The seed's network location (host and optional port)
/// * `Err(UrlError)` - The seed is not an absolute URL with a host
pub fn extract_hostname(url_str: &str) -> UrlResult<String> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(format!("{}: {}", url_str, e)))?;
    match authority(&url) {
        Some(host) if !host.is_empty() => Ok(host),
        _ => Err(UrlError::MissingHost(url_str.to_string())),
    }
}

/// Returns true when both URLs share the same network location
pub fn same_origin(a: &Url, b: &Url) -> bool {
    authority(a) == authority(b)
}
