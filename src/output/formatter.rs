//! Result formatting
//!
//! Renders a discovered link into its printable form. The formatted string is
//! also the deduplication key, so the same URL found with different source or
//! origin annotations is emitted once per distinct rendering.

use crate::crawler::DiscoveredLink;
use crate::output::traits::OutputResult;
use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

/// Output representation switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    /// Emit one JSON object per line
    pub json: bool,

    /// Annotate each result with the kind of reference (`href`, `script`, `form`)
    pub show_source: bool,

    /// Annotate each result with the page it was found on
    pub show_where: bool,
}

#[derive(Serialize)]
struct JsonRecord<'a> {
    #[serde(rename = "Source")]
    source: &'a str,
    #[serde(rename = "URL")]
    url: &'a str,
    #[serde(rename = "Where")]
    location: &'a str,
}

/// JSON layout with `", "` between members and `": "` after keys
struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Formats a discovered link according to the output options
///
/// # Formats
///
/// | json | show_source | show_where | Result |
/// |------|-------------|------------|--------|
/// | no   | no          | no         | `url` |
/// | no   | yes         | no         | `[kind] url` |
/// | no   | no          | yes        | `[origin] url` |
/// | no   | yes         | yes        | `[origin] [kind] url` |
/// | yes  | any         | any        | `{"Source": kind, "URL": url, "Where": origin or ""}` |
///
/// In JSON mode `show_source` has no effect and `Where` is the empty string
/// unless `show_where` is set.
///
/// # Example
///
/// ```
/// use gossamer::crawler::{DiscoveredLink, LinkKind};
/// use gossamer::output::{format_result, OutputOptions};
///
/// let link = DiscoveredLink::new("https://a.test/b", LinkKind::Href, "https://a.test");
/// let options = OutputOptions { show_source: true, ..Default::default() };
/// assert_eq!(format_result(&link, &options).unwrap(), "[href] https://a.test/b");
/// ```
pub fn format_result(link: &DiscoveredLink, options: &OutputOptions) -> OutputResult<String> {
    if options.json {
        let record = JsonRecord {
            source: link.kind.as_str(),
            url: &link.url,
            location: if options.show_where { &link.origin } else { "" },
        };
        let mut buf = Vec::new();
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
        record.serialize(&mut serializer)?;
        return Ok(String::from_utf8_lossy(&buf).into_owned());
    }

    let mut result = if options.show_source {
        format!("[{}] {}", link.kind, link.url)
    } else {
        link.url.clone()
    };

    if options.show_where {
        result = format!("[{}] {}", link.origin, result);
    }

    Ok(result)
}
