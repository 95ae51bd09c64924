//! Gossamer main entry point
//!
//! Reads seed URLs from standard input and streams every in-scope link it
//! discovers to standard output.

use clap::Parser;
use gossamer::config::{load_config, read_seeds, resolve_settings, CliOverrides};
use gossamer::crawler::crawl;
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Gossamer: a scoped breadth-first link crawler
///
/// Seed URLs are read one per line from standard input. Each discovered
/// hyperlink, script source and form target inside the seed's scope is
/// printed once.
#[derive(Parser, Debug)]
#[command(name = "gossamer")]
#[command(version)]
#[command(about = "A scoped breadth-first link crawler", long_about = None)]
struct Cli {
    /// Only follow hyperlinks on the same host as the page
    #[arg(short, long)]
    inside: bool,

    /// Number of concurrent requests across all seeds
    #[arg(short, long)]
    threads: Option<usize>,

    /// Maximum recursion depth for visited URLs
    #[arg(short, long)]
    depth: Option<u32>,

    /// Page size limit in KB (non-positive means no limit)
    #[arg(long, allow_negative_numbers = true)]
    size: Option<i64>,

    /// Disable TLS certificate verification
    #[arg(long)]
    insecure: bool,

    /// Include subdomains of the seed in scope
    #[arg(long)]
    subs: bool,

    /// Emit results as JSON lines
    #[arg(long)]
    json: bool,

    /// Show the kind of element each link came from (href, script, form)
    #[arg(short = 's', long)]
    show_source: bool,

    /// Show the page each link was found on
    #[arg(short = 'w', long)]
    show_where: bool,

    /// Custom headers, e.g. "Cookie: a=b;;Authorization: x"
    #[arg(short = 'H', long)]
    headers: Option<String>,

    /// Accepted for compatibility; results are always unique
    #[arg(short, long)]
    unique: bool,

    /// Proxy URL (http, https, socks5 or socks5h), e.g. http://127.0.0.1:8080
    #[arg(long)]
    proxy: Option<String>,

    /// Per-request timeout in seconds (non-positive means no timeout)
    #[arg(long, allow_negative_numbers = true)]
    timeout: Option<i64>,

    /// Accepted for compatibility; redirects are never followed
    #[arg(long = "disable-redirects", visible_alias = "dr")]
    disable_redirects: bool,

    /// Path to a TOML configuration file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress everything except errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn overrides(&self) -> CliOverrides {
        CliOverrides {
            depth: self.depth,
            threads: self.threads,
            inside: self.inside,
            subs: self.subs,
            headers: self.headers.clone(),
            proxy: self.proxy.clone(),
            timeout: self.timeout,
            size: self.size,
            insecure: self.insecure,
            json: self.json,
            show_source: self.show_source,
            show_where: self.show_where,
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let stdin = io::stdin();
    if stdin.is_terminal() {
        tracing::error!("No URLs detected. Hint: cat urls.txt | gossamer");
        return ExitCode::FAILURE;
    }

    let input = match read_seeds(stdin.lock()) {
        Ok(input) => input,
        Err(e) => {
            tracing::error!("Failed to read seed URLs: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if input.is_empty() {
        tracing::error!("No URLs detected. Hint: cat urls.txt | gossamer");
        return ExitCode::FAILURE;
    }

    let file_config = match &cli.config {
        Some(path) => {
            tracing::debug!("Loading configuration from: {}", path.display());
            match load_config(path) {
                Ok(config) => Some(config),
                Err(e) => {
                    tracing::error!("Failed to load configuration: {}", e);
                    return ExitCode::FAILURE;
                }
            }
        }
        None => None,
    };

    let settings = match resolve_settings(file_config, &cli.overrides()) {
        Ok(settings) => settings,
        Err(e) => {
            tracing::error!("Invalid configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            tracing::error!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };

    tracing::debug!("Crawling {} seed URLs", input.seeds.len());

    match runtime.block_on(crawl(settings, input.seeds)) {
        Ok(_) if input.invalid_lines > 0 => {
            tracing::error!("{} input lines could not be read", input.invalid_lines);
            ExitCode::FAILURE
        }
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            ExitCode::FAILURE
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only results.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("gossamer=warn,error"),
            1 => EnvFilter::new("gossamer=info,warn"),
            2 => EnvFilter::new("gossamer=debug,info"),
            _ => EnvFilter::new("gossamer=trace,debug"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn help_for(id: &str) -> String {
        Cli::command()
            .get_arguments()
            .find(|arg| arg.get_id().as_str() == id)
            .and_then(|arg| arg.get_help())
            .map(|help| help.to_string())
            .unwrap_or_default()
    }

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_show_flags_describe_their_annotation() {
        assert!(help_for("show_source").contains("kind of element"));
        assert!(help_for("show_where").contains("page each link was found on"));
    }

    #[test]
    fn test_show_flags_map_to_output_options() {
        let cli = Cli::parse_from(["gossamer", "-s", "--json"]);
        let overrides = cli.overrides();
        assert!(overrides.show_source);
        assert!(!overrides.show_where);
        assert!(overrides.json);

        let cli = Cli::parse_from(["gossamer", "-w"]);
        assert!(cli.overrides().show_where);
    }

    #[test]
    fn test_negative_limits_accepted() {
        let cli = Cli::parse_from(["gossamer", "--timeout", "-1", "--size", "-1", "--dr"]);
        assert_eq!(cli.timeout, Some(-1));
        assert_eq!(cli.size, Some(-1));
        assert!(cli.disable_redirects);
    }
}
