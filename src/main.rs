//! Command line interface for api-docs-dl

use api_docs_dl::discovery::is_groups_index;
use api_docs_dl::{
    ApiDocsDownloader, BatchResult, Config, Error, FileWriteOptions, GroupSlugResolver,
    LastLinkPerGroup, SupportLevelSelector, UrlPathResolver,
};
use clap::error::ErrorKind;
use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "api-docs-dl")]
#[command(version)]
#[command(about = "Download the JSON documents listed by an API documentation index")]
struct Cli {
    /// Print less output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    quiet: u8,

    /// Print more output (repeatable)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Directory the documents are written to
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// URL of the discovery document
    #[arg(short = 'u', long)]
    discovery_url: Option<String>,

    /// Open flags for written files: "wx" (exclusive), "w" (replace atomically), "a" (append)
    #[arg(long, default_value = "wx")]
    flags: String,

    /// Octal permission bits for created files, e.g. 644
    #[arg(long, value_parser = parse_mode)]
    mode: Option<u32>,

    /// Extra request header, "Name: value" (repeatable)
    #[arg(short = 'H', long = "header", value_parser = parse_header)]
    headers: Vec<(String, String)>,

    /// Per-request timeout in seconds
    #[arg(long)]
    timeout: Option<u64>,

    /// Which documents to download [default: support-level for a groups.json
    /// index, last-link otherwise]
    #[arg(long, value_enum)]
    strategy: Option<Strategy>,

    /// Lowest support level downloaded by the support-level strategy
    #[arg(long, default_value = "production")]
    min_support_level: String,

    /// Name files after their group
    #[arg(long, conflicts_with = "url_names")]
    slug_names: bool,

    /// Name files after their URL path
    #[arg(long)]
    url_names: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum Strategy {
    /// Last link of every group
    LastLink,
    /// Groups at or above --min-support-level, as <slug>.json
    SupportLevel,
}

impl Cli {
    fn verbosity(&self) -> i16 {
        i16::from(self.verbose) - i16::from(self.quiet)
    }

    fn config(&self) -> Config {
        let mut config = Config {
            output_dir: self.output_dir.clone(),
            file_write: FileWriteOptions {
                flags: self.flags.clone(),
                mode: self.mode,
            },
            headers: self.headers.iter().cloned().collect(),
            request_timeout: self.timeout.map(Duration::from_secs),
            ..Default::default()
        };
        if let Some(url) = &self.discovery_url {
            config.discovery_url = url.clone();
        }
        config
    }

    fn downloader(&self) -> api_docs_dl::Result<ApiDocsDownloader> {
        let config = self.config();
        let groups_index = config.discovery_url().is_ok_and(|url| is_groups_index(&url));
        let mut downloader = ApiDocsDownloader::new(config)?;

        let strategy = self.strategy.unwrap_or(if groups_index {
            Strategy::SupportLevel
        } else {
            Strategy::LastLink
        });
        downloader = match strategy {
            Strategy::LastLink => downloader.with_selector(LastLinkPerGroup),
            Strategy::SupportLevel => {
                let selector =
                    SupportLevelSelector::new(&self.min_support_level).ok_or_else(|| {
                        Error::config(
                            "min_support_level",
                            format!("unknown support level {:?}", self.min_support_level),
                        )
                    })?;
                downloader.with_selector(selector)
            }
        };

        if self.slug_names {
            downloader = downloader.with_path_resolver(GroupSlugResolver);
        } else if self.url_names {
            downloader = downloader.with_path_resolver(UrlPathResolver);
        }
        Ok(downloader)
    }
}

fn parse_mode(s: &str) -> Result<u32, String> {
    let digits = s.trim_start_matches("0o");
    u32::from_str_radix(digits, 8).map_err(|e| format!("invalid octal mode {s:?}: {e}"))
}

fn parse_header(s: &str) -> Result<(String, String), String> {
    let (name, value) = s
        .split_once(':')
        .ok_or_else(|| format!("header {s:?} must look like \"Name: value\""))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(format!("header {s:?} has an empty name"));
    }
    Ok((name.to_string(), value.trim().to_string()))
}

/// Log level directive for a verbosity (verbose count minus quiet count)
fn level_for(verbosity: i16) -> &'static str {
    match verbosity {
        i16::MIN..=-2 => "off",
        -1 => "error",
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

fn init_tracing(verbosity: i16) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Exit code for a command line that did not parse
fn parse_error_exit_code(kind: ErrorKind) -> u8 {
    match kind {
        ErrorKind::DisplayHelp
        | ErrorKind::DisplayVersion
        | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => 0,
        _ => 1,
    }
}

/// Render an orchestration error, with its source chain when verbose
fn describe_error(err: &Error, verbosity: i16) -> String {
    if verbosity <= 0 {
        return err.to_string();
    }
    let mut description = format!("{err:?}");
    let mut source = std::error::Error::source(err);
    while let Some(cause) = source {
        description.push_str(&format!("\n  caused by: {cause}"));
        source = cause.source();
    }
    description
}

fn report(result: &BatchResult) -> u8 {
    let mut stderr = std::io::stderr().lock();
    result.report(&mut stderr).unwrap_or(1)
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return ExitCode::from(parse_error_exit_code(e.kind()));
        }
    };

    let verbosity = cli.verbosity();
    init_tracing(verbosity);

    let outcome = match cli.downloader() {
        Ok(downloader) => downloader.run().await,
        Err(e) => Err(e),
    };

    match outcome {
        Ok(result) => ExitCode::from(report(&result)),
        Err(e) => {
            eprintln!("{}", describe_error(&e, verbosity));
            ExitCode::from(1)
        }
    }
}
