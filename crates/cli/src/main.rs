// ABOUTME: CLI binary for the springer-doi bibliographic record scraper.
// ABOUTME: Fetches link.springer.com pages (or reads a saved HTML file) and prints BibTeX or JSON.

mod logging;

use std::fs;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use springer_doi::{formats, Client, JoinPolicy, OutputFormat, PublicationRecord, SiteSelectors};

#[derive(Parser, Debug)]
#[command(name = "springer-doi")]
#[command(about = "Extract bibliographic records from link.springer.com pages")]
struct Args {
    /// Output format: bibtex (default) or json
    #[arg(short = 'f', long = "format", default_value = "bibtex")]
    format: String,

    /// Output file path (default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// HTML file to parse (requires --url)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// Source URL for HTML file parsing (required with --html)
    #[arg(long = "url")]
    url: Option<String>,

    /// JSON file replacing the built-in selector set
    #[arg(long = "selectors")]
    selectors: Option<PathBuf>,

    /// Separator placed between values of a multi-valued field
    #[arg(long = "join")]
    join: Option<String>,

    /// Request timeout in seconds
    #[arg(long = "timeout", default_value_t = 30)]
    timeout: u64,

    /// Allow fetching from private/local networks
    #[arg(long = "allow-private-networks")]
    allow_private_networks: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start URLs to fetch, one record per page
    #[arg()]
    urls: Vec<String>,
}

fn build_client(args: &Args) -> Result<Client> {
    let mut builder = Client::builder()
        .timeout(Duration::from_secs(args.timeout))
        .allow_private_networks(args.allow_private_networks);

    if let Some(sep) = &args.join {
        builder = builder.join(JoinPolicy::new(sep.as_str()));
    }

    if let Some(path) = &args.selectors {
        let selectors = SiteSelectors::from_json_file(path)
            .with_context(|| format!("loading selectors from {}", path.display()))?;
        builder = builder.selectors(selectors);
    }

    Ok(builder.build())
}

fn write_output(records: &[PublicationRecord], args: &Args) -> Result<()> {
    let rendered = formats::render(records, OutputFormat::from(args.format.as_str()))?;

    match &args.output {
        Some(path) => fs::write(path, format!("{}\n", rendered))
            .with_context(|| format!("writing to {}", path.display()))?,
        None => println!("{}", rendered),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();

    if let Err(e) = logging::init_logging(args.verbose) {
        eprintln!("warning: {}", e);
    }

    if args.html.is_some() && args.url.is_none() {
        eprintln!("error: --url is required when using --html");
        return ExitCode::from(1);
    }

    if args.html.is_none() && args.urls.is_empty() {
        eprintln!("error: at least one URL is required, or use --html with --url");
        return ExitCode::from(1);
    }

    if args.html.is_some() && !args.urls.is_empty() {
        eprintln!("error: cannot use both --html and positional URLs");
        return ExitCode::from(1);
    }

    let client = match build_client(&args) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("error: {:#}", e);
            return ExitCode::from(1);
        }
    };

    let start = Instant::now();
    let mut records: Vec<PublicationRecord> = Vec::new();
    let mut had_error = false;

    if let (Some(html_path), Some(url)) = (&args.html, &args.url) {
        match fs::read_to_string(html_path) {
            Ok(html) => match client.parse_html(&html, url) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("error parsing HTML: {}", e);
                    had_error = true;
                }
            },
            Err(e) => {
                eprintln!("error reading file {:?}: {}", html_path, e);
                had_error = true;
            }
        }
    } else {
        for url in &args.urls {
            match client.parse(url).await {
                Ok(Some(record)) => records.push(record),
                Ok(None) => {}
                Err(e) => {
                    eprintln!("error parsing {}: {}", url, e);
                    had_error = true;
                }
            }
        }
    }

    let elapsed = start.elapsed();
    tracing::info!(
        records = records.len(),
        elapsed_ms = elapsed.as_millis() as u64,
        "done"
    );

    if !records.is_empty() {
        if let Err(e) = write_output(&records, &args) {
            eprintln!("error: {:#}", e);
            had_error = true;
        }
    }

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", elapsed.as_millis());
    }

    if had_error {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    }
}
