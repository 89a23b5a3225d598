// ABOUTME: CLI for scraping Census QuickFacts county tables with quickfacts-core.
// ABOUTME: Batch mode drives Chrome over an input sheet; --html mode parses one saved page and prints JSON.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::{Duration, Instant};

use anyhow::{bail, Context, Result};
use clap::Parser;
use quickfacts_core::{
    to_pretty_json, BatchReport, ChromeOptions, ChromeSession, Client, DEFAULT_BASE_URL,
    DEFAULT_VINTAGE,
};
use tracing_subscriber::EnvFilter;

/// Scrape county statistics from Census QuickFacts and write them as JSON.
#[derive(Parser, Debug)]
#[command(name = "quickfacts")]
#[command(about = "Scrape Census QuickFacts county tables into a JSON document", long_about = None)]
struct Args {
    /// CSV sheet with state in column 1 and county in column 2 (header row required)
    #[arg(short = 'i', long = "input", default_value = "census_geo_sheet.csv")]
    input: PathBuf,

    /// Output file (batch default: census_results.json; --html default: stdout)
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Chrome/Chromium executable (default: auto-detect)
    #[arg(long = "browser")]
    browser: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long = "headful")]
    headful: bool,

    /// Launch Chrome without its sandbox (needed in some containers)
    #[arg(long = "no-sandbox")]
    no_sandbox: bool,

    /// Seconds to wait for a page's tables to become visible
    #[arg(
        long = "wait-timeout",
        default_value_t = 10,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    wait_timeout: u64,

    /// QuickFacts site root
    #[arg(long = "base-url", default_value = DEFAULT_BASE_URL)]
    base_url: String,

    /// Dataset vintage at the end of each table URL
    #[arg(long = "vintage", default_value = DEFAULT_VINTAGE)]
    vintage: String,

    /// Stop at the first county that fails
    #[arg(long = "fail-fast")]
    fail_fast: bool,

    /// Keep counties already present in the output and skip them
    #[arg(long = "resume")]
    resume: bool,

    /// Print elapsed time in ms to stderr
    #[arg(long = "timing")]
    timing: bool,

    /// Saved QuickFacts page to parse instead of browsing (requires --state and --county)
    #[arg(long = "html")]
    html: Option<PathBuf>,

    /// State for --html mode
    #[arg(long = "state")]
    state: Option<String>,

    /// County for --html mode
    #[arg(long = "county")]
    county: Option<String>,
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging();

    let start = Instant::now();
    let outcome = if args.html.is_some() {
        parse_saved_page(&args)
    } else {
        run_batch(&args).await
    };

    if args.timing {
        let _ = writeln!(io::stderr(), "elapsed: {}ms", start.elapsed().as_millis());
    }

    match outcome {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::from(1),
        Err(err) => {
            eprintln!("error: {:#}", err);
            ExitCode::from(1)
        }
    }
}

fn build_client(args: &Args) -> Result<Client> {
    let client = Client::builder()
        .base_url(&args.base_url)
        .vintage(&args.vintage)
        .wait_timeout(Duration::from_secs(args.wait_timeout))
        .fail_fast(args.fail_fast)
        .resume(args.resume)
        .build()?;
    Ok(client)
}

/// Scrape every county in the input sheet. Returns false if any county failed.
async fn run_batch(args: &Args) -> Result<bool> {
    if args.state.is_some() || args.county.is_some() {
        bail!("--state and --county are only valid with --html");
    }

    let client = build_client(args)?;
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from("census_results.json"));
    let chrome = ChromeOptions {
        executable: args.browser.clone(),
        headless: !args.headful,
        no_sandbox: args.no_sandbox,
        ..Default::default()
    };

    let report = client
        .run(&args.input, &output, || ChromeSession::launch(&chrome))
        .await?;

    print_summary(&report, &output);
    Ok(report.is_complete())
}

fn print_summary(report: &BatchReport, output: &Path) {
    eprintln!(
        "{} of {} counties scraped ({} skipped, {} failed) -> {}",
        report.scraped(),
        report.total,
        report.skipped,
        report.failures.len(),
        output.display()
    );
    for failed in &report.failures {
        match &failed.result_url {
            Some(url) => eprintln!(
                "  failed {}, {} ({}): {}",
                failed.county, failed.state, url, failed.error
            ),
            None => eprintln!("  failed {}, {}: {}", failed.county, failed.state, failed.error),
        }
    }
}

/// Parse one saved page and emit its record as JSON.
fn parse_saved_page(args: &Args) -> Result<bool> {
    let (Some(html_path), Some(state), Some(county)) = (&args.html, &args.state, &args.county)
    else {
        bail!("--state and --county are required with --html");
    };

    let client = build_client(args)?;
    let html = fs::read_to_string(html_path)
        .with_context(|| format!("reading {}", html_path.display()))?;
    let record = client.parse_html(&html, &county.to_lowercase(), &state.to_lowercase())?;
    let json = String::from_utf8(to_pretty_json(&record)?)?;

    match &args.output {
        Some(path) => {
            fs::write(path, &json).with_context(|| format!("writing {}", path.display()))?
        }
        None => println!("{}", json),
    }
    Ok(true)
}
