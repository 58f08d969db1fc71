//! Hire-Sweep main entry point
//!
//! This is the command-line interface for the Hire-Sweep contact and
//! careers crawler.

use chrono::Utc;
use clap::Parser;
use hire_sweep::config::{load_config_with_hash, CategoryTable, Config};
use hire_sweep::input::{load_records, InputTable};
use hire_sweep::output::{build_handlers, print_statistics, write_all, RunStatistics, SweepReport};
use hire_sweep::resolve_website;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Hire-Sweep: a polite contact and careers crawler
///
/// Hire-Sweep reads a table of business records, visits each record's
/// website, collects contact email addresses and flags career/HR keyword
/// categories. Results are written back next to the original columns.
#[derive(Parser, Debug)]
#[command(name = "hire-sweep")]
#[command(version = "1.0.0")]
#[command(about = "A polite contact and careers crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Input CSV file (overrides [input] csv-path)
    #[arg(short, long, value_name = "PATH")]
    input: Option<PathBuf>,

    /// Output CSV file (overrides [output] csv-path)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and input, and show what would be crawled without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let input_path = cli
        .input
        .clone()
        .or_else(|| config.input.csv_path.as_ref().map(PathBuf::from))
        .ok_or("no input file: pass --input or set [input] csv-path")?;
    let input = load_records(&input_path, &config.input.website_column)?;

    if cli.dry_run {
        handle_dry_run(&config, &input_path, &input);
        return Ok(());
    }

    let output_path = cli
        .output
        .clone()
        .or_else(|| config.output.csv_path.as_ref().map(PathBuf::from))
        .ok_or("no output file: pass --output or set [output] csv-path")?;

    handle_sweep(config, &config_hash, input, &output_path).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("hire_sweep=info,warn"),
            1 => EnvFilter::new("hire_sweep=debug,info"),
            2 => EnvFilter::new("hire_sweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and input without fetching
fn handle_dry_run(config: &Config, input_path: &Path, input: &InputTable) {
    println!("=== Hire-Sweep Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Concurrency: {}", config.crawler.concurrency);
    println!("  Request delay: {}ms", config.crawler.request_delay);
    println!(
        "  Retries: {} ({}ms apart)",
        config.crawler.retry_count, config.crawler.retry_delay
    );
    println!("  Depth limit: {}", config.crawler.depth_limit);
    println!("  Request timeout: {}ms", config.crawler.request_timeout);
    match config.crawler.run_timeout {
        Some(secs) => println!("  Run timeout: {}s", secs),
        None => println!("  Run timeout: none"),
    }

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nDetailed Tier:");
    println!("  Enabled: {}", config.detailed.enabled);
    println!("  Renderer: {:?}", config.detailed.renderer);

    let categories = CategoryTable::from_config(config);
    println!("\nCategories ({}):", categories.len());
    for category in categories.iter() {
        println!("  - {} ({} keywords)", category.name, category.keywords.len());
    }

    let mut missing = 0;
    let mut invalid = 0;
    for record in &input.records {
        match resolve_website(record.website.as_deref()) {
            Ok(_) => {}
            Err(hire_sweep::UrlError::Missing) => missing += 1,
            Err(hire_sweep::UrlError::Invalid(_)) => invalid += 1,
        }
    }

    println!("\nInput: {}", input_path.display());
    println!("  Records: {}", input.len());
    println!("  Missing website: {}", missing);
    println!("  Invalid website: {}", invalid);

    println!("\n✓ Configuration is valid");
    println!(
        "✓ Would schedule {} fast-tier fetches",
        input.len() - missing - invalid
    );
}

/// Handles the main sweep operation
async fn handle_sweep(
    config: Config,
    config_hash: &str,
    input: InputTable,
    output_path: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let categories: Vec<String> = CategoryTable::from_config(&config)
        .names()
        .into_iter()
        .map(String::from)
        .collect();
    let handlers = build_handlers(output_path, &config.output);

    let started_at = Utc::now();
    let results = match hire_sweep::run_sweep(config, &input.records).await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Sweep failed: {}", e);
            return Err(e.into());
        }
    };
    let finished_at = Utc::now();

    let report = SweepReport {
        input: &input,
        results: &results,
        categories: &categories,
        started_at,
        finished_at,
        config_hash,
    };
    write_all(&handlers, &report)?;

    print_statistics(&RunStatistics::from_results(&results, &categories));
    Ok(())
}
