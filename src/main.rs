//! Listhawk main entry point
//!
//! This is the command-line interface for the Listhawk classifieds
//! listing harvester.

use clap::Parser;
use listhawk::config::load_config_with_hash;
use listhawk::crawler::Coordinator;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Listhawk: a polite classifieds listing harvester
///
/// Listhawk walks a paginated listing index, fetches every item page it
/// discovers, extracts the configured fields, and appends the records to
/// a delimiter-separated file, pausing politely between requests.
#[derive(Parser, Debug)]
#[command(name = "listhawk")]
#[command(version = "1.0.0")]
#[command(about = "A polite classifieds listing harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be crawled without any network I/O
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
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

    if cli.dry_run {
        handle_dry_run(&config, &config_hash);
        return Ok(());
    }

    handle_crawl(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("listhawk=info,warn"),
            1 => EnvFilter::new("listhawk=debug,info"),
            2 => EnvFilter::new("listhawk=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &listhawk::config::Config, config_hash: &str) {
    println!("=== Listhawk Dry Run ===\n");

    println!("Index:");
    println!("  URL: {}", config.index.url);
    println!("  Page parameter: {}", config.index.page_param);

    println!("\nOutput:");
    println!("  Path: {}", config.output.path);
    println!("  Delimiter: '{}'", config.output.delimiter);

    println!("\nThrottle:");
    println!("  Base delay: {}ms", config.throttle.base_delay_ms);
    println!(
        "  Jitter: {}ms - {}ms",
        config.throttle.jitter_min_ms, config.throttle.jitter_max_ms
    );

    println!("\nHTTP headers ({}):", config.http.headers.len());
    for name in config.http.headers.keys() {
        println!("  - {}", name);
    }
    if let Some(proxy) = &config.http.proxy {
        println!("Proxy: {}", proxy.url);
    }

    let selected = config.selected_fields();
    println!("\nSelected fields ({}):", selected.len());
    for field in &selected {
        println!("  - {}", field);
    }

    println!("\n✓ Configuration is valid (hash: {})", config_hash);
}

/// Handles the main crawl operation
async fn handle_crawl(config: listhawk::config::Config) -> anyhow::Result<()> {
    let selected = config.selected_fields().len();
    tracing::info!(fields = selected, "Starting crawl");

    // Ctrl-C requests a clean stop at the next request boundary; records
    // already appended to the sink stay valid.
    let cancel = CancellationToken::new();
    let signal_token = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing current request then stopping");
            signal_token.cancel();
        }
    });

    let mut coordinator = Coordinator::new(config, cancel)?;
    let summary = coordinator.run().await?;

    println!(
        "Crawl finished: {} ({} pages visited, {} records written)",
        summary.outcome, summary.pages_visited, summary.records_written
    );

    Ok(())
}
