//! shelfscan CLI - product listing extraction from the command line.

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use shelfscan::{FailureReport, Listing, ScrapeConfig, Scraper, SiteKey, Strategy};

/// shelfscan - extract product listings from e-commerce search pages
#[derive(Parser)]
#[command(name = "shelfscan")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract listings for a search term
    Scrape(ScrapeArgs),

    /// List supported sites
    Sites,
}

#[derive(Parser)]
struct ScrapeArgs {
    /// Site to search (amazon, flipkart, blinkit)
    #[arg(value_parser = parse_site)]
    site: SiteKey,

    /// Search term; the configured default is used when omitted
    term: Option<String>,

    /// Maximum number of products to display
    #[arg(short, long)]
    limit: Option<usize>,

    /// Output format
    #[arg(short, long, default_value = "text")]
    format: OutputFormat,

    /// JSON configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Never fall back to the headless browser
    #[arg(long)]
    static_only: bool,

    /// Save a debugging screenshot of the rendered page into this directory
    #[arg(long)]
    artifacts: Option<PathBuf>,

    /// Show the browser window instead of running headless
    #[arg(long)]
    headed: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    /// Human-readable text output
    Text,
    /// JSON array of products
    Json,
    /// Tab-separated single-line output
    Compact,
}

fn parse_site(s: &str) -> std::result::Result<SiteKey, String> {
    s.parse::<SiteKey>().map_err(|e| e.to_string())
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Scrape(args) => run_scrape(args).await,
        Commands::Sites => {
            list_sites();
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn list_sites() {
    println!("Supported sites:\n");
    for site in SiteKey::ALL {
        let adapter = site.adapter();
        println!("  {:<10} - {} ({})", site, adapter.name, adapter.search_url);
    }
    println!();
    println!("Usage: shelfscan scrape flipkart \"galaxy f14\" -f json");
}

async fn run_scrape(args: ScrapeArgs) -> Result<ExitCode> {
    let mut config = match &args.config {
        Some(path) => ScrapeConfig::from_json_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => ScrapeConfig::default(),
    };
    if let Some(dir) = &args.artifacts {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating artifact directory {}", dir.display()))?;
        if let Some(stale) = existing_artifact(Some(dir), args.site) {
            std::fs::remove_file(&stale)
                .with_context(|| format!("removing stale {}", stale.display()))?;
        }
        config.debug_artifact_dir = Some(dir.clone());
    }
    if args.headed {
        config.headless = false;
    }

    let mut scraper = Scraper::new(config)?;
    scraper.set_dynamic_enabled(!args.static_only);

    let listing = match scraper.scrape(args.site, args.term.as_deref()).await {
        Ok(listing) => listing,
        Err(e) => {
            tracing::error!("{} extraction failed: {}", args.site, e);
            let artifact = existing_artifact(args.artifacts.as_deref(), args.site);
            let report = FailureReport::for_site(args.site, artifact.as_deref());
            match args.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&report)?),
                _ => eprintln!("{}", report.error),
            }
            return Ok(ExitCode::FAILURE);
        }
    };

    print_listing(&listing, &args)?;
    Ok(ExitCode::SUCCESS)
}

/// Screenshot left by a failed run, if the browser got far enough to save one.
fn existing_artifact(dir: Option<&Path>, site: SiteKey) -> Option<PathBuf> {
    let path = dir?.join(format!("{}-debug.png", site));
    path.is_file().then_some(path)
}

fn print_listing(listing: &Listing, args: &ScrapeArgs) -> Result<()> {
    let limit = args.limit.unwrap_or(usize::MAX);

    match args.format {
        OutputFormat::Text => {
            let strategy = listing.strategy.map_or("none", Strategy::as_str);
            println!(
                "\n{} results for \"{}\" ({} products via {} in {}ms):\n",
                listing.site,
                listing.term,
                listing.products.len(),
                strategy,
                listing.duration_ms
            );

            if listing.is_empty() {
                let report = FailureReport::for_site(args.site, listing.artifact.as_deref());
                println!("{}", report.error);
                if let Some(details) = report.details {
                    println!("{}", details);
                }
                return Ok(());
            }

            for (i, product) in listing.products.iter().take(limit).enumerate() {
                println!("{}. {}", i + 1, product.name);
                println!("   Price: {:.2}", product.price);
                println!(
                    "   Rating: {:.1} | Reviews: {}",
                    product.rating, product.reviews
                );
                println!("   Image: {}", product.image_url);
                println!();
            }
        }
        OutputFormat::Json => {
            let output: Vec<_> = listing.products.iter().take(limit).collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Compact => {
            for product in listing.products.iter().take(limit) {
                println!(
                    "{}\t{:.2}\t{:.1}\t{}\t{}",
                    product.name, product.price, product.rating, product.reviews, product.image_url
                );
            }
        }
    }

    Ok(())
}
