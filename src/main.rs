//! headphone-deals - Rebuilds the deals page from a fresh PA-API search.

use anyhow::Result;
use clap::Parser;
use headphone_deals::config::Config;
use headphone_deals::{BuildCommand, Region};
use std::path::PathBuf;
use tracing::Level;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "headphone-deals",
    version,
    about = "Build a static page of Amazon listings under a price ceiling",
    long_about = "Searches the Product Advertising API, keeps listings priced under the ceiling, \
                  sorts them cheapest first and writes a static HTML page."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Page to write
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Also write the listings as JSON to this path
    #[arg(long)]
    json_output: Option<PathBuf>,

    /// Price ceiling (exclusive)
    #[arg(long)]
    max_price: Option<f64>,

    /// Search keywords
    #[arg(short, long)]
    keywords: Option<String>,

    /// Amazon marketplace to search
    #[arg(short, long)]
    region: Option<Region>,

    /// Render from a saved SearchItems response instead of calling the API
    #[arg(long, value_name = "FILE")]
    offline: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new(Level::DEBUG.to_string())
    } else {
        EnvFilter::from_default_env().add_directive(Level::WARN.into())
    };

    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();

    // Load config with layered overrides
    let mut config = Config::load(cli.config.as_deref())?.with_env();

    // Apply CLI overrides
    if let Some(region) = cli.region {
        config.region = region;
    }
    if let Some(output) = cli.output {
        config.output = output;
    }
    if let Some(json_output) = cli.json_output {
        config.json_output = Some(json_output);
    }
    if let Some(max_price) = cli.max_price {
        config.max_price = max_price;
    }
    if let Some(keywords) = cli.keywords {
        config.keywords = keywords;
    }

    config.validate()?;

    let cmd = BuildCommand::new(config);
    let report = match cli.offline {
        Some(path) => cmd.execute_offline(&path)?,
        None => cmd.execute().await?,
    };

    println!(
        "Wrote {} ({} of {} listings under the ceiling)",
        report.output.display(),
        report.listings,
        report.candidates
    );

    Ok(())
}
