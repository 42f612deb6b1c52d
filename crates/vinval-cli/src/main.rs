mod offline;
mod valuate;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use vinval_core::{DealerType, Environment, StrategyKind, DEFAULT_LIMIT};

#[derive(Debug, Parser)]
#[command(name = "vinval")]
#[command(about = "Comparable-vehicle valuation from MarketCheck listings")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch comparables and a price prediction, then print a valuation report
    Valuate {
        /// 17-character VIN of the vehicle being valued
        #[arg(long)]
        vin: String,
        /// Current odometer reading
        #[arg(long)]
        miles: u64,
        /// ZIP code used to center the comparable search
        #[arg(long)]
        zip: String,
        /// Report sections YAML (defaults to VINVAL_REPORT_SECTIONS_PATH)
        #[arg(long)]
        sections: Option<PathBuf>,
    },
    /// Rank listings from a saved JSON payload with one selection strategy
    Select(SelectArgs),
    /// Derive a valuation summary from a saved prediction payload
    Summarize {
        /// Prediction response JSON
        #[arg(long)]
        prediction: PathBuf,
        /// Listings JSON whose normalized count becomes the data point count
        #[arg(long)]
        listings: Option<PathBuf>,
    },
}

#[derive(Debug, Args)]
struct SelectArgs {
    /// Listings JSON: a bare array or a provider response
    #[arg(long)]
    listings: PathBuf,
    /// Strategy name, e.g. top_price or closest-mileage
    #[arg(long)]
    strategy: StrategyKind,
    /// Maximum number of listings to print
    #[arg(long, default_value_t = DEFAULT_LIMIT)]
    limit: usize,
    #[arg(long)]
    target_price: Option<f64>,
    #[arg(long)]
    target_mileage: Option<u64>,
    /// franchise or independent
    #[arg(long)]
    dealer_type: Option<DealerType>,
    #[arg(long)]
    min_price: Option<f64>,
    #[arg(long)]
    max_price: Option<f64>,
    #[arg(long)]
    min_miles: Option<u64>,
    #[arg(long)]
    max_miles: Option<u64>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    dotenvy::dotenv().ok();
    let config = vinval_core::load_app_config()?;

    // Logs go to stderr so stdout carries only the JSON result.
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(log_ansi(&config.env))
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Valuate {
            vin,
            miles,
            zip,
            sections,
        } => valuate::run_valuate(&config, &vin, miles, &zip, sections.as_deref()).await,
        Commands::Select(args) => offline::run_select(&args),
        Commands::Summarize {
            prediction,
            listings,
        } => offline::run_summarize(&prediction, listings.as_deref()),
    }
}

/// ANSI colors are off in production.
fn log_ansi(env: &Environment) -> bool {
    !matches!(env, Environment::Production)
}

#[cfg(test)]
mod tests;
