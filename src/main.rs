//! appstore-prices - Compare App Store prices across storefronts
//!
//! Converts every regional price of an app into one currency.

use anyhow::Result;
use appstore_prices::commands::{list_currencies, EndpointCommand, SearchCommand, SearchOptions};
use appstore_prices::config::{Config, OutputFormat};
use appstore_prices::pipeline::SortKey;
use appstore_prices::store::FileEndpointStore;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "appstore-prices",
    version,
    about = "Compare App Store prices across storefronts",
    long_about = "Fetches an app's regional App Store prices from a scraping endpoint \
                  and converts them into one currency."
)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "ASP_CONFIG")]
    config: Option<PathBuf>,

    /// Output format (table, json, markdown, csv)
    #[arg(short, long, global = true)]
    format: Option<OutputFormat>,

    /// Target currency (e.g. AUD, USD, EUR)
    #[arg(long, global = true)]
    currency: Option<String>,

    /// HTTP request timeout in seconds
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch and convert the regional prices of an app
    #[command(alias = "s")]
    Search {
        /// App Store app id (e.g. 284882215)
        app_id: String,

        /// Product to show (defaults to the first alphabetically)
        #[arg(short, long)]
        product: Option<String>,

        /// Sort column: currency, cost, converted, countries
        #[arg(long, default_value = "converted")]
        sort: SortKey,

        /// Sort descending
        #[arg(long)]
        desc: bool,

        /// Show every product
        #[arg(long, conflicts_with = "product")]
        all: bool,
    },

    /// Manage the scraper endpoint URL
    #[command(subcommand)]
    Endpoint(EndpointAction),

    /// List supported target currencies
    Currencies,
}

#[derive(Subcommand)]
enum EndpointAction {
    /// Print the effective endpoint
    Show,

    /// Save an endpoint
    Set {
        /// Endpoint URL (http or https)
        url: String,
    },

    /// Remove the saved endpoint
    Clear,
}

#[tokio::main]
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
    if let Some(format) = cli.format {
        config.format = format;
    }
    if let Some(currency) = cli.currency {
        config.target_currency = currency;
    }
    if let Some(timeout) = cli.timeout {
        config.timeout_secs = timeout;
    }

    let store = FileEndpointStore::default_location()?.with_fallback(config.endpoint.clone());
    debug!("Endpoint file: {}", store.path().display());

    match cli.command {
        Commands::Search { app_id, product, sort, desc, all } => {
            let options = SearchOptions { product, sort, descending: desc, all_products: all };

            let cmd = SearchCommand::new(config);
            let output = cmd.execute(&app_id, &options, Box::new(store)).await?;
            println!("{}", output);
        }

        Commands::Endpoint(action) => {
            let cmd = EndpointCommand::new(&store);

            let output = match action {
                EndpointAction::Show => cmd.show(),
                EndpointAction::Set { url } => cmd.set(&url)?,
                EndpointAction::Clear => cmd.clear()?,
            };

            println!("{}", output);
        }

        Commands::Currencies => {
            println!("{}", list_currencies(&config.target_currency));
        }
    }

    Ok(())
}
