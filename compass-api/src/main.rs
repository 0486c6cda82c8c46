use std::sync::Arc;

use anyhow::Result;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use compass_api::{CompService, ServiceError};
use compass_store::{Config, InMemoryStore};
use serde::Serialize;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "compass")]
#[command(about = "Value casino cruise offers and rank them by comp value")]
struct Cli {
    /// Snapshot file to read instead of the configured `snapshot.path`
    #[arg(short, long, global = true)]
    snapshot: Option<String>,

    /// Clock used for `generatedAt` and expiry checks (RFC 3339). Defaults to now.
    #[arg(long, global = true)]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Top offers by total value and by best single sailing
    Rankings,

    /// Every valued sailing for one offer code, with its rank positions
    Detail {
        offer_code: String,
    },

    /// Value one offer, optionally against one cruise
    Value {
        offer_id: String,
        #[arg(short, long)]
        cruise: Option<String>,
    },

    /// Offers that have not expired, one per offer code
    Offers,

    /// Check offer codes against the YYMONnnn format
    Codes,

    /// Number of cruises linked to each offer code
    Links,

    /// Associated and upcoming cruise counts per offer, with expiry status
    Analysis,
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "compass_api=debug,compass_offer=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    let config = Config::load()?;

    let path = cli.snapshot.as_deref().unwrap_or(&config.snapshot.path);
    let store = Arc::new(InMemoryStore::from_snapshot_file(path)?);
    let service = CompService::from_config(store, &config);

    let now = cli.at.unwrap_or_else(Utc::now);
    let today = now.date_naive();

    match cli.command {
        Commands::Rankings => {
            print_json(&service.rankings(now).await?)?;
        }

        Commands::Detail { offer_code } => {
            let detail = service
                .offer_detail(&offer_code, now)
                .await?
                .ok_or_else(|| ServiceError::code_not_found(&offer_code))?;
            print_json(&detail)?;
        }

        Commands::Value { offer_id, cruise } => {
            let valuation = service
                .value_for_pair(&offer_id, cruise.as_deref())
                .await?
                .ok_or_else(|| ServiceError::offer_not_found(&offer_id))?;
            print_json(&valuation)?;
        }

        Commands::Offers => {
            print_json(&service.list_active_offers(today).await?)?;
        }

        Commands::Codes => {
            print_json(&service.validate_offer_codes().await?)?;
        }

        Commands::Links => {
            print_json(&service.linked_cruise_counts().await?)?;
        }

        Commands::Analysis => {
            print_json(&service.offer_analysis(today).await?)?;
        }
    }

    Ok(())
}
