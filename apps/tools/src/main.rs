use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use storage::Storage;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod import;

use import::{fetch_csv, import_cities, import_hotels, BasicAuth};

#[derive(Parser, Debug)]
struct Cli {
    #[arg(long, env = "DATABASE_URL", default_value = "sqlite://./data/hotels.db")]
    database_url: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Download the city and hotel CSV files and upsert their rows.
    ImportCsv {
        #[arg(long, env = "CITY_CSV_URL")]
        city_csv_url: String,
        #[arg(long, env = "HOTEL_CSV_URL")]
        hotel_csv_url: String,
        #[arg(long, env = "AUTH_USERNAME")]
        auth_username: Option<String>,
        #[arg(long, env = "AUTH_PASSWORD", hide_env_values = true)]
        auth_password: Option<String>,
    },
    CreateCity {
        code: String,
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();
    let storage = Storage::new(&cli.database_url).await?;

    match cli.command {
        Command::ImportCsv {
            city_csv_url,
            hotel_csv_url,
            auth_username,
            auth_password,
        } => {
            let auth = auth_username.map(|username| BasicAuth {
                username,
                password: auth_password,
            });
            let http = reqwest::Client::new();

            let cities = fetch_csv(&http, &city_csv_url, auth.as_ref()).await?;
            let count = import_cities(&storage, &cities)
                .await
                .context("city import failed")?;
            info!(count, "Done importing cities");

            let hotels = fetch_csv(&http, &hotel_csv_url, auth.as_ref()).await?;
            let count = import_hotels(&storage, &hotels)
                .await
                .context("hotel import failed")?;
            info!(count, "Done importing hotels");
        }
        Command::CreateCity { code, name } => {
            let code = code.trim();
            if code.is_empty() || code.chars().count() > shared::domain::CITY_CODE_MAX_LEN {
                anyhow::bail!(
                    "city code must be 1 to {} characters",
                    shared::domain::CITY_CODE_MAX_LEN
                );
            }
            storage.upsert_city(code, name.trim()).await?;
            println!("created city code={code}");
        }
    }

    Ok(())
}
