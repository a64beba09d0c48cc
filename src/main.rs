use std::io;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

use parkcast::driver::{self, LocationPrompt};
use parkcast::{ParkcastConfig, ParkcastError, ParksApiClient, ScoreWindow, logging};

/// Recommends the U.S. national park near you with the clearest skies ahead.
#[derive(Parser)]
#[command(name = "parkcast")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Address to search around; prompts interactively when omitted.
    #[arg(short, long)]
    address: Option<String>,

    /// Only consider parks offering a matching activity, e.g. "kayak".
    #[arg(long)]
    activity: Option<String>,

    /// Configuration file (TOML).
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Log debug output to stderr.
    #[arg(short, long)]
    verbose: bool,
}

async fn run(cli: Cli) -> Result<()> {
    let config = ParkcastConfig::load_from_path(cli.config)?;
    logging::init(&config.logging, cli.verbose)?;
    tracing::debug!("Cache location: {}", config.cache.location);

    let client = ParksApiClient::new(config.api.clone())?;

    let location = match cli.address {
        Some(address) => {
            let location = driver::resolve_address(&client, &address).await?;
            println!("Searching for parks nearby {}...", location.name);
            location
        }
        None => {
            let stdin = io::stdin();
            LocationPrompt::new(stdin.lock(), io::stdout(), config.search.max_attempts)
                .run(&client)
                .await?
        }
    };

    let window = ScoreWindow::starting_today(config.search.forecast_days);
    let recommendation = driver::find_recommendation(
        &client,
        &location,
        &config.cache_path(),
        window,
        cli.activity.as_deref(),
    )
    .await?;

    match recommendation {
        Some(recommendation) => println!("{recommendation}"),
        None => println!(
            "No parks found near {}. Try another location.",
            location.name
        ),
    }

    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{e:#}");
            eprintln!("Error: {e:#}");
            if let Some(err) = e.downcast_ref::<ParkcastError>() {
                eprintln!("{}", err.user_message());
            }
            ExitCode::FAILURE
        }
    }
}
