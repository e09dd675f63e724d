// Command-line entry point: scrape one site for one query and print the
// assembled response as JSON on stdout. Logs go to stderr.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use kodegen_tools_pricescout::{
    AssembledResponse, Platform, PriceScout, ResultSet, ScrapeConfig, SiteProfile, init_automation,
};

#[derive(Parser)]
#[command(
    name = "kodegen-pricescout",
    about = "Search a retail site and print the first page of product listings as JSON"
)]
struct Cli {
    /// Site to search: amazon or flipkart
    platform: Platform,

    /// Search terms
    #[arg(required = true, num_args = 1..)]
    query: Vec<String>,

    /// JSON file with scrape configuration overrides
    #[arg(long)]
    config: Option<PathBuf>,

    /// JSON site profile replacing the built-in selectors
    #[arg(long)]
    profile: Option<PathBuf>,

    /// Show the browser window
    #[arg(long)]
    headed: bool,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new("info,chromiumoxide::handler=off,chromiumoxide::conn=off")
    });
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn load_config(cli: &Cli) -> Result<ScrapeConfig> {
    let config = match &cli.config {
        Some(path) => ScrapeConfig::from_json_file(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => ScrapeConfig::default(),
    };
    if !cli.headed {
        return Ok(config);
    }
    Ok(config.into_builder().headless(false).build()?)
}

async fn run(cli: &Cli) -> Result<AssembledResponse> {
    let config = load_config(cli)?;
    let query = cli.query.join(" ");

    let launcher = match init_automation().await.launcher() {
        Ok(launcher) => launcher,
        Err(e) => {
            let profile = SiteProfile::for_platform(cli.platform);
            return Ok(AssembledResponse {
                status_code: 500,
                body: ResultSet::error(query.trim(), profile.failure_message(&e.to_string())),
            });
        }
    };

    let mut scout = PriceScout::new(launcher, config);
    if let Some(path) = &cli.profile {
        let profile = SiteProfile::from_json_file(path)
            .with_context(|| format!("Failed to load profile {}", path.display()))?;
        if profile.platform != cli.platform {
            anyhow::bail!(
                "Profile {} is for {}, not {}",
                path.display(),
                profile.platform,
                cli.platform
            );
        }
        scout = scout.with_profile(profile);
    }

    Ok(scout.search_response(cli.platform, &query).await)
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    let response = match run(&cli).await {
        Ok(response) => response,
        Err(e) => {
            tracing::error!("{:#}", e);
            return ExitCode::from(2);
        }
    };

    match response.to_json_pretty() {
        Ok(json) => println!("{json}"),
        Err(e) => {
            tracing::error!("Failed to serialize response: {}", e);
            return ExitCode::FAILURE;
        }
    }

    if response.is_success() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
