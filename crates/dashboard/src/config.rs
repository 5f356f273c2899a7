use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use dashboard_api::ApiConfig;
use std::time::Duration;
use watchlist_sync::{Scope, SyncOptions};

#[derive(Parser, Debug)]
#[command(
    name = "dashboard",
    version,
    about = "Stock market dashboard: watchlists, sentiment and backtesting results"
)]
pub struct Cli {
    /// Base URL of the dashboard backend.
    #[arg(long, env = "API_BASE_URL", default_value = dashboard_api::DEFAULT_BASE_URL)]
    pub api_base_url: String,

    /// Per-request timeout in seconds.
    #[arg(long, env = "API_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Print every panel once (default).
    Overview,
    /// Interactive watchlist; without a user id the read-only aggregate is shown.
    Watchlist {
        #[arg(long, env = "WATCHLIST_USER_ID")]
        user_id: Option<String>,
    },
    /// Sentiment classification per stock.
    Sentiment,
    /// Backtesting summary and price history.
    Backtesting,
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub api: ApiConfig,
    pub sync: SyncOptions,
    pub command: Command,
}

impl DashboardConfig {
    pub fn from_cli(cli: Cli) -> Result<Self> {
        let url = reqwest::Url::parse(&cli.api_base_url)
            .with_context(|| format!("API_BASE_URL is not a valid URL: {}", cli.api_base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!(
                "API_BASE_URL must use http or https, got {}",
                url.scheme()
            );
        }
        if cli.timeout_secs == 0 {
            bail!("API_TIMEOUT_SECS must be at least 1");
        }

        let timeout = Duration::from_secs(cli.timeout_secs);
        Ok(Self {
            api: ApiConfig::new(cli.api_base_url, timeout),
            sync: SyncOptions {
                request_timeout: timeout,
            },
            command: cli.command.unwrap_or(Command::Overview),
        })
    }
}

impl Command {
    pub fn scope(&self) -> Scope {
        match self {
            Command::Watchlist { user_id } => Scope::from_user_id(user_id.as_deref()),
            _ => Scope::Aggregate,
        }
    }
}
