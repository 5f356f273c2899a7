mod config;
mod render;
mod session;

use anyhow::Result;
use clap::Parser;
use dashboard_api::DashboardApi;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use watchlist_sync::{Scope, WatchlistComponent};

use config::{Cli, Command, DashboardConfig};

fn init_tracing() {
    let json_logging = std::env::var("RUST_LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "dashboard=info,watchlist_sync=info,dashboard_api=warn".into());

    // stdout belongs to the dashboard itself
    if json_logging {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }
}

async fn show_watchlist_once(api: &DashboardApi, config: &DashboardConfig, scope: Scope) {
    let component = WatchlistComponent::new(Arc::new(api.watchlist.clone()), scope, config.sync);
    let state = component.activate().await;
    let view = component.render().await;
    println!("{}", render::watchlist(&view, state.last_synced_at));
}

async fn show_sentiment(api: &DashboardApi) {
    let records = match api.sentiment.list().await {
        Ok(records) => records,
        Err(e) => {
            tracing::error!("Error fetching sentiments: {}", e);
            Vec::new()
        }
    };
    println!("{}", render::sentiment(&records));
}

async fn show_backtesting(api: &DashboardApi) {
    let results = match api.backtesting.list().await {
        Ok(results) => results,
        Err(e) => {
            tracing::error!("Error fetching backtesting data: {}", e);
            Vec::new()
        }
    };
    println!("{}", render::backtesting(&results));
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = DashboardConfig::from_cli(Cli::parse())?;
    tracing::info!(
        base_url = %config.api.base_url,
        timeout_secs = config.api.timeout.as_secs(),
        "Starting market dashboard"
    );

    let api = DashboardApi::new(&config.api)?;

    match &config.command {
        Command::Overview => {
            println!("== Stock Market Dashboard ==\n");
            show_watchlist_once(&api, &config, Scope::Aggregate).await;
            show_sentiment(&api).await;
            show_backtesting(&api).await;
        }
        Command::Watchlist { .. } => {
            let component = WatchlistComponent::new(
                Arc::new(api.watchlist.clone()),
                config.command.scope(),
                config.sync,
            );
            session::run(component).await?;
        }
        Command::Sentiment => show_sentiment(&api).await,
        Command::Backtesting => show_backtesting(&api).await,
    }

    Ok(())
}
