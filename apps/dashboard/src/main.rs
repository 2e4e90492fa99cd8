use std::sync::Arc;

use anyhow::Result;
use dashboard::{Data, config::Config, overview::run_overview};
use stock::feed::{self, RandomQuotes};
use stock::{LlmClient, MarketDataClient};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env();
    info!(?config, "starting dashboard");

    let market = Arc::new(MarketDataClient::from_env()?);
    let llm = match LlmClient::from_env() {
        Ok(client) => Some(Arc::new(client)),
        Err(e) => {
            warn!(error = %e, "llm client disabled");
            None
        }
    };

    let data = Data { market, llm };

    let overview = run_overview(&data, &config).await?;
    if let Some(report) = &overview.analysis {
        println!("{}", report.content);
    }

    let subscription = feed::subscribe(
        &config.symbol,
        feed::DEFAULT_INTERVAL,
        RandomQuotes::new(),
        |quote| {
            info!(
                symbol = %quote.symbol,
                price = quote.price,
                change = quote.change,
                change_percent = quote.change_percent,
                volume = quote.volume,
                "tick"
            )
        },
    )?;

    tokio::select! {
        _ = tokio::time::sleep(config.feed_for) => {},
        _ = shutdown_signal() => info!("interrupted"),
    }
    subscription.cancel().await;

    info!("Shutdown complete.");
    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::{
            select,
            signal::unix::{SignalKind, signal},
        };
        let (Ok(mut sigterm), Ok(mut sigint)) = (
            signal(SignalKind::terminate()),
            signal(SignalKind::interrupt()),
        ) else {
            warn!("failed to install signal handlers");
            return std::future::pending().await;
        };
        select! {
            _ = sigterm.recv() => {},
            _ = sigint.recv()  => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
