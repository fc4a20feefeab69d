use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

use farewatch::config::FarewatchConfig;
use farewatch::pipeline::PriceChecker;
use farewatch::upstream::UpstreamClient;

#[tokio::main]
async fn main() -> Result<()> {
    let config = FarewatchConfig::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    let pnr = std::env::args().nth(1).context("usage: farewatch <PNR>")?;

    let gateway = UpstreamClient::new(&config.upstream);
    let checker = PriceChecker::new(gateway.clone(), gateway.clone(), gateway);

    let report = checker.check(&pnr).await;
    println!("{}", serde_json::to_string_pretty(&report)?);

    Ok(())
}
