use anyhow::Result;
use clap::Parser;
use retail_sales_api::{config::Config, server, Dataset, QueryService};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::parse();

    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_span_events(fmt::format::FmtSpan::CLOSE)
        .init();
    info!("startup");

    // ─── 2) load the dataset; any failure stops startup ──────────────
    let addr = config.bind_addr()?;
    let dataset = Dataset::load(&config.data_path, config.parse_policy())?;
    info!(
        path = %config.data_path.display(),
        records = dataset.len(),
        "dataset ready"
    );

    // ─── 3) serve ────────────────────────────────────────────────────
    let service = QueryService::new(Arc::new(dataset));
    info!("items: http://{}/items", addr);
    server::serve(service, addr).await;

    Ok(())
}
