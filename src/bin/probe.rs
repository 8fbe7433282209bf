use clap::Parser;
use clob_latency_probe::{ProbeConfig, Runner};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cfg = ProbeConfig::parse();
    cfg.validate()?;

    let runner = Runner::new(cfg)?;
    runner.run().await?;
    Ok(())
}
