use anyhow::{Context, Result};
use heat_pump_optimizer::{config, fleet, telemetry};
use config::Config;
use fleet::Scenario;
use std::path::PathBuf;
use std::sync::Arc;
use telemetry::init_tracing;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing();

    let cfg = Config::load()?;

    let scenario_path = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| cfg.scenario.path.clone());
    info!(path = %scenario_path.display(), "loading scenario");
    let scenario = Scenario::from_file(&scenario_path)?;

    let optimizer = Arc::new(cfg.optimizer.build());
    let outcomes = fleet::run_scenario(
        &scenario,
        optimizer,
        cfg.optimizer.horizon_hours,
        &cfg.comfort,
    )
    .await?;

    let json = serde_json::to_string_pretty(&outcomes).context("serializing results")?;
    println!("{json}");

    info!(devices = outcomes.len(), "done");
    Ok(())
}
