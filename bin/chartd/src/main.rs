use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use common::{Config, StrategyParams};
use indicators::IndicatorFileConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // ── Logging ──────────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    // ── Config ────────────────────────────────────────────────────────────────
    let cfg = Config::from_env().context("invalid service configuration")?;
    info!(
        candles_to_show = cfg.display.candles_to_show,
        range_policy = %cfg.display.range_policy,
        "Chart service starting"
    );

    // ── Indicator defaults ────────────────────────────────────────────────────
    let defaults = match &cfg.indicator_config_path {
        Some(path) => {
            IndicatorFileConfig::load(path)
                .with_context(|| format!("failed to load indicator config at '{path}'"))?
                .params
        }
        None => StrategyParams::default(),
    };

    // ── API ───────────────────────────────────────────────────────────────────
    let state = api::AppState {
        defaults,
        display: cfg.display,
    };
    api::serve(state, cfg.socket_addr())
        .await
        .context("chart API server failed")?;

    info!("Chart service stopped");
    Ok(())
}
