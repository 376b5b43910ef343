use serde::{Deserialize, Serialize};
use tracing::{error, info};

use common::{CandleSeries, DisplaySettings, Result, SignalLevels, StrategyParams};
use indicators::{compute_indicators, Indicators};

use crate::overlay::{chart_title, signal_overlays, SignalOverlay};
use crate::window::{select_display_window, DisplayWindow};

/// Everything needed to draw one signal chart.
#[derive(Debug, Clone)]
pub struct ChartInput {
    pub symbol: String,
    pub series: CandleSeries,
    pub signal: Option<SignalLevels>,
    pub params: StrategyParams,
}

/// Render-ready chart data. Bands and overlays are aligned with
/// `window.candles`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartData {
    pub title: String,
    pub symbol: String,
    pub window: DisplayWindow,
    pub indicators: Indicators,
    pub overlays: Vec<SignalOverlay>,
}

/// Select the display window, then compute the indicators over the displayed
/// candles only, and attach signal overlays and a title.
pub fn prepare_chart(input: &ChartInput, settings: &DisplaySettings) -> Result<ChartData> {
    let window = select_display_window(&input.series, input.signal.as_ref(), settings);

    let indicators = compute_indicators(&window.candles, &input.params).map_err(|e| {
        error!(symbol = %input.symbol, error = %e, "Indicators calculation failed - cannot prepare chart");
        e
    })?;

    let overlays = input
        .signal
        .as_ref()
        .map(|s| signal_overlays(s, window.candles.len()))
        .unwrap_or_default();

    let direction = input.signal.and_then(|s| s.direction);
    let title = chart_title(&input.symbol, direction);

    info!(
        symbol = %input.symbol,
        candles = window.candles.len(),
        overlays = overlays.len(),
        fitted = window.fitted_to_signal,
        "Chart prepared"
    );

    Ok(ChartData {
        title,
        symbol: input.symbol.clone(),
        window,
        indicators,
        overlays,
    })
}
