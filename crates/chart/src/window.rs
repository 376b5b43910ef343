use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{Candle, CandleSeries, DisplaySettings, PriceRange, RangePolicy, SignalLevels};

/// Share of the fitted span added above and below when signal levels widen
/// the range.
pub const RANGE_PADDING: f64 = 0.05;

/// The candles a chart shows and the vertical range to draw them in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayWindow {
    pub candles: CandleSeries,
    pub range: PriceRange,
    /// False when `range` is just the candles' own low/high. The renderer is
    /// free to auto-scale in that case.
    pub fitted_to_signal: bool,
}

/// Select the trailing `candles_to_show` candles of `series` and compute
/// their vertical range.
///
/// Which signal levels take part depends on `settings.range_policy`. With
/// the default policy the range is widened only when entry, stop-loss and
/// take-profit are all provided, and a partial set leaves the data range
/// untouched.
pub fn select_display_window(
    series: &CandleSeries,
    signal: Option<&SignalLevels>,
    settings: &DisplaySettings,
) -> DisplayWindow {
    let candles = series.trailing(settings.candles_to_show);
    let data = data_range(candles.candles());

    let levels = signal
        .map(|s| range_levels(s, settings.range_policy))
        .unwrap_or_default();

    if levels.is_empty() {
        return DisplayWindow {
            candles,
            range: data,
            fitted_to_signal: false,
        };
    }

    let range = fit_range(data, &levels);
    debug!(
        min = range.min,
        max = range.max,
        policy = %settings.range_policy,
        "Chart range fitted to signal levels"
    );

    DisplayWindow {
        candles,
        range,
        fitted_to_signal: true,
    }
}

/// [min(low), max(high)] over `candles`.
pub fn data_range(candles: &[Candle]) -> PriceRange {
    candles.iter().fold(
        PriceRange::new(f64::INFINITY, f64::NEG_INFINITY),
        |range, c| PriceRange::new(range.min.min(c.low), range.max.max(c.high)),
    )
}

/// Widen `data` to include every level, then pad by [`RANGE_PADDING`].
pub fn fit_range(data: PriceRange, levels: &[f64]) -> PriceRange {
    levels
        .iter()
        .fold(data, |range, &level| range.including(level))
        .padded(RANGE_PADDING)
}

fn range_levels(signal: &SignalLevels, policy: RangePolicy) -> Vec<f64> {
    match policy {
        RangePolicy::AllOrNone => signal.complete().map(Vec::from).unwrap_or_default(),
        RangePolicy::PerLevel => signal.present(),
    }
}
