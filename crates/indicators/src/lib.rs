pub mod bands;
pub mod config;
pub mod engine;

pub use bands::{BandIndicator, MovingAverageBand, VwapBand};
pub use config::IndicatorFileConfig;
pub use engine::{compute_indicators, Indicators};

use common::{BandSeries, CandleSeries, Result};

/// Moving-average band over the closes of `series`.
pub fn moving_average_band(series: &CandleSeries, window: usize, num_std: f64) -> Result<BandSeries> {
    Ok(MovingAverageBand::new(window, num_std)?.compute(series))
}

/// Daily-reset VWAP band over `series`.
pub fn vwap_band(series: &CandleSeries, num_std: f64) -> Result<BandSeries> {
    Ok(VwapBand::new(num_std)?.compute(series))
}
