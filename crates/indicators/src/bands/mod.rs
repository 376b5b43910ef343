pub mod moving_average;
pub mod vwap;

pub use moving_average::MovingAverageBand;
pub use vwap::VwapBand;

use common::{BandSeries, CandleSeries};

/// A band indicator computed over a whole candle series at once.
pub trait BandIndicator: Send + Sync {
    /// Short identifier used in logs.
    fn name(&self) -> &str;

    /// One point per candle, in series order.
    fn compute(&self, series: &CandleSeries) -> BandSeries;
}
