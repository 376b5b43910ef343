use chrono::NaiveDate;

use common::{BandPoint, BandSeries, CandleSeries, Error, Result};

use super::BandIndicator;

/// Session VWAP with volume-weighted deviation bands, reset at every
/// calendar-date change.
///
/// Series without volume weigh each candle as 1.0, which turns VWAP into a
/// running mean of typical price.
#[derive(Debug, Clone)]
pub struct VwapBand {
    pub num_std: f64,
}

impl VwapBand {
    pub fn new(num_std: f64) -> Result<Self> {
        if !num_std.is_finite() || num_std < 0.0 {
            return Err(Error::config(format!(
                "VWAP band multiplier must be non-negative, got {num_std}"
            )));
        }
        Ok(Self { num_std })
    }
}

impl BandIndicator for VwapBand {
    fn name(&self) -> &str {
        "vwap"
    }

    fn compute(&self, series: &CandleSeries) -> BandSeries {
        let mut session = Session::default();

        series
            .candles()
            .iter()
            .map(|candle| {
                session.roll_to(candle.date());
                // volume is all-or-nothing per series; `None` means unweighted
                let volume = candle.volume.unwrap_or(1.0);

                match session.add(candle.typical_price(), volume) {
                    Some((vwap, spread)) => BandPoint::from_spread(vwap, Some(spread), self.num_std),
                    None => BandPoint::UNDEFINED,
                }
            })
            .collect()
    }
}

/// Running sums for one trading day.
#[derive(Debug, Default)]
struct Session {
    date: Option<NaiveDate>,
    cum_volume: f64,
    cum_tp_volume: f64,
    cum_sq_dev: f64,
}

impl Session {
    fn roll_to(&mut self, date: NaiveDate) {
        if self.date != Some(date) {
            *self = Session {
                date: Some(date),
                ..Session::default()
            };
        }
    }

    /// Accumulate one candle; returns (vwap, spread), or `None` while the
    /// session has seen no volume.
    fn add(&mut self, typical_price: f64, volume: f64) -> Option<(f64, f64)> {
        self.cum_volume += volume;
        self.cum_tp_volume += typical_price * volume;

        if self.cum_volume <= 0.0 {
            return None;
        }

        let vwap = self.cum_tp_volume / self.cum_volume;
        self.cum_sq_dev += volume * (typical_price - vwap).powi(2);
        let variance = (self.cum_sq_dev / self.cum_volume).max(0.0);

        Some((vwap, variance.sqrt()))
    }
}
