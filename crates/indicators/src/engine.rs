use serde::{Deserialize, Serialize};
use tracing::debug;

use common::{BandSeries, CandleSeries, Result, StrategyParams};

use crate::bands::{BandIndicator, MovingAverageBand, VwapBand};

/// Both band series for one candle series, each aligned 1:1 with it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Indicators {
    pub moving_average: BandSeries,
    pub vwap: BandSeries,
}

/// Compute the moving-average and VWAP bands for `series`.
///
/// Parameters are validated before anything is computed. The result depends
/// only on the inputs, so repeated calls give bit-identical output.
pub fn compute_indicators(series: &CandleSeries, params: &StrategyParams) -> Result<Indicators> {
    params.validate()?;

    let moving_average = MovingAverageBand::new(params.bb_window, params.bb_std)?;
    let vwap = VwapBand::new(params.vwap_std)?;

    let indicators = Indicators {
        moving_average: run(&moving_average, series),
        vwap: run(&vwap, series),
    };

    debug!(
        candles = series.len(),
        bb_window = params.bb_window,
        "Indicators calculated"
    );
    Ok(indicators)
}

fn run(indicator: &dyn BandIndicator, series: &CandleSeries) -> BandSeries {
    let band = indicator.compute(series);
    let defined = band.iter().filter(|p| p.center.is_some()).count();
    debug!(indicator = indicator.name(), defined, total = band.len(), "Band computed");
    band
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use common::{Candle, Error};

    fn hourly(n: usize) -> CandleSeries {
        let start = NaiveDate::from_ymd_opt(2024, 1, 2)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        let candles = (0..n)
            .map(|i| {
                let open = 1.05 + i as f64 * 0.0001;
                Candle::new(
                    start + Duration::hours(i as i64),
                    open,
                    open + 0.0005,
                    open - 0.0003,
                    open + 0.0002,
                )
                .with_volume(1000.0)
            })
            .collect();
        CandleSeries::new(candles).unwrap()
    }

    #[test]
    fn bands_align_with_series() {
        let series = hourly(100);
        let out = compute_indicators(&series, &StrategyParams::default()).unwrap();
        assert_eq!(out.moving_average.len(), 100);
        assert_eq!(out.vwap.len(), 100);
        assert!(out.moving_average.points()[18].center.is_none());
        assert!(out.moving_average.points()[19].is_defined());
        assert!(out.vwap.points()[0].is_defined());
    }

    #[test]
    fn invalid_params_fail_before_computing() {
        let params = StrategyParams {
            bb_window: 0,
            ..Default::default()
        };
        let err = compute_indicators(&hourly(10), &params).unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let series = hourly(75);
        let params = StrategyParams {
            bb_window: 7,
            bb_std: 1.5,
            vwap_std: 2.5,
        };
        let a = compute_indicators(&series, &params).unwrap();
        let b = compute_indicators(&series, &params).unwrap();
        assert_eq!(a, b);
    }
}
