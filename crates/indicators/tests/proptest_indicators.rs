use chrono::{Duration, NaiveDate, NaiveDateTime};
use common::{Candle, CandleSeries, StrategyParams};
use indicators::{compute_indicators, moving_average_band, vwap_band};
use proptest::prelude::*;

fn start() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2024, 2, 26)
        .unwrap()
        .and_hms_opt(0, 0, 0)
        .unwrap()
}

/// Series with `step_minutes` spacing so that long inputs span several days.
fn series_from(rows: &[(f64, f64, f64)], step_minutes: i64) -> CandleSeries {
    let candles = rows
        .iter()
        .enumerate()
        .map(|(i, &(close, wick, volume))| {
            Candle::new(
                start() + Duration::minutes(i as i64 * step_minutes),
                close,
                close + wick,
                (close - wick).max(close * 0.5),
                close,
            )
            .with_volume(volume)
        })
        .collect();
    CandleSeries::new(candles).unwrap()
}

fn rows(max_len: usize) -> impl Strategy<Value = Vec<(f64, f64, f64)>> {
    prop::collection::vec((1.0f64..10_000.0, 0.0f64..5.0, 0.0f64..1_000_000.0), 1..max_len)
}

fn close_enough(a: f64, b: f64) -> bool {
    (a - b).abs() <= 1e-9 * a.abs().max(b.abs()).max(1.0)
}

proptest! {
    /// Center is undefined before a full window and equals the window mean after.
    #[test]
    fn moving_average_center_is_window_mean(
        data in rows(120),
        window in 1usize..30,
    ) {
        let series = series_from(&data, 60);
        let band = moving_average_band(&series, window, 2.0).unwrap();
        prop_assert_eq!(band.len(), series.len());

        let closes: Vec<f64> = series.closes().collect();
        for (i, point) in band.iter().enumerate() {
            if i + 1 < window {
                prop_assert!(point.center.is_none());
            } else {
                let slice = &closes[i + 1 - window..=i];
                let mean = slice.iter().sum::<f64>() / window as f64;
                let center = point.center.unwrap();
                prop_assert!(close_enough(center, mean), "i={} center={} mean={}", i, center, mean);
            }
        }
    }

    /// Upper and lower sit symmetrically around the center.
    #[test]
    fn moving_average_band_is_symmetric(
        data in rows(80),
        window in 2usize..20,
        k in 0.0f64..4.0,
    ) {
        let series = series_from(&data, 60);
        let band = moving_average_band(&series, window, k).unwrap();
        for point in band.iter().filter(|p| p.is_defined()) {
            let (c, u, l) = (point.center.unwrap(), point.upper.unwrap(), point.lower.unwrap());
            prop_assert!(u >= c && c >= l);
            prop_assert!(close_enough(u - c, c - l));
        }
    }

    /// VWAP output keeps one point per candle across day boundaries, each
    /// defined point is finite and the bands are symmetric.
    #[test]
    fn vwap_covers_every_candle(
        data in rows(200),
        step in prop::sample::select(vec![5i64, 60, 240, 1440]),
        k in 0.0f64..4.0,
    ) {
        let series = series_from(&data, step);
        let band = vwap_band(&series, k).unwrap();
        prop_assert_eq!(band.len(), series.len());

        for point in band.iter() {
            match point.center {
                Some(c) => {
                    let (u, l) = (point.upper.unwrap(), point.lower.unwrap());
                    prop_assert!(c.is_finite() && u.is_finite() && l.is_finite());
                    prop_assert!(close_enough(u - c, c - l));
                }
                None => prop_assert!(point.upper.is_none() && point.lower.is_none()),
            }
        }
    }

    /// The first candle of each day depends on that candle alone.
    #[test]
    fn vwap_resets_each_day(
        data in rows(100),
        k in 0.0f64..4.0,
    ) {
        let series = series_from(&data, 360);
        let band = vwap_band(&series, k).unwrap();

        let candles = series.candles();
        for i in 0..candles.len() {
            let new_day = i == 0 || candles[i].date() != candles[i - 1].date();
            if !new_day {
                continue;
            }
            let point = band.points()[i];
            if candles[i].volume == Some(0.0) {
                prop_assert!(point.center.is_none());
            } else {
                let tp = candles[i].typical_price();
                prop_assert!(close_enough(point.center.unwrap(), tp));
                prop_assert!(close_enough(point.upper.unwrap(), tp));
            }
        }
    }

    /// No hidden state: identical inputs give identical bands.
    #[test]
    fn indicators_are_idempotent(
        data in rows(150),
        bb_window in 1usize..40,
        bb_std in 0.0f64..3.0,
        vwap_std in 0.0f64..3.0,
    ) {
        let series = series_from(&data, 30);
        let params = StrategyParams { bb_window, bb_std, vwap_std };
        let a = compute_indicators(&series, &params).unwrap();
        let b = compute_indicators(&series, &params).unwrap();
        prop_assert_eq!(a, b);
    }
}
