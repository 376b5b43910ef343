use common::{BandPoint, BandSeries, CandleSeries, Error, Result};

use super::BandIndicator;

/// Moving-average band (Bollinger): rolling mean of close ± `num_std`
/// rolling standard deviations.
///
/// The deviation is the *sample* standard deviation (N-1 denominator), the
/// same convention as the usual rolling-statistics libraries. This makes the
/// band slightly wider than a population-σ band on short windows. It also
/// means a window of 1 has a center but no bands.
#[derive(Debug, Clone)]
pub struct MovingAverageBand {
    pub window: usize,
    pub num_std: f64,
}

impl MovingAverageBand {
    pub fn new(window: usize, num_std: f64) -> Result<Self> {
        if window == 0 {
            return Err(Error::config("moving-average window must be at least 1"));
        }
        if !num_std.is_finite() || num_std < 0.0 {
            return Err(Error::config(format!(
                "moving-average band multiplier must be non-negative, got {num_std}"
            )));
        }
        Ok(Self { window, num_std })
    }

    /// Band over a slice of close prices (oldest first). The first
    /// `window - 1` points are undefined; a window longer than the input
    /// yields an all-undefined band.
    pub fn compute_closes(&self, closes: &[f64]) -> BandSeries {
        let mut stats = RollingStats::default();

        closes
            .iter()
            .enumerate()
            .map(|(i, &close)| {
                if i >= self.window {
                    stats.evict(closes[i - self.window]);
                }
                stats.push(close);

                if stats.count < self.window {
                    BandPoint::UNDEFINED
                } else {
                    BandPoint::from_spread(stats.mean, stats.sample_std(), self.num_std)
                }
            })
            .collect()
    }
}

impl BandIndicator for MovingAverageBand {
    fn name(&self) -> &str {
        "moving_average"
    }

    fn compute(&self, series: &CandleSeries) -> BandSeries {
        let closes: Vec<f64> = series.closes().collect();
        self.compute_closes(&closes)
    }
}

/// Sliding-window mean and sum of squared deviations (Welford), updated in
/// O(1) per candle.
///
/// Removing a large value leaves rounding residue in `m2`, so the length of
/// the trailing run of equal values is tracked as well. When that run covers
/// the whole window the stats are reset to exact values: mean = the repeated
/// close, deviation = 0.
#[derive(Debug, Clone, Default)]
struct RollingStats {
    count: usize,
    mean: f64,
    m2: f64,
    last: f64,
    run: usize,
}

impl RollingStats {
    fn push(&mut self, x: f64) {
        self.run = if self.count > 0 && x == self.last { self.run + 1 } else { 1 };
        self.last = x;

        self.count += 1;
        let delta = x - self.mean;
        self.mean += delta / self.count as f64;
        self.m2 += delta * (x - self.mean);

        if self.run >= self.count {
            self.mean = x;
            self.m2 = 0.0;
        }
    }

    fn evict(&mut self, x: f64) {
        if self.count <= 1 {
            *self = Self::default();
            return;
        }
        let n = self.count as f64;
        let delta = x - self.mean;
        self.mean = (self.mean * n - x) / (n - 1.0);
        self.m2 -= delta * (x - self.mean);
        self.count -= 1;

        // float error on near-constant windows
        if self.m2 < 0.0 {
            self.m2 = 0.0;
        }
    }

    fn sample_std(&self) -> Option<f64> {
        if self.count < 2 {
            return None;
        }
        Some((self.m2 / (self.count - 1) as f64).max(0.0).sqrt())
    }
}
