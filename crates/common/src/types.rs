use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One OHLCV sample.
///
/// Timestamps are wall-clock times with no zone attached. Callers holding
/// zoned data reduce it to local time before building a series, so that the
/// calendar date seen by VWAP grouping is the trading-day date.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub timestamp: NaiveDateTime,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    /// `None` on instruments without volume (e.g. spot FX). A series is
    /// either fully with or fully without volume.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume: Option<f64>,
}

impl Candle {
    pub fn new(timestamp: NaiveDateTime, open: f64, high: f64, low: f64, close: f64) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume: None,
        }
    }

    pub fn with_volume(mut self, volume: f64) -> Self {
        self.volume = Some(volume);
        self
    }

    /// (high + low + close) / 3
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }

    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    fn validate(&self, index: usize) -> Result<()> {
        for (field, value) in [
            ("open", self.open),
            ("high", self.high),
            ("low", self.low),
            ("close", self.close),
        ] {
            if !value.is_finite() || value <= 0.0 {
                return Err(Error::malformed(format!(
                    "candle {index} ({}): {field} must be a positive number, got {value}",
                    self.timestamp
                )));
            }
        }
        if let Some(volume) = self.volume {
            if !volume.is_finite() || volume < 0.0 {
                return Err(Error::malformed(format!(
                    "candle {index} ({}): volume must be non-negative, got {volume}",
                    self.timestamp
                )));
            }
        }
        Ok(())
    }
}

/// A non-empty run of candles in strictly ascending timestamp order.
///
/// The only way to get one is through [`CandleSeries::new`], so everything
/// downstream can rely on ordering, uniqueness and sane prices without
/// checking again.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Candle>", into = "Vec<Candle>")]
pub struct CandleSeries {
    candles: Vec<Candle>,
    has_volume: bool,
}

impl CandleSeries {
    pub fn new(candles: Vec<Candle>) -> Result<Self> {
        let first = candles
            .first()
            .ok_or_else(|| Error::malformed("series contains no candles"))?;
        let has_volume = first.volume.is_some();

        for (i, candle) in candles.iter().enumerate() {
            candle.validate(i)?;

            if candle.volume.is_some() != has_volume {
                return Err(Error::malformed(format!(
                    "candle {i} ({}): volume must be given for every candle or for none",
                    candle.timestamp
                )));
            }

            if i > 0 {
                let prev = candles[i - 1].timestamp;
                if candle.timestamp == prev {
                    return Err(Error::malformed(format!(
                        "candle {i}: duplicate timestamp {}",
                        candle.timestamp
                    )));
                }
                if candle.timestamp < prev {
                    return Err(Error::malformed(format!(
                        "candle {i}: timestamp {} is earlier than previous {prev}",
                        candle.timestamp
                    )));
                }
            }
        }

        Ok(Self { candles, has_volume })
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    /// Always false for a constructed series; kept for slice-like ergonomics.
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    /// Whether the series carries real volume. Without it every candle
    /// weighs 1.0 in VWAP.
    pub fn has_volume(&self) -> bool {
        self.has_volume
    }

    /// The last `count` candles, or all of them if the series is shorter.
    pub fn tail(&self, count: usize) -> &[Candle] {
        let start = self.candles.len().saturating_sub(count);
        &self.candles[start..]
    }

    /// The last `count` candles (at least one) as a series of their own.
    pub fn trailing(&self, count: usize) -> CandleSeries {
        CandleSeries {
            candles: self.tail(count.max(1)).to_vec(),
            has_volume: self.has_volume,
        }
    }

    pub fn closes(&self) -> impl Iterator<Item = f64> + '_ {
        self.candles.iter().map(|c| c.close)
    }
}

impl TryFrom<Vec<Candle>> for CandleSeries {
    type Error = Error;

    fn try_from(candles: Vec<Candle>) -> Result<Self> {
        CandleSeries::new(candles)
    }
}

impl From<CandleSeries> for Vec<Candle> {
    fn from(series: CandleSeries) -> Self {
        series.candles
    }
}

/// Indicator settings for one chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrategyParams {
    /// Moving-average / std-dev lookback in candles.
    pub bb_window: usize,
    /// Moving-average band multiplier.
    pub bb_std: f64,
    /// VWAP band multiplier.
    pub vwap_std: f64,
}

impl Default for StrategyParams {
    fn default() -> Self {
        Self {
            bb_window: 20,
            bb_std: 2.0,
            vwap_std: 2.0,
        }
    }
}

impl StrategyParams {
    pub fn validate(&self) -> Result<()> {
        if self.bb_window == 0 {
            return Err(Error::config("bb_window must be a positive integer"));
        }
        for (name, value) in [("bb_std", self.bb_std), ("vwap_std", self.vwap_std)] {
            if !value.is_finite() || value < 0.0 {
                return Err(Error::config(format!(
                    "{name} must be a non-negative number, got {value}"
                )));
            }
        }
        Ok(())
    }
}

/// One point of a band series. Each component is `None` where the indicator
/// has no value yet, and the renderer skips those points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BandPoint {
    pub center: Option<f64>,
    pub upper: Option<f64>,
    pub lower: Option<f64>,
}

impl BandPoint {
    pub const UNDEFINED: BandPoint = BandPoint {
        center: None,
        upper: None,
        lower: None,
    };

    /// Center with symmetric bands at `num_std` spreads. An undefined spread
    /// leaves the bands undefined but keeps the center.
    pub fn from_spread(center: f64, spread: Option<f64>, num_std: f64) -> Self {
        let offset = spread.map(|s| num_std * s);
        BandPoint {
            center: Some(center),
            upper: offset.map(|o| center + o),
            lower: offset.map(|o| center - o),
        }
    }

    pub fn is_defined(&self) -> bool {
        self.center.is_some() && self.upper.is_some() && self.lower.is_some()
    }
}

/// Band values aligned 1:1 with the candles they were computed from.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BandSeries {
    points: Vec<BandPoint>,
}

impl BandSeries {
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn points(&self) -> &[BandPoint] {
        &self.points
    }

    pub fn iter(&self) -> impl Iterator<Item = &BandPoint> {
        self.points.iter()
    }
}

impl FromIterator<BandPoint> for BandSeries {
    fn from_iter<I: IntoIterator<Item = BandPoint>>(iter: I) -> Self {
        Self {
            points: iter.into_iter().collect(),
        }
    }
}

/// Direction of a trade signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SignalDirection {
    Long,
    Short,
}

impl SignalDirection {
    /// Upper-case label used in chart titles.
    pub fn label(&self) -> &'static str {
        match self {
            SignalDirection::Long => "LONG",
            SignalDirection::Short => "SHORT",
        }
    }
}

impl std::fmt::Display for SignalDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SignalDirection::Long => write!(f, "long"),
            SignalDirection::Short => write!(f, "short"),
        }
    }
}

impl std::str::FromStr for SignalDirection {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "long" => Ok(SignalDirection::Long),
            "short" => Ok(SignalDirection::Short),
            other => Err(Error::config(format!(
                "signal direction must be 'long' or 'short', got '{other}'"
            ))),
        }
    }
}

/// Trade levels to draw on the chart. A level that is absent, zero or
/// negative counts as not provided.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SignalLevels {
    #[serde(default)]
    pub entry_price: Option<f64>,
    #[serde(default)]
    pub stop_loss: Option<f64>,
    #[serde(default)]
    pub take_profit: Option<f64>,
    #[serde(default)]
    pub direction: Option<SignalDirection>,
}

impl SignalLevels {
    pub fn new(entry_price: f64, stop_loss: f64, take_profit: f64) -> Self {
        Self {
            entry_price: Some(entry_price),
            stop_loss: Some(stop_loss),
            take_profit: Some(take_profit),
            direction: None,
        }
    }

    pub fn with_direction(mut self, direction: SignalDirection) -> Self {
        self.direction = Some(direction);
        self
    }

    pub fn entry(&self) -> Option<f64> {
        provided(self.entry_price)
    }

    pub fn stop(&self) -> Option<f64> {
        provided(self.stop_loss)
    }

    pub fn target(&self) -> Option<f64> {
        provided(self.take_profit)
    }

    /// All three levels, or `None` if any of them is missing.
    pub fn complete(&self) -> Option<[f64; 3]> {
        Some([self.entry()?, self.stop()?, self.target()?])
    }

    /// Whichever levels are individually provided.
    pub fn present(&self) -> Vec<f64> {
        [self.entry(), self.stop(), self.target()]
            .into_iter()
            .flatten()
            .collect()
    }
}

fn provided(level: Option<f64>) -> Option<f64> {
    level.filter(|p| p.is_finite() && *p > 0.0)
}

/// Vertical price bounds of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

impl PriceRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    pub fn contains(&self, price: f64) -> bool {
        price >= self.min && price <= self.max
    }

    /// Smallest range holding both `self` and `price`.
    pub fn including(self, price: f64) -> Self {
        Self {
            min: self.min.min(price),
            max: self.max.max(price),
        }
    }

    /// Widened by `fraction` of the span on each side.
    pub fn padded(self, fraction: f64) -> Self {
        let padding = self.span() * fraction;
        Self {
            min: self.min - padding,
            max: self.max + padding,
        }
    }
}

/// How signal levels widen the vertical range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RangePolicy {
    /// Widen only when entry, stop-loss and take-profit are all provided.
    #[default]
    AllOrNone,
    /// Widen by whichever levels are provided.
    PerLevel,
}

impl std::fmt::Display for RangePolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RangePolicy::AllOrNone => write!(f, "all-or-none"),
            RangePolicy::PerLevel => write!(f, "per-level"),
        }
    }
}

impl std::str::FromStr for RangePolicy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "all-or-none" => Ok(RangePolicy::AllOrNone),
            "per-level" => Ok(RangePolicy::PerLevel),
            other => Err(Error::config(format!(
                "range policy must be 'all-or-none' or 'per-level', got '{other}'"
            ))),
        }
    }
}

/// How much of the series a chart shows and how its range is fitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySettings {
    pub candles_to_show: usize,
    #[serde(default)]
    pub range_policy: RangePolicy,
}

impl DisplaySettings {
    pub const DEFAULT_CANDLES_TO_SHOW: usize = 100;

    pub fn new(candles_to_show: usize, range_policy: RangePolicy) -> Result<Self> {
        if candles_to_show == 0 {
            return Err(Error::config("candles_to_show must be greater than zero"));
        }
        Ok(Self {
            candles_to_show,
            range_policy,
        })
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            candles_to_show: Self::DEFAULT_CANDLES_TO_SHOW,
            range_policy: RangePolicy::AllOrNone,
        }
    }
}
