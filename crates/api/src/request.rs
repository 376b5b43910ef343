use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use chart::{ChartData, ChartInput};
use common::{Candle, CandleSeries, Error, Result, SignalDirection, SignalLevels, StrategyParams};

/// Body of `POST /chart/generate`.
#[derive(Debug, Clone, Deserialize)]
pub struct ChartRequest {
    pub symbol: String,
    /// OHLCV rows in any order; they are sorted by timestamp before use.
    pub data: Vec<CandleRow>,
    #[serde(default)]
    pub signal_data: Option<SignalData>,
    #[serde(default)]
    pub strategy_params: Option<StrategyParamsPatch>,
}

/// One raw OHLCV row. Every column is optional on the wire so that a missing
/// one can be reported by name.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CandleRow {
    pub timestamp: Option<Timestamp>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub close: Option<f64>,
    pub volume: Option<f64>,
}

/// ISO-8601 text or epoch milliseconds.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Text(String),
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignalData {
    pub entry_price: Option<f64>,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
    /// "long" or "short".
    pub signal_type: Option<String>,
}

/// Indicator overrides. Absent keys take the service defaults.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrategyParamsPatch {
    pub bb_window: Option<usize>,
    pub bb_std: Option<f64>,
    pub vwap_std: Option<f64>,
}

/// Successful reply; failures are returned as an [`crate::ApiError`] instead.
#[derive(Debug, Clone, Serialize)]
pub struct ChartResponse {
    pub success: bool,
    pub chart: ChartData,
    pub generated_at: String,
}

impl ChartRequest {
    /// Validate the wire request into chart input, filling unset indicator
    /// parameters from `defaults`.
    pub fn into_input(self, defaults: StrategyParams) -> Result<ChartInput> {
        let params = self
            .strategy_params
            .map(|p| p.apply(defaults))
            .unwrap_or(defaults);
        params.validate()?;

        let signal = self.signal_data.map(SignalData::into_levels).transpose()?;

        Ok(ChartInput {
            symbol: self.symbol,
            series: rows_to_series(self.data)?,
            signal,
            params,
        })
    }
}

impl StrategyParamsPatch {
    pub fn apply(self, defaults: StrategyParams) -> StrategyParams {
        StrategyParams {
            bb_window: self.bb_window.unwrap_or(defaults.bb_window),
            bb_std: self.bb_std.unwrap_or(defaults.bb_std),
            vwap_std: self.vwap_std.unwrap_or(defaults.vwap_std),
        }
    }
}

impl SignalData {
    pub fn into_levels(self) -> Result<SignalLevels> {
        let direction = self.signal_type.as_deref().map(str::parse::<SignalDirection>).transpose()?;
        Ok(SignalLevels {
            entry_price: self.entry_price,
            stop_loss: self.stop_loss,
            take_profit: self.take_profit,
            direction,
        })
    }
}

/// Convert raw rows to a validated series, sorting by timestamp first.
pub fn rows_to_series(rows: Vec<CandleRow>) -> Result<CandleSeries> {
    if rows.is_empty() {
        return Err(Error::malformed("data contains no rows"));
    }

    let mut candles = rows
        .into_iter()
        .map(CandleRow::into_candle)
        .collect::<Result<Vec<_>>>()?;
    candles.sort_by_key(|c| c.timestamp);

    CandleSeries::new(candles)
}

impl CandleRow {
    fn into_candle(self) -> Result<Candle> {
        let timestamp = required("timestamp", self.timestamp)?.to_naive()?;
        Ok(Candle {
            timestamp,
            open: required("open", self.open)?,
            high: required("high", self.high)?,
            low: required("low", self.low)?,
            close: required("close", self.close)?,
            volume: self.volume,
        })
    }
}

fn required<T>(column: &str, value: Option<T>) -> Result<T> {
    value.ok_or_else(|| Error::malformed(format!("Missing required column: {column}")))
}

impl Timestamp {
    /// Wall-clock time of the sample. Zoned text keeps its local time so the
    /// calendar date matches the exchange day.
    pub fn to_naive(&self) -> Result<NaiveDateTime> {
        match self {
            Timestamp::Millis(ms) => DateTime::from_timestamp_millis(*ms)
                .map(|dt| dt.naive_utc())
                .ok_or_else(|| Error::malformed(format!("timestamp out of range: {ms}"))),
            Timestamp::Text(text) => parse_text(text.trim()),
        }
    }
}

fn parse_text(text: &str) -> Result<NaiveDateTime> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Ok(dt.naive_local());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(text, fmt) {
            return Ok(dt);
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .ok_or_else(|| Error::malformed(format!("unrecognized timestamp: '{text}'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ts: &str, close: f64) -> CandleRow {
        CandleRow {
            timestamp: Some(Timestamp::Text(ts.into())),
            open: Some(close),
            high: Some(close + 0.001),
            low: Some(close - 0.001),
            close: Some(close),
            volume: None,
        }
    }

    #[test]
    fn timestamps_in_common_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        for text in [
            "2024-01-15T09:30:00",
            "2024-01-15 09:30:00",
            "2024-01-15T09:30:00.000",
            "2024-01-15T09:30",
            "2024-01-15T09:30:00+02:00",
            "2024-01-15T09:30:00Z",
        ] {
            assert_eq!(Timestamp::Text(text.into()).to_naive().unwrap(), expected, "{text}");
        }
        assert_eq!(
            Timestamp::Millis(1_705_311_000_000).to_naive().unwrap(),
            expected
        );
    }

    #[test]
    fn garbage_timestamp_is_malformed() {
        let err = Timestamp::Text("yesterday".into()).to_naive().unwrap_err();
        assert!(matches!(err, Error::MalformedSeries(_)));
    }

    #[test]
    fn rows_are_sorted_before_validation() {
        let series = rows_to_series(vec![
            row("2024-01-15T10:00:00", 1.2),
            row("2024-01-15T09:00:00", 1.1),
        ])
        .unwrap();
        assert_eq!(series.candles()[0].close, 1.1);
        assert_eq!(series.candles()[1].close, 1.2);
    }

    #[test]
    fn duplicate_rows_are_rejected() {
        let err = rows_to_series(vec![
            row("2024-01-15T09:00:00", 1.1),
            row("2024-01-15T09:00:00", 1.2),
        ])
        .unwrap_err();
        assert!(err.to_string().contains("duplicate"), "{err}");
    }

    #[test]
    fn missing_column_is_named() {
        let mut r = row("2024-01-15T09:00:00", 1.1);
        r.close = None;
        let err = rows_to_series(vec![r]).unwrap_err();
        assert!(err.to_string().contains("Missing required column: close"), "{err}");
    }

    #[test]
    fn params_patch_fills_from_defaults() {
        let defaults = StrategyParams {
            bb_window: 30,
            bb_std: 2.5,
            vwap_std: 1.0,
        };
        let patched = StrategyParamsPatch {
            bb_window: Some(10),
            ..Default::default()
        }
        .apply(defaults);
        assert_eq!(patched.bb_window, 10);
        assert_eq!(patched.bb_std, 2.5);
        assert_eq!(patched.vwap_std, 1.0);
    }

    #[test]
    fn signal_type_is_parsed() {
        let levels = SignalData {
            entry_price: Some(1.06),
            signal_type: Some("Short".into()),
            ..Default::default()
        }
        .into_levels()
        .unwrap();
        assert_eq!(levels.direction, Some(SignalDirection::Short));
        assert!(SignalData {
            signal_type: Some("sideways".into()),
            ..Default::default()
        }
        .into_levels()
        .is_err());
    }
}
