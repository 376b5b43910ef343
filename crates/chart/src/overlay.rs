use serde::{Deserialize, Serialize};

use common::{SignalDirection, SignalLevels};

/// Index symbols that legitimately end in `X`.
const X_SUFFIXED_INDICES: [&str; 4] = ["DAX", "FTMX", "SPX", "NDX"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelKind {
    Entry,
    StopLoss,
    TakeProfit,
}

/// A horizontal signal line spanning the displayed candles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignalOverlay {
    pub kind: LevelKind,
    pub price: f64,
    /// Number of candles the line spans, starting at the first displayed one.
    pub span: usize,
}

/// One overlay per level that is individually provided. Unlike the range
/// fitting this never requires the full set.
pub fn signal_overlays(signal: &SignalLevels, span: usize) -> Vec<SignalOverlay> {
    [
        (LevelKind::Entry, signal.entry()),
        (LevelKind::StopLoss, signal.stop()),
        (LevelKind::TakeProfit, signal.target()),
    ]
    .into_iter()
    .filter_map(|(kind, price)| price.map(|price| SignalOverlay { kind, price, span }))
    .collect()
}

/// Display name for a symbol. Data feeds append a trailing `X` to some
/// tickers; it is dropped unless the symbol is an index that really ends in
/// `X`.
pub fn display_symbol(symbol: &str) -> &str {
    match symbol.strip_suffix('X') {
        Some(stripped) if !X_SUFFIXED_INDICES.contains(&symbol) => stripped,
        _ => symbol,
    }
}

/// Chart title: `EURUSD - LONG Signal`, or just the symbol without a direction.
pub fn chart_title(symbol: &str, direction: Option<SignalDirection>) -> String {
    let name = display_symbol(symbol);
    match direction {
        Some(d) => format!("{name} - {} Signal", d.label()),
        None => name.to_string(),
    }
}
