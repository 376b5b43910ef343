pub mod overlay;
pub mod prepare;
pub mod window;

pub use overlay::{chart_title, display_symbol, signal_overlays, LevelKind, SignalOverlay};
pub use prepare::{prepare_chart, ChartData, ChartInput};
pub use window::{data_range, fit_range, select_display_window, DisplayWindow, RANGE_PADDING};
