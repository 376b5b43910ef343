use serde::{Deserialize, Serialize};
use tracing::info;

use common::{Result, StrategyParams};

/// Indicator defaults file (TOML).
///
/// Example `config/indicators.toml`:
/// ```toml
/// [params]
/// bb_window = 20
/// bb_std = 2.0
/// vwap_std = 2.0
/// ```
///
/// Keys left out fall back to the built-in [`StrategyParams`] defaults.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct IndicatorFileConfig {
    #[serde(default)]
    pub params: StrategyParams,
}

impl IndicatorFileConfig {
    /// Load and validate from a TOML file.
    pub fn load(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let cfg = Self::parse(&content)?;
        info!(path, params = ?cfg.params, "Loaded indicator defaults");
        Ok(cfg)
    }

    pub fn parse(content: &str) -> Result<Self> {
        let cfg: Self = toml::from_str(content)?;
        cfg.params.validate()?;
        Ok(cfg)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::Error;

    #[test]
    fn partial_table_keeps_builtin_defaults() {
        let cfg = IndicatorFileConfig::parse("[params]\nbb_window = 50\n").unwrap();
        assert_eq!(cfg.params.bb_window, 50);
        assert_eq!(cfg.params.bb_std, 2.0);
        assert_eq!(cfg.params.vwap_std, 2.0);
    }

    #[test]
    fn empty_file_is_all_defaults() {
        let cfg = IndicatorFileConfig::parse("").unwrap();
        assert_eq!(cfg.params, StrategyParams::default());
    }

    #[test]
    fn invalid_params_are_rejected() {
        let err = IndicatorFileConfig::parse("[params]\nbb_window = 0\n").unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn bad_toml_is_reported() {
        let err = IndicatorFileConfig::parse("[params\n").unwrap_err();
        assert!(matches!(err, Error::Toml(_)));
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = IndicatorFileConfig::load("/nonexistent/indicators.toml").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }
}
