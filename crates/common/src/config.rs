use std::net::{IpAddr, SocketAddr};

use crate::{DisplaySettings, Error, RangePolicy, Result};

/// Service configuration loaded from environment variables at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub host: IpAddr,
    pub port: u16,
    pub display: DisplaySettings,
    /// Optional TOML file with default indicator parameters.
    pub indicator_config_path: Option<String>,
}

impl Config {
    /// Load configuration from environment variables, reading `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let host = match lookup("CHART_HOST") {
            Some(v) => v
                .trim()
                .parse()
                .map_err(|_| Error::config(format!("CHART_HOST is not an IP address: '{v}'")))?,
            None => IpAddr::from([0, 0, 0, 0]),
        };

        let port = parse_or("CHART_PORT", lookup("CHART_PORT"), 8000u16)?;
        let candles_to_show = parse_or(
            "CHART_CANDLES_TO_SHOW",
            lookup("CHART_CANDLES_TO_SHOW"),
            DisplaySettings::DEFAULT_CANDLES_TO_SHOW,
        )?;
        let range_policy = match lookup("CHART_RANGE_POLICY") {
            Some(v) => v.parse::<RangePolicy>()?,
            None => RangePolicy::default(),
        };

        Ok(Config {
            host,
            port,
            display: DisplaySettings::new(candles_to_show, range_policy)?,
            indicator_config_path: lookup("INDICATOR_CONFIG_PATH").filter(|p| !p.trim().is_empty()),
        })
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn parse_or<T: std::str::FromStr>(key: &str, value: Option<String>, default: T) -> Result<T> {
    match value {
        Some(v) => v
            .trim()
            .parse()
            .map_err(|_| Error::config(format!("{key} has an invalid value: '{v}'"))),
        None => Ok(default),
    }
}
