use crate::error::ConfigError;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";
pub const CONFIG_PATH_ENV: &str = "PRICEWATCH_CONFIG";
/// One year.
pub const MAX_WINDOW_MINUTES: f64 = 60.0 * 24.0 * 365.0;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    pub default_currency: String,
    pub alert_strategies: AlertStrategiesConfig,
    #[serde(default)]
    pub monitor: MonitorSettings,
    #[serde(default)]
    pub source: SourceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlertStrategiesConfig {
    pub threshold: ThresholdConfig,
    pub variation: VariationConfig,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThresholdConfig {
    /// Zero disables the buy side.
    #[serde(default)]
    pub buy_threshold: f64,
    pub sell_threshold: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariationConfig {
    pub percentage_threshold: f64,
    pub time_window_minutes: f64,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MonitorSettings {
    pub interval_ms: u64,
    pub backoff_ms: u64,
    pub exit_keyword: String,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            interval_ms: 3000,
            backoff_ms: 2000,
            exit_keyword: "exit".to_string(),
        }
    }
}

impl MonitorSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn backoff(&self) -> Duration {
        Duration::from_millis(self.backoff_ms)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SourceConfig {
    pub ws_url: String,
    pub quote_asset: String,
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            ws_url: "wss://stream.binance.com:9443".to_string(),
            quote_asset: "USDT".to_string(),
            timeout_secs: 10,
        }
    }
}

impl Config {
    /// Reads, parses and validates the config file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: Config = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.default_currency.trim().is_empty() {
            return Err(invalid("defaultCurrency must not be empty"));
        }

        let threshold = &self.alert_strategies.threshold;
        if !threshold.buy_threshold.is_finite() || threshold.buy_threshold < 0.0 {
            return Err(invalid("buyThreshold must be zero (disabled) or positive"));
        }
        if !threshold.sell_threshold.is_finite() || threshold.sell_threshold <= 0.0 {
            return Err(invalid("sellThreshold must be positive"));
        }

        let variation = &self.alert_strategies.variation;
        if !variation.percentage_threshold.is_finite() || variation.percentage_threshold <= 0.0 {
            return Err(invalid("percentageThreshold must be positive"));
        }
        if !variation.time_window_minutes.is_finite() || variation.time_window_minutes <= 0.0 {
            return Err(invalid("timeWindowMinutes must be positive"));
        }
        if variation.time_window_minutes > MAX_WINDOW_MINUTES {
            return Err(invalid("timeWindowMinutes must be at most one year (525600)"));
        }

        if self.monitor.exit_keyword.trim().is_empty() {
            return Err(invalid("exitKeyword must not be empty"));
        }
        if self.source.timeout_secs == 0 {
            return Err(invalid("timeoutSecs must be at least 1"));
        }

        Ok(())
    }
}

/// Config path from the first CLI argument, then the environment, then the default.
pub fn resolve_path(cli_arg: Option<String>) -> String {
    cli_arg
        .or_else(|| std::env::var(CONFIG_PATH_ENV).ok())
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string())
}

fn invalid(reason: &str) -> ConfigError {
    ConfigError::Invalid(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const FULL: &str = r#"{
        "defaultCurrency": "BTC",
        "apiKey": "ignored",
        "alertStrategies": {
            "threshold": { "buyThreshold": 40000, "sellThreshold": 50000 },
            "variation": { "percentageThreshold": 5, "timeWindowMinutes": 10 }
        },
        "monitor": { "intervalMs": 1000, "backoffMs": 500, "exitKeyword": "sair" },
        "source": { "wsUrl": "wss://example.test", "quoteAsset": "USDC", "timeoutSecs": 3 }
    }"#;

    const MINIMAL: &str = r#"{
        "defaultCurrency": "ETH",
        "alertStrategies": {
            "threshold": { "sellThreshold": 4000 },
            "variation": { "percentageThreshold": 2.5, "timeWindowMinutes": 0.5 }
        }
    }"#;

    #[test]
    fn parses_full_config() {
        let config = Config::from_json(FULL).unwrap();
        assert_eq!(config.default_currency, "BTC");
        assert_eq!(config.alert_strategies.threshold.buy_threshold, 40000.0);
        assert_eq!(config.alert_strategies.threshold.sell_threshold, 50000.0);
        assert_eq!(config.alert_strategies.variation.percentage_threshold, 5.0);
        assert_eq!(config.alert_strategies.variation.time_window_minutes, 10.0);
        assert_eq!(config.monitor.interval(), Duration::from_millis(1000));
        assert_eq!(config.monitor.backoff(), Duration::from_millis(500));
        assert_eq!(config.monitor.exit_keyword, "sair");
        assert_eq!(config.source.ws_url, "wss://example.test");
        assert_eq!(config.source.quote_asset, "USDC");
        assert_eq!(config.source.timeout_secs, 3);
    }

    #[test]
    fn optional_sections_fall_back_to_defaults() {
        let config = Config::from_json(MINIMAL).unwrap();
        assert_eq!(config.alert_strategies.threshold.buy_threshold, 0.0);
        assert_eq!(config.monitor.interval_ms, 3000);
        assert_eq!(config.monitor.backoff_ms, 2000);
        assert_eq!(config.monitor.exit_keyword, "exit");
        assert_eq!(config.source.ws_url, "wss://stream.binance.com:9443");
        assert_eq!(config.source.quote_asset, "USDT");
        assert_eq!(config.source.timeout_secs, 10);
    }

    #[test]
    fn missing_sell_threshold_is_a_parse_error() {
        let raw = r#"{
            "defaultCurrency": "BTC",
            "alertStrategies": {
                "threshold": { "buyThreshold": 1 },
                "variation": { "percentageThreshold": 5, "timeWindowMinutes": 10 }
            }
        }"#;
        assert!(matches!(Config::from_json(raw), Err(ConfigError::Parse(_))));
    }

    #[test]
    fn rejects_out_of_range_values() {
        let cases = [
            MINIMAL.replace("\"ETH\"", "\"  \""),
            MINIMAL.replace("\"sellThreshold\": 4000", "\"sellThreshold\": 4000, \"buyThreshold\": -1"),
            MINIMAL.replace("4000", "0"),
            MINIMAL.replace("2.5", "0"),
            MINIMAL.replace("0.5", "-3"),
            MINIMAL.replace("0.5", "1e12"),
            MINIMAL.replace("0.5", "525601"),
        ];

        for raw in cases {
            assert!(
                matches!(Config::from_json(&raw), Err(ConfigError::Invalid(_))),
                "expected invalid config for {}",
                raw
            );
        }
    }

    #[test]
    fn accepts_a_one_year_window() {
        let config = Config::from_json(&MINIMAL.replace("0.5", "525600")).unwrap();
        assert_eq!(config.alert_strategies.variation.time_window_minutes, MAX_WINDOW_MINUTES);
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(MINIMAL.as_bytes()).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.default_currency, "ETH");
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(dir.path().join("nope.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn cli_argument_wins_path_resolution() {
        assert_eq!(resolve_path(Some("custom.json".to_string())), "custom.json");
    }
}
