use crate::api::PriceSource;
use crate::config::SourceConfig;
use crate::error::FetchError;
use crate::model::PriceSample;
use chrono::Utc;
use futures_util::StreamExt;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite;

/// Common asset names users type instead of ticker symbols.
const COMMON_NAMES: &[(&str, &str)] = &[
    ("bitcoin", "BTC"),
    ("ethereum", "ETH"),
    ("solana", "SOL"),
    ("dogecoin", "DOGE"),
    ("cardano", "ADA"),
    ("polkadot", "DOT"),
    ("chainlink", "LINK"),
    ("litecoin", "LTC"),
    ("binance coin", "BNB"),
    ("avalanche", "AVAX"),
];

#[derive(Debug, Serialize, Deserialize)]
struct TickerData {
    #[serde(rename = "s")]
    symbol: String,
    #[serde(rename = "c")]
    last_price: String,
    #[serde(rename = "P", default)]
    change_percent: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub symbol: String,
    pub display_name: String,
}

/// Maps user input to a canonical symbol and a display name.
pub fn resolve_asset(query: &str) -> Result<Asset, FetchError> {
    let query = query.trim();
    if query.is_empty() {
        return Err(FetchError::NotFound("Empty symbol".to_string()));
    }

    let lower = query.to_lowercase();
    if let Some((name, symbol)) = COMMON_NAMES
        .iter()
        .find(|(name, symbol)| *name == lower || symbol.eq_ignore_ascii_case(query))
    {
        return Ok(Asset {
            symbol: symbol.to_string(),
            display_name: title_case(name),
        });
    }

    if !query.chars().all(|c| c.is_ascii_alphanumeric()) {
        return Err(FetchError::NotFound(format!("Cryptocurrency {}", query)));
    }

    let symbol = query.to_uppercase();
    Ok(Asset {
        display_name: symbol.clone(),
        symbol,
    })
}

fn title_case(name: &str) -> String {
    name.split(' ')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect(),
                None => String::new(),
            }
        })
        .collect::<Vec<String>>()
        .join(" ")
}

fn parse_ticker(text: &str, pair: &str) -> Result<f64, FetchError> {
    let ticker: TickerData = serde_json::from_str(text)?;
    if !ticker.symbol.eq_ignore_ascii_case(pair) {
        return Err(FetchError::Transport(format!(
            "expected ticker for {}, got {}",
            pair, ticker.symbol
        )));
    }

    debug!(
        "{}: Price = {} (Change: {}%)",
        ticker.symbol, ticker.last_price, ticker.change_percent
    );

    ticker
        .last_price
        .parse::<f64>()
        .map_err(|e| FetchError::Transport(format!("bad price '{}': {}", ticker.last_price, e)))
}

/// Reads one ticker frame per fetch from the Binance public market stream.
pub struct BinanceTickerSource {
    ws_url: String,
    quote_asset: String,
    timeout: Duration,
}

impl BinanceTickerSource {
    pub fn new(config: &SourceConfig) -> Self {
        Self {
            ws_url: config.ws_url.trim_end_matches('/').to_string(),
            quote_asset: config.quote_asset.to_uppercase(),
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn pair(&self, symbol: &str) -> String {
        format!("{}{}", symbol, self.quote_asset)
    }

    fn stream_url(&self, pair: &str) -> String {
        format!("{}/ws/{}@ticker", self.ws_url, pair.to_lowercase())
    }

    async fn read_ticker(&self, url: &str, pair: &str) -> Result<f64, FetchError> {
        debug!("Connecting to Binance WebSocket: {}", url);
        let (mut ws_stream, _) = connect_async(url).await?;

        while let Some(message) = ws_stream.next().await {
            match message? {
                tungstenite::protocol::Message::Text(text) => {
                    let price = parse_ticker(&text, pair);
                    if let Err(e) = ws_stream.close(None).await {
                        warn!("Failed to close ticker stream for {}: {}", pair, e);
                    }
                    return price;
                }
                tungstenite::protocol::Message::Close(_) => {
                    debug!("WebSocket closed before a ticker for {}", pair);
                    break;
                }
                _ => {} // Ignore other message types
            }
        }

        Err(FetchError::NotFound(format!("Cryptocurrency {}", pair)))
    }
}

impl PriceSource for BinanceTickerSource {
    async fn fetch_price(&self, query: &str) -> Result<PriceSample, FetchError> {
        let asset = resolve_asset(query)?;
        let pair = self.pair(&asset.symbol);
        let url = self.stream_url(&pair);

        let price = match tokio::time::timeout(self.timeout, self.read_ticker(&url, &pair)).await {
            Ok(result) => result?,
            Err(_) => {
                return Err(FetchError::NotFound(format!(
                    "Cryptocurrency {} (no ticker within {}s)",
                    pair,
                    self.timeout.as_secs()
                )))
            }
        };

        PriceSample::new(asset.symbol, asset.display_name, price, Utc::now())
            .map_err(|e| FetchError::Transport(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn source() -> BinanceTickerSource {
        BinanceTickerSource::new(&SourceConfig {
            ws_url: "wss://stream.binance.com:9443/".to_string(),
            quote_asset: "usdt".to_string(),
            timeout_secs: 5,
        })
    }

    #[test]
    fn resolves_common_names() {
        let asset = resolve_asset("Bitcoin").unwrap();
        assert_eq!(asset.symbol, "BTC");
        assert_eq!(asset.display_name, "Bitcoin");

        let asset = resolve_asset(" binance coin ").unwrap();
        assert_eq!(asset.symbol, "BNB");
        assert_eq!(asset.display_name, "Binance Coin");
    }

    #[test]
    fn known_symbols_get_their_display_name() {
        let asset = resolve_asset("eth").unwrap();
        assert_eq!(asset.symbol, "ETH");
        assert_eq!(asset.display_name, "Ethereum");
    }

    #[test]
    fn unknown_symbols_are_upper_cased() {
        let asset = resolve_asset("pepe").unwrap();
        assert_eq!(asset.symbol, "PEPE");
        assert_eq!(asset.display_name, "PEPE");
    }

    #[test]
    fn rejects_unusable_queries() {
        assert!(matches!(resolve_asset("   "), Err(FetchError::NotFound(_))));
        assert!(matches!(resolve_asset("btc/usdt"), Err(FetchError::NotFound(_))));
    }

    #[test]
    fn builds_stream_url() {
        let source = source();
        let pair = source.pair("BTC");
        assert_eq!(pair, "BTCUSDT");
        assert_eq!(
            source.stream_url(&pair),
            "wss://stream.binance.com:9443/ws/btcusdt@ticker"
        );
    }

    #[test]
    fn parses_ticker_payload() {
        let text = r#"{"e":"24hrTicker","E":1700000000000,"s":"BTCUSDT","p":"120.5","P":"0.25","c":"48123.45","v":"1000"}"#;
        assert_eq!(parse_ticker(text, "BTCUSDT").unwrap(), 48123.45);
    }

    #[test]
    fn rejects_mismatched_or_malformed_ticker() {
        let other = r#"{"s":"ETHUSDT","c":"3000.0","P":"1.0"}"#;
        assert!(matches!(parse_ticker(other, "BTCUSDT"), Err(FetchError::Transport(_))));

        let bad_price = r#"{"s":"BTCUSDT","c":"n/a","P":"1.0"}"#;
        assert!(matches!(parse_ticker(bad_price, "BTCUSDT"), Err(FetchError::Transport(_))));

        assert!(matches!(parse_ticker("not json", "BTCUSDT"), Err(FetchError::Transport(_))));
    }
}
