pub mod binance;

use crate::error::FetchError;
use crate::model::PriceSample;
use std::future::Future;

/// Where the monitor gets its prices from. `query` is whatever the user
/// typed: a ticker symbol or a common asset name.
pub trait PriceSource {
    fn fetch_price(&self, query: &str) -> impl Future<Output = Result<PriceSample, FetchError>> + Send;
}
