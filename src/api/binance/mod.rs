pub mod ws;

pub use ws::BinanceTickerSource;
