use crate::error::AlertError;
use chrono::{DateTime, Utc};

/// One priced observation of an asset.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSample {
    symbol: String,
    display_name: String,
    price: f64,
    observed_at: DateTime<Utc>,
}

impl PriceSample {
    pub fn new(
        symbol: impl Into<String>,
        display_name: impl Into<String>,
        price: f64,
        observed_at: DateTime<Utc>,
    ) -> Result<Self, AlertError> {
        let symbol = symbol.into();
        if !price.is_finite() || price <= 0.0 {
            return Err(AlertError::InvalidSample(format!(
                "price for {} must be positive, got {}",
                symbol, price
            )));
        }

        Ok(Self {
            symbol,
            display_name: display_name.into(),
            price,
            observed_at,
        })
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn price(&self) -> f64 {
        self.price
    }

    pub fn observed_at(&self) -> DateTime<Utc> {
        self.observed_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_non_positive_prices() {
        let now = Utc::now();
        assert!(PriceSample::new("BTC", "Bitcoin", 0.0, now).is_err());
        assert!(PriceSample::new("BTC", "Bitcoin", -1.0, now).is_err());
        assert!(PriceSample::new("BTC", "Bitcoin", f64::NAN, now).is_err());
        assert!(PriceSample::new("BTC", "Bitcoin", f64::INFINITY, now).is_err());
    }

    #[test]
    fn keeps_fields() {
        let now = Utc::now();
        let sample = PriceSample::new("ETH", "Ethereum", 3100.5, now).unwrap();
        assert_eq!(sample.symbol(), "ETH");
        assert_eq!(sample.display_name(), "Ethereum");
        assert_eq!(sample.price(), 3100.5);
        assert_eq!(sample.observed_at(), now);
    }
}
