use super::rule::AlertRule;
use crate::config::ThresholdConfig;
use crate::error::AlertError;
use crate::model::PriceSample;
use crate::ui::format::{format_grouped, format_price};

/// Fires when the price reaches a fixed buy (lower) or sell (upper) bound.
/// Both bounds are inclusive. A buy threshold of zero disables the buy side.
#[derive(Debug, Clone)]
pub struct ThresholdRule {
    buy_threshold: f64,
    sell_threshold: f64,
}

impl ThresholdRule {
    pub fn new(buy_threshold: f64, sell_threshold: f64) -> Self {
        Self {
            buy_threshold,
            sell_threshold,
        }
    }

    pub fn from_config(config: &ThresholdConfig) -> Self {
        Self::new(config.buy_threshold, config.sell_threshold)
    }

    fn buy_triggered(&self, price: f64) -> bool {
        self.buy_threshold > 0.0 && price <= self.buy_threshold
    }

    fn sell_triggered(&self, price: f64) -> bool {
        price >= self.sell_threshold
    }
}

impl AlertRule for ThresholdRule {
    fn name(&self) -> &str {
        "threshold"
    }

    fn evaluate(&mut self, sample: &PriceSample) -> Result<bool, AlertError> {
        let price = sample.price();
        let fired = self.buy_triggered(price) || self.sell_triggered(price);
        log::debug!(
            "threshold {}: price={} buy={} sell={} fired={}",
            sample.symbol(),
            price,
            self.buy_threshold,
            self.sell_threshold,
            fired
        );
        Ok(fired)
    }

    fn describe(&self, sample: &PriceSample) -> Result<String, AlertError> {
        let price = sample.price();

        if self.buy_triggered(price) {
            return Ok(format!(
                "🟢 BUY ALERT: {} is at {} (below buy threshold ${})",
                sample.display_name(),
                format_price(price),
                format_grouped(self.buy_threshold)
            ));
        }

        if self.sell_triggered(price) {
            return Ok(format!(
                "🚨 THRESHOLD ALERT: {} exceeded ${}! Current price: {}",
                sample.display_name(),
                format_grouped(self.sell_threshold),
                format_price(price)
            ));
        }

        Ok(String::new())
    }
}
