use super::rule::AlertRule;
use crate::config::VariationConfig;
use crate::error::AlertError;
use crate::model::PriceSample;
use crate::ui::format::format_price;
use chrono::{DateTime, Duration, Utc};
use std::collections::{HashMap, VecDeque};

#[derive(Debug, Clone, Copy, PartialEq)]
struct HistoryEntry {
    price: f64,
    observed_at: DateTime<Utc>,
}

/// Fires when the price has moved at least `percentage_threshold` percent
/// away from the earliest sample still inside the rolling time window.
///
/// The baseline is the first surviving entry, not the window's extreme, so
/// the rule measures net drift since the window started.
#[derive(Debug, Clone)]
pub struct VariationRule {
    percentage_threshold: f64,
    time_window_minutes: f64,
    window: Duration,
    history: HashMap<String, VecDeque<HistoryEntry>>,
}

impl VariationRule {
    pub fn new(percentage_threshold: f64, time_window_minutes: f64) -> Self {
        // Windows too long for a TimeDelta are treated as unbounded.
        let window = Duration::try_milliseconds((time_window_minutes * 60_000.0).round() as i64)
            .unwrap_or_else(Duration::max_value);
        Self {
            percentage_threshold,
            time_window_minutes,
            window,
            history: HashMap::new(),
        }
    }

    pub fn from_config(config: &VariationConfig) -> Self {
        Self::new(config.percentage_threshold, config.time_window_minutes)
    }

    #[cfg(test)]
    pub fn history_len(&self, symbol: &str) -> usize {
        self.history.get(symbol).map_or(0, VecDeque::len)
    }

    /// Price the next variation is measured against, once there are at
    /// least two entries in the window.
    pub fn baseline(&self, symbol: &str) -> Option<f64> {
        self.history
            .get(symbol)
            .filter(|entries| entries.len() >= 2)
            .and_then(|entries| entries.front())
            .map(|entry| entry.price)
    }

    fn signed_variation(oldest: f64, current: f64) -> f64 {
        (current - oldest) / oldest * 100.0
    }
}

impl AlertRule for VariationRule {
    fn name(&self) -> &str {
        "variation"
    }

    fn evaluate(&mut self, sample: &PriceSample) -> Result<bool, AlertError> {
        let entries = self.history.entry(sample.symbol().to_string()).or_default();

        entries.push_back(HistoryEntry {
            price: sample.price(),
            observed_at: sample.observed_at(),
        });

        // A cutoff before the earliest representable time keeps everything.
        if let Some(cutoff) = sample.observed_at().checked_sub_signed(self.window) {
            entries.retain(|entry| entry.observed_at >= cutoff);
        }

        let oldest = match entries.front() {
            Some(entry) if entries.len() >= 2 => entry.price,
            _ => {
                log::debug!(
                    "variation {}: {} entries in window, no baseline yet",
                    sample.symbol(),
                    entries.len()
                );
                return Ok(false);
            }
        };
        let variation = Self::signed_variation(oldest, sample.price()).abs();
        log::debug!(
            "variation {}: {:.4}% vs baseline {} over {} entries",
            sample.symbol(),
            variation,
            oldest,
            entries.len()
        );

        Ok(variation >= self.percentage_threshold)
    }

    fn describe(&self, sample: &PriceSample) -> Result<String, AlertError> {
        let oldest = match self.baseline(sample.symbol()) {
            Some(price) => price,
            None => return Ok(String::new()),
        };

        let variation = Self::signed_variation(oldest, sample.price());
        let (arrow, direction) = if variation > 0.0 {
            ("📈", "up")
        } else {
            ("📉", "down")
        };

        Ok(format!(
            "{} VARIATION ALERT: {} {} {:.2}% in {} minutes ({} → {})",
            arrow,
            sample.display_name(),
            direction,
            variation.abs(),
            self.time_window_minutes,
            format_price(oldest),
            format_price(sample.price())
        ))
    }
}
