pub mod rule;
pub mod threshold;
pub mod variation;

pub use rule::AlertRule;
pub use threshold::ThresholdRule;
pub use variation::VariationRule;

use crate::config::AlertStrategiesConfig;
use crate::error::AlertError;
use crate::model::PriceSample;

/// Outcome of running every rule against one sample.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct CheckReport {
    /// Alert messages, in rule registration order.
    pub alerts: Vec<String>,
    /// Rules that failed and were skipped.
    pub failures: Vec<String>,
}

/// Runs an ordered, fixed set of rules against each new sample.
pub struct AlertEngine {
    rules: Vec<Box<dyn AlertRule + Send>>,
}

impl AlertEngine {
    pub fn new(rules: Vec<Box<dyn AlertRule + Send>>) -> Self {
        Self { rules }
    }

    /// Threshold rule first, then variation.
    pub fn from_config(config: &AlertStrategiesConfig) -> Self {
        Self::new(vec![
            Box::new(ThresholdRule::from_config(&config.threshold)),
            Box::new(VariationRule::from_config(&config.variation)),
        ])
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn check_all(&mut self, sample: &PriceSample) -> CheckReport {
        let mut report = CheckReport::default();

        for rule in self.rules.iter_mut() {
            let outcome = rule
                .evaluate(sample)
                .and_then(|fired| if fired { rule.describe(sample) } else { Ok(String::new()) });

            match outcome {
                Ok(message) if !message.is_empty() => {
                    log::info!("{} alert for {}: {}", rule.name(), sample.symbol(), message);
                    report.alerts.push(message);
                }
                Ok(_) => {}
                Err(e) => {
                    let failure = AlertError::RuleEvaluation {
                        rule: rule.name().to_string(),
                        reason: e.to_string(),
                    };
                    log::warn!("Skipping rule for {}: {}", sample.symbol(), failure);
                    report.failures.push(failure.to_string());
                }
            }
        }

        report
    }
}
