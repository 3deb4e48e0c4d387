use crate::error::AlertError;
use crate::model::PriceSample;

/// A self-contained alerting policy evaluated against every sample.
///
/// Rules never block, do no I/O and never look at each other's state: the
/// decision for a sample depends only on the sample and what the rule itself
/// has accumulated. Stateful rules record the sample inside `evaluate`, so
/// calling it twice with the same sample counts that sample twice.
pub trait AlertRule {
    fn name(&self) -> &str;

    /// Whether this sample should raise an alert.
    fn evaluate(&mut self, sample: &PriceSample) -> Result<bool, AlertError>;

    /// Alert text for the last `evaluate` that returned true. Empty when
    /// there is nothing to report.
    fn describe(&self, sample: &PriceSample) -> Result<String, AlertError>;
}
