use crate::tally::OutcomeTally;
use crate::Metric;
use pulsemon_common::types::Severity;

/// Fraction of events in the window that are failures, in `[0.0, 1.0]`.
/// `0.0` for an empty window.
#[derive(Debug)]
pub struct FailureRateMetric {
    pub name: String,
    pub severity: Severity,
    pub trigger_threshold: f64,
    pub clear_threshold: f64,
    pub cooldown_secs: u64,
}

impl Metric for FailureRateMetric {
    fn name(&self) -> &str {
        &self.name
    }

    fn severity(&self) -> Severity {
        self.severity
    }

    fn trigger_threshold(&self) -> f64 {
        self.trigger_threshold
    }

    fn clear_threshold(&self) -> f64 {
        self.clear_threshold
    }

    fn cooldown_secs(&self) -> u64 {
        self.cooldown_secs
    }

    fn compute(&self, tally: &OutcomeTally) -> f64 {
        tally.failure_rate()
    }
}
