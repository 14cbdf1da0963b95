use crate::tally::OutcomeTally;
use crate::Metric;
use pulsemon_common::types::Severity;

/// Distinct failing sources divided by total events in the window, `0.0` when
/// the window is empty. A high value means failures are spread across many
/// sources rather than concentrated in one.
#[derive(Debug)]
pub struct SourceSpreadMetric {
    pub name: String,
    pub severity: Severity,
    pub trigger_threshold: f64,
    pub clear_threshold: f64,
    pub cooldown_secs: u64,
}

impl Metric for SourceSpreadMetric {
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
        if tally.total() == 0 {
            0.0
        } else {
            tally.distinct_failure_sources() as f64 / tally.total() as f64
        }
    }
}
