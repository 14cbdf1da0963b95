use pulsemon_common::types::{Event, Outcome};
use serde::Serialize;
use std::collections::HashMap;

/// A source and its failure count within the current window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceFailures {
    pub source: String,
    pub failures: u64,
}

/// Incrementally maintained outcome counts for the current window contents.
///
/// Derived state: mutated exclusively by the event buffer's insert/evict
/// operations, so `total` always equals the buffer length and `failures` the
/// number of FAILURE events currently retained.
#[derive(Debug, Clone, Default, Serialize)]
pub struct OutcomeTally {
    total: u64,
    failures: u64,
    per_source_failures: HashMap<String, u64>,
}

impl OutcomeTally {
    pub(crate) fn record(&mut self, event: &Event) {
        self.total += 1;
        if event.outcome == Outcome::Failure {
            self.failures += 1;
            if let Some(source) = &event.source {
                *self.per_source_failures.entry(source.clone()).or_insert(0) += 1;
            }
        }
    }

    pub(crate) fn forget(&mut self, event: &Event) {
        self.total -= 1;
        if event.outcome == Outcome::Failure {
            self.failures -= 1;
            if let Some(source) = &event.source {
                if let Some(count) = self.per_source_failures.get_mut(source) {
                    *count -= 1;
                    // Drop the key at zero so memory stays bounded under many
                    // distinct sources.
                    if *count == 0 {
                        self.per_source_failures.remove(source);
                    }
                }
            }
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn failures(&self) -> u64 {
        self.failures
    }

    /// Failures divided by total, `0.0` for an empty window. The empty-window
    /// value is policy, not a missing-data error.
    pub fn failure_rate(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            self.failures as f64 / self.total as f64
        }
    }

    /// Number of distinct sources with at least one failure in the window.
    pub fn distinct_failure_sources(&self) -> u64 {
        self.per_source_failures.len() as u64
    }

    /// Up to `k` sources ranked by failure count descending, ties broken by
    /// source name ascending. Deterministic for a given window content.
    pub fn top_sources(&self, k: usize) -> Vec<SourceFailures> {
        let mut ranked: Vec<SourceFailures> = self
            .per_source_failures
            .iter()
            .map(|(source, failures)| SourceFailures {
                source: source.clone(),
                failures: *failures,
            })
            .collect();
        ranked.sort_by(|a, b| {
            b.failures
                .cmp(&a.failures)
                .then_with(|| a.source.cmp(&b.source))
        });
        ranked.truncate(k);
        ranked
    }
}
