use crate::config::{build_metrics, MonitorConfig};
use crate::error::{MonitorError, Result};
use crate::state::{AlertStateMachine, Evaluation, Phase};
use crate::tally::SourceFailures;
use crate::window::{EventBuffer, WindowBound};
use crate::Metric;
use chrono::{DateTime, Utc};
use pulsemon_common::id::IdGenerator;
use pulsemon_common::types::{Alert, AlertDirection, Event, RawRecord, Severity};
use serde::Serialize;
use std::collections::HashSet;

/// Per-metric entry in a [`Snapshot`].
#[derive(Debug, Clone, Serialize)]
pub struct MetricState {
    pub name: String,
    pub value: f64,
    pub severity: Severity,
    pub phase: Phase,
    pub last_transition: Option<DateTime<Utc>>,
    pub last_alert_at: Option<DateTime<Utc>>,
}

/// Side-effect-free view of the monitor's current aggregates.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub total: u64,
    pub failures: u64,
    pub failure_rate: f64,
    pub top_sources: Vec<SourceFailures>,
    pub metrics: Vec<MetricState>,
}

#[derive(Debug)]
struct MetricEntry {
    metric: Box<dyn Metric>,
    state: AlertStateMachine,
}

/// The orchestrator: owns the event buffer, the metric registry, and one
/// alert state machine per metric.
///
/// Not thread-safe: concurrent producers need an external mutex around the
/// whole monitor, since every ingest touches the buffer and tally together.
/// Each instance is fully independent (no global state), so multiple
/// differently configured monitors can coexist in one process.
///
/// The monitor keeps a logical clock at the maximum event timestamp seen and
/// evaluates `check()` at that instant, which makes replaying historical
/// streams behave identically to live tailing.
#[derive(Debug)]
pub struct Monitor {
    buffer: EventBuffer,
    entries: Vec<MetricEntry>,
    top_k: usize,
    ids: IdGenerator,
    clock: Option<DateTime<Utc>>,
}

impl Monitor {
    /// Build a monitor from configuration. Any invalid setting (threshold
    /// ordering, zero window, unknown discriminator) fails here, never later.
    pub fn from_config(config: &MonitorConfig) -> Result<Self> {
        let bound = config.window.bound()?;
        let metrics = build_metrics(config)?;
        Self::new(bound, metrics, config.top_k)
    }

    pub fn new(bound: WindowBound, metrics: Vec<Box<dyn Metric>>, top_k: usize) -> Result<Self> {
        let mut names = HashSet::new();
        for metric in &metrics {
            if !names.insert(metric.name().to_string()) {
                return Err(MonitorError::Config(format!(
                    "duplicate metric name: {}",
                    metric.name()
                )));
            }
        }

        let buffer = EventBuffer::new(bound)?;
        let mut entries = Vec::with_capacity(metrics.len());
        for metric in metrics {
            let state = AlertStateMachine::new(
                metric.trigger_threshold(),
                metric.clear_threshold(),
                metric.cooldown_secs(),
            )?;
            entries.push(MetricEntry { metric, state });
        }

        Ok(Self {
            buffer,
            entries,
            top_k,
            ids: IdGenerator::default(),
            clock: None,
        })
    }

    /// Ingest one typed event, advancing the logical clock and evicting per
    /// the window bound. Typed events are well-formed by construction, so
    /// this cannot fail; the fallible boundary is [`Monitor::ingest_record`].
    pub fn ingest(&mut self, event: Event) {
        let now = match self.clock {
            Some(clock) => clock.max(event.timestamp),
            None => event.timestamp,
        };
        self.clock = Some(now);
        self.buffer.push(event, now);
    }

    /// Validate a raw JSON-Lines record and ingest it. On a malformed record
    /// (unknown outcome, unparsable timestamp) the monitor's state is left
    /// completely unchanged.
    pub fn ingest_record(&mut self, record: &RawRecord) -> Result<()> {
        let event = record.resolve().map_err(MonitorError::Validation)?;
        self.ingest(event);
        Ok(())
    }

    /// Ingest an ordered sequence; equivalent to repeated [`Monitor::ingest`].
    pub fn ingest_batch(&mut self, events: impl IntoIterator<Item = Event>) {
        for event in events {
            self.ingest(event);
        }
    }

    /// Evaluate every registered metric at the logical clock and return the
    /// alerts emitted by their state machines. Empty when nothing transitions.
    pub fn check(&mut self) -> Vec<Alert> {
        let now = self.clock.unwrap_or_else(Utc::now);
        self.check_at(now)
    }

    /// [`Monitor::check`] at an explicit instant.
    pub fn check_at(&mut self, now: DateTime<Utc>) -> Vec<Alert> {
        self.buffer.evict(now);
        let mut alerts = Vec::new();
        for entry in &mut self.entries {
            let metric = entry.metric.as_ref();
            let value = metric.compute(self.buffer.tally());
            match entry.state.evaluate(value, now) {
                Evaluation::Triggered => {
                    alerts.push(Alert {
                        id: self.ids.next_id(),
                        metric_name: metric.name().to_string(),
                        severity: metric.severity(),
                        direction: AlertDirection::Trigger,
                        value,
                        threshold: metric.trigger_threshold(),
                        message: format!(
                            "{} is {:.3}, at or above trigger threshold {:.3}",
                            metric.name(),
                            value,
                            metric.trigger_threshold()
                        ),
                        timestamp: now,
                    });
                }
                Evaluation::Cleared => {
                    alerts.push(Alert {
                        id: self.ids.next_id(),
                        metric_name: metric.name().to_string(),
                        severity: metric.severity(),
                        direction: AlertDirection::Clear,
                        value,
                        threshold: metric.clear_threshold(),
                        message: format!(
                            "RECOVERED: {} is {:.3}, at or below clear threshold {:.3}",
                            metric.name(),
                            value,
                            metric.clear_threshold()
                        ),
                        timestamp: now,
                    });
                }
                Evaluation::Suppressed => {
                    tracing::debug!(
                        metric = metric.name(),
                        value,
                        "Alert suppressed (cooldown)"
                    );
                }
                Evaluation::Steady => {}
            }
        }
        alerts
    }

    /// Read-only snapshot of current aggregates; safe at any point between
    /// ingest calls.
    pub fn summarize(&self) -> Snapshot {
        let tally = self.buffer.tally();
        Snapshot {
            total: tally.total(),
            failures: tally.failures(),
            failure_rate: tally.failure_rate(),
            top_sources: tally.top_sources(self.top_k),
            metrics: self
                .entries
                .iter()
                .map(|entry| MetricState {
                    name: entry.metric.name().to_string(),
                    value: entry.metric.compute(tally),
                    severity: entry.metric.severity(),
                    phase: entry.state.phase(),
                    last_transition: entry.state.last_transition(),
                    last_alert_at: entry.state.last_alert_at(),
                })
                .collect(),
        }
    }

    /// Sources ranked by failure contribution, overriding the configured
    /// default count.
    pub fn top_sources(&self, k: usize) -> Vec<SourceFailures> {
        self.buffer.tally().top_sources(k)
    }

    pub fn window_len(&self) -> usize {
        self.buffer.len()
    }
}
