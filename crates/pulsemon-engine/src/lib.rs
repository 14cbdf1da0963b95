//! Sliding-window aggregation and hysteresis alerting engine.
//!
//! The [`monitor::Monitor`] ingests outcome events into a bounded recent-history
//! window, computes registered [`Metric`]s over the incrementally maintained
//! [`tally::OutcomeTally`], and feeds each metric value through its own
//! hysteresis state machine (separate trigger and clear thresholds, plus a
//! cooldown between consecutive trigger alerts). Built-in metric types include
//! failure rate and distinct-source spread.

pub mod config;
pub mod error;
pub mod metrics;
pub mod monitor;
pub mod state;
pub mod tally;
pub mod window;


use pulsemon_common::types::Severity;
use tally::OutcomeTally;

/// A scalar metric computed over the current window tally.
///
/// Implementations are registered in the [`monitor::Monitor`] at construction
/// and evaluated on each `check()` call. Every metric carries its own
/// trigger/clear thresholds and cooldown and is driven by a dedicated
/// [`state::AlertStateMachine`] instance, so metrics never interfere with one
/// another.
pub trait Metric: Send + Sync + std::fmt::Debug {
    /// Name under which alerts and snapshot entries are reported
    /// (e.g., `"failure_rate"`).
    fn name(&self) -> &str;

    /// Severity assigned to alerts produced for this metric.
    fn severity(&self) -> Severity;

    /// Value at or above which a `NORMAL` state machine triggers.
    fn trigger_threshold(&self) -> f64;

    /// Value at or below which an `ALERTING` state machine clears.
    fn clear_threshold(&self) -> f64;

    /// Minimum seconds between consecutive trigger alerts for this metric.
    /// Clear alerts are never subject to the cooldown.
    fn cooldown_secs(&self) -> u64;

    /// Computes the metric value from the current tally. Must be pure: no
    /// side effects, same tally in, same value out.
    fn compute(&self, tally: &OutcomeTally) -> f64;
}
