use crate::error::{MonitorError, Result};
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;

/// Phase of a metric's alert lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Normal,
    Alerting,
}

/// What a single [`AlertStateMachine::evaluate`] call decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Evaluation {
    /// No transition; the value did not cross the relevant threshold.
    Steady,
    /// `NORMAL -> ALERTING`; a trigger alert should be emitted.
    Triggered,
    /// `ALERTING -> NORMAL`; a clear alert should be emitted.
    Cleared,
    /// The value is at or above the trigger threshold but the cooldown since
    /// the last trigger has not elapsed. No transition, no alert; the
    /// condition stays visible through snapshots.
    Suppressed,
}

/// Hysteresis state machine for a single metric.
///
/// Two distinct thresholds (`trigger >= clear`) prevent flapping when the
/// value hovers near a single boundary; the cooldown bounds trigger-alert
/// volume during a sustained condition. Recovery is never suppressed: the
/// cooldown is consulted only on the `NORMAL -> ALERTING` edge.
///
/// Lives for the monitor's lifetime; there is no terminal state.
#[derive(Debug)]
pub struct AlertStateMachine {
    trigger_threshold: f64,
    clear_threshold: f64,
    cooldown: Duration,
    phase: Phase,
    last_transition: Option<DateTime<Utc>>,
    last_alert_at: Option<DateTime<Utc>>,
}

impl AlertStateMachine {
    /// Fails fast on invalid threshold ordering or non-finite thresholds;
    /// evaluation never re-checks the configuration.
    pub fn new(trigger_threshold: f64, clear_threshold: f64, cooldown_secs: u64) -> Result<Self> {
        if !trigger_threshold.is_finite() || !clear_threshold.is_finite() {
            return Err(MonitorError::Config(format!(
                "thresholds must be finite (trigger={trigger_threshold}, clear={clear_threshold})"
            )));
        }
        if trigger_threshold < clear_threshold {
            return Err(MonitorError::Config(format!(
                "trigger_threshold {trigger_threshold} < clear_threshold {clear_threshold}"
            )));
        }
        Ok(Self {
            trigger_threshold,
            clear_threshold,
            cooldown: Duration::seconds(cooldown_secs as i64),
            phase: Phase::Normal,
            last_transition: None,
            last_alert_at: None,
        })
    }

    pub fn evaluate(&mut self, value: f64, now: DateTime<Utc>) -> Evaluation {
        match self.phase {
            Phase::Normal if value >= self.trigger_threshold => {
                let in_cooldown = self
                    .last_alert_at
                    .is_some_and(|last| now - last < self.cooldown);
                if in_cooldown {
                    return Evaluation::Suppressed;
                }
                self.phase = Phase::Alerting;
                self.last_transition = Some(now);
                self.last_alert_at = Some(now);
                Evaluation::Triggered
            }
            Phase::Alerting if value <= self.clear_threshold => {
                self.phase = Phase::Normal;
                self.last_transition = Some(now);
                Evaluation::Cleared
            }
            _ => Evaluation::Steady,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn last_transition(&self) -> Option<DateTime<Utc>> {
        self.last_transition
    }

    pub fn last_alert_at(&self) -> Option<DateTime<Utc>> {
        self.last_alert_at
    }
}
