use crate::error::{MonitorError, Result};
use crate::metrics::{FailureRateMetric, SourceSpreadMetric};
use crate::window::WindowBound;
use crate::Metric;
use pulsemon_common::types::Severity;
use serde::{Deserialize, Serialize};

/// Construction-time monitor configuration. Immutable after creation: to
/// change any of it, construct a new monitor.
///
/// The top-level thresholds configure the built-in `failure_rate` metric;
/// `metrics` registers additional metric instances, each with its own
/// thresholds, cooldown, and state machine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitorConfig {
    #[serde(default)]
    pub window: WindowConfig,
    #[serde(default = "default_trigger_threshold")]
    pub trigger_threshold: f64,
    #[serde(default = "default_clear_threshold")]
    pub clear_threshold: f64,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
    #[serde(default = "default_severity")]
    pub severity: String,
    /// Default number of sources returned by snapshot attribution.
    #[serde(default = "default_top_k")]
    pub top_k: usize,
    #[serde(default)]
    pub metrics: Vec<MetricConfig>,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            window: WindowConfig::default(),
            trigger_threshold: default_trigger_threshold(),
            clear_threshold: default_clear_threshold(),
            cooldown_secs: default_cooldown_secs(),
            severity: default_severity(),
            top_k: default_top_k(),
            metrics: Vec::new(),
        }
    }
}

/// Window bound configuration: `mode = "count"` keeps the last `size` events,
/// `mode = "time"` keeps events within the last `size` seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WindowConfig {
    #[serde(default = "default_window_mode")]
    pub mode: String,
    #[serde(default = "default_window_size")]
    pub size: u64,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            mode: default_window_mode(),
            size: default_window_size(),
        }
    }
}

impl WindowConfig {
    pub fn bound(&self) -> Result<WindowBound> {
        match self.mode.as_str() {
            "count" => Ok(WindowBound::Count(self.size as usize)),
            "time" => Ok(WindowBound::Seconds(self.size)),
            other => Err(MonitorError::Config(format!(
                "unknown window mode: {other}"
            ))),
        }
    }
}

/// Configuration for one additional registered metric.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricConfig {
    /// Built-in metric discriminator: `"failure_rate"` or `"source_spread"`.
    pub metric_type: String,
    /// Reported name; defaults to `metric_type`.
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_metric_severity")]
    pub severity: String,
    pub trigger_threshold: f64,
    pub clear_threshold: f64,
    #[serde(default = "default_cooldown_secs")]
    pub cooldown_secs: u64,
}

fn default_window_mode() -> String {
    "count".to_string()
}

fn default_window_size() -> u64 {
    100
}

fn default_trigger_threshold() -> f64 {
    0.5
}

fn default_clear_threshold() -> f64 {
    0.2
}

fn default_cooldown_secs() -> u64 {
    300
}

fn default_severity() -> String {
    "critical".to_string()
}

fn default_metric_severity() -> String {
    "warning".to_string()
}

fn default_top_k() -> usize {
    5
}

/// Convert a single [`MetricConfig`] into a `Box<dyn Metric>`.
///
/// Unknown `metric_type` is fatal: the monitor refuses to start with a
/// configuration it cannot honor, rather than silently dropping a metric.
pub fn build_metric(cfg: &MetricConfig) -> Result<Box<dyn Metric>> {
    let severity: Severity = cfg.severity.parse().unwrap_or(Severity::Warning);
    let name = cfg
        .name
        .clone()
        .unwrap_or_else(|| cfg.metric_type.clone());
    match cfg.metric_type.as_str() {
        "failure_rate" => Ok(Box::new(FailureRateMetric {
            name,
            severity,
            trigger_threshold: cfg.trigger_threshold,
            clear_threshold: cfg.clear_threshold,
            cooldown_secs: cfg.cooldown_secs,
        })),
        "source_spread" => Ok(Box::new(SourceSpreadMetric {
            name,
            severity,
            trigger_threshold: cfg.trigger_threshold,
            clear_threshold: cfg.clear_threshold,
            cooldown_secs: cfg.cooldown_secs,
        })),
        other => Err(MonitorError::Config(format!("unknown metric type: {other}"))),
    }
}

/// Build the full metric registry for a monitor: the built-in `failure_rate`
/// from the top-level thresholds, followed by every entry in `metrics`.
pub fn build_metrics(config: &MonitorConfig) -> Result<Vec<Box<dyn Metric>>> {
    let severity: Severity = config.severity.parse().unwrap_or(Severity::Critical);
    let mut metrics: Vec<Box<dyn Metric>> = vec![Box::new(FailureRateMetric {
        name: "failure_rate".to_string(),
        severity,
        trigger_threshold: config.trigger_threshold,
        clear_threshold: config.clear_threshold,
        cooldown_secs: config.cooldown_secs,
    })];
    for cfg in &config.metrics {
        metrics.push(build_metric(cfg)?);
    }
    Ok(metrics)
}
