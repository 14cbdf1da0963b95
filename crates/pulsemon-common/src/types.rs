use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The outcome of a single observed event.
///
/// The set is closed: anything other than `success` or `failure` is rejected
/// at the ingestion boundary instead of being carried through the hot path.
///
/// # Examples
///
/// ```
/// use pulsemon_common::types::Outcome;
///
/// let outcome: Outcome = "failure".parse().unwrap();
/// assert_eq!(outcome, Outcome::Failure);
/// assert_eq!(outcome.to_string(), "failure");
/// assert!("flaky".parse::<Outcome>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Success,
    Failure,
}

impl std::fmt::Display for Outcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Outcome::Success => write!(f, "success"),
            Outcome::Failure => write!(f, "failure"),
        }
    }
}

impl std::str::FromStr for Outcome {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "success" => Ok(Outcome::Success),
            "failure" => Ok(Outcome::Failure),
            _ => Err(format!("unknown outcome: {s}")),
        }
    }
}

/// Alert severity level, ordered from lowest to highest.
///
/// # Examples
///
/// ```
/// use pulsemon_common::types::Severity;
///
/// let sev: Severity = "critical".parse().unwrap();
/// assert_eq!(sev, Severity::Critical);
/// assert!(Severity::Critical > Severity::Warning);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Info => write!(f, "info"),
            Severity::Warning => write!(f, "warning"),
            Severity::Critical => write!(f, "critical"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "info" => Ok(Severity::Info),
            "warning" => Ok(Severity::Warning),
            "critical" => Ok(Severity::Critical),
            _ => Err(format!("unknown severity: {s}")),
        }
    }
}

/// A single observed event, immutable once created.
///
/// Timestamps are expected to be non-decreasing across the stream; the
/// engine documents eviction behavior as undefined for clients that violate
/// this, but counts stay consistent regardless.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub timestamp: DateTime<Utc>,
    pub outcome: Outcome,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Event {
    pub fn new(timestamp: DateTime<Utc>, outcome: Outcome, source: Option<String>) -> Self {
        Self {
            timestamp,
            outcome,
            source,
        }
    }
}

/// Timestamp field of a raw JSON-Lines record: epoch seconds or ISO-8601 text.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum TimestampSpec {
    Epoch(f64),
    Text(String),
}

impl TimestampSpec {
    /// Resolve into a UTC instant.
    ///
    /// # Examples
    ///
    /// ```
    /// use pulsemon_common::types::TimestampSpec;
    ///
    /// let ts = TimestampSpec::Text("2026-03-01T12:00:00Z".to_string());
    /// assert!(ts.resolve().is_ok());
    ///
    /// let ts = TimestampSpec::Epoch(1_772_366_400.0);
    /// assert!(ts.resolve().is_ok());
    ///
    /// let ts = TimestampSpec::Text("yesterday".to_string());
    /// assert!(ts.resolve().is_err());
    /// ```
    pub fn resolve(&self) -> Result<DateTime<Utc>, String> {
        match self {
            TimestampSpec::Epoch(secs) => {
                if !secs.is_finite() {
                    return Err(format!("non-finite epoch timestamp: {secs}"));
                }
                let millis = (secs * 1000.0).round();
                if millis < i64::MIN as f64 || millis > i64::MAX as f64 {
                    return Err(format!("epoch timestamp out of range: {secs}"));
                }
                DateTime::from_timestamp_millis(millis as i64)
                    .ok_or_else(|| format!("epoch timestamp out of range: {secs}"))
            }
            TimestampSpec::Text(text) => DateTime::parse_from_rfc3339(text)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("unparsable timestamp '{text}': {e}")),
        }
    }
}

/// One record of the JSON-Lines ingest format, as read off the wire.
///
/// Field shapes are deliberately loose (`outcome` is a bare string, the
/// timestamp is epoch-or-text); validation into an [`Event`] happens in
/// [`RawRecord::resolve`] so that a malformed record never reaches the engine.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRecord {
    pub timestamp: TimestampSpec,
    pub outcome: String,
    #[serde(default)]
    pub source: Option<String>,
}

impl RawRecord {
    /// Validate and convert into a typed [`Event`].
    pub fn resolve(&self) -> Result<Event, String> {
        let timestamp = self.timestamp.resolve()?;
        let outcome: Outcome = self.outcome.parse()?;
        Ok(Event::new(timestamp, outcome, self.source.clone()))
    }
}

/// Direction of an alert transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertDirection {
    Trigger,
    Clear,
}

impl std::fmt::Display for AlertDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AlertDirection::Trigger => write!(f, "trigger"),
            AlertDirection::Clear => write!(f, "clear"),
        }
    }
}

/// An alert emitted on a state-machine transition.
///
/// Immutable value; the monitor keeps no alert history. Delivery (print, log,
/// webhook) is the caller's responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub metric_name: String,
    pub severity: Severity,
    pub direction: AlertDirection,
    pub value: f64,
    /// The threshold that was crossed: trigger threshold for `trigger`
    /// alerts, clear threshold for `clear` alerts.
    pub threshold: f64,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}
