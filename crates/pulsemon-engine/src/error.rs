/// Errors that can occur within the monitoring engine.
///
/// The two variants map to the two error categories the engine distinguishes:
/// `Config` is fatal and raised at construction time only (the monitor never
/// starts with an invalid configuration), while `Validation` is per-record and
/// recoverable: the caller is expected to skip the offending record and
/// continue. A failed validation leaves the monitor's state untouched.
///
/// # Examples
///
/// ```rust
/// use pulsemon_engine::error::MonitorError;
///
/// let err = MonitorError::Config("trigger_threshold 0.2 < clear_threshold 0.6".to_string());
/// assert!(err.to_string().contains("clear_threshold"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum MonitorError {
    /// Invalid construction-time configuration: threshold ordering
    /// (`trigger_threshold < clear_threshold`), zero window size, non-finite
    /// thresholds, or an unknown metric/window discriminator.
    #[error("Engine: invalid configuration: {0}")]
    Config(String),

    /// A malformed event record passed to ingestion: missing or unknown
    /// outcome, or an unparsable timestamp.
    #[error("Engine: invalid event record: {0}")]
    Validation(String),
}

/// Convenience `Result` alias for engine operations.
pub type Result<T> = std::result::Result<T, MonitorError>;
