//! Built-in metric types.

pub mod failure_rate;
pub mod source_spread;

pub use failure_rate::FailureRateMetric;
pub use source_spread::SourceSpreadMetric;
