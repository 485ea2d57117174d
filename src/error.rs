//! Error taxonomy for rotation resolution
//!
//! Configuration problems are fatal. Missing calendar data is recoverable and
//! is normally downgraded to a warning on the notice.

use thiserror::Error;

/// Errors raised by the rotation core and its data collaborators
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RotationError {
    /// Invalid anchor, cycle length, reminder day, timezone or pattern
    #[error("Invalid configuration: {0}")]
    Configuration(String),

    /// The calendar feed could not be fetched or parsed
    #[error("Calendar data unavailable: {0}")]
    DataUnavailable(String),
}

impl RotationError {
    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }

    /// Whether the caller can continue with a best-effort answer
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::DataUnavailable(_))
    }
}
