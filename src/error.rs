//! Configuration errors
//!
//! The simulation itself never fails; bad tuning is rejected before a world
//! is built.

use thiserror::Error;

/// Errors raised while loading or validating a [`crate::Tuning`].
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Tuning file could not be read
    #[error("failed to read tuning file: {0}")]
    Io(#[from] std::io::Error),

    /// Tuning JSON is malformed
    #[error("failed to parse tuning: {0}")]
    Parse(#[from] serde_json::Error),

    /// A parameter (or combination) makes no sense
    #[error("invalid tuning `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        ConfigError::Invalid {
            field,
            reason: reason.into(),
        }
    }
}
