//! Error types for the humanizer.
//!
//! Only boundary operations fail: building buffers, validating parameter
//! sets and tuning, and forwarding to a sink. The per-frame loop never
//! returns an error.

use thiserror::Error;

/// Result type for humanizer operations.
pub type HumanizeResult<T> = Result<T, HumanizeError>;

/// Errors raised at the edges of the humanizer.
#[derive(Debug, Error)]
pub enum HumanizeError {
    /// Sample rate is zero, negative, or not finite.
    #[error("invalid sample rate: {rate}")]
    InvalidSampleRate {
        /// The rejected sample rate.
        rate: f64,
    },

    /// A planar buffer whose channels disagree on length.
    #[error("channel {channel} has {found} frames, expected {expected}")]
    ChannelLengthMismatch {
        /// Index of the offending channel.
        channel: usize,
        /// Frame count of channel 0.
        expected: usize,
        /// Frame count of the offending channel.
        found: usize,
    },

    /// A DSP parameter set failed validation.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: String,
        /// Error message.
        message: String,
    },

    /// Engine tuning failed validation.
    #[error("invalid tuning '{name}': {message}")]
    InvalidTuning {
        /// Tuning field name.
        name: String,
        /// Error message.
        message: String,
    },

    /// The downstream sink refused a buffer.
    #[error("sink error: {message}")]
    Sink {
        /// Error message.
        message: String,
    },
}

impl HumanizeError {
    /// Creates an invalid parameter error.
    pub fn invalid_param(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates an invalid tuning error.
    pub fn invalid_tuning(name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidTuning {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Creates a sink error.
    pub fn sink(message: impl Into<String>) -> Self {
        Self::Sink {
            message: message.into(),
        }
    }

    /// Stable machine-readable error code.
    pub fn code(&self) -> &'static str {
        match self {
            HumanizeError::InvalidSampleRate { .. } => "HUMANIZE_001",
            HumanizeError::ChannelLengthMismatch { .. } => "HUMANIZE_002",
            HumanizeError::InvalidParameter { .. } => "HUMANIZE_003",
            HumanizeError::InvalidTuning { .. } => "HUMANIZE_004",
            HumanizeError::Sink { .. } => "HUMANIZE_005",
        }
    }
}

/// Checks that `value` is finite and within `[min, max]`.
pub(crate) fn check_range(
    name: &str,
    value: f64,
    min: f64,
    max: f64,
) -> Result<(), String> {
    if !value.is_finite() {
        return Err(format!("{} must be finite, got {}", name, value));
    }
    if value < min || value > max {
        return Err(format!(
            "{} must be in [{}, {}], got {}",
            name, min, max, value
        ));
    }
    Ok(())
}
