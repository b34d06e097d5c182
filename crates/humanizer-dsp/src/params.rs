//! DSP parameter sets and their validation.

use serde::{Deserialize, Serialize};

use crate::error::{check_range, HumanizeError, HumanizeResult};

/// Largest accepted shimmer depth.
pub const MAX_SHIMMER_DEPTH: f64 = 0.5;
/// Largest accepted jitter oscillator speed, in Hz.
pub const MAX_JITTER_SPEED: f64 = 20.0;
/// Largest accepted jitter depth.
pub const MAX_JITTER_DEPTH: f64 = 1.0;
/// Largest accepted breathiness.
pub const MAX_BREATHINESS: f64 = 0.1;
/// Largest accepted warmth drive.
pub const MAX_WARMTH_DRIVE: f64 = 10.0;

/// The five knobs of the humanizer chain.
///
/// Swapped between utterances, never mid-buffer. The engine applies the
/// values literally; use [`DspParams::validate`] before handing in a set
/// that did not come from the preset table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DspParams {
    /// Amplitude modulation depth of the 8 Hz shimmer oscillator.
    pub shimmer_depth: f64,
    /// Jitter oscillator frequency in Hz.
    pub jitter_speed: f64,
    /// Jitter oscillator depth, before scaling into samples.
    pub jitter_depth: f64,
    /// Gain of the filtered breath noise.
    pub breathiness: f64,
    /// Drive into the arctangent saturator (1.0 = gentlest).
    pub warmth_drive: f64,
}

impl DspParams {
    /// Parameters that leave only the pure delay and a drive-1 saturator.
    pub const BYPASS: DspParams = DspParams {
        shimmer_depth: 0.0,
        jitter_speed: 0.0,
        jitter_depth: 0.0,
        breathiness: 0.0,
        warmth_drive: 1.0,
    };

    /// Checks every field is finite and inside its accepted range.
    pub fn validate(&self) -> HumanizeResult<()> {
        let fields = [
            ("shimmer_depth", self.shimmer_depth, 0.0, MAX_SHIMMER_DEPTH),
            ("jitter_speed", self.jitter_speed, 0.0, MAX_JITTER_SPEED),
            ("jitter_depth", self.jitter_depth, 0.0, MAX_JITTER_DEPTH),
            ("breathiness", self.breathiness, 0.0, MAX_BREATHINESS),
            ("warmth_drive", self.warmth_drive, 1.0, MAX_WARMTH_DRIVE),
        ];

        for (name, value, min, max) in fields {
            check_range(name, value, min, max)
                .map_err(|message| HumanizeError::invalid_param(name, message))?;
        }
        Ok(())
    }
}

impl Default for DspParams {
    fn default() -> Self {
        crate::presets::preset(crate::Emotion::Neutral)
    }
}
