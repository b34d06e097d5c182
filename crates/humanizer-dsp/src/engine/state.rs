//! Engine tuning constants and the persistent per-session state.

use serde::{Deserialize, Serialize};

use super::delay_line::{DelayLine, DEFAULT_CAPACITY, MAX_CAPACITY};
use super::oscillator::OscillatorPhases;
use crate::error::{check_range, HumanizeError, HumanizeResult};
use crate::params::MAX_JITTER_DEPTH;

/// Upper bound on the centre delay, in samples.
pub const MAX_BASE_DELAY_SAMPLES: f64 = 65536.0;

/// Fixed constants of the humanizer chain.
///
/// Every field has a default, so a JSON file only needs the values it
/// changes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineTuning {
    /// Shimmer oscillator frequency in Hz.
    pub shimmer_rate_hz: f64,
    /// Drift oscillator frequency in Hz.
    pub drift_rate_hz: f64,
    /// Drift contribution to the delay offset, before scaling.
    pub drift_depth: f64,
    /// Converts the summed jitter terms into samples of delay.
    pub jitter_scale: f64,
    /// Centre of the modulated delay, in samples.
    pub base_delay_samples: f64,
    /// Ring size of the delay line, in samples.
    pub delay_capacity: usize,
    /// Bound of the uniform dither on the shimmer gain.
    pub shimmer_dither: f64,
    /// Bound of the uniform dither on the jitter offset.
    pub jitter_dither: f64,
    /// Coefficient of the breath noise low-pass.
    pub breath_smoothing: f64,
    /// Magnitude a sample must exceed before breath noise is added.
    pub breath_gate: f64,
}

impl Default for EngineTuning {
    fn default() -> Self {
        Self {
            shimmer_rate_hz: 8.0,
            drift_rate_hz: 0.3,
            drift_depth: 0.008,
            jitter_scale: 25.0,
            base_delay_samples: 200.0,
            delay_capacity: DEFAULT_CAPACITY,
            shimmer_dither: 0.03,
            jitter_dither: 0.005,
            breath_smoothing: 0.3,
            breath_gate: 0.01,
        }
    }
}

impl EngineTuning {
    /// Largest delay the chain can request with a valid parameter set.
    pub fn max_delay_samples(&self) -> f64 {
        self.base_delay_samples
            + self.jitter_scale * (MAX_JITTER_DEPTH + self.drift_depth + self.jitter_dither)
    }

    /// Checks ranges and that the delay line can hold the deepest excursion.
    pub fn validate(&self) -> HumanizeResult<()> {
        let check = |name: &str, value: f64, min: f64, max: f64| {
            check_range(name, value, min, max)
                .map_err(|message| HumanizeError::invalid_tuning(name, message))
        };

        check("shimmer_rate_hz", self.shimmer_rate_hz, f64::MIN_POSITIVE, 1000.0)?;
        check("drift_rate_hz", self.drift_rate_hz, f64::MIN_POSITIVE, 1000.0)?;
        check("drift_depth", self.drift_depth, 0.0, 1.0)?;
        check("jitter_scale", self.jitter_scale, 0.0, 1000.0)?;
        check("base_delay_samples", self.base_delay_samples, 0.0, MAX_BASE_DELAY_SAMPLES)?;
        check("shimmer_dither", self.shimmer_dither, 0.0, 1.0)?;
        check("jitter_dither", self.jitter_dither, 0.0, 1.0)?;
        check("breath_smoothing", self.breath_smoothing, f64::MIN_POSITIVE, 1.0)?;
        check("breath_gate", self.breath_gate, 0.0, 1.0)?;

        // The read position must stay behind the head with room for the
        // second interpolation tap.
        let excursion = self.max_delay_samples() - self.base_delay_samples;
        if self.base_delay_samples < excursion {
            return Err(HumanizeError::invalid_tuning(
                "base_delay_samples",
                format!(
                    "must be at least the jitter excursion of {} samples, got {}",
                    excursion, self.base_delay_samples
                ),
            ));
        }
        if self.delay_capacity > MAX_CAPACITY {
            return Err(HumanizeError::invalid_tuning(
                "delay_capacity",
                format!("must be at most {} samples, got {}", MAX_CAPACITY, self.delay_capacity),
            ));
        }
        // Bounded above by the range checks, so the cast cannot saturate.
        let required = self.max_delay_samples().ceil() as usize + 2;
        if self.delay_capacity < required {
            return Err(HumanizeError::invalid_tuning(
                "delay_capacity",
                format!("must be at least {} samples, got {}", required, self.delay_capacity),
            ));
        }

        Ok(())
    }
}

/// Everything the engine carries from one buffer to the next.
///
/// One state belongs to one stream. Phases, delay contents, and the breath
/// filter are never reset between buffers; doing so would click.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineState {
    pub(super) tuning: EngineTuning,
    pub(super) phases: OscillatorPhases,
    pub(super) delay: DelayLine,
    pub(super) breath: f64,
}

impl EngineState {
    /// Creates a fresh state after validating `tuning`.
    pub fn new(tuning: EngineTuning) -> HumanizeResult<Self> {
        tuning.validate()?;
        Ok(Self::from_valid(tuning))
    }

    fn from_valid(tuning: EngineTuning) -> Self {
        Self {
            tuning,
            phases: OscillatorPhases::default(),
            delay: DelayLine::new(tuning.delay_capacity),
            breath: 0.0,
        }
    }

    /// The tuning this state was built with.
    pub fn tuning(&self) -> &EngineTuning {
        &self.tuning
    }

    /// Current oscillator phases.
    pub fn phases(&self) -> OscillatorPhases {
        self.phases
    }

    /// Current delay line write head.
    pub fn write_head(&self) -> usize {
        self.delay.write_pos()
    }

    /// Last output of the breath noise filter.
    pub fn breath_filter(&self) -> f64 {
        self.breath
    }

    /// Returns the state to silence at phase zero.
    ///
    /// Only for starting an unrelated session on the same instance.
    pub fn reset(&mut self) {
        self.phases = OscillatorPhases::default();
        self.delay.clear();
        self.breath = 0.0;
    }
}

impl Default for EngineState {
    fn default() -> Self {
        Self::from_valid(EngineTuning::default())
    }
}
