//! Phase accumulators for the shimmer, jitter, and drift oscillators.

use std::f64::consts::TAU;

/// The three oscillator phases, each kept in `[0, 2π)`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OscillatorPhases {
    /// Amplitude modulation oscillator.
    pub shimmer: f64,
    /// Delay modulation oscillator, driven at the preset's jitter speed.
    pub jitter: f64,
    /// Very slow delay drift.
    pub drift: f64,
}

/// Per-frame phase increments in radians.
///
/// Computed once per buffer from the sample rate and the active parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhaseIncrements {
    pub shimmer: f64,
    pub jitter: f64,
    pub drift: f64,
}

impl PhaseIncrements {
    /// Builds increments from frequencies in Hz.
    pub fn from_hz(shimmer_hz: f64, jitter_hz: f64, drift_hz: f64, sample_rate: f64) -> Self {
        let k = TAU / sample_rate;
        Self {
            shimmer: shimmer_hz * k,
            jitter: jitter_hz * k,
            drift: drift_hz * k,
        }
    }
}

impl OscillatorPhases {
    /// Advances all three phases by one frame.
    #[inline]
    pub fn advance(&mut self, inc: &PhaseIncrements) {
        self.shimmer = wrap_phase(self.shimmer + inc.shimmer);
        self.jitter = wrap_phase(self.jitter + inc.jitter);
        self.drift = wrap_phase(self.drift + inc.drift);
    }
}

/// Wraps a phase into `[0, 2π)`.
#[inline]
fn wrap_phase(phase: f64) -> f64 {
    if (0.0..TAU).contains(&phase) {
        return phase;
    }
    let wrapped = phase.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
