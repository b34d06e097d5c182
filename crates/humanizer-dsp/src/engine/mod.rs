//! The humanizer engine.
//!
//! [`process`] is a stateless function over an explicit [`EngineState`].
//! Per frame it runs:
//!
//! 1. advance the shimmer, jitter, and drift phases
//! 2. shimmer gain `1 + sin(shimmer)·depth + dither`
//! 3. jitter delay `base + scale·(sin(jitter)·depth + sin(drift)·drift + dither)`
//! 4. write the clean sample into the delay line, read it back interpolated
//! 5. add low-passed breath noise above the gate
//! 6. arctangent saturation
//!
//! Channel 0 carries the voice. Its processed samples are copied to every
//! other channel, so all channels share one set of phases, one delay line,
//! and one noise stream.

pub mod delay_line;
pub mod oscillator;
pub mod shaping;
pub mod state;

pub use delay_line::DelayLine;
pub use oscillator::{OscillatorPhases, PhaseIncrements};
pub use shaping::{saturate, saturate_sample};
pub use state::{EngineState, EngineTuning};

use tracing::{debug, trace, warn};

use crate::buffer::PcmBuffer;
use crate::emotion::Emotion;
use crate::error::HumanizeResult;
use crate::params::DspParams;
use crate::presets::preset;
use crate::rng::{EntropySource, RandomSource};

use shaping::{amplitude_modulation, breath_contribution, smooth_noise};

/// Processes `buffer` in place, carrying continuity in `state`.
///
/// Buffers with no frames or no channels are left alone and do not touch
/// `state`. Nothing in the frame loop allocates or fails; out-of-range
/// parameters are applied as given.
pub fn process<R: RandomSource + ?Sized>(
    buffer: &mut PcmBuffer,
    params: &DspParams,
    state: &mut EngineState,
    rng: &mut R,
) {
    if buffer.is_empty() {
        return;
    }

    let tuning = state.tuning;
    let inc = PhaseIncrements::from_hz(
        tuning.shimmer_rate_hz,
        params.jitter_speed,
        tuning.drift_rate_hz,
        buffer.sample_rate(),
    );

    let Some((voice, rest)) = buffer.split_voice_mut() else {
        return;
    };

    for sample in voice.iter_mut() {
        *sample = state.tick(*sample, params, &inc, rng);
    }
    for channel in rest {
        channel.copy_from_slice(voice);
    }
}

impl EngineState {
    /// Runs one frame through the chain.
    #[inline]
    fn tick<R: RandomSource + ?Sized>(
        &mut self,
        input: f32,
        params: &DspParams,
        inc: &PhaseIncrements,
        rng: &mut R,
    ) -> f32 {
        let t = self.tuning;

        self.phases.advance(inc);

        let amp_mod = amplitude_modulation(
            self.phases.shimmer,
            params.shimmer_depth,
            rng.next_within(t.shimmer_dither),
        );

        let wobble = self.phases.jitter.sin() * params.jitter_depth
            + self.phases.drift.sin() * t.drift_depth
            + rng.next_within(t.jitter_dither);
        let delay = t.base_delay_samples + wobble * t.jitter_scale;

        let mut sample = self.delay.write_and_read(input, delay) * amp_mod;

        self.breath = smooth_noise(self.breath, rng.next_bipolar(), t.breath_smoothing);
        sample += breath_contribution(sample, self.breath, params.breathiness, t.breath_gate);

        saturate_sample(sample, params.warmth_drive)
    }
}

/// Owns an engine state, the active parameters, and a random source.
///
/// One instance per speaking session. Not meant to be shared between
/// threads; move it to whichever thread delivers the buffers.
#[derive(Debug, Clone)]
pub struct Humanizer<R = EntropySource> {
    state: EngineState,
    params: DspParams,
    rng: R,
}

impl Humanizer<EntropySource> {
    /// Creates a humanizer with OS-entropy noise and the neutral preset.
    pub fn new(tuning: EngineTuning) -> HumanizeResult<Self> {
        Self::with_source(tuning, EntropySource::new())
    }
}

impl<R: RandomSource> Humanizer<R> {
    /// Creates a humanizer drawing noise from `rng`.
    pub fn with_source(tuning: EngineTuning, rng: R) -> HumanizeResult<Self> {
        Ok(Self {
            state: EngineState::new(tuning)?,
            params: DspParams::default(),
            rng,
        })
    }

    /// Switches to the preset for `emotion`. State is kept.
    pub fn set_emotion(&mut self, emotion: Emotion) {
        debug!(%emotion, "applying emotion preset");
        self.params = preset(emotion);
    }

    /// Switches to an explicit parameter set after validating it.
    ///
    /// On error the previous parameters stay active.
    pub fn apply_preset(&mut self, params: DspParams) -> HumanizeResult<()> {
        if let Err(err) = params.validate() {
            warn!(error = %err, "rejected parameter set");
            return Err(err);
        }
        debug!(?params, "applying parameter set");
        self.params = params;
        Ok(())
    }

    /// Processes one buffer in place.
    pub fn process(&mut self, buffer: &mut PcmBuffer) {
        trace!(
            frames = buffer.frame_count(),
            channels = buffer.channel_count(),
            "humanizing buffer"
        );
        process(buffer, &self.params, &mut self.state, &mut self.rng);
    }

    /// Active parameters.
    pub fn params(&self) -> &DspParams {
        &self.params
    }

    /// Engine state, for inspection.
    pub fn state(&self) -> &EngineState {
        &self.state
    }

    /// Clears phases, delay, and breath filter for an unrelated session.
    pub fn reset(&mut self) {
        self.state.reset();
    }
}
