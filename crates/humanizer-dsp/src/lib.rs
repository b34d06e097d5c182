//! Speech Humanizer DSP
//!
//! Post-processing for synthesized speech. Takes the PCM buffers a
//! text-to-speech engine produces and makes them sound less mechanical:
//!
//! - **Shimmer** - slow, dithered amplitude modulation
//! - **Jitter** - pitch micro-wobble via a modulated fractional delay line
//! - **Breathiness** - low-passed noise, gated so silence stays silent
//! - **Warmth** - arctangent soft saturation
//!
//! A keyword classifier picks one of five emotions for each utterance and
//! the preset table maps it to a parameter set.
//!
//! # Example
//!
//! ```
//! use humanizer_dsp::{CollectingSink, EngineTuning, Humanizer, PcmBuffer, SeededSource, SpeechSession};
//!
//! let humanizer = Humanizer::with_source(EngineTuning::default(), SeededSource::new(42))?;
//! let mut session = SpeechSession::with_humanizer(humanizer, CollectingSink::new());
//!
//! let emotion = session.begin_utterance("This is amazing!");
//! assert_eq!(emotion.to_string(), "excited");
//!
//! session.push(PcmBuffer::mono(22050.0, vec![0.25; 512])?)?;
//! let sink = session.finish();
//! assert_eq!(sink.buffers()[0].frame_count(), 512);
//! # Ok::<(), humanizer_dsp::HumanizeError>(())
//! ```
//!
//! # Determinism
//!
//! With a [`SeededSource`] the output is fully reproducible, and processing
//! a stream in chunks gives exactly the same samples and state as
//! processing it in one piece. The default [`EntropySource`] makes the
//! breath noise differ from run to run.
//!
//! # Crate Structure
//!
//! - [`emotion`] - Keyword classifier
//! - [`presets`] - Emotion to parameter table
//! - [`params`] - Parameter set and validation
//! - [`engine`] - Delay line, oscillators, shaping stages, and [`process`]
//! - [`pipeline`] - Session façade and sink trait
//! - [`buffer`] - Planar PCM buffers
//! - [`rng`] - Injectable random sources

pub mod buffer;
pub mod emotion;
pub mod engine;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod presets;
pub mod rng;

// Re-export main types at crate root
pub use buffer::PcmBuffer;
pub use emotion::{classify, matched_keyword, Emotion, ParseEmotionError};
pub use engine::{process, saturate, EngineState, EngineTuning, Humanizer};
pub use error::{HumanizeError, HumanizeResult};
pub use params::DspParams;
pub use pipeline::{BufferSink, CollectingSink, SessionStats, SpeechSession};
pub use presets::preset;
pub use rng::{EntropySource, RandomSource, SeededSource, ZeroSource};
