//! Utterance-level plumbing between synthesis and playback.
//!
//! A [`SpeechSession`] classifies each utterance, selects its preset, runs
//! every arriving buffer through one persistent [`Humanizer`], and hands
//! the result to a [`BufferSink`] in arrival order.

use tracing::{debug, trace};

use crate::buffer::PcmBuffer;
use crate::emotion::{classify, Emotion};
use crate::engine::{EngineTuning, Humanizer};
use crate::error::HumanizeResult;
use crate::params::DspParams;
use crate::rng::{EntropySource, RandomSource};

/// Downstream consumer of humanized buffers, typically a playback queue.
pub trait BufferSink {
    /// Accepts the next buffer. Buffers arrive in temporal order.
    fn accept(&mut self, buffer: PcmBuffer) -> HumanizeResult<()>;
}

/// Sink that keeps every buffer in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingSink {
    buffers: Vec<PcmBuffer>,
}

impl CollectingSink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Buffers received so far.
    pub fn buffers(&self) -> &[PcmBuffer] {
        &self.buffers
    }

    /// Concatenates channel `index` of every received buffer.
    pub fn channel_samples(&self, index: usize) -> Vec<f32> {
        self.buffers
            .iter()
            .filter_map(|b| b.channel(index))
            .flatten()
            .copied()
            .collect()
    }

    /// Consumes the sink and returns the buffers.
    pub fn into_buffers(self) -> Vec<PcmBuffer> {
        self.buffers
    }
}

impl BufferSink for CollectingSink {
    fn accept(&mut self, buffer: PcmBuffer) -> HumanizeResult<()> {
        self.buffers.push(buffer);
        Ok(())
    }
}

impl<S: BufferSink + ?Sized> BufferSink for &mut S {
    fn accept(&mut self, buffer: PcmBuffer) -> HumanizeResult<()> {
        (**self).accept(buffer)
    }
}

/// Counters for one session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionStats {
    /// Utterances started.
    pub utterances: u64,
    /// Buffers forwarded to the sink.
    pub buffers: u64,
    /// Frames forwarded to the sink.
    pub frames: u64,
}

/// One humanizer plus one sink, living across many utterances.
#[derive(Debug)]
pub struct SpeechSession<S, R = EntropySource> {
    humanizer: Humanizer<R>,
    sink: S,
    emotion: Option<Emotion>,
    stats: SessionStats,
}

impl<S: BufferSink> SpeechSession<S, EntropySource> {
    /// Creates a session with OS-entropy noise.
    pub fn new(tuning: EngineTuning, sink: S) -> HumanizeResult<Self> {
        Ok(Self::with_humanizer(Humanizer::new(tuning)?, sink))
    }
}

impl<S: BufferSink, R: RandomSource> SpeechSession<S, R> {
    /// Wraps an existing humanizer.
    pub fn with_humanizer(humanizer: Humanizer<R>, sink: S) -> Self {
        Self {
            humanizer,
            sink,
            emotion: None,
            stats: SessionStats::default(),
        }
    }

    /// Classifies `text` and applies its preset before its buffers arrive.
    pub fn begin_utterance(&mut self, text: &str) -> Emotion {
        let emotion = classify(text);
        self.begin_with_emotion(emotion);
        emotion
    }

    /// Applies the preset for a known emotion.
    pub fn begin_with_emotion(&mut self, emotion: Emotion) {
        self.stats.utterances += 1;
        debug!(
            utterance = self.stats.utterances,
            %emotion,
            "utterance started"
        );
        self.humanizer.set_emotion(emotion);
        self.emotion = Some(emotion);
    }

    /// Applies explicit parameters instead of a classified preset.
    pub fn begin_utterance_with(&mut self, params: DspParams) -> HumanizeResult<()> {
        self.humanizer.apply_preset(params)?;
        self.stats.utterances += 1;
        debug!(utterance = self.stats.utterances, "utterance started with custom parameters");
        self.emotion = None;
        Ok(())
    }

    /// Humanizes `buffer` and forwards it to the sink.
    pub fn push(&mut self, mut buffer: PcmBuffer) -> HumanizeResult<()> {
        self.humanizer.process(&mut buffer);

        self.stats.buffers += 1;
        self.stats.frames += buffer.frame_count() as u64;
        trace!(buffers = self.stats.buffers, "forwarding buffer");

        self.sink.accept(buffer)
    }

    /// Emotion of the current utterance, if it came from a preset.
    pub fn emotion(&self) -> Option<Emotion> {
        self.emotion
    }

    /// Active parameters.
    pub fn params(&self) -> &DspParams {
        self.humanizer.params()
    }

    /// Counters so far.
    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    /// The underlying humanizer.
    pub fn humanizer(&self) -> &Humanizer<R> {
        &self.humanizer
    }

    /// Ends the session and returns the sink.
    pub fn finish(self) -> S {
        debug!(
            utterances = self.stats.utterances,
            buffers = self.stats.buffers,
            frames = self.stats.frames,
            "session finished"
        );
        self.sink
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HumanizeError;
    use crate::presets::preset;
    use crate::rng::SeededSource;
    use pretty_assertions::assert_eq;

    fn session(seed: u32) -> SpeechSession<CollectingSink, SeededSource> {
        let humanizer =
            Humanizer::with_source(EngineTuning::default(), SeededSource::new(seed)).unwrap();
        SpeechSession::with_humanizer(humanizer, CollectingSink::new())
    }

    #[test]
    fn test_begin_utterance_selects_preset() {
        let mut session = session(1);
        assert_eq!(session.begin_utterance("Wow, yes!"), Emotion::Excited);
        assert_eq!(session.params(), &preset(Emotion::Excited));
        assert_eq!(session.emotion(), Some(Emotion::Excited));

        assert_eq!(session.begin_utterance("Take a deep breath."), Emotion::Calm);
        assert_eq!(session.params(), &preset(Emotion::Calm));
        assert_eq!(session.stats().utterances, 2);
    }

    #[test]
    fn test_custom_params_are_validated() {
        let mut session = session(1);
        session.begin_utterance("sorry");

        let bad = DspParams {
            jitter_depth: 50.0,
            ..DspParams::BYPASS
        };
        let err = session.begin_utterance_with(bad).unwrap_err();
        assert!(matches!(err, HumanizeError::InvalidParameter { .. }));
        assert_eq!(session.params(), &preset(Emotion::Warm));

        session.begin_utterance_with(DspParams::BYPASS).unwrap();
        assert_eq!(session.emotion(), None);
    }

    #[test]
    fn test_buffers_forwarded_in_order() {
        let mut session = session(2);
        session.begin_utterance("hello there");

        for frames in [128, 0, 64, 256] {
            session.push(PcmBuffer::silent(16000.0, 1, frames).unwrap()).unwrap();
        }

        assert_eq!(
            session.stats(),
            SessionStats {
                utterances: 1,
                buffers: 4,
                frames: 448,
            }
        );

        let buffers = session.finish().into_buffers();
        let sizes: Vec<usize> = buffers.iter().map(PcmBuffer::frame_count).collect();
        assert_eq!(sizes, vec![128, 0, 64, 256]);
    }

    #[test]
    fn test_sink_errors_propagate() {
        struct Refusing;
        impl BufferSink for Refusing {
            fn accept(&mut self, _buffer: PcmBuffer) -> HumanizeResult<()> {
                Err(HumanizeError::sink("queue full"))
            }
        }

        let humanizer = Humanizer::with_source(EngineTuning::default(), SeededSource::new(3)).unwrap();
        let mut session = SpeechSession::with_humanizer(humanizer, Refusing);
        let err = session.push(PcmBuffer::silent(8000.0, 1, 8).unwrap()).unwrap_err();
        assert!(err.to_string().contains("queue full"));
    }

    #[test]
    fn test_borrowed_sink() {
        let mut sink = CollectingSink::new();
        {
            let humanizer =
                Humanizer::with_source(EngineTuning::default(), SeededSource::new(4)).unwrap();
            let mut session = SpeechSession::with_humanizer(humanizer, &mut sink);
            session.push(PcmBuffer::silent(8000.0, 2, 32).unwrap()).unwrap();
        }
        assert_eq!(sink.buffers().len(), 1);
        assert_eq!(sink.channel_samples(1).len(), 32);
    }
}
