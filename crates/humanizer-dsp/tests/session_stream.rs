//! End-to-end session tests: utterances in, humanized buffers out.

use humanizer_dsp::{
    preset, process, CollectingSink, DspParams, Emotion, EngineState, EngineTuning, Humanizer,
    PcmBuffer, SeededSource, SpeechSession,
};
use pretty_assertions::assert_eq;
use std::f32::consts::TAU;

fn tone(frames: usize, sample_rate: f32) -> Vec<f32> {
    (0..frames)
        .map(|i| 0.5 * (TAU * 220.0 * i as f32 / sample_rate).sin())
        .collect()
}

fn seeded_session(seed: u32) -> SpeechSession<CollectingSink, SeededSource> {
    let humanizer =
        Humanizer::with_source(EngineTuning::default(), SeededSource::new(seed)).unwrap();
    SpeechSession::with_humanizer(humanizer, CollectingSink::new())
}

#[test]
fn test_stream_matches_direct_processing() {
    let input = tone(4410, 22050.0);

    let mut session = seeded_session(11);
    session.begin_utterance("Unfortunately the flight is delayed.");
    for chunk in PcmBuffer::mono(22050.0, input.clone()).unwrap().split_frames(256) {
        session.push(chunk).unwrap();
    }
    let streamed = session.finish().channel_samples(0);

    let mut direct = PcmBuffer::mono(22050.0, input).unwrap();
    let mut state = EngineState::default();
    process(
        &mut direct,
        &preset(Emotion::Warm),
        &mut state,
        &mut SeededSource::new(11),
    );

    assert_eq!(streamed, direct.channel(0).unwrap().to_vec());
}

#[test]
fn test_emotion_change_does_not_reset_state() {
    let mut session = seeded_session(5);
    session.begin_utterance("Listen, this is important.");
    session.push(PcmBuffer::mono(16000.0, tone(1000, 16000.0)).unwrap()).unwrap();

    let state_before = session.humanizer().state().clone();
    assert_eq!(session.begin_utterance("Relax."), Emotion::Calm);
    assert_eq!(session.humanizer().state(), &state_before);
    assert_eq!(state_before.write_head(), 1000);
}

#[test]
fn test_humanized_speech_differs_but_stays_bounded() {
    let input = tone(8000, 16000.0);
    let mut session = seeded_session(8);
    session.begin_utterance("Wow!");
    session.push(PcmBuffer::mono(16000.0, input.clone()).unwrap()).unwrap();

    let output = session.finish().channel_samples(0);
    assert_eq!(output.len(), input.len());
    assert!(output.iter().all(|s| s.abs() < 1.0));

    // Past the initial delay the voice is present, not silence.
    let energy: f32 = output[400..].iter().map(|s| s * s).sum();
    assert!(energy > 1.0);
}

#[test]
fn test_bypass_only_dither_differs_between_seeds() {
    // With every depth at zero only the dither terms depend on the seed.
    let input = tone(2000, 22050.0);
    let mut outputs = Vec::new();
    for seed in [1, 2] {
        let mut session = seeded_session(seed);
        session.begin_utterance_with(DspParams::BYPASS).unwrap();
        session.push(PcmBuffer::mono(22050.0, input.clone()).unwrap()).unwrap();
        outputs.push(session.finish().channel_samples(0));
    }

    let max_diff = outputs[0]
        .iter()
        .zip(&outputs[1])
        .map(|(a, b)| (a - b).abs())
        .fold(0.0f32, f32::max);
    assert!(max_diff > 0.0);
    assert!(max_diff < 0.1, "max diff {}", max_diff);
}
