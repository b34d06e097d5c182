//! Process command implementation
//!
//! Humanizes a WAV file offline. The file is split into fixed-size chunks
//! and pushed through a speech session one buffer at a time, the same way
//! a synthesizer callback would deliver them.

use anyhow::{Context, Result};
use colored::Colorize;
use humanizer_dsp::{
    matched_keyword, DspParams, Emotion, EngineTuning, Humanizer, PcmBuffer, RandomSource,
    SeededSource, SessionStats, SpeechSession,
};
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use super::print_params;
use crate::config::{load_params, load_tuning};
use crate::wav::{read_wav, WavSink};

/// Default buffer size handed to the session, in frames.
pub const DEFAULT_CHUNK_FRAMES: usize = 512;

/// Where the utterance's parameters come from.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamSource {
    /// Classify this text.
    Text(String),
    /// Use this emotion's preset.
    Emotion(Emotion),
    /// Load an explicit parameter file.
    ParamsFile(PathBuf),
    /// Neutral preset.
    Default,
}

/// Options for the process command.
#[derive(Debug, Clone)]
pub struct ProcessOptions {
    /// Input WAV path.
    pub input: PathBuf,
    /// Output WAV path.
    pub output: PathBuf,
    /// Parameter selection.
    pub source: ParamSource,
    /// Optional engine tuning file.
    pub tuning: Option<PathBuf>,
    /// Seed for reproducible noise. OS entropy when absent.
    pub seed: Option<u32>,
    /// Frames per pushed buffer.
    pub chunk_frames: usize,
}

/// Machine-readable summary of a run.
#[derive(Debug, Serialize)]
pub struct ProcessReport {
    /// Input path.
    pub input: String,
    /// Output path.
    pub output: String,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
    /// Classified or requested emotion; absent for a parameter file.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emotion: Option<Emotion>,
    /// Keyword that decided the emotion.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<&'static str>,
    /// Parameters applied.
    pub params: DspParams,
    /// Seed, if deterministic.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub seed: Option<u32>,
    /// Buffers pushed.
    pub buffers: u64,
    /// Frames per channel processed.
    pub frames: u64,
}

/// Run the process command
///
/// # Returns
/// Exit code: 0 on success
pub fn run(options: &ProcessOptions, json_output: bool) -> Result<ExitCode> {
    let report = process_file(options)?;

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report);
    }

    Ok(ExitCode::SUCCESS)
}

/// Humanizes `options.input` into `options.output`.
pub fn process_file(options: &ProcessOptions) -> Result<ProcessReport> {
    let tuning = match &options.tuning {
        Some(path) => load_tuning(path)?,
        None => EngineTuning::default(),
    };

    let (buffer, spec) = read_wav(&options.input)?;
    info!(
        input = %options.input.display(),
        sample_rate = spec.sample_rate,
        channels = spec.channels,
        frames = buffer.frame_count(),
        "loaded input"
    );

    // Resolve parameters before the output file exists.
    let selection = match &options.source {
        ParamSource::Text(text) => Selection::Text(text),
        ParamSource::Emotion(emotion) => Selection::Emotion(*emotion),
        ParamSource::ParamsFile(path) => Selection::Params(load_params(path)?),
        ParamSource::Default => Selection::Emotion(Emotion::Neutral),
    };

    let sink = WavSink::create(&options.output, spec)?;
    let chunks = buffer.split_frames(options.chunk_frames);

    let outcome = match options.seed {
        Some(seed) => {
            let rng = SeededSource::for_component(seed, "humanizer");
            run_session(Humanizer::with_source(tuning, rng)?, sink, selection, chunks)?
        }
        None => run_session(Humanizer::new(tuning)?, sink, selection, chunks)?,
    };

    Ok(ProcessReport {
        input: options.input.display().to_string(),
        output: options.output.display().to_string(),
        sample_rate: spec.sample_rate,
        channels: spec.channels,
        emotion: outcome.emotion,
        keyword: outcome.keyword,
        params: outcome.params,
        seed: options.seed,
        buffers: outcome.stats.buffers,
        frames: outcome.stats.frames,
    })
}

enum Selection<'a> {
    Text(&'a str),
    Emotion(Emotion),
    Params(DspParams),
}

struct SessionOutcome {
    emotion: Option<Emotion>,
    keyword: Option<&'static str>,
    params: DspParams,
    stats: SessionStats,
}

fn run_session<R: RandomSource>(
    humanizer: Humanizer<R>,
    sink: WavSink<BufWriter<File>>,
    selection: Selection<'_>,
    chunks: Vec<PcmBuffer>,
) -> Result<SessionOutcome> {
    let mut session = SpeechSession::with_humanizer(humanizer, sink);

    let mut keyword = None;
    match selection {
        Selection::Text(text) => {
            keyword = matched_keyword(text).map(|(_, k)| k);
            session.begin_utterance(text);
        }
        Selection::Emotion(emotion) => session.begin_with_emotion(emotion),
        Selection::Params(params) => session.begin_utterance_with(params)?,
    }

    for chunk in chunks {
        session.push(chunk).context("Failed to write humanized audio")?;
    }

    let outcome = SessionOutcome {
        emotion: session.emotion(),
        keyword,
        params: *session.params(),
        stats: session.stats(),
    };
    session.finish().finalize()?;

    Ok(outcome)
}

fn print_report(report: &ProcessReport) {
    println!("{}", "Humanized:".cyan().bold());
    println!("  {} {}", "Input: ".dimmed(), report.input);
    println!("  {} {}", "Output:".dimmed(), report.output);
    println!(
        "  {} {} Hz, {} ch, {} frames in {} buffers",
        "Format:".dimmed(),
        report.sample_rate,
        report.channels,
        report.frames,
        report.buffers
    );
    match (report.emotion, report.keyword) {
        (Some(emotion), Some(keyword)) => println!(
            "  {} {} (matched \"{}\")",
            "Emotion:".dimmed(),
            emotion.to_string().green(),
            keyword
        ),
        (Some(emotion), None) => {
            println!("  {} {}", "Emotion:".dimmed(), emotion.to_string().green())
        }
        (None, _) => println!("  {} {}", "Emotion:".dimmed(), "custom parameters".yellow()),
    }
    if let Some(seed) = report.seed {
        println!("  {} {}", "Seed:".dimmed(), seed);
    }
    print_params(&report.params);
}

impl ProcessOptions {
    /// Options with defaults for everything but the paths.
    pub fn new(input: impl AsRef<Path>, output: impl AsRef<Path>) -> Self {
        Self {
            input: input.as_ref().to_path_buf(),
            output: output.as_ref().to_path_buf(),
            source: ParamSource::Default,
            tuning: None,
            seed: None,
            chunk_frames: DEFAULT_CHUNK_FRAMES,
        }
    }
}
