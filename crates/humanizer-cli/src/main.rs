//! Humanizer CLI
//!
//! Classifies utterance text, lists the emotion presets and humanizes WAV
//! files offline.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use humanizer_cli::commands;
use humanizer_cli::commands::process::{ParamSource, ProcessOptions, DEFAULT_CHUNK_FRAMES};
use humanizer_dsp::Emotion;

/// Humanizer - emotion-aware post-processing for synthesized speech
#[derive(Parser)]
#[command(name = "humanizer")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify utterance text into an emotion and show its preset
    Classify {
        /// Utterance text
        #[arg(short, long)]
        text: String,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// List the parameter preset for every emotion
    Presets {
        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },

    /// Humanize a WAV file
    Process {
        /// Input WAV file
        #[arg(short, long)]
        input: PathBuf,

        /// Output WAV file (same format as the input)
        #[arg(short, long)]
        output: PathBuf,

        /// Utterance text used to pick the emotion
        #[arg(short, long, conflicts_with_all = ["emotion", "params"])]
        text: Option<String>,

        /// Emotion preset to apply
        #[arg(short, long, conflicts_with = "params")]
        emotion: Option<Emotion>,

        /// JSON file with explicit DSP parameters
        #[arg(short, long)]
        params: Option<PathBuf>,

        /// JSON file overriding engine tuning constants
        #[arg(long)]
        tuning: Option<PathBuf>,

        /// Seed for reproducible noise (default: OS entropy)
        #[arg(long)]
        seed: Option<u32>,

        /// Frames per buffer pushed through the engine
        #[arg(long, default_value_t = DEFAULT_CHUNK_FRAMES)]
        chunk_frames: usize,

        /// Output machine-readable JSON (no colored output)
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .ok();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing();

    let result = match cli.command {
        Commands::Classify { text, json } => commands::classify::run(&text, json),
        Commands::Presets { json } => commands::presets::run(json),
        Commands::Process {
            input,
            output,
            text,
            emotion,
            params,
            tuning,
            seed,
            chunk_frames,
            json,
        } => {
            let source = match (text, emotion, params) {
                (Some(text), _, _) => ParamSource::Text(text),
                (_, Some(emotion), _) => ParamSource::Emotion(emotion),
                (_, _, Some(path)) => ParamSource::ParamsFile(path),
                (None, None, None) => ParamSource::Default,
            };
            let options = ProcessOptions {
                input,
                output,
                source,
                tuning,
                seed,
                chunk_frames,
            };
            commands::process::run(&options, json)
        }
    };

    match result {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", colored::Colorize::red("error"), e);
            ExitCode::from(1)
        }
    }
}
