//! Classify command implementation
//!
//! Shows which emotion an utterance maps to and the preset it selects.

use anyhow::Result;
use colored::Colorize;
use humanizer_dsp::{matched_keyword, preset, DspParams, Emotion};
use serde::Serialize;
use std::process::ExitCode;

use super::print_params;

/// Machine-readable classification result.
#[derive(Debug, Serialize)]
pub struct ClassifyOutput {
    /// Classified emotion.
    pub emotion: Emotion,
    /// Keyword that decided it, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keyword: Option<&'static str>,
    /// Preset the emotion selects.
    pub params: DspParams,
}

/// Builds the classification result for `text`.
pub fn classify_text(text: &str) -> ClassifyOutput {
    let (emotion, keyword) = match matched_keyword(text) {
        Some((emotion, keyword)) => (emotion, Some(keyword)),
        None => (Emotion::Neutral, None),
    };
    ClassifyOutput {
        emotion,
        keyword,
        params: preset(emotion),
    }
}

/// Run the classify command
///
/// # Arguments
/// * `text` - Utterance text
/// * `json_output` - Whether to output machine-readable JSON
pub fn run(text: &str, json_output: bool) -> Result<ExitCode> {
    let result = classify_text(text);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!("{} {}", "Emotion:".cyan().bold(), result.emotion.to_string().green());
    match result.keyword {
        Some(keyword) => println!("  {} \"{}\"", "matched".dimmed(), keyword),
        None => println!("  {}", "no keyword matched".dimmed()),
    }
    print_params(&result.params);

    Ok(ExitCode::SUCCESS)
}
