//! Presets command implementation

use anyhow::Result;
use colored::Colorize;
use humanizer_dsp::presets::table;
use humanizer_dsp::{DspParams, Emotion};
use serde::Serialize;
use std::process::ExitCode;

#[derive(Debug, Serialize)]
struct PresetEntry {
    emotion: Emotion,
    #[serde(flatten)]
    params: DspParams,
}

/// Run the presets command
pub fn run(json_output: bool) -> Result<ExitCode> {
    if json_output {
        let entries: Vec<PresetEntry> = table()
            .into_iter()
            .map(|(emotion, params)| PresetEntry { emotion, params })
            .collect();
        println!("{}", serde_json::to_string_pretty(&entries)?);
        return Ok(ExitCode::SUCCESS);
    }

    println!(
        "{:<10} {:>8} {:>8} {:>8} {:>8} {:>8}",
        "emotion".cyan().bold(),
        "shimmer".cyan(),
        "j.speed".cyan(),
        "j.depth".cyan(),
        "breath".cyan(),
        "warmth".cyan()
    );
    for (emotion, p) in table() {
        println!(
            "{:<10} {:>8.3} {:>8.2} {:>8.3} {:>8.4} {:>8.2}",
            emotion.to_string().green(),
            p.shimmer_depth,
            p.jitter_speed,
            p.jitter_depth,
            p.breathiness,
            p.warmth_drive
        );
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_flattens_params() {
        let entry = PresetEntry {
            emotion: Emotion::Calm,
            params: humanizer_dsp::preset(Emotion::Calm),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["emotion"], "calm");
        assert!(json["breathiness"].is_number());
    }
}
