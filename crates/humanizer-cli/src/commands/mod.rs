//! CLI command implementations.

pub mod classify;
pub mod presets;
pub mod process;

use colored::Colorize;
use humanizer_dsp::DspParams;

/// Prints a parameter set as an indented block.
pub(crate) fn print_params(params: &DspParams) {
    println!("{}", "Parameters:".cyan().bold());
    println!("  {} {}", "shimmer_depth:".dimmed(), params.shimmer_depth);
    println!("  {} {} Hz", "jitter_speed: ".dimmed(), params.jitter_speed);
    println!("  {} {}", "jitter_depth: ".dimmed(), params.jitter_depth);
    println!("  {} {}", "breathiness:  ".dimmed(), params.breathiness);
    println!("  {} {}", "warmth_drive: ".dimmed(), params.warmth_drive);
}
