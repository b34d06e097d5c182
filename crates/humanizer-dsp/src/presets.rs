//! Emotion to parameter preset table.

use crate::emotion::Emotion;
use crate::params::DspParams;

/// Returns the parameter preset for an emotion.
///
/// The match is exhaustive, so adding an emotion without a preset fails to
/// compile.
pub const fn preset(emotion: Emotion) -> DspParams {
    match emotion {
        // Light, steady movement.
        Emotion::Neutral => DspParams {
            shimmer_depth: 0.02,
            jitter_speed: 4.0,
            jitter_depth: 0.02,
            breathiness: 0.002,
            warmth_drive: 1.2,
        },
        // Softer, breathier, rounder.
        Emotion::Warm => DspParams {
            shimmer_depth: 0.03,
            jitter_speed: 3.0,
            jitter_depth: 0.025,
            breathiness: 0.006,
            warmth_drive: 1.5,
        },
        // Fast wobble, bright and pushed.
        Emotion::Excited => DspParams {
            shimmer_depth: 0.05,
            jitter_speed: 7.0,
            jitter_depth: 0.04,
            breathiness: 0.003,
            warmth_drive: 1.8,
        },
        // Slow, breathy, barely driven.
        Emotion::Calm => DspParams {
            shimmer_depth: 0.015,
            jitter_speed: 2.0,
            jitter_depth: 0.015,
            breathiness: 0.008,
            warmth_drive: 1.1,
        },
        // Tight and dry.
        Emotion::Serious => DspParams {
            shimmer_depth: 0.01,
            jitter_speed: 5.0,
            jitter_depth: 0.01,
            breathiness: 0.001,
            warmth_drive: 1.3,
        },
    }
}

/// The full table as `(emotion, params)` pairs, in declaration order.
pub fn table() -> [(Emotion, DspParams); 5] {
    Emotion::ALL.map(|emotion| (emotion, preset(emotion)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_all_presets_validate() {
        for (emotion, params) in table() {
            assert!(
                params.validate().is_ok(),
                "preset for {} failed validation: {:?}",
                emotion,
                params.validate()
            );
        }
    }

    #[test]
    fn test_warmth_drive_at_least_one() {
        for (_, params) in table() {
            assert!(params.warmth_drive >= 1.0);
        }
    }

    #[test]
    fn test_neutral_is_default() {
        assert_eq!(DspParams::default(), preset(Emotion::Neutral));
    }

    #[test]
    fn test_presets_are_distinct() {
        let table = table();
        for (i, (a, pa)) in table.iter().enumerate() {
            for (b, pb) in &table[i + 1..] {
                assert_ne!(pa, pb, "{} and {} share a preset", a, b);
            }
        }
    }
}
