//! Per-sample shaping stages: shimmer gain, breath noise, and warmth.

use std::f64::consts::FRAC_2_PI;

/// Largest magnitude the f64 saturator returns.
const SATURATION_CEILING: f64 = 1.0 - f64::EPSILON;

/// Largest magnitude written back into an f32 buffer.
const OUTPUT_CEILING: f32 = 1.0 - f32::EPSILON;

/// Shimmer gain: `1 + sin(phase)·depth + dither`.
#[inline]
pub fn amplitude_modulation(shimmer_phase: f64, depth: f64, dither: f64) -> f64 {
    1.0 + shimmer_phase.sin() * depth + dither
}

/// One step of the single-pole low-pass over white noise.
#[inline]
pub fn smooth_noise(filtered: f64, raw: f64, alpha: f64) -> f64 {
    filtered + alpha * (raw - filtered)
}

/// Breath noise to add to `sample`, gated so silence stays silent.
///
/// Returns exactly `0.0` when `|sample|` does not exceed `gate`.
#[inline]
pub fn breath_contribution(sample: f64, filtered: f64, breathiness: f64, gate: f64) -> f64 {
    if sample.abs() > gate {
        filtered * breathiness
    } else {
        0.0
    }
}

/// Arctangent soft saturation: `(2/π)·atan(x·drive)`.
///
/// Odd, monotonic, and strictly inside `(-1, 1)` for finite input. The
/// ceiling guard covers inputs large enough for `atan` to round to `π/2`.
#[inline]
pub fn saturate(x: f64, drive: f64) -> f64 {
    (FRAC_2_PI * (x * drive).atan()).clamp(-SATURATION_CEILING, SATURATION_CEILING)
}

/// [`saturate`] narrowed to an f32 sample, still strictly inside `(-1, 1)`.
///
/// NaN passes through as NaN.
#[inline]
pub fn saturate_sample(x: f64, drive: f64) -> f32 {
    (saturate(x, drive) as f32).clamp(-OUTPUT_CEILING, OUTPUT_CEILING)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::TAU;

    #[test]
    fn test_saturate_bounds() {
        for x in [0.5, 1.0, 10.0, 1e6, 1e300, f64::MAX] {
            assert!(saturate(x, 1.0) < 1.0);
            assert!(saturate(-x, 1.0) > -1.0);
            assert!(saturate_sample(x, 10.0) < 1.0);
            assert!(saturate_sample(-x, 10.0) > -1.0);
        }
    }

    #[test]
    fn test_saturate_is_odd_and_monotonic() {
        let mut prev = f64::NEG_INFINITY;
        for i in -100..=100 {
            let x = i as f64 * 0.05;
            let y = saturate(x, 1.5);
            assert!((y + saturate(-x, 1.5)).abs() < 1e-15);
            assert!(y >= prev);
            prev = y;
        }
        assert_eq!(saturate(0.0, 3.0), 0.0);
    }

    #[test]
    fn test_saturate_nan_does_not_panic() {
        assert!(saturate(f64::NAN, 1.0).is_nan());
        assert!(saturate_sample(f64::NAN, 1.0).is_nan());
    }

    #[test]
    fn test_breath_gate() {
        for breathiness in [0.0, 0.01, 0.1, 5.0, -3.0] {
            assert_eq!(breath_contribution(0.0, 0.9, breathiness, 0.01), 0.0);
            assert_eq!(breath_contribution(0.01, 0.9, breathiness, 0.01), 0.0);
            assert_eq!(breath_contribution(-0.0099, 0.9, breathiness, 0.01), 0.0);
        }
        assert_eq!(breath_contribution(0.5, 0.2, 0.1, 0.01), 0.2 * 0.1);
        assert_eq!(breath_contribution(-0.5, 0.2, 0.1, 0.01), 0.2 * 0.1);
    }

    #[test]
    fn test_smooth_noise_converges() {
        let mut filtered = 0.0;
        for _ in 0..200 {
            filtered = smooth_noise(filtered, 1.0, 0.3);
        }
        assert!((filtered - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_shimmer_mean_over_period() {
        let sample_rate = 48000.0;
        let period = (sample_rate / 8.0) as usize;
        let inc = 8.0 * TAU / sample_rate;

        let mut phase = 0.0;
        let mut sum = 0.0;
        for _ in 0..period {
            phase += inc;
            sum += amplitude_modulation(phase, 0.05, 0.0);
        }

        assert!((sum / period as f64 - 1.0).abs() < 1e-9);
    }
}
