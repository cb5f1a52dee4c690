//! Distortion / Waveshaping
//!
//! Distortion adds harmonics by reshaping the waveform. A waveshaper maps each
//! input sample through a fixed transfer curve:
//!
//!   output = curve(input)
//!
//! The curve is precomputed as a table and read with linear interpolation,
//! so any transfer function costs the same at render time.
//!
//! # The Drive Curve
//!
//! Voices use the classic "amount" curve:
//!
//!   f(x) = ((3 + k) * x * 20°) / (π + k * |x|)      (20° = 20 * π / 180)
//!
//! where `k` is the drive amount. At k = 0 the curve is a gentle straight
//! line; as k grows the shoulders flatten and the wave squares off.
//!
//! # Drive Values
//!
//!   0     = almost linear, quieter than the input
//!   20    = default, obvious grit on a saw bass
//!   100+  = heavily squared, fuzz-like

use std::f32::consts::PI;
use std::sync::Arc;

use crate::dsp::mix::blend_dry_wet;

/// Points in a generated drive curve.
pub const CURVE_POINTS: usize = 44_100;

const TWENTY_DEGREES: f32 = 20.0 * PI / 180.0;

/// The drive transfer function evaluated at a single point.
#[inline]
pub fn drive_curve_point(x: f32, amount: f32) -> f32 {
    ((3.0 + amount) * x * TWENTY_DEGREES) / (PI + amount * x.abs())
}

/// Sample the drive curve at `points` evenly spaced inputs across [-1, 1].
pub fn make_drive_curve(amount: f32, points: usize) -> Vec<f32> {
    let points = points.max(2);
    (0..points)
        .map(|i| {
            let x = (i as f32 * 2.0) / points as f32 - 1.0;
            drive_curve_point(x, amount)
        })
        .collect()
}

/// Table waveshaper with a dry/wet blend.
#[derive(Debug, Clone)]
pub struct WaveShaper {
    curve: Arc<[f32]>,
    mix: f32,
}

impl WaveShaper {
    pub fn new(curve: Arc<[f32]>, mix: f32) -> Self {
        Self {
            curve,
            mix: mix.clamp(0.0, 1.0),
        }
    }

    /// Shaper using the drive curve at full resolution.
    pub fn drive(amount: f32, mix: f32) -> Self {
        Self::new(make_drive_curve(amount, CURVE_POINTS).into(), mix)
    }

    pub fn mix(&self) -> f32 {
        self.mix
    }

    /// Map one sample through the curve; input outside [-1, 1] is clamped.
    #[inline]
    pub fn shape(&self, sample: f32) -> f32 {
        let n = self.curve.len();
        if n == 0 {
            return sample;
        }
        let x = if sample.is_finite() {
            sample.clamp(-1.0, 1.0)
        } else {
            0.0
        };
        let pos = (n - 1) as f32 * (x + 1.0) * 0.5;
        let index = pos.floor() as usize;
        if index + 1 >= n {
            return self.curve[n - 1];
        }
        let frac = pos - index as f32;
        self.curve[index] + (self.curve[index + 1] - self.curve[index]) * frac
    }

    pub fn render(&self, buffer: &mut [f32]) {
        for sample in buffer.iter_mut() {
            let wet = self.shape(*sample);
            *sample = blend_dry_wet(*sample, wet, self.mix);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_is_odd_symmetric() {
        for x in [0.1, 0.5, 0.9] {
            let pos = drive_curve_point(x, 20.0);
            let neg = drive_curve_point(-x, 20.0);
            assert!((pos + neg).abs() < 1e-6);
        }
    }

    #[test]
    fn more_drive_squares_the_shoulders() {
        // Ratio of the curve at 0.5 to its value at 1.0 climbs towards 1 with drive.
        let ratio = |k: f32| drive_curve_point(0.5, k) / drive_curve_point(1.0, k);
        assert!(ratio(100.0) > ratio(20.0));
        assert!(ratio(20.0) > ratio(0.0));
    }

    #[test]
    fn shaper_matches_curve_and_clamps() {
        let shaper = WaveShaper::drive(20.0, 1.0);
        let expected = drive_curve_point(0.5, 20.0);
        assert!((shaper.shape(0.5) - expected).abs() < 1e-3);
        assert_eq!(shaper.shape(4.0), shaper.shape(1.0));
        assert_eq!(shaper.shape(f32::NAN), shaper.shape(0.0));
    }

    #[test]
    fn zero_mix_is_transparent() {
        let shaper = WaveShaper::drive(50.0, 0.0);
        let mut buffer = [0.9, -0.4, 0.2];
        shaper.render(&mut buffer);
        assert_eq!(buffer, [0.9, -0.4, 0.2]);
    }
}
