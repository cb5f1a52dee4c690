//! Signal summing, scaling and dry/wet blending.

/*
Summing Buses
=============

Everything in the engine ends up ADDED into a bus: note graphs into their
voice channel, channels and drums into the master. Sums are not normalised,
so the bus gain (master 0.5, channel volume) is what keeps the result in
range.

  sum         a[i] += b[i]
  scale       a[i] *= g
  multiply    a[i] *= b[i]           (gain envelopes, VCA)
  dry/wet     dry * (1 - mix) + wet * mix

Layering N Oscillators
----------------------

N detuned copies of a waveform are largely uncorrelated, so their POWER adds
rather than their amplitude. Scaling each copy by 1/sqrt(N) keeps perceived
loudness roughly constant as layers are added:

    N   gain    sum of powers
    1   1.000   1.0
    2   0.707   1.0
    3   0.577   1.0
    4   0.500   1.0
*/

/// Add signal B into signal A in-place (summing).
#[inline]
pub fn sum_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb;
    }
}

/// Add signal B scaled by `gain` into signal A.
#[inline]
pub fn sum_scaled_in_place(a: &mut [f32], b: &[f32], gain: f32) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa += sb * gain;
    }
}

#[inline]
pub fn scale_in_place(a: &mut [f32], gain: f32) {
    for sample in a.iter_mut() {
        *sample *= gain;
    }
}

/// Multiply A by B sample-by-sample (amplitude control).
#[inline]
pub fn multiply_in_place(a: &mut [f32], b: &[f32]) {
    debug_assert_eq!(a.len(), b.len());

    for (sa, &sb) in a.iter_mut().zip(b.iter()) {
        *sa *= sb;
    }
}

/// Per-layer gain that keeps the power of `layers` uncorrelated signals constant.
#[inline]
pub fn equal_power_gain(layers: usize) -> f32 {
    1.0 / (layers.max(1) as f32).sqrt()
}

/// Blend dry and wet samples using linear crossfade (single sample version).
///
/// output = (dry × (1-mix)) + (wet × mix)
#[inline]
pub fn blend_dry_wet(dry: f32, wet: f32, mix: f32) -> f32 {
    dry * (1.0 - mix) + wet * mix
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sum_can_exceed_one() {
        let mut a = [1.0, 0.5];
        sum_in_place(&mut a, &[1.0, 0.8]);
        assert_eq!(a, [2.0, 1.3]);
    }

    #[test]
    fn scaled_sum_and_multiply() {
        let mut a = [0.0, 1.0];
        sum_scaled_in_place(&mut a, &[1.0, 1.0], 0.5);
        assert_eq!(a, [0.5, 1.5]);

        multiply_in_place(&mut a, &[2.0, 0.0]);
        assert_eq!(a, [1.0, 0.0]);

        scale_in_place(&mut a, 0.25);
        assert_eq!(a, [0.25, 0.0]);
    }

    #[test]
    fn equal_power_gain_preserves_power() {
        for layers in 1..=4 {
            let gain = equal_power_gain(layers);
            let power = layers as f32 * gain * gain;
            assert!((power - 1.0).abs() < 1e-6);
        }
        assert_eq!(equal_power_gain(0), 1.0);
    }

    #[test]
    fn test_blend_dry_wet() {
        assert_eq!(blend_dry_wet(1.0, 0.5, 0.0), 1.0);
        assert_eq!(blend_dry_wet(1.0, 0.5, 1.0), 0.5);
        assert_eq!(blend_dry_wet(1.0, 0.0, 0.5), 0.5);
    }
}
