use std::f32::consts::PI;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::MIN_FILTER_FREQ;

/*
| type      | passes          | rejects         | used by                      |
| --------- | --------------- | --------------- | ---------------------------- |
| low-pass  | below cutoff    | above cutoff    | filter envelope, channel LP  |
| high-pass | above cutoff    | below cutoff    | hats, crash, channel HP      |
| band-pass | around cutoff   | both sides      | snare, clap                  |

Q maps to the SVF damping as k = 1/Q. Q = 0.707 is the flattest response,
Q = 1 (channel default) has a small bump, Q = 8 (filter envelope) squelches.
*/

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterType {
    LowPass,
    HighPass,
    BandPass,
}

pub struct FilterOutputs {
    pub lowpass: f32,
    pub bandpass: f32,
    pub highpass: f32,
}

/// Topology-preserving-transform state-variable filter.
#[derive(Debug, Clone)]
pub struct SVFilter {
    ic1eq: f32, // First integrator's memory
    ic2eq: f32, // Second integrator's memory

    pub cutoff_hz: f32,
    pub q: f32,
    filter_type: FilterType,
}

impl SVFilter {
    pub fn new(filter_type: FilterType, cutoff_hz: f32, q: f32) -> Self {
        Self {
            ic1eq: 0.0,
            ic2eq: 0.0,
            cutoff_hz,
            q,
            filter_type,
        }
    }

    pub fn lowpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::LowPass, cutoff_hz, 1.0)
    }

    pub fn highpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::HighPass, cutoff_hz, 1.0)
    }

    pub fn bandpass(cutoff_hz: f32) -> Self {
        Self::new(FilterType::BandPass, cutoff_hz, 1.0)
    }

    pub fn with_q(mut self, q: f32) -> Self {
        self.q = q;
        self
    }

    pub fn filter_type(&self) -> FilterType {
        self.filter_type
    }

    #[inline]
    fn compute_g(cutoff_hz: f32, sample_rate: f32) -> f32 {
        // Keep the prewarp away from Nyquist where tan() blows up.
        let cutoff = cutoff_hz.clamp(MIN_FILTER_FREQ, sample_rate * 0.49);
        (PI * cutoff / sample_rate).tan()
    }

    #[inline]
    fn damping(&self) -> f32 {
        1.0 / self.q.max(0.01)
    }

    pub fn next_sample(&mut self, sample: f32, k: f32, g: f32) -> FilterOutputs {
        let h = 1.0 / (1.0 + g * (g + k));
        let v3 = sample - self.ic2eq;
        let v1 = h * (self.ic1eq + g * v3);
        let v2 = self.ic2eq + g * v1;

        self.ic1eq = 2.0 * v1 - self.ic1eq;
        self.ic2eq = 2.0 * v2 - self.ic2eq;

        FilterOutputs {
            lowpass: v2,
            bandpass: v1,
            highpass: sample - k * v1 - v2,
        }
    }

    // Band-pass is scaled by k so its peak sits at unity gain.
    #[inline]
    fn select(&self, outputs: FilterOutputs, k: f32) -> f32 {
        match self.filter_type {
            FilterType::LowPass => outputs.lowpass,
            FilterType::HighPass => outputs.highpass,
            FilterType::BandPass => outputs.bandpass * k,
        }
    }

    /// Filter `buffer` in place at the current cutoff.
    pub fn render(&mut self, buffer: &mut [f32], sample_rate: f32) {
        let g = Self::compute_g(self.cutoff_hz, sample_rate);
        let k = self.damping();

        for sample in buffer.iter_mut() {
            let outputs = self.next_sample(*sample, k, g);
            *sample = self.select(outputs, k);
        }
    }

    /// Filter `buffer` in place with one cutoff value per frame.
    pub fn render_modulated(&mut self, buffer: &mut [f32], cutoffs: &[f32], sample_rate: f32) {
        debug_assert_eq!(buffer.len(), cutoffs.len());
        let k = self.damping();

        for (sample, &cutoff) in buffer.iter_mut().zip(cutoffs.iter()) {
            let g = Self::compute_g(cutoff, sample_rate);
            let outputs = self.next_sample(*sample, k, g);
            *sample = self.select(outputs, k);
        }

        if let Some(&last) = cutoffs.last() {
            self.cutoff_hz = last;
        }
    }

    pub fn reset(&mut self) {
        self.ic1eq = 0.0;
        self.ic2eq = 0.0;
    }

    pub fn set_cutoff(&mut self, cutoff: f32) {
        self.cutoff_hz = cutoff;
    }

    pub fn set_q(&mut self, q: f32) {
        self.q = q;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dsp::oscillator::OscillatorBlock;

    const SR: f32 = 48_000.0;

    fn peak_after_transient(buffer: &[f32]) -> f32 {
        let skip = buffer.len().min(256);
        buffer
            .get(skip..)
            .unwrap_or(buffer)
            .iter()
            .fold(0.0f32, |acc, &x| acc.max(x.abs()))
    }

    fn filtered_sine_peak(filter: &mut SVFilter, freq: f32) -> f32 {
        filter.reset();
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 2048];
        osc.render(&mut buffer, freq, SR);
        filter.render(&mut buffer, SR);
        peak_after_transient(&buffer)
    }

    #[test]
    fn lowpass_passes_dc() {
        let mut filter = SVFilter::lowpass(500.0).with_q(0.707);
        let mut buffer = vec![1.0; 1024];
        filter.render(&mut buffer, SR);
        assert!(buffer[1023] > 0.99);
    }

    #[test]
    fn highpass_blocks_dc() {
        let mut filter = SVFilter::highpass(500.0).with_q(0.707);
        let mut buffer = vec![1.0; 1024];
        filter.render(&mut buffer, SR);
        assert!(buffer[1023].abs() < 0.001);
    }

    #[test]
    fn lowpass_attenuates_above_cutoff() {
        let mut filter = SVFilter::lowpass(500.0).with_q(0.707);
        let peak = filtered_sine_peak(&mut filter, 5_000.0);
        assert!(peak < 0.05, "expected attenuation, got {peak}");
    }

    #[test]
    fn bandpass_emphasizes_center() {
        let mut filter = SVFilter::bandpass(1_800.0).with_q(0.8);
        let center = filtered_sine_peak(&mut filter, 1_800.0);
        let below = filtered_sine_peak(&mut filter, 100.0);
        assert!(center > below * 2.0, "center={center}, below={below}");
    }

    #[test]
    fn higher_q_resonates_at_cutoff() {
        let mut gentle = SVFilter::lowpass(1_000.0).with_q(0.707);
        let mut squelchy = SVFilter::lowpass(1_000.0).with_q(8.0);
        let gentle_peak = filtered_sine_peak(&mut gentle, 1_000.0);
        let squelchy_peak = filtered_sine_peak(&mut squelchy, 1_000.0);
        assert!(squelchy_peak > gentle_peak * 4.0);
    }

    #[test]
    fn modulated_cutoff_tracks_last_value() {
        let mut filter = SVFilter::lowpass(800.0);
        let mut buffer = vec![0.5f32; 64];
        let cutoffs: Vec<f32> = (0..64).map(|i| 800.0 + i as f32 * 100.0).collect();
        filter.render_modulated(&mut buffer, &cutoffs, SR);
        assert_eq!(filter.cutoff_hz, 7_100.0);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }

    #[test]
    fn out_of_range_cutoff_stays_stable() {
        let mut filter = SVFilter::lowpass(-50.0);
        let mut buffer = vec![1.0f32; 256];
        filter.render(&mut buffer, SR);
        filter.set_cutoff(1.0e9);
        filter.render(&mut buffer, SR);
        assert!(buffer.iter().all(|s| s.is_finite()));
    }
}
