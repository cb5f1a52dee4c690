use std::f32::consts::{PI, TAU};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Harmonics summed into a pulse wavetable.
pub const PULSE_HARMONICS: usize = 32;
/// Samples per wavetable cycle.
pub const WAVETABLE_SIZE: usize = 2048;

/// Periodic waveforms the oscillator can produce. Noise is not periodic and
/// lives in [`crate::dsp::noise`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OscillatorWaveform {
    Sine,
    Square,
    Sawtooth,
    Triangle,
}

/// One cycle of a band-limited waveform built from sine partials.
#[derive(Debug, Clone, PartialEq)]
pub struct Wavetable {
    samples: Vec<f32>,
}

impl Wavetable {
    /// Sum `real[n-1] * cos(2πnx) + imag[n-1] * sin(2πnx)` over one cycle,
    /// normalised to unit peak. The DC term is always dropped.
    pub fn from_partials(real: &[f32], imag: &[f32]) -> Self {
        let harmonics = real.len().max(imag.len());
        let mut samples = vec![0.0f32; WAVETABLE_SIZE];
        for (i, sample) in samples.iter_mut().enumerate() {
            let x = i as f32 / WAVETABLE_SIZE as f32;
            *sample = (0..harmonics)
                .map(|h| {
                    let angle = TAU * (h + 1) as f32 * x;
                    let a = real.get(h).copied().unwrap_or(0.0);
                    let b = imag.get(h).copied().unwrap_or(0.0);
                    a * angle.cos() + b * angle.sin()
                })
                .sum();
        }

        let peak = samples.iter().fold(0.0f32, |acc, &s| acc.max(s.abs()));
        if peak > f32::EPSILON {
            samples.iter_mut().for_each(|s| *s /= peak);
        }

        Self { samples }
    }

    /// Fourier series of a pulse wave with the given duty cycle, centred on
    /// phase zero: `a_n = 2 / (πn) * sin(πn * width)`.
    pub fn pulse(width: f32) -> Self {
        let real: Vec<f32> = (1..=PULSE_HARMONICS)
            .map(|n| {
                let n = n as f32;
                2.0 / (PI * n) * (PI * n * width).sin()
            })
            .collect();
        Self::from_partials(&real, &[])
    }

    #[inline]
    pub fn lookup(&self, phase: f32) -> f32 {
        let pos = phase.rem_euclid(1.0) * WAVETABLE_SIZE as f32;
        let index = pos as usize % WAVETABLE_SIZE;
        let next = (index + 1) % WAVETABLE_SIZE;
        let frac = pos - pos.floor();
        self.samples[index] + (self.samples[next] - self.samples[index]) * frac
    }
}

#[derive(Debug, Clone)]
pub enum OscillatorShape {
    Basic(OscillatorWaveform),
    Table(Arc<Wavetable>),
}

/// Phase-accumulator oscillator. Frequency is supplied per sample so pitch
/// automation (slides, vibrato, drum sweeps) is sample accurate.
#[derive(Debug, Clone)]
pub struct OscillatorBlock {
    shape: OscillatorShape,
    phase: f32,
}

impl OscillatorBlock {
    pub fn new(waveform: OscillatorWaveform) -> Self {
        Self {
            shape: OscillatorShape::Basic(waveform),
            phase: 0.0,
        }
    }

    pub fn sine() -> Self {
        Self::new(OscillatorWaveform::Sine)
    }

    pub fn square() -> Self {
        Self::new(OscillatorWaveform::Square)
    }

    pub fn sawtooth() -> Self {
        Self::new(OscillatorWaveform::Sawtooth)
    }

    pub fn triangle() -> Self {
        Self::new(OscillatorWaveform::Triangle)
    }

    pub fn wavetable(table: Arc<Wavetable>) -> Self {
        Self {
            shape: OscillatorShape::Table(table),
            phase: 0.0,
        }
    }

    pub fn shape(&self) -> &OscillatorShape {
        &self.shape
    }

    #[inline]
    pub fn next_sample(&mut self, frequency: f32, sample_rate: f32) -> f32 {
        let dt = (frequency / sample_rate).clamp(-0.5, 0.5);
        let phase = self.phase;

        let value = match &self.shape {
            OscillatorShape::Basic(OscillatorWaveform::Sine) => (TAU * phase).sin(),
            OscillatorShape::Basic(OscillatorWaveform::Sawtooth) => {
                let naive = 2.0 * phase - 1.0;
                naive - poly_blep(phase, dt.abs())
            }
            OscillatorShape::Basic(OscillatorWaveform::Square) => {
                let naive = if phase < 0.5 { 1.0 } else { -1.0 };
                naive + poly_blep(phase, dt.abs())
                    - poly_blep((phase + 0.5).rem_euclid(1.0), dt.abs())
            }
            OscillatorShape::Basic(OscillatorWaveform::Triangle) => {
                4.0 * ((phase + 0.75).rem_euclid(1.0) - 0.5).abs() - 1.0
            }
            OscillatorShape::Table(table) => table.lookup(phase),
        };

        self.phase = (phase + dt).rem_euclid(1.0);
        value
    }

    /// Render at a fixed frequency.
    pub fn render(&mut self, out: &mut [f32], frequency: f32, sample_rate: f32) {
        for sample in out.iter_mut() {
            *sample = self.next_sample(frequency, sample_rate);
        }
    }

    /// Render with one frequency value per output frame.
    pub fn render_modulated(&mut self, out: &mut [f32], frequencies: &[f32], sample_rate: f32) {
        debug_assert_eq!(out.len(), frequencies.len());
        for (sample, &freq) in out.iter_mut().zip(frequencies.iter()) {
            *sample = self.next_sample(freq, sample_rate);
        }
    }

    pub fn reset(&mut self) {
        self.phase = 0.0;
    }
}

// Polynomial band-limited step, smooths the discontinuity of saw and square.
#[inline]
fn poly_blep(phase: f32, dt: f32) -> f32 {
    if dt <= 0.0 {
        return 0.0;
    }
    if phase < dt {
        let t = phase / dt;
        t + t - t * t - 1.0
    } else if phase > 1.0 - dt {
        let t = (phase - 1.0) / dt;
        t * t + t + t + 1.0
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sine_matches_closed_form() {
        let sample_rate = 48_000.0;
        let mut osc = OscillatorBlock::sine();
        let mut buffer = vec![0.0f32; 64];
        osc.render(&mut buffer, 440.0, sample_rate);

        let n = 12;
        let expected = (TAU * 440.0 * n as f32 / sample_rate).sin();
        assert!((buffer[n] - expected).abs() < 1e-4);
    }

    #[test]
    fn waveforms_stay_in_range() {
        for waveform in [
            OscillatorWaveform::Sine,
            OscillatorWaveform::Square,
            OscillatorWaveform::Sawtooth,
            OscillatorWaveform::Triangle,
        ] {
            let mut osc = OscillatorBlock::new(waveform);
            let mut buffer = vec![0.0f32; 4096];
            osc.render(&mut buffer, 997.0, 44_100.0);
            let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
            assert!(peak <= 1.01, "{waveform:?} peaked at {peak}");
            assert!(peak > 0.5, "{waveform:?} barely moved: {peak}");
        }
    }

    #[test]
    fn triangle_starts_at_zero_and_rises() {
        let mut osc = OscillatorBlock::triangle();
        let first = osc.next_sample(100.0, 48_000.0);
        let second = osc.next_sample(100.0, 48_000.0);
        assert!(first.abs() < 1e-6);
        assert!(second > first);
    }

    #[test]
    fn pulse_table_is_normalised() {
        let table = Wavetable::pulse(0.25);
        let peak = table.samples.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        assert!((peak - 1.0).abs() < 1e-5);
    }

    #[test]
    fn half_width_pulse_is_a_square() {
        let table = Wavetable::pulse(0.5);
        assert!(table.lookup(0.0) > 0.8);
        assert!(table.lookup(0.5) < -0.8);
        assert!((table.lookup(0.0) + table.lookup(0.5)).abs() < 1e-3);
    }

    #[test]
    fn narrow_pulse_spends_most_of_the_cycle_low() {
        let table = Wavetable::pulse(0.1);
        let low = (0..100)
            .map(|i| table.lookup(i as f32 / 100.0))
            .filter(|&v| v < 0.0)
            .count();
        assert!(low > 70, "only {low} of 100 points below zero");
    }
}
