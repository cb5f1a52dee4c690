//! White noise buffers.
//!
//! Noise is rendered into a buffer up front and played back like a sample.
//! Synth voices get a fresh buffer per note; drums share one second of noise
//! that is generated the first time a drum needs it.

use std::sync::Arc;

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, PartialEq)]
pub struct NoiseBuffer {
    samples: Vec<f32>,
}

impl NoiseBuffer {
    pub fn from_samples(samples: Vec<f32>) -> Self {
        Self { samples }
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    /// Sample at `frame`, silence past the end.
    #[inline]
    pub fn get(&self, frame: usize) -> f32 {
        self.samples.get(frame).copied().unwrap_or(0.0)
    }
}

/// Uniform [-1, 1] noise generator plus the lazily built shared drum buffer.
#[derive(Debug)]
pub struct NoiseBank {
    rng: SmallRng,
    sample_rate: f32,
    shared: Option<Arc<NoiseBuffer>>,
}

impl NoiseBank {
    /// `seed` fixes the sequence for reproducible renders; `None` seeds from the OS.
    pub fn new(sample_rate: f32, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_os_rng(),
        };
        Self {
            rng,
            sample_rate,
            shared: None,
        }
    }

    /// A fresh buffer lasting `seconds`.
    pub fn generate(&mut self, seconds: f64) -> Arc<NoiseBuffer> {
        let frames = if seconds.is_finite() && seconds > 0.0 {
            (seconds * self.sample_rate as f64).ceil() as usize
        } else {
            0
        };
        let samples = (0..frames)
            .map(|_| self.rng.random_range(-1.0f32..=1.0))
            .collect();
        Arc::new(NoiseBuffer::from_samples(samples))
    }

    /// The one-second buffer every noise drum plays from.
    pub fn shared(&mut self) -> Arc<NoiseBuffer> {
        if let Some(buffer) = &self.shared {
            return Arc::clone(buffer);
        }
        log::debug!("generating shared drum noise buffer");
        let buffer = self.generate(1.0);
        self.shared = Some(Arc::clone(&buffer));
        buffer
    }

    pub fn has_shared(&self) -> bool {
        self.shared.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_noise_is_bounded_and_sized() {
        let mut bank = NoiseBank::new(1_000.0, Some(7));
        let buffer = bank.generate(0.25);
        assert_eq!(buffer.len(), 250);
        assert!(buffer.samples().iter().all(|s| (-1.0..=1.0).contains(s)));
        assert_eq!(buffer.get(10_000), 0.0);
    }

    #[test]
    fn shared_buffer_is_built_once() {
        let mut bank = NoiseBank::new(1_000.0, Some(1));
        assert!(!bank.has_shared());
        let first = bank.shared();
        let second = bank.shared();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(first.len(), 1_000);
    }

    #[test]
    fn per_note_buffers_differ() {
        let mut bank = NoiseBank::new(1_000.0, Some(3));
        let a = bank.generate(0.1);
        let b = bank.generate(0.1);
        assert_ne!(a.samples(), b.samples());
    }

    #[test]
    fn seeded_banks_repeat() {
        let a = NoiseBank::new(1_000.0, Some(42)).generate(0.05);
        let b = NoiseBank::new(1_000.0, Some(42)).generate(0.05);
        assert_eq!(a, b);
    }
}
