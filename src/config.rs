//! Engine configuration.
//!
//! Defaults match the browser workstation this engine drives: 44.1 kHz, a
//! 10 ms scheduling lookahead and a 20 ms tail after every note. A config can
//! also be read from TOML where every field is optional:
//!
//! ```toml
//! sample_rate = 48000.0
//! lookahead = 0.01
//! slide_resolution = "any-row"
//! ```

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// How a slide note finds the pitch it glides from.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "kebab-case"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SlideResolution {
    /// Scan backwards in the same row. The row's pitch never changes, so the
    /// slide source is the note's own pitch and the glide is inaudible.
    #[default]
    SameRow,
    /// Scan backwards across every row of the voice and glide from the
    /// nearest earlier note, whatever its pitch.
    AnyRow,
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Output sample rate in Hz
    pub sample_rate: f32,
    /// Seconds between a step firing and its notes sounding
    pub lookahead: f64,
    /// Seconds every transient note graph outlives its envelope
    pub note_tail: f64,
    /// Gain of the master bus all channels and drums sum into
    pub master_gain: f32,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub default_bpm: f64,
    pub slide_resolution: SlideResolution,
    /// Fixed seed for noise generation; `None` seeds from the OS
    pub noise_seed: Option<u64>,
    /// Start with the audio clock suspended until the first `start()`,
    /// like a browser audio context under autoplay policy
    pub start_suspended: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            sample_rate: 44_100.0,
            lookahead: 0.01,
            note_tail: 0.02,
            master_gain: 0.5,
            min_bpm: 60.0,
            max_bpm: 200.0,
            default_bpm: 120.0,
            slide_resolution: SlideResolution::SameRow,
            noise_seed: None,
            start_suspended: true,
        }
    }
}

impl EngineConfig {
    #[cfg(feature = "serde")]
    pub fn from_toml_str(text: &str) -> crate::Result<Self> {
        Ok(toml::from_str(text)?)
    }

    pub fn with_sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn with_noise_seed(mut self, seed: u64) -> Self {
        self.noise_seed = Some(seed);
        self
    }

    pub fn with_slide_resolution(mut self, resolution: SlideResolution) -> Self {
        self.slide_resolution = resolution;
        self
    }

    /// Check a BPM against the configured bounds.
    pub fn validate_bpm(&self, bpm: f64) -> crate::Result<f64> {
        if bpm.is_finite() && (self.min_bpm..=self.max_bpm).contains(&bpm) {
            Ok(bpm)
        } else {
            Err(crate::EngineError::BpmOutOfRange {
                bpm,
                min: self.min_bpm,
                max: self.max_bpm,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bpm_bounds_are_inclusive() {
        let config = EngineConfig::default();
        assert!(config.validate_bpm(60.0).is_ok());
        assert!(config.validate_bpm(200.0).is_ok());
        assert!(config.validate_bpm(59.9).is_err());
        assert!(config.validate_bpm(f64::NAN).is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn partial_toml_keeps_defaults() {
        let config = EngineConfig::from_toml_str(
            "sample_rate = 48000.0\nslide_resolution = \"any-row\"\n",
        )
        .unwrap();

        assert_eq!(config.sample_rate, 48_000.0);
        assert_eq!(config.slide_resolution, SlideResolution::AnyRow);
        assert_eq!(config.lookahead, 0.01);
        assert!(config.start_suspended);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn bad_toml_is_a_config_error() {
        let err = EngineConfig::from_toml_str("sample_rate = \"fast\"").unwrap_err();
        assert!(matches!(err, crate::EngineError::Config(_)));
    }
}
