//! Per-voice channel strips and the master bus.
//!
//! Strips are built lazily, the first time a voice is touched (a note routed
//! to it, a setting changed, or its settings read), and are never torn down.
//! Drums bypass the strips and land on the master bus directly.

mod settings;
mod strip;

pub use settings::{ChannelSettings, ChannelUpdate, HIGHPASS_BYPASS_HZ, LOWPASS_BYPASS_HZ};
pub use strip::ChannelStrip;

use crate::dsp::mix::{scale_in_place, sum_in_place};
use crate::error::{EngineError, Result};
use crate::NUM_VOICES;

#[derive(Debug, Clone)]
pub struct Mixer {
    sample_rate: f32,
    master_gain: f32,
    strips: [Option<ChannelStrip>; NUM_VOICES],
}

impl Mixer {
    pub fn new(sample_rate: f32, master_gain: f32) -> Self {
        Self {
            sample_rate,
            master_gain,
            strips: Default::default(),
        }
    }

    /// The strip for `voice`, built on first access.
    pub fn channel(&mut self, voice: usize) -> Result<&mut ChannelStrip> {
        let sample_rate = self.sample_rate;
        let slot = self
            .strips
            .get_mut(voice)
            .ok_or(EngineError::InvalidVoice(voice))?;
        Ok(slot.get_or_insert_with(|| {
            log::debug!("building channel strip for voice {voice}");
            ChannelStrip::new(sample_rate)
        }))
    }

    pub fn is_built(&self, voice: usize) -> bool {
        matches!(self.strips.get(voice), Some(Some(_)))
    }

    pub fn update_channel(&mut self, voice: usize, update: ChannelUpdate) -> Result<()> {
        self.channel(voice)?.update(update);
        log::trace!("voice {voice}: channel updated");
        Ok(())
    }

    /// Overwrite every stored setting of a channel, as a song load does.
    pub fn replace_channel(&mut self, voice: usize, settings: ChannelSettings) -> Result<()> {
        self.update_channel(voice, settings.into())
    }

    pub fn settings(&mut self, voice: usize) -> Result<ChannelSettings> {
        Ok(self.channel(voice)?.settings())
    }

    pub fn master_gain(&self) -> f32 {
        self.master_gain
    }

    pub fn set_master_gain(&mut self, gain: f32) {
        self.master_gain = gain;
    }

    /// Run one voice's block through its strip and add the result to `bus`.
    /// `input` is left holding the processed signal.
    pub fn mix_voice(&mut self, voice: usize, input: &mut [f32], bus: &mut [f32]) -> Result<()> {
        let strip = self.channel(voice)?;
        strip.process(input);
        sum_in_place(bus, input);
        Ok(())
    }

    /// Apply the master gain to a finished bus.
    pub fn finish(&self, bus: &mut [f32]) {
        scale_in_place(bus, self.master_gain);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_are_built_on_first_touch() {
        let mut mixer = Mixer::new(8_000.0, 0.5);
        assert!(!mixer.is_built(1));
        let settings = mixer.settings(1).unwrap();
        assert!(mixer.is_built(1));
        assert!(!mixer.is_built(0));
        assert_eq!(settings, ChannelSettings::default());
    }

    #[test]
    fn unknown_voice_is_rejected() {
        let mut mixer = Mixer::new(8_000.0, 0.5);
        assert!(matches!(
            mixer.update_channel(3, ChannelUpdate::default()),
            Err(EngineError::InvalidVoice(3))
        ));
    }

    #[test]
    fn replace_applies_bypass_rules() {
        let mut mixer = Mixer::new(8_000.0, 0.5);
        let settings = ChannelSettings {
            lp_enabled: false,
            lp_freq: 800.0,
            delay_enabled: true,
            delay_mix: 0.35,
            ..Default::default()
        };
        mixer.replace_channel(0, settings).unwrap();

        let strip = mixer.channel(0).unwrap();
        assert_eq!(strip.lowpass_cutoff(), LOWPASS_BYPASS_HZ);
        assert_eq!(strip.wet_gain(), 0.35);
        assert_eq!(strip.settings(), settings);
    }

    #[test]
    fn mix_sums_into_the_bus_and_scales_master() {
        let mut mixer = Mixer::new(8_000.0, 0.5);
        mixer
            .update_channel(
                2,
                ChannelUpdate {
                    volume: Some(1.0),
                    ..Default::default()
                },
            )
            .unwrap();

        let mut bus = vec![0.25f32; 64];
        let mut input = vec![0.0f32; 64];
        mixer.mix_voice(2, &mut input, &mut bus).unwrap();
        mixer.finish(&mut bus);
        assert!(bus.iter().all(|&s| (s - 0.125).abs() < 1e-6));
    }
}
