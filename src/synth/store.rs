use crate::error::{EngineError, Result};
use crate::synth::params::*;
use crate::NUM_VOICES;

/// Owns the settings of every voice.
///
/// Getters hand out copies, so a caller can never hold a reference into the
/// store across a note trigger. Updates land immediately and are read by the
/// next note built; notes already scheduled keep what they were built with.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceParameterStore {
    voices: [VoiceSettings; NUM_VOICES],
}

macro_rules! category_accessors {
    ($( $get:ident / $update:ident : $field:ident => $settings:ty, $partial:ty );+ $(;)?) => {
        $(
            pub fn $get(&self, voice: usize) -> Result<$settings> {
                Ok(self.voice(voice)?.$field.clone())
            }

            pub fn $update(&mut self, voice: usize, update: $partial) -> Result<()> {
                let settings = self.voice_mut(voice)?;
                update.apply_to(&mut settings.$field);
                log::trace!("voice {voice}: {} updated", stringify!($field));
                Ok(())
            }
        )+
    };
}

impl VoiceParameterStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voice(&self, voice: usize) -> Result<&VoiceSettings> {
        self.voices.get(voice).ok_or(EngineError::InvalidVoice(voice))
    }

    fn voice_mut(&mut self, voice: usize) -> Result<&mut VoiceSettings> {
        self.voices
            .get_mut(voice)
            .ok_or(EngineError::InvalidVoice(voice))
    }

    /// Copy of every setting for one voice.
    pub fn settings(&self, voice: usize) -> Result<VoiceSettings> {
        self.voice(voice).cloned()
    }

    pub fn all(&self) -> &[VoiceSettings; NUM_VOICES] {
        &self.voices
    }

    /// Replace a voice wholesale, as a song load does. An empty arpeggio
    /// interval list is repaired to `[0]` rather than rejected, since the
    /// data came from a file rather than a control.
    pub fn replace(&mut self, voice: usize, mut settings: VoiceSettings) -> Result<()> {
        if settings.arpeggio.intervals.is_empty() {
            log::warn!("voice {voice}: empty arpeggio intervals in loaded settings, using [0]");
            settings.arpeggio.intervals = vec![0];
        }
        *self.voice_mut(voice)? = settings;
        Ok(())
    }

    category_accessors! {
        adsr / update_adsr: adsr => AdsrSettings, AdsrUpdate;
        pwm / update_pwm: pwm => PwmSettings, PwmUpdate;
        vibrato / update_vibrato: vibrato => VibratoSettings, VibratoUpdate;
        filter_envelope / update_filter_envelope: filter_envelope => FilterEnvelopeSettings, FilterEnvelopeUpdate;
        volume_envelope / update_volume_envelope: volume_envelope => VolumeEnvelopeSettings, VolumeEnvelopeUpdate;
        distortion / update_distortion: distortion => DistortionSettings, DistortionUpdate;
        detune / update_detune: detune => DetuneSettings, DetuneUpdate;
    }

    pub fn arpeggio(&self, voice: usize) -> Result<ArpeggioSettings> {
        Ok(self.voice(voice)?.arpeggio.clone())
    }

    /// Rejects an empty interval list and leaves the voice untouched.
    pub fn update_arpeggio(&mut self, voice: usize, update: ArpeggioUpdate) -> Result<()> {
        if update.intervals.as_ref().is_some_and(Vec::is_empty) {
            log::warn!("voice {voice}: rejected empty arpeggio interval list");
            return Err(EngineError::EmptyArpeggio);
        }
        let settings = self.voice_mut(voice)?;
        update.apply_to(&mut settings.arpeggio);
        log::trace!("voice {voice}: arpeggio updated");
        Ok(())
    }
}
