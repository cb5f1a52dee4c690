//! Per-voice synthesis settings.
//!
//! Each category is a plain struct with the workstation's defaults, paired
//! with an `*Update` struct of optional fields. Applying an update merges
//! only the fields that are `Some`; everything else keeps its prior value.
//! Numeric ranges are not checked here. The note builder clamps whatever it
//! reads (filter cutoffs to 20 Hz, exponential targets to a positive floor).

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Declares a settings category, its defaults and its partial update.
macro_rules! settings_category {
    (
        $(#[$meta:meta])*
        $name:ident / $update:ident {
            $( $(#[$field_meta:meta])* $field:ident : $ty:ty = $default:expr ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
        #[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
        #[derive(Debug, Clone, PartialEq)]
        pub struct $name {
            $( $(#[$field_meta])* pub $field: $ty, )+
        }

        impl Default for $name {
            fn default() -> Self {
                Self { $( $field: $default, )+ }
            }
        }

        #[doc = concat!("Partial update of [`", stringify!($name), "`]; `None` fields are left alone.")]
        #[derive(Debug, Clone, Default, PartialEq)]
        pub struct $update {
            $( pub $field: Option<$ty>, )+
        }

        impl $update {
            pub fn apply_to(self, target: &mut $name) {
                $(
                    if let Some(value) = self.$field {
                        target.$field = value;
                    }
                )+
            }
        }
    };
}

settings_category! {
    /// Gain envelope. Times in seconds, sustain is a level in [0, 1].
    AdsrSettings / AdsrUpdate {
        attack: f32 = 0.004,
        decay: f32 = 0.1,
        sustain: f32 = 0.7,
        release: f32 = 0.08,
    }
}

settings_category! {
    /// Duty cycle of the pulse waveform, in (0, 1).
    PwmSettings / PwmUpdate {
        pulse_width: f32 = 0.5,
    }
}

settings_category! {
    /// Cycle through chord intervals instead of holding one pitch.
    ArpeggioSettings / ArpeggioUpdate {
        enabled: bool = false,
        /// 0..=4, 32nd notes through half notes
        speed: u8 = 2,
        /// Semitone offsets; never empty
        intervals: Vec<i32> = vec![0, 4, 7],
    }
}

settings_category! {
    VibratoSettings / VibratoUpdate {
        enabled: bool = false,
        /// LFO rate in Hz
        rate: f32 = 5.0,
        /// Depth in semitones
        depth: f32 = 0.5,
    }
}

settings_category! {
    /// Resonant low-pass sweep per note.
    FilterEnvelopeSettings / FilterEnvelopeUpdate {
        enabled: bool = false,
        /// 0..=1, scales the 8 kHz sweep range
        amount: f32 = 0.5,
        attack: f32 = 0.01,
        decay: f32 = 0.2,
        sustain: f32 = 0.3,
        release: f32 = 0.1,
        base_freq: f32 = 800.0,
    }
}

settings_category! {
    VolumeEnvelopeSettings / VolumeEnvelopeUpdate {
        enabled: bool = false,
        /// Peak multiplier, 0.5..=2
        accent: f32 = 1.0,
    }
}

settings_category! {
    DistortionSettings / DistortionUpdate {
        enabled: bool = false,
        amount: f32 = 20.0,
        mix: f32 = 0.5,
    }
}

settings_category! {
    /// Stacked detuned oscillators (reese / supersaw).
    DetuneSettings / DetuneUpdate {
        enabled: bool = false,
        /// 1..=4 oscillators
        voices: u8 = 2,
        /// Cents between neighbouring oscillators
        spread: f32 = 10.0,
    }
}

/// Everything a note trigger reads for one voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct VoiceSettings {
    pub adsr: AdsrSettings,
    pub pwm: PwmSettings,
    pub arpeggio: ArpeggioSettings,
    pub vibrato: VibratoSettings,
    pub filter_envelope: FilterEnvelopeSettings,
    pub volume_envelope: VolumeEnvelopeSettings,
    pub distortion: DistortionSettings,
    pub detune: DetuneSettings,
}

/// Oscillator selection for a voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WaveType {
    #[default]
    Square,
    Sawtooth,
    Triangle,
    Pulse,
    Noise,
}

impl WaveType {
    pub const ALL: [WaveType; 5] = [
        WaveType::Square,
        WaveType::Sawtooth,
        WaveType::Triangle,
        WaveType::Pulse,
        WaveType::Noise,
    ];

    pub fn name(self) -> &'static str {
        match self {
            WaveType::Square => "square",
            WaveType::Sawtooth => "sawtooth",
            WaveType::Triangle => "triangle",
            WaveType::Pulse => "pulse",
            WaveType::Noise => "noise",
        }
    }

    pub fn from_name(name: &str) -> Option<WaveType> {
        Self::ALL.into_iter().find(|wave| wave.name() == name)
    }

    pub fn is_noise(self) -> bool {
        self == WaveType::Noise
    }
}
