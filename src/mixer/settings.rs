#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Low-pass cutoff while the channel low-pass is off.
pub const LOWPASS_BYPASS_HZ: f32 = 22_000.0;
/// High-pass cutoff while the channel high-pass is off.
pub const HIGHPASS_BYPASS_HZ: f32 = 20.0;

/// Stored settings of one channel strip, as shown to a mixer UI and saved
/// with a song.
///
/// The stored cutoffs are what the user dialled in. Whether they reach the
/// filters depends on the matching `*_enabled` flag.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChannelSettings {
    pub volume: f32,
    pub lp_enabled: bool,
    pub lp_freq: f32,
    pub lp_q: f32,
    pub hp_enabled: bool,
    pub hp_freq: f32,
    pub hp_q: f32,
    pub delay_enabled: bool,
    /// Seconds, at most two
    pub delay_time: f32,
    pub delay_feedback: f32,
    pub delay_mix: f32,
    /// Channel mute; off sends nothing to the master bus
    pub enabled: bool,
}

impl Default for ChannelSettings {
    fn default() -> Self {
        Self {
            volume: 0.8,
            lp_enabled: false,
            lp_freq: 5_000.0,
            lp_q: 1.0,
            hp_enabled: false,
            hp_freq: 200.0,
            hp_q: 1.0,
            delay_enabled: false,
            delay_time: 0.25,
            delay_feedback: 0.3,
            delay_mix: 0.3,
            enabled: true,
        }
    }
}

/// Partial channel update. Only `Some` fields are applied.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ChannelUpdate {
    pub volume: Option<f32>,
    pub lp_enabled: Option<bool>,
    pub lp_freq: Option<f32>,
    pub lp_q: Option<f32>,
    pub hp_enabled: Option<bool>,
    pub hp_freq: Option<f32>,
    pub hp_q: Option<f32>,
    pub delay_enabled: Option<bool>,
    pub delay_time: Option<f32>,
    pub delay_feedback: Option<f32>,
    pub delay_mix: Option<f32>,
    pub enabled: Option<bool>,
}

impl From<ChannelSettings> for ChannelUpdate {
    fn from(settings: ChannelSettings) -> Self {
        Self {
            volume: Some(settings.volume),
            lp_enabled: Some(settings.lp_enabled),
            lp_freq: Some(settings.lp_freq),
            lp_q: Some(settings.lp_q),
            hp_enabled: Some(settings.hp_enabled),
            hp_freq: Some(settings.hp_freq),
            hp_q: Some(settings.hp_q),
            delay_enabled: Some(settings.delay_enabled),
            delay_time: Some(settings.delay_time),
            delay_feedback: Some(settings.delay_feedback),
            delay_mix: Some(settings.delay_mix),
            enabled: Some(settings.enabled),
        }
    }
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_take_defaults() {
        let json = r#"{ "volume": 0.9, "lpEnabled": true, "lpFreq": 800, "lpQ": 8, "hpEnabled": true, "hpFreq": 40 }"#;
        let settings: ChannelSettings = serde_json::from_str(json).unwrap();
        assert_eq!(settings.volume, 0.9);
        assert_eq!(settings.lp_q, 8.0);
        assert_eq!(settings.hp_q, 1.0);
        assert_eq!(settings.delay_time, 0.25);
        assert!(settings.enabled);
    }
}
