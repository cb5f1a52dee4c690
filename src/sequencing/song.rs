#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::mixer::ChannelSettings;
use crate::sequencing::arrangement::SongArrangement;
use crate::sequencing::library::LibraryPattern;
use crate::synth::params::{VoiceSettings, WaveType};

pub const SONG_VERSION: u32 = 1;

/// Everything a song file carries.
///
/// Every field may be missing from a file. A missing `bpm`, wave list,
/// octave list, voice list or mixer list leaves the engine's current values
/// alone; short lists only touch the voices they cover.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, PartialEq)]
pub struct Song {
    pub version: u32,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub bpm: Option<f64>,
    pub pattern_library: Vec<LibraryPattern>,
    pub song_arrangement: SongArrangement,
    pub wave_types: Vec<WaveType>,
    pub octaves: Vec<i8>,
    pub voice_settings: Vec<VoiceSettings>,
    pub mixer_settings: Vec<ChannelSettings>,
}

impl Default for Song {
    fn default() -> Self {
        Self {
            version: SONG_VERSION,
            bpm: None,
            pattern_library: Vec::new(),
            song_arrangement: SongArrangement::default(),
            wave_types: Vec::new(),
            octaves: Vec::new(),
            voice_settings: Vec::new(),
            mixer_settings: Vec::new(),
        }
    }
}
