//! Genre starting points for game soundtracks.
//!
//! Each preset is a whole one-pattern song: grid, arrangement, tempo, waves,
//! octaves, voice settings and mixer. Load one with
//! [`Engine::load_song`](crate::Engine::load_song), or add just its pattern
//! to a library with [`Preset::add_to_library`].
//!
//! ```ignore
//! let preset = presets::find("horror").unwrap();
//! engine.load_song(&preset.song())?;
//! ```

use crate::mixer::ChannelSettings;
use crate::sequencing::arrangement::SongArrangement;
use crate::sequencing::demo::hits;
use crate::sequencing::library::{LibraryPattern, PatternLibrary};
use crate::sequencing::pattern::{Note, Pattern};
use crate::sequencing::song::{Song, SONG_VERSION};
use crate::synth::params::*;
use crate::voices::Drum;

/// A named song recipe.
#[derive(Debug, Clone, Copy)]
pub struct Preset {
    /// Short lowercase identifier, for command lines
    pub key: &'static str,
    pub name: &'static str,
    build: fn() -> Song,
}

impl Preset {
    pub fn song(&self) -> Song {
        (self.build)()
    }

    /// The preset's grid under its display name.
    pub fn pattern(&self) -> LibraryPattern {
        let song = self.song();
        let pattern = song
            .pattern_library
            .into_iter()
            .next()
            .map(|entry| entry.pattern)
            .unwrap_or_default();
        LibraryPattern::new(self.name, pattern)
    }

    /// Append the preset's pattern to `library` and return its index.
    /// Voice, mixer and tempo settings are left alone.
    pub fn add_to_library(&self, library: &mut PatternLibrary) -> usize {
        let index = library.push(self.pattern());
        log::info!("added preset '{}' as pattern {index}", self.name);
        index
    }
}

pub const PRESETS: [Preset; 4] = [
    Preset {
        key: "platformer",
        name: "8-Bit Platformer",
        build: platformer,
    },
    Preset {
        key: "shooter",
        name: "Space Shooter",
        build: space_shooter,
    },
    Preset {
        key: "horror",
        name: "Horror/Suspense",
        build: horror,
    },
    Preset {
        key: "menu",
        name: "Menu Music",
        build: menu,
    },
];

/// Look a preset up by key or display name, ignoring case.
pub fn find(name: &str) -> Option<&'static Preset> {
    PRESETS
        .iter()
        .find(|p| p.key.eq_ignore_ascii_case(name) || p.name.eq_ignore_ascii_case(name))
}

// (row, step, length)
fn notes(pattern: &mut Pattern, voice: usize, cells: &[(usize, usize, u8)]) {
    for &(row, step, length) in cells {
        pattern.voices[voice].set(row, step, Note::on().with_length(length));
    }
}

fn voice(adsr: [f32; 4], pulse_width: f32, vibrato: Option<(f32, f32)>) -> VoiceSettings {
    let [attack, decay, sustain, release] = adsr;
    VoiceSettings {
        adsr: AdsrSettings {
            attack,
            decay,
            sustain,
            release,
        },
        pwm: PwmSettings { pulse_width },
        vibrato: match vibrato {
            Some((rate, depth)) => VibratoSettings {
                enabled: true,
                rate,
                depth,
            },
            None => VibratoSettings::default(),
        },
        ..Default::default()
    }
}

#[allow(clippy::too_many_arguments)]
fn song(
    name: &str,
    pattern: Pattern,
    loops: usize,
    bpm: f64,
    waves: [WaveType; 3],
    octaves: [i8; 3],
    voices: [VoiceSettings; 3],
    mixer: [ChannelSettings; 3],
) -> Song {
    Song {
        version: SONG_VERSION,
        bpm: Some(bpm),
        pattern_library: vec![LibraryPattern::new(name, pattern)],
        song_arrangement: SongArrangement::from_slots(&vec![Some(0); loops]),
        wave_types: waves.to_vec(),
        octaves: octaves.to_vec(),
        voice_settings: voices.to_vec(),
        mixer_settings: mixer.to_vec(),
    }
}

/// Bouncy C-G bass, a peppy lead and chord stabs at 150 BPM.
pub fn platformer() -> Song {
    let mut p = Pattern::new();
    notes(
        &mut p,
        0,
        &[(5, 0, 2), (5, 4, 2), (5, 8, 2), (5, 12, 2), (2, 2, 1), (2, 10, 1)],
    );
    notes(
        &mut p,
        1,
        &[
            (0, 0, 1),
            (1, 1, 1),
            (2, 2, 1),
            (1, 3, 1),
            (0, 4, 2),
            (3, 8, 1),
            (2, 9, 1),
            (1, 10, 1),
            (0, 12, 3),
        ],
    );
    notes(&mut p, 2, &[(3, 0, 1), (3, 4, 1), (3, 8, 1), (3, 12, 1)]);
    hits(&mut p, Drum::Kick, &[0, 4, 8, 12]);
    hits(&mut p, Drum::Snare, &[4, 12]);
    hits(&mut p, Drum::ClosedHat, &[2, 6, 10, 14]);

    song(
        "Platformer",
        p,
        4,
        150.0,
        [WaveType::Pulse, WaveType::Pulse, WaveType::Square],
        [0, 0, 0],
        [
            voice([0.002, 0.05, 0.9, 0.05], 0.25, None),
            voice([0.001, 0.08, 0.5, 0.1], 0.5, Some((5.0, 0.3))),
            voice([0.001, 0.03, 0.3, 0.02], 0.5, None),
        ],
        [
            ChannelSettings {
                volume: 0.8,
                lp_enabled: true,
                lp_freq: 1_500.0,
                lp_q: 3.0,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.7,
                lp_enabled: true,
                lp_freq: 4_000.0,
                lp_q: 5.0,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.6,
                ..Default::default()
            },
        ],
    )
}

/// Driving bass, a 16th-note arpeggiated lead and a pad at 170 BPM.
pub fn space_shooter() -> Song {
    let mut p = Pattern::new();
    for step in (0..16).step_by(2) {
        p.voices[0].set(6, step, Note::on());
    }
    for step in (1..16).step_by(4) {
        p.voices[0].set(3, step, Note::on());
    }
    for step in 0..16 {
        p.voices[1].set([0, 3, 2, 3][step % 4], step, Note::on());
    }
    notes(&mut p, 2, &[(1, 0, 8), (5, 8, 8)]);
    hits(&mut p, Drum::Kick, &[0, 4, 8, 12]);
    hits(&mut p, Drum::Snare, &[2, 6, 10, 14]);
    hits(&mut p, Drum::ClosedHat, &(0..16).collect::<Vec<_>>());
    hits(&mut p, Drum::Crash, &[8]);

    let mut lead = voice([0.001, 0.05, 0.6, 0.08], 0.5, None);
    lead.arpeggio = ArpeggioSettings {
        enabled: true,
        speed: 1,
        intervals: vec![0, 4, 7],
    };

    song(
        "Space Shooter",
        p,
        8,
        170.0,
        [WaveType::Pulse, WaveType::Sawtooth, WaveType::Triangle],
        [0, 0, 0],
        [
            voice([0.001, 0.02, 0.8, 0.03], 0.3, None),
            lead,
            voice([0.05, 0.2, 0.7, 0.3], 0.5, Some((4.0, 0.5))),
        ],
        [
            ChannelSettings {
                volume: 0.9,
                lp_enabled: true,
                lp_freq: 2_000.0,
                lp_q: 8.0,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.8,
                hp_enabled: true,
                hp_freq: 400.0,
                hp_q: 2.0,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.5,
                lp_enabled: true,
                lp_freq: 3_000.0,
                delay_enabled: true,
                delay_time: 0.3,
                delay_mix: 0.2,
                ..Default::default()
            },
        ],
    )
}

/// Low drone, a dissonant line and sparse noise at 80 BPM.
pub fn horror() -> Song {
    let mut p = Pattern::new();
    notes(&mut p, 0, &[(7, 0, 16)]);
    notes(&mut p, 1, &[(4, 0, 3), (3, 4, 3), (4, 8, 3), (6, 12, 3)]);
    notes(&mut p, 2, &[(0, 6, 1), (0, 14, 1)]);
    hits(&mut p, Drum::Kick, &[8]);
    hits(&mut p, Drum::Tom, &[3, 11]);

    song(
        "Horror",
        p,
        4,
        80.0,
        [WaveType::Sawtooth, WaveType::Pulse, WaveType::Noise],
        [-1, 0, 0],
        [
            voice([0.1, 0.3, 0.9, 0.5], 0.5, Some((2.0, 0.8))),
            voice([0.02, 0.15, 0.6, 0.2], 0.2, Some((3.0, 1.2))),
            voice([0.001, 0.05, 0.1, 0.05], 0.5, None),
        ],
        [
            ChannelSettings {
                volume: 0.7,
                lp_enabled: true,
                lp_freq: 800.0,
                lp_q: 10.0,
                delay_enabled: true,
                delay_time: 0.5,
                delay_feedback: 0.5,
                delay_mix: 0.4,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.6,
                lp_enabled: true,
                lp_freq: 2_000.0,
                lp_q: 6.0,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.4,
                hp_enabled: true,
                hp_freq: 1_000.0,
                ..Default::default()
            },
        ],
    )
}

/// Gentle bass, melody and held harmony at 110 BPM.
pub fn menu() -> Song {
    let mut p = Pattern::new();
    notes(&mut p, 0, &[(5, 0, 4), (3, 8, 4)]);
    notes(&mut p, 1, &[(0, 0, 2), (3, 2, 2), (2, 4, 2), (3, 6, 2), (0, 8, 4)]);
    notes(&mut p, 2, &[(3, 0, 8), (2, 8, 8)]);
    hits(&mut p, Drum::ClosedHat, &[4, 12]);

    song(
        "Menu Music",
        p,
        4,
        110.0,
        [WaveType::Triangle, WaveType::Pulse, WaveType::Square],
        [0, 0, 0],
        [
            voice([0.01, 0.1, 0.8, 0.1], 0.5, None),
            voice([0.005, 0.08, 0.6, 0.15], 0.5, Some((4.0, 0.2))),
            voice([0.02, 0.15, 0.7, 0.2], 0.5, None),
        ],
        [
            ChannelSettings {
                volume: 0.6,
                lp_enabled: true,
                lp_freq: 2_000.0,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.7,
                lp_enabled: true,
                lp_freq: 4_000.0,
                delay_enabled: true,
                delay_time: 0.375,
                delay_mix: 0.3,
                ..Default::default()
            },
            ChannelSettings {
                volume: 0.5,
                lp_enabled: true,
                lp_freq: 3_000.0,
                ..Default::default()
            },
        ],
    )
}
