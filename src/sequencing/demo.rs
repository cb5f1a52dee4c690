//! Built-in demo song: filtered house at 124 BPM.
//!
//! A sawtooth bass with accents and slides on voice 1, pulse stabs on
//! voice 2 and a noise wash on voice 3, over six patterns arranged into a
//! 30-slot song.

use crate::mixer::ChannelSettings;
use crate::sequencing::arrangement::SongArrangement;
use crate::sequencing::library::LibraryPattern;
use crate::sequencing::pattern::{Note, Pattern};
use crate::sequencing::song::{Song, SONG_VERSION};
use crate::synth::params::*;
use crate::voices::Drum;

const BASS: usize = 0;
const STABS: usize = 1;
const PAD: usize = 2;

// (row, step, length, accent, slide)
type Cell = (usize, usize, u8, bool, bool);

const FUNK_LINE: [Cell; 9] = [
    (7, 0, 2, true, false),
    (6, 3, 1, false, true),
    (7, 4, 1, false, false),
    (5, 6, 1, true, false),
    (7, 7, 1, false, false),
    (7, 8, 2, true, false),
    (4, 11, 1, false, true),
    (5, 12, 1, false, false),
    (6, 14, 1, true, false),
];

fn place(pattern: &mut Pattern, voice: usize, cells: &[Cell]) {
    for &(row, step, length, accent, slide) in cells {
        pattern.voices[voice].set(
            row,
            step,
            Note::on().with_length(length).with_accent(accent).with_slide(slide),
        );
    }
}

pub(super) fn hits(pattern: &mut Pattern, drum: Drum, steps: &[usize]) {
    for &step in steps {
        pattern.drums.set(drum.index(), step, true);
    }
}

const FOUR_ON_FLOOR: [usize; 4] = [0, 4, 8, 12];
const EIGHTHS: [usize; 8] = [0, 2, 4, 6, 8, 10, 12, 14];

fn funky_bass() -> LibraryPattern {
    let mut p = Pattern::new();
    place(&mut p, BASS, &FUNK_LINE);
    hits(&mut p, Drum::Kick, &FOUR_ON_FLOOR);
    hits(&mut p, Drum::ClosedHat, &[2, 6, 10, 14]);
    LibraryPattern::new("Funky Bass", p)
}

fn filter_disco() -> LibraryPattern {
    let mut p = Pattern::new();
    place(&mut p, BASS, &FUNK_LINE);
    place(
        &mut p,
        STABS,
        &[
            (5, 1, 1, true, false),
            (3, 3, 1, false, false),
            (5, 5, 1, true, false),
            (4, 9, 1, true, false),
            (3, 11, 1, false, false),
            (5, 13, 1, true, false),
        ],
    );
    hits(&mut p, Drum::Kick, &FOUR_ON_FLOOR);
    hits(&mut p, Drum::Clap, &[4, 12]);
    hits(&mut p, Drum::ClosedHat, &EIGHTHS);
    LibraryPattern::new("Filter Disco", p)
}

fn robotic_groove() -> LibraryPattern {
    let mut p = Pattern::new();
    for step in EIGHTHS {
        p.voices[BASS].set(7, step, Note::on().with_accent(step % 4 == 0));
    }
    for step in [1, 5, 9, 13] {
        p.voices[STABS].set(5, step, Note::on());
    }
    for step in [3, 7, 11, 15] {
        p.voices[STABS].set(3, step, Note::on());
    }
    hits(&mut p, Drum::Kick, &FOUR_ON_FLOOR);
    hits(&mut p, Drum::Clap, &[4, 12]);
    hits(&mut p, Drum::ClosedHat, &EIGHTHS);
    hits(&mut p, Drum::OpenHat, &[8]);
    LibraryPattern::new("Robotic Groove", p)
}

fn breakdown() -> LibraryPattern {
    let mut p = Pattern::new();
    place(&mut p, BASS, &[(7, 0, 4, true, false), (5, 8, 4, true, false)]);
    place(&mut p, PAD, &[(0, 0, 16, false, false)]);
    hits(&mut p, Drum::Kick, &[0, 8]);
    hits(&mut p, Drum::ClosedHat, &[4, 12]);
    LibraryPattern::new("Breakdown", p)
}

fn buildup() -> LibraryPattern {
    let mut p = Pattern::new();
    place(
        &mut p,
        BASS,
        &[
            (7, 0, 2, true, false),
            (6, 2, 2, true, true),
            (5, 4, 2, true, true),
            (4, 6, 2, true, true),
            (7, 8, 2, true, false),
            (6, 10, 2, true, true),
            (5, 12, 2, true, true),
            (4, 14, 2, true, true),
        ],
    );
    for (step, row) in EIGHTHS.into_iter().zip([5, 4, 3, 2, 5, 4, 3, 2]) {
        p.voices[STABS].set(row, step, Note::on().with_accent(true));
    }
    hits(&mut p, Drum::Kick, &EIGHTHS);
    hits(&mut p, Drum::ClosedHat, &(0..16).collect::<Vec<_>>());
    LibraryPattern::new("Buildup", p)
}

fn peak_drop() -> LibraryPattern {
    let mut p = Pattern::new();
    place(&mut p, BASS, &FUNK_LINE);
    for step in [1, 5, 9, 13] {
        place(&mut p, STABS, &[(5, step, 1, true, false), (3, step, 1, true, false)]);
    }
    hits(&mut p, Drum::Kick, &FOUR_ON_FLOOR);
    hits(&mut p, Drum::Clap, &[4, 12]);
    hits(&mut p, Drum::ClosedHat, &EIGHTHS);
    hits(&mut p, Drum::OpenHat, &[0, 8]);
    LibraryPattern::new("Peak Drop", p)
}

fn bass_voice() -> VoiceSettings {
    VoiceSettings {
        adsr: AdsrSettings {
            attack: 0.003,
            decay: 0.12,
            sustain: 0.7,
            release: 0.15,
        },
        vibrato: VibratoSettings {
            depth: 0.3,
            ..Default::default()
        },
        filter_envelope: FilterEnvelopeSettings {
            enabled: true,
            amount: 0.75,
            attack: 0.002,
            decay: 0.2,
            sustain: 0.3,
            release: 0.15,
            base_freq: 400.0,
        },
        volume_envelope: VolumeEnvelopeSettings {
            enabled: true,
            accent: 1.8,
        },
        distortion: DistortionSettings {
            enabled: true,
            amount: 25.0,
            mix: 0.3,
        },
        detune: DetuneSettings {
            enabled: false,
            voices: 1,
            spread: 0.0,
        },
        ..Default::default()
    }
}

fn stab_voice() -> VoiceSettings {
    VoiceSettings {
        adsr: AdsrSettings {
            attack: 0.005,
            decay: 0.15,
            sustain: 0.6,
            release: 0.2,
        },
        arpeggio: ArpeggioSettings {
            speed: 1,
            ..Default::default()
        },
        vibrato: VibratoSettings {
            depth: 0.2,
            ..Default::default()
        },
        filter_envelope: FilterEnvelopeSettings {
            enabled: true,
            amount: 0.7,
            attack: 0.005,
            decay: 0.18,
            sustain: 0.4,
            release: 0.2,
            base_freq: 800.0,
        },
        volume_envelope: VolumeEnvelopeSettings {
            enabled: true,
            accent: 1.6,
        },
        distortion: DistortionSettings {
            enabled: true,
            amount: 20.0,
            mix: 0.25,
        },
        detune: DetuneSettings {
            enabled: true,
            voices: 2,
            spread: 12.0,
        },
        ..Default::default()
    }
}

fn pad_voice() -> VoiceSettings {
    VoiceSettings {
        adsr: AdsrSettings {
            attack: 0.2,
            decay: 0.3,
            sustain: 0.8,
            release: 0.4,
        },
        pwm: PwmSettings { pulse_width: 0.3 },
        arpeggio: ArpeggioSettings {
            speed: 0,
            intervals: vec![0, 4, 7, 12],
            ..Default::default()
        },
        vibrato: VibratoSettings {
            enabled: true,
            rate: 3.0,
            depth: 0.15,
        },
        filter_envelope: FilterEnvelopeSettings {
            enabled: true,
            amount: 0.3,
            attack: 0.1,
            decay: 0.5,
            sustain: 0.6,
            release: 0.4,
            base_freq: 2_000.0,
        },
        ..Default::default()
    }
}

fn channels() -> Vec<ChannelSettings> {
    vec![
        ChannelSettings {
            volume: 0.9,
            lp_enabled: true,
            lp_freq: 800.0,
            lp_q: 8.0,
            hp_enabled: true,
            hp_freq: 40.0,
            delay_time: 0.375,
            delay_feedback: 0.45,
            delay_mix: 0.25,
            ..Default::default()
        },
        ChannelSettings {
            volume: 0.75,
            lp_enabled: true,
            lp_freq: 2_500.0,
            lp_q: 5.0,
            hp_enabled: true,
            hp_freq: 100.0,
            delay_enabled: true,
            delay_time: 0.1875,
            delay_feedback: 0.5,
            delay_mix: 0.35,
            ..Default::default()
        },
        ChannelSettings {
            volume: 0.5,
            lp_enabled: true,
            lp_freq: 5_000.0,
            lp_q: 2.0,
            hp_enabled: true,
            hp_freq: 400.0,
            delay_enabled: true,
            delay_time: 0.5,
            delay_feedback: 0.6,
            delay_mix: 0.5,
            ..Default::default()
        },
    ]
}

pub fn demo_song() -> Song {
    #[rustfmt::skip]
    let order = [
        0, 0, 0, 0,
        1, 1, 1, 1,
        2, 2, 2, 2,
        1, 1,
        3, 3,
        4, 4,
        5, 5, 5, 5,
        2, 2, 2, 2,
        1, 1,
        0, 0,
    ];
    let slots: Vec<Option<usize>> = order.into_iter().map(Some).collect();

    Song {
        version: SONG_VERSION,
        bpm: Some(124.0),
        pattern_library: vec![
            funky_bass(),
            filter_disco(),
            robotic_groove(),
            breakdown(),
            buildup(),
            peak_drop(),
        ],
        song_arrangement: SongArrangement::from_slots(&slots),
        wave_types: vec![WaveType::Sawtooth, WaveType::Pulse, WaveType::Noise],
        octaves: vec![-2, 0, 1],
        voice_settings: vec![bass_voice(), stab_voice(), pad_voice()],
        mixer_settings: channels(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MAX_SONG_SLOTS;

    #[test]
    fn arrangement_covers_every_pattern() {
        let song = demo_song();
        assert_eq!(song.song_arrangement.filled_count(), 30);
        assert_eq!(song.song_arrangement.slot(MAX_SONG_SLOTS - 1), None);
        for index in 0..song.pattern_library.len() {
            assert!(song.song_arrangement.filled().any(|(_, p)| p == index));
        }
    }

    #[test]
    fn bass_line_has_accents_and_slides() {
        let song = demo_song();
        let bass = &song.pattern_library[0].pattern.voices[BASS];
        assert_eq!(*bass.note(7, 0).unwrap(), Note::on().with_length(2).with_accent(true));
        assert!(bass.note(6, 3).unwrap().slide);
        assert!(song.pattern_library[3].pattern.voices[PAD].note(0, 0).unwrap().length == 16);
    }
}
