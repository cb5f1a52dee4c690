use crate::error::{EngineError, Result};
use crate::sequencing::arrangement::SongArrangement;
use crate::sequencing::library::PatternLibrary;
use crate::sequencing::notes::clamp_octave;
use crate::sequencing::pattern::Pattern;
use crate::sequencing::song::Song;
use crate::synth::params::WaveType;
use crate::NUM_VOICES;

/// Everything the transport reads on each tick.
///
/// The working pattern is the one being edited. In song mode a filled
/// arrangement slot plays its library pattern instead; an empty slot or a
/// dangling library index falls back to the working pattern.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub working: Pattern,
    pub library: PatternLibrary,
    pub arrangement: SongArrangement,
    pub song_mode: bool,
    bpm: f64,
    waves: [WaveType; NUM_VOICES],
    octaves: [i8; NUM_VOICES],
}

impl Session {
    pub fn new(bpm: f64) -> Self {
        Self {
            working: Pattern::new(),
            library: PatternLibrary::new(),
            arrangement: SongArrangement::new(),
            song_mode: true,
            bpm,
            waves: [WaveType::Square; NUM_VOICES],
            octaves: [0; NUM_VOICES],
        }
    }

    pub fn bpm(&self) -> f64 {
        self.bpm
    }

    /// Stores the tempo as given; range checks belong to the caller that
    /// also retimes the transport.
    pub(crate) fn set_bpm_unchecked(&mut self, bpm: f64) {
        self.bpm = bpm;
    }

    pub fn wave(&self, voice: usize) -> Result<WaveType> {
        self.waves
            .get(voice)
            .copied()
            .ok_or(EngineError::InvalidVoice(voice))
    }

    pub fn set_wave(&mut self, voice: usize, wave: WaveType) -> Result<()> {
        let slot = self
            .waves
            .get_mut(voice)
            .ok_or(EngineError::InvalidVoice(voice))?;
        *slot = wave;
        Ok(())
    }

    pub fn octave(&self, voice: usize) -> Result<i8> {
        self.octaves
            .get(voice)
            .copied()
            .ok_or(EngineError::InvalidVoice(voice))
    }

    /// Clamped to -2..=2.
    pub fn set_octave(&mut self, voice: usize, octave: i8) -> Result<()> {
        let slot = self
            .octaves
            .get_mut(voice)
            .ok_or(EngineError::InvalidVoice(voice))?;
        *slot = clamp_octave(octave);
        Ok(())
    }

    pub fn waves(&self) -> &[WaveType; NUM_VOICES] {
        &self.waves
    }

    pub fn octaves(&self) -> &[i8; NUM_VOICES] {
        &self.octaves
    }

    /// Pattern to play for `slot` (or the working pattern for `None`).
    pub fn active_pattern(&self, slot: Option<usize>) -> &Pattern {
        slot.filter(|_| self.song_mode)
            .and_then(|slot| self.arrangement.slot(slot))
            .and_then(|index| self.library.get(index))
            .map_or(&self.working, |entry| &entry.pattern)
    }

    /// Replace library, arrangement, tempo, waves and octaves from a song.
    /// The first library pattern, if any, becomes the working pattern.
    pub fn apply_song(&mut self, song: &Song) {
        self.library.import(song.pattern_library.clone());
        self.arrangement = song.song_arrangement.clone();

        if let Some(bpm) = song.bpm {
            self.bpm = bpm;
        }
        for (slot, wave) in self.waves.iter_mut().zip(&song.wave_types) {
            *slot = *wave;
        }
        for (slot, octave) in self.octaves.iter_mut().zip(&song.octaves) {
            *slot = clamp_octave(*octave);
        }
        if !self.library.is_empty() {
            self.library.load_into(0, &mut self.working);
        }
        log::info!(
            "loaded song: {} patterns, {} arranged slots",
            self.library.len(),
            self.arrangement.filled_count()
        );
    }
}
