//! What the UI knows about the engine.
//!
//! The audio thread only ever sends `StepEvent`s. Everything else shown here
//! is either a copy taken before the engine moved to the audio thread or
//! the UI's own record of commands it sent.

use stepsynth::{
    sequencing::{LibraryPattern, Pattern, Song, SongArrangement},
    synth::WaveType,
    transport::StepEvent,
    Engine, NUM_VOICES,
};

pub struct UiState {
    pub bpm: f64,
    pub min_bpm: f64,
    pub max_bpm: f64,
    pub playing: bool,
    pub song_mode: bool,
    pub sample_rate: f32,
    pub waves: [WaveType; NUM_VOICES],
    pub octaves: [i8; NUM_VOICES],
    pub working: Pattern,
    pub library: Vec<LibraryPattern>,
    pub arrangement: SongArrangement,
    /// Latest step the engine reported
    pub last_step: Option<StepEvent>,
}

impl UiState {
    pub fn new(engine: &Engine, song: &Song) -> Self {
        let session = engine.session();
        Self {
            bpm: engine.bpm(),
            min_bpm: engine.config().min_bpm,
            max_bpm: engine.config().max_bpm,
            playing: engine.is_playing(),
            song_mode: session.song_mode,
            sample_rate: engine.config().sample_rate,
            waves: *session.waves(),
            octaves: *session.octaves(),
            working: session.working.clone(),
            library: song.pattern_library.clone(),
            arrangement: session.arrangement.clone(),
            last_step: None,
        }
    }

    /// Pattern for the step on screen: the arranged one in song mode,
    /// otherwise the working pattern.
    pub fn visible_pattern(&self) -> &Pattern {
        self.last_step
            .and_then(|step| step.song_slot)
            .and_then(|slot| self.arrangement.slot(slot))
            .and_then(|index| self.library.get(index))
            .map_or(&self.working, |entry| &entry.pattern)
    }

    pub fn pattern_name(&self) -> Option<&str> {
        let slot = self.last_step?.song_slot?;
        let index = self.arrangement.slot(slot)?;
        self.library.get(index).map(|entry| entry.name.as_str())
    }
}
