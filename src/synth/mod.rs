//! Per-voice synthesis: settings, note expansion and note graphs.
//!
//! A step that fires on a voice becomes a [`NoteTrigger`]. The arpeggiator
//! may split it into several sub-notes, each of which is planned against the
//! voice's current settings and turned into a transient graph.

pub mod arpeggio;
pub mod params;
pub mod plan;
pub mod store;

pub use params::{VoiceSettings, WaveType};
pub use plan::{NotePlan, NoteSource};
pub use store::VoiceParameterStore;

/// One note asked of a voice: what to play, when, and for how long.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NoteTrigger {
    pub voice: usize,
    /// Hz, octave shift already applied
    pub frequency: f32,
    /// Clock time in seconds
    pub time: f64,
    pub wave: WaveType,
    /// Seconds
    pub duration: f64,
    pub accent: bool,
    /// Pitch to glide from, if the note slides
    pub slide_from: Option<f32>,
}

impl NoteTrigger {
    pub fn new(voice: usize, frequency: f32, time: f64, wave: WaveType, duration: f64) -> Self {
        Self {
            voice,
            frequency,
            time,
            wave,
            duration,
            accent: false,
            slide_from: None,
        }
    }

    pub fn with_accent(mut self, accent: bool) -> Self {
        self.accent = accent;
        self
    }

    pub fn with_slide_from(mut self, from: Option<f32>) -> Self {
        self.slide_from = from;
        self
    }
}
