use crate::synth::NoteTrigger;
use crate::voices::Drum;
use crate::{NUM_DRUMS, NUM_ROWS, NUM_VOICES};

/// What one transport tick fired, for a presentation layer to highlight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepEvent {
    /// Step that just played, 0..16
    pub step: usize,
    /// Arrangement slot that supplied the pattern, in song mode
    pub song_slot: Option<usize>,
    pub loop_count: u64,
    /// Clock time the step's notes start
    pub time: f64,
    pub voices: [[bool; NUM_ROWS]; NUM_VOICES],
    pub drums: [bool; NUM_DRUMS],
}

impl StepEvent {
    pub fn new(step: usize, song_slot: Option<usize>, loop_count: u64, time: f64) -> Self {
        Self {
            step,
            song_slot,
            loop_count,
            time,
            voices: [[false; NUM_ROWS]; NUM_VOICES],
            drums: [false; NUM_DRUMS],
        }
    }

    pub fn note_count(&self) -> usize {
        self.voices.iter().flatten().filter(|&&hit| hit).count()
    }

    pub fn drum_count(&self) -> usize {
        self.drums.iter().filter(|&&hit| hit).count()
    }
}

/// Receives everything a tick produces.
pub trait TriggerSink {
    fn note(&mut self, trigger: NoteTrigger);
    fn drum(&mut self, drum: Drum, time: f64);
    fn step(&mut self, _event: StepEvent) {}
}

/// Sink that keeps everything, for tests and offline inspection.
#[derive(Debug, Default, Clone)]
pub struct RecordingSink {
    pub notes: Vec<NoteTrigger>,
    pub drums: Vec<(Drum, f64)>,
    pub steps: Vec<StepEvent>,
}

impl TriggerSink for RecordingSink {
    fn note(&mut self, trigger: NoteTrigger) {
        self.notes.push(trigger);
    }

    fn drum(&mut self, drum: Drum, time: f64) {
        self.drums.push((drum, time));
    }

    fn step(&mut self, event: StepEvent) {
        self.steps.push(event);
    }
}
