/*
Pattern Grid
============

A pattern is one 16-step loop: a note grid per voice plus the drum grid.

    voice grid (x3)                          drum grid
                 step 0 ............ 15                  step 0 ...... 15
    row 0  C5    [ ][ ][■■■■][ ] ...          Kick       [■][ ][ ][ ] ...
    ...                                       ...
    row 7  G3    [■][ ][ ][■] ...             Crash      [ ][ ][ ][ ] ...

A voice cell is a Note: on/off, a length in steps (a held note spans cells
to its right), plus the accent and slide flags. A drum cell is just on/off.

Older saves stored a voice cell as a bare `true`/`false`. Those are read as
a one-step note with no accent or slide, and always written back in the
object form.
*/

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, Result};
use crate::{NUM_DRUMS, NUM_ROWS, NUM_STEPS, NUM_VOICES};

/// One voice cell.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(from = "NoteRepr"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Note {
    pub active: bool,
    /// Steps the note sounds for, at least 1
    pub length: u8,
    pub accent: bool,
    pub slide: bool,
}

impl Note {
    pub const OFF: Note = Note {
        active: false,
        length: 1,
        accent: false,
        slide: false,
    };

    pub const fn on() -> Self {
        Note {
            active: true,
            ..Note::OFF
        }
    }

    pub fn with_length(mut self, length: u8) -> Self {
        self.length = length.max(1);
        self
    }

    pub fn with_accent(mut self, accent: bool) -> Self {
        self.accent = accent;
        self
    }

    pub fn with_slide(mut self, slide: bool) -> Self {
        self.slide = slide;
        self
    }

    /// Switching a note off forgets its length and flags.
    pub fn set_active(&mut self, active: bool) {
        if active {
            self.active = true;
        } else {
            *self = Note::OFF;
        }
    }
}

impl Default for Note {
    fn default() -> Self {
        Note::OFF
    }
}

#[cfg(feature = "serde")]
#[derive(Deserialize)]
#[serde(untagged)]
enum NoteRepr {
    Legacy(bool),
    Fields {
        #[serde(default)]
        active: bool,
        #[serde(default)]
        length: Option<u32>,
        #[serde(default)]
        accent: Option<bool>,
        #[serde(default)]
        slide: Option<bool>,
    },
}

#[cfg(feature = "serde")]
impl From<NoteRepr> for Note {
    fn from(repr: NoteRepr) -> Self {
        match repr {
            NoteRepr::Legacy(active) => Note {
                active,
                ..Note::OFF
            },
            NoteRepr::Fields {
                active,
                length,
                accent,
                slide,
            } => Note {
                active,
                // A zero or missing length means one step.
                length: length
                    .filter(|&len| len > 0)
                    .map_or(1, |len| len.min(NUM_STEPS as u32) as u8),
                accent: accent.unwrap_or(false),
                slide: slide.unwrap_or(false),
            },
        }
    }
}

/// Eight pitch rows by sixteen steps for one voice.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoicePattern {
    rows: [[Note; NUM_STEPS]; NUM_ROWS],
}

impl Default for VoicePattern {
    fn default() -> Self {
        Self {
            rows: [[Note::OFF; NUM_STEPS]; NUM_ROWS],
        }
    }
}

impl VoicePattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn note(&self, row: usize, step: usize) -> Option<&Note> {
        self.rows.get(row)?.get(step)
    }

    pub fn note_mut(&mut self, row: usize, step: usize) -> Option<&mut Note> {
        self.rows.get_mut(row)?.get_mut(step)
    }

    pub fn set(&mut self, row: usize, step: usize, note: Note) {
        if let Some(cell) = self.note_mut(row, step) {
            *cell = note;
        }
    }

    pub fn is_active(&self, row: usize, step: usize) -> bool {
        self.note(row, step).is_some_and(|note| note.active)
    }

    /// Flip a cell, returning its new state.
    pub fn toggle(&mut self, row: usize, step: usize) -> bool {
        match self.note_mut(row, step) {
            Some(note) => {
                let active = !note.active;
                note.set_active(active);
                active
            }
            None => false,
        }
    }

    /// Stretch an active note, keeping it inside the loop.
    pub fn set_length(&mut self, row: usize, step: usize, length: usize) {
        let max = NUM_STEPS.saturating_sub(step).max(1);
        if let Some(note) = self.note_mut(row, step) {
            if note.active {
                note.length = length.clamp(1, max) as u8;
            }
        }
    }

    pub fn rows(&self) -> &[[Note; NUM_STEPS]; NUM_ROWS] {
        &self.rows
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.rows.iter().flatten().all(|note| !note.active)
    }
}

/// Seven drum rows by sixteen steps.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DrumPattern {
    rows: [[bool; NUM_STEPS]; NUM_DRUMS],
}

impl DrumPattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, drum: usize, step: usize) -> bool {
        self.rows
            .get(drum)
            .and_then(|row| row.get(step))
            .copied()
            .unwrap_or(false)
    }

    pub fn set(&mut self, drum: usize, step: usize, active: bool) {
        if let Some(cell) = self.rows.get_mut(drum).and_then(|row| row.get_mut(step)) {
            *cell = active;
        }
    }

    pub fn toggle(&mut self, drum: usize, step: usize) -> bool {
        let active = !self.is_active(drum, step);
        self.set(drum, step, active);
        active
    }

    pub fn rows(&self) -> &[[bool; NUM_STEPS]; NUM_DRUMS] {
        &self.rows
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }
}

#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default, rename_all = "camelCase"))]
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Pattern {
    #[cfg_attr(feature = "serde", serde(rename = "voicePattern"))]
    pub voices: [VoicePattern; NUM_VOICES],
    #[cfg_attr(feature = "serde", serde(rename = "drumPattern"))]
    pub drums: DrumPattern,
}

impl Pattern {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn voice(&self, voice: usize) -> Result<&VoicePattern> {
        self.voices.get(voice).ok_or(EngineError::InvalidVoice(voice))
    }

    pub fn voice_mut(&mut self, voice: usize) -> Result<&mut VoicePattern> {
        self.voices
            .get_mut(voice)
            .ok_or(EngineError::InvalidVoice(voice))
    }

    pub fn clear_voice(&mut self, voice: usize) -> Result<()> {
        self.voice_mut(voice)?.clear();
        Ok(())
    }

    pub fn clear_drums(&mut self) {
        self.drums.clear();
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn is_empty(&self) -> bool {
        self.voices.iter().all(VoicePattern::is_empty)
            && self.drums.rows().iter().flatten().all(|&hit| !hit)
    }
}
