//! The step clock.
//!
//! ```text
//!            start / preview                 (tick every interval)
//!   Stopped ─────────────────→ Playing ──┐
//!      ↑                          │  ↑   │
//!      └──────── stop ────────────┘  └───┘
//!      └──── preview finished ────┘
//! ```
//!
//! The transport keeps time on the audio clock rather than a wall timer.
//! `next_tick_at` moves forward by exactly one interval per tick, so ticks
//! never drift however late `poll` runs. A tick due at `d` schedules its
//! notes at `d + lookahead`.

mod event;

pub use event::{RecordingSink, StepEvent, TriggerSink};

use crate::config::{EngineConfig, SlideResolution};
use crate::error::Result;
use crate::sequencing::notes::{shifted_frequency, ROWS};
use crate::sequencing::pattern::{Pattern, VoicePattern};
use crate::sequencing::session::Session;
use crate::synth::NoteTrigger;
use crate::voices::Drum;
use crate::{NUM_STEPS, NUM_VOICES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportState {
    Stopped,
    Playing,
}

/// Seconds per step: a sixteenth note at `bpm`.
pub fn step_interval(bpm: f64) -> f64 {
    60.0 / bpm / 4.0
}

#[derive(Debug, Clone)]
pub struct Transport {
    state: TransportState,
    current_step: usize,
    current_song_slot: usize,
    loop_count: u64,
    interval: f64,
    pending_interval: Option<f64>,
    next_tick_at: f64,
    lookahead: f64,
    slide_resolution: SlideResolution,
    preview: Option<Pattern>,
}

impl Transport {
    pub fn new(config: &EngineConfig, bpm: f64) -> Self {
        Self {
            state: TransportState::Stopped,
            current_step: 0,
            current_song_slot: 0,
            loop_count: 0,
            interval: step_interval(bpm),
            pending_interval: None,
            next_tick_at: 0.0,
            lookahead: config.lookahead,
            slide_resolution: config.slide_resolution,
            preview: None,
        }
    }

    pub fn state(&self) -> TransportState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == TransportState::Playing
    }

    /// Step the next tick will play.
    pub fn current_step(&self) -> usize {
        self.current_step
    }

    pub fn current_song_slot(&self) -> usize {
        self.current_song_slot
    }

    pub fn loop_count(&self) -> u64 {
        self.loop_count
    }

    pub fn interval(&self) -> f64 {
        self.interval
    }

    pub fn next_tick_at(&self) -> f64 {
        self.next_tick_at
    }

    pub fn is_previewing(&self) -> bool {
        self.preview.is_some()
    }

    pub fn set_slide_resolution(&mut self, resolution: SlideResolution) {
        self.slide_resolution = resolution;
    }

    /// Begin playback at clock time `now`. The first step fires immediately.
    pub fn start(&mut self, now: f64, session: &Session, sink: &mut impl TriggerSink) {
        self.preview = None;
        self.begin(now);
        if session.song_mode {
            self.current_song_slot = session.arrangement.first_filled_slot();
            log::debug!("song mode: starting at slot {}", self.current_song_slot);
        }
        log::info!("transport started at {:.1} BPM", 60.0 / (self.interval * 4.0));
        self.tick(now, session, sink);
    }

    /// Play `pattern` once from its first step, then stop.
    pub fn preview_pattern(
        &mut self,
        now: f64,
        pattern: Pattern,
        session: &Session,
        sink: &mut impl TriggerSink,
    ) {
        self.preview = Some(pattern);
        self.begin(now);
        log::info!("previewing pattern");
        self.tick(now, session, sink);
    }

    fn begin(&mut self, now: f64) {
        self.current_step = 0;
        self.loop_count = 0;
        if let Some(interval) = self.pending_interval.take() {
            self.interval = interval;
        }
        self.next_tick_at = now + self.interval;
        self.state = TransportState::Playing;
    }

    /// Halt future ticks. Notes already handed to the sink play out.
    pub fn stop(&mut self) {
        if self.is_playing() {
            log::info!("transport stopped at step {}", self.current_step);
        }
        self.state = TransportState::Stopped;
        self.preview = None;
    }

    /// Change tempo. The tick already scheduled keeps its time; the new
    /// interval applies from the one after it.
    pub fn set_bpm(&mut self, bpm: f64) {
        let interval = step_interval(bpm);
        if self.is_playing() {
            self.pending_interval = Some(interval);
        } else {
            self.interval = interval;
        }
        log::debug!("tempo set to {bpm} BPM ({:.1} ms per step)", interval * 1_000.0);
    }

    /// Fire every tick due before `horizon`. Returns how many fired.
    pub fn poll(&mut self, horizon: f64, session: &Session, sink: &mut impl TriggerSink) -> usize {
        let mut fired = 0;
        while self.is_playing() && self.next_tick_at < horizon {
            let due = self.next_tick_at;
            self.tick(due, session, sink);
            fired += 1;
            if let Some(interval) = self.pending_interval.take() {
                self.interval = interval;
            }
            self.next_tick_at = due + self.interval;
        }
        fired
    }

    fn tick(&mut self, due: f64, session: &Session, sink: &mut impl TriggerSink) {
        let when = due + self.lookahead;
        let step = self.current_step;
        let song_slot = (session.song_mode && self.preview.is_none()).then_some(self.current_song_slot);
        let pattern = match &self.preview {
            Some(pattern) => pattern,
            None => session.active_pattern(song_slot),
        };

        let mut event = StepEvent::new(step, song_slot, self.loop_count, when);

        for voice in 0..NUM_VOICES {
            let wave = session.waves()[voice];
            let octave = session.octaves()[voice];
            let grid = &pattern.voices[voice];

            for (row, row_note) in ROWS.iter().enumerate() {
                let note = grid.rows()[row][step];
                if !note.active {
                    continue;
                }
                let frequency = shifted_frequency(row_note.hz, octave);
                let slide_from = if note.slide {
                    self.slide_source(grid, row, step, octave)
                } else {
                    None
                };
                let duration = self.interval * f64::from(note.length);

                sink.note(NoteTrigger {
                    voice,
                    frequency,
                    time: when,
                    wave,
                    duration,
                    accent: note.accent,
                    slide_from,
                });
                event.voices[voice][row] = true;
            }
        }

        for drum in Drum::ALL {
            if pattern.drums.is_active(drum.index(), step) {
                sink.drum(drum, when);
                event.drums[drum.index()] = true;
            }
        }

        log::trace!(
            "step {step}: {} notes, {} drums at {when:.4}",
            event.note_count(),
            event.drum_count()
        );
        sink.step(event);
        self.advance(session);
    }

    fn advance(&mut self, session: &Session) {
        self.current_step = (self.current_step + 1) % NUM_STEPS;
        if self.current_step != 0 {
            return;
        }

        if self.preview.is_some() {
            log::info!("preview finished");
            self.stop();
        } else if session.song_mode {
            self.loop_count += 1;
            let next = session.arrangement.next_filled_slot(self.current_song_slot);
            if next != self.current_song_slot {
                log::debug!("song slot {} -> {next}", self.current_song_slot);
            }
            self.current_song_slot = next;
        }
    }

    /// Pitch a slide at `step` glides from. Never resolves on the first step.
    fn slide_source(&self, grid: &VoicePattern, row: usize, step: usize, octave: i8) -> Option<f32> {
        let source_row = match self.slide_resolution {
            SlideResolution::SameRow => (0..step)
                .rev()
                .find(|&s| grid.is_active(row, s))
                .map(|_| row),
            SlideResolution::AnyRow => (0..step)
                .rev()
                .find_map(|s| (0..ROWS.len()).find(|&r| grid.is_active(r, s))),
        }?;
        Some(shifted_frequency(ROWS[source_row].hz, octave))
    }
}

/// Validate and apply a tempo change to both the session and the clock.
pub fn retime(config: &EngineConfig, session: &mut Session, transport: &mut Transport, bpm: f64) -> Result<()> {
    let bpm = config.validate_bpm(bpm)?;
    session.set_bpm_unchecked(bpm);
    transport.set_bpm(bpm);
    Ok(())
}
