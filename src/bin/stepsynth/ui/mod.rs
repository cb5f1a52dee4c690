//! Terminal UI for stepsynth
//!
//! Shows the transport, the step grid with a playhead and the output
//! waveform. Keys go to the engine as commands; the grid follows the step
//! events coming back.

mod grid;
mod state;
mod transport;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::{Block, Borders, Paragraph},
    DefaultTerminal, Frame,
};
use rtrb::Consumer;
use std::time::Duration;
use stepsynth::{engine::EngineController, sequencing, transport::StepEvent, NUM_DRUMS, NUM_VOICES};

pub use state::UiState;

use grid::render_grid;
use transport::{render_transport, AudioStats};
use waveform::render_waveform;

/// Audio visualization buffer size
const VIS_BUFFER_SIZE: usize = 1024;
/// Tempo change per key press
const BPM_STEP: f64 = 5.0;

pub struct UiApp {
    controller: EngineController,
    step_rx: Consumer<StepEvent>,
    scope_rx: Consumer<f32>,
    state: UiState,
    audio_buffer: Vec<f32>,
    should_quit: bool,
}

impl UiApp {
    pub fn new(
        controller: EngineController,
        step_rx: Consumer<StepEvent>,
        scope_rx: Consumer<f32>,
        state: UiState,
    ) -> Self {
        Self {
            controller,
            step_rx,
            scope_rx,
            state,
            audio_buffer: vec![0.0; VIS_BUFFER_SIZE],
            should_quit: false,
        }
    }

    /// Run the UI event loop
    pub fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        while !self.should_quit {
            self.poll_audio();
            self.poll_steps();

            terminal.draw(|frame| self.render(frame))?;

            // Handle keyboard input (non-blocking, ~60fps)
            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }
        }

        self.controller.stop();
        Ok(())
    }

    fn poll_audio(&mut self) {
        let available = self.scope_rx.slots();
        if available == 0 {
            return;
        }
        self.audio_buffer.extend(std::iter::from_fn(|| self.scope_rx.pop().ok()).take(available));
        if self.audio_buffer.len() > VIS_BUFFER_SIZE {
            let excess = self.audio_buffer.len() - VIS_BUFFER_SIZE;
            self.audio_buffer.drain(0..excess);
        }
    }

    /// Keep only the latest step
    fn poll_steps(&mut self) {
        while let Ok(step) = self.step_rx.pop() {
            self.state.last_step = Some(step);
        }
    }

    fn handle_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Char(' ') => {
                let sent = if self.state.playing {
                    self.controller.stop()
                } else {
                    self.controller.start()
                };
                if sent {
                    self.state.playing = !self.state.playing;
                    self.state.last_step = None;
                }
            }
            KeyCode::Char('+') | KeyCode::Char('=') | KeyCode::Up => self.nudge_bpm(BPM_STEP),
            KeyCode::Char('-') | KeyCode::Down => self.nudge_bpm(-BPM_STEP),
            KeyCode::Char('m') | KeyCode::Char('M') => {
                let enabled = !self.state.song_mode;
                if self.controller.set_song_mode(enabled) {
                    self.state.song_mode = enabled;
                }
            }
            KeyCode::Char('r') | KeyCode::Char('R') => {
                let pattern = sequencing::seeded_pattern(rand::random());
                if self.controller.set_pattern(pattern.clone()) {
                    self.state.working = pattern;
                }
            }
            _ => {}
        }
    }

    fn nudge_bpm(&mut self, delta: f64) {
        let bpm = (self.state.bpm + delta).clamp(self.state.min_bpm, self.state.max_bpm);
        if let Ok(true) = self.controller.set_bpm(bpm) {
            self.state.bpm = bpm;
        }
    }

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        // Header row plus one lane per voice and drum
        let grid_height = (1 + NUM_VOICES + NUM_DRUMS) as u16 + 2;

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),           // Transport bar
                Constraint::Length(grid_height), // Step grid
                Constraint::Min(6),              // Waveform
                Constraint::Length(1),           // Help bar
            ])
            .split(area);

        let stats = AudioStats::from_buffer(&self.audio_buffer);
        render_transport(frame, chunks[0], &self.state, &stats);

        let grid_block = Block::default().title(" Steps ").borders(Borders::ALL);
        let grid_inner = grid_block.inner(chunks[1]);
        frame.render_widget(grid_block, chunks[1]);
        render_grid(frame, grid_inner, &self.state);

        render_waveform(frame, chunks[2], &self.audio_buffer);

        let help = Paragraph::new(" [Q] Quit  [Space] Play/Stop  [+/-] BPM  [M] Song mode")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
