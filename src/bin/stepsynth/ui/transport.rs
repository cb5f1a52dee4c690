//! Transport bar widget - shows BPM, play state, step, song slot and levels

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use stepsynth::NUM_STEPS;

use super::UiState;

/// Audio statistics for display
pub struct AudioStats {
    pub peak: f32,
    pub rms: f32,
}

impl AudioStats {
    /// Compute audio stats from a buffer
    pub fn from_buffer(buffer: &[f32]) -> Self {
        if buffer.is_empty() {
            return Self { peak: 0.0, rms: 0.0 };
        }
        let peak = buffer.iter().fold(0.0f32, |acc, &x| acc.max(x.abs()));
        let rms = (buffer.iter().map(|&x| x * x).sum::<f32>() / buffer.len() as f32).sqrt();
        Self { peak, rms }
    }
}

pub fn render_transport(frame: &mut Frame, area: Rect, state: &UiState, audio_stats: &AudioStats) {
    let block = Block::default().title(" stepsynth ").borders(Borders::ALL);

    let play_symbol = if state.playing { "▶" } else { "■" };
    let play_state_str = if state.playing { "Playing" } else { "Stopped" };
    let step = state.last_step.map_or(0, |event| event.step + 1);

    let position = match state.last_step.and_then(|event| event.song_slot) {
        Some(slot) if state.song_mode => format!(
            "Slot {:>2} {:<14} Loop {}  ",
            slot + 1,
            state.pattern_name().unwrap_or("(working)"),
            state.last_step.map_or(0, |event| event.loop_count)
        ),
        _ => String::from("Pattern (working)  "),
    };

    let line = Line::from(vec![
        Span::styled(format!(" BPM: {:.0}  ", state.bpm), Style::default().fg(Color::Cyan)),
        Span::styled(
            format!("{} {}  ", play_symbol, play_state_str),
            Style::default().fg(if state.playing { Color::Green } else { Color::Yellow }),
        ),
        Span::styled(format!("Step {:>2}/{NUM_STEPS}  ", step), Style::default().fg(Color::White)),
        Span::styled(
            format!("Song {}  ", if state.song_mode { "on" } else { "off" }),
            Style::default().fg(if state.song_mode { Color::Green } else { Color::DarkGray }),
        ),
        Span::styled(position, Style::default().fg(Color::White)),
        Span::styled(
            format!("{:.1}kHz  ", state.sample_rate / 1000.0),
            Style::default().fg(Color::DarkGray),
        ),
        Span::styled(
            format!("Peak: {:.2}  RMS: {:.2}", audio_stats.peak, audio_stats.rms),
            Style::default().fg(Color::Magenta),
        ),
    ]);

    frame.render_widget(Paragraph::new(line).block(block), area);
}
