//! Step grid widget - one lane per voice and drum, playhead on the last step

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use stepsynth::{voices::Drum, NUM_STEPS};

use super::UiState;

const LABEL_WIDTH: usize = 12;

pub fn render_grid(frame: &mut Frame, area: Rect, state: &UiState) {
    if area.width < (LABEL_WIDTH + NUM_STEPS * 2) as u16 {
        return;
    }

    let pattern = state.visible_pattern();
    let playhead = state.playing.then(|| state.last_step.map(|event| event.step)).flatten();
    let mut lines = Vec::new();

    // Beat markers row
    let mut markers = " ".repeat(LABEL_WIDTH);
    for step in 0..NUM_STEPS {
        markers.push_str(if step % 4 == 0 { "| " } else { ". " });
    }
    lines.push(Line::from(Span::styled(markers, Style::default().fg(Color::DarkGray))));

    for (voice, grid) in pattern.voices.iter().enumerate() {
        let label = format!(
            "V{} {:<5}{:+}",
            voice + 1,
            state.waves[voice].name(),
            state.octaves[voice]
        );
        let fired = state.last_step.map(|event| event.voices[voice]);
        let cells = (0..NUM_STEPS).map(|step| {
            let mut accent = false;
            let mut active = false;
            for row in grid.rows() {
                let note = row[step];
                active |= note.active;
                accent |= note.active && note.accent;
            }
            let lit = playhead == Some(step) && fired.is_some_and(|rows| rows.iter().any(|&r| r));
            (active, accent, lit)
        });
        lines.push(lane(label, cells, playhead, Color::Cyan));
    }

    for drum in Drum::ALL {
        let fired = state.last_step.is_some_and(|event| event.drums[drum.index()]);
        let cells = (0..NUM_STEPS).map(|step| {
            let active = pattern.drums.is_active(drum.index(), step);
            (active, false, playhead == Some(step) && fired)
        });
        lines.push(lane(drum.name().to_string(), cells, playhead, Color::Magenta));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn lane(
    label: String,
    cells: impl Iterator<Item = (bool, bool, bool)>,
    playhead: Option<usize>,
    color: Color,
) -> Line<'static> {
    let mut spans = vec![Span::styled(
        format!("{label:<width$.width$}", width = LABEL_WIDTH),
        Style::default().fg(Color::White),
    )];

    for (step, (active, accent, lit)) in cells.enumerate() {
        let symbol = match (active, accent) {
            (true, true) => "◆ ",
            (true, false) => "● ",
            _ => "· ",
        };
        let mut style = Style::default().fg(if active { color } else { Color::DarkGray });
        if lit {
            style = style.fg(Color::Yellow).add_modifier(Modifier::BOLD);
        } else if playhead == Some(step) {
            style = style.bg(Color::Rgb(40, 40, 40));
        }
        spans.push(Span::styled(symbol, style));
    }
    Line::from(spans)
}
