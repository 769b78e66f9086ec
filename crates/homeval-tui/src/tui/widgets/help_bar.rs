// Help bar widget: keyboard shortcut hints for the focused field.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use crate::tui::ViewState;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let paragraph = Paragraph::new(Line::from(vec![Span::styled(
        hint_text(state),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::DIM),
    )]))
    .style(Style::default().bg(Color::DarkGray));
    frame.render_widget(paragraph, area);
}

/// Hints depend on the focused field kind and whether a request is pending.
pub fn hint_text(state: &ViewState) -> &'static str {
    match (state.focus.is_text(), state.snapshot.in_flight) {
        (true, false) => " q:Quit | Up/Down:Field | 0-9:Type | Bksp:Delete | Enter:Predict",
        (false, false) => " q:Quit | Up/Down:Field | Left/Right:Change | Enter:Predict",
        (true, true) => " q:Quit | Up/Down:Field | 0-9:Type | Bksp:Delete | Calculating...",
        (false, true) => " q:Quit | Up/Down:Field | Left/Right:Change | Calculating...",
    }
}
