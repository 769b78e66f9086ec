// Result panel: the latest valuation, the latest error, or a pending marker.
//
// Heading: "{predictor label} Analysis"
// Body: "Estimated Value" with the formatted amount ("—" when none)

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use homeval_core::display::format_result;

use crate::tui::ViewState;

pub const PENDING_TEXT: &str = "Calculating...";

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let border_style = if state.snapshot.error.is_some() {
        Style::default().fg(Color::Red)
    } else if state.snapshot.in_flight {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(build_result_lines(state))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(panel_title(state))
                .border_style(border_style),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// "Predictor-1 Analysis" etc.
pub fn panel_title(state: &ViewState) -> String {
    format!(
        "{} Analysis",
        state.snapshot.specification.selected_predictor.label()
    )
}

fn build_result_lines(state: &ViewState) -> Vec<Line<'static>> {
    let snapshot = &state.snapshot;
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            " Estimated Value",
            Style::default().fg(Color::Gray),
        )),
    ];

    let value = if snapshot.in_flight {
        Span::styled(
            format!(" {PENDING_TEXT}"),
            Style::default().fg(Color::Yellow),
        )
    } else {
        Span::styled(
            format!(" {}", format_result(snapshot.result)),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )
    };
    lines.push(Line::from(value));

    if let Some(err) = &snapshot.error {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!(" {err}"),
            Style::default().fg(Color::Red),
        )));
    }

    lines
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use homeval_core::display::NO_VALUE;
    use homeval_core::store::{Predictor, ValuationError};
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn rendered(state: &ViewState) -> String {
        let mut terminal = Terminal::new(TestBackend::new(50, 10)).unwrap();
        terminal
            .draw(|frame| render(frame, frame.area(), state))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn title_follows_predictor() {
        let mut state = ViewState::default();
        assert_eq!(panel_title(&state), "Predictor-1 Analysis");
        state.snapshot.specification.selected_predictor = Predictor::Predictor2;
        assert_eq!(panel_title(&state), "Predictor-2 Analysis");
    }

    #[test]
    fn shows_placeholder_without_result() {
        let text = rendered(&ViewState::default());
        assert!(text.contains(NO_VALUE));
        assert!(text.contains("Predictor-1 Analysis"));
    }

    #[test]
    fn shows_formatted_result() {
        let mut state = ViewState::default();
        state.snapshot.result = Some(318_250.5);
        assert!(rendered(&state).contains("$318,250.5"));
    }

    #[test]
    fn shows_pending_marker() {
        let mut state = ViewState::default();
        state.snapshot.in_flight = true;
        assert!(rendered(&state).contains(PENDING_TEXT));
    }

    #[test]
    fn shows_rejection_message() {
        let mut state = ViewState::default();
        state.snapshot.error = Some(ValuationError::RequestRejected {
            message: Some("Invalid size".into()),
        });
        assert!(rendered(&state).contains("Invalid size"));
    }

    #[test]
    fn shows_transport_failure_message() {
        let mut state = ViewState::default();
        state.snapshot.error = Some(ValuationError::TransportFailure);
        assert!(rendered(&state).contains("Backend request failed"));
    }
}
