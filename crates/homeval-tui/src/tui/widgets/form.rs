// Form widget: one row per property field, focused row highlighted.
//
// Choice fields show "< value >"; text fields show the raw text with a
// cursor when focused.

use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

use homeval_core::store::PropertySpecification;

use crate::protocol::FormField;
use crate::tui::ViewState;

/// Shown in the location row until a zone is chosen.
pub const LOCATION_PLACEHOLDER: &str = "Select location";

/// Width of the label column.
const LABEL_WIDTH: usize = 22;

pub fn render(frame: &mut Frame, area: Rect, state: &ViewState) {
    let lines = build_form_lines(state);

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Property Details"),
    );
    frame.render_widget(paragraph, area);
}

fn build_form_lines(state: &ViewState) -> Vec<Line<'static>> {
    let spec = &state.snapshot.specification;
    let mut lines = Vec::with_capacity(FormField::ALL.len() * 2);

    for field in FormField::ALL {
        let focused = field == state.focus;
        let marker = if focused { "> " } else { "  " };
        let label_style = if focused {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray)
        };

        let mut value = field_value(field, spec);
        if focused {
            value = if field.is_text() {
                format!("{value}_")
            } else {
                format!("< {value} >")
            };
        }

        let value_style = if field == FormField::Location && spec.location_zone.is_none() {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::White)
        };

        lines.push(Line::from(vec![
            Span::styled(marker, label_style),
            Span::styled(format!("{:<LABEL_WIDTH$}", field.label()), label_style),
            Span::styled(value, value_style),
        ]));
        lines.push(Line::default());
    }

    lines
}

/// Display text for a field's current value.
pub fn field_value(field: FormField, spec: &PropertySpecification) -> String {
    match field {
        FormField::Bedrooms => spec.bedroom_count.to_string(),
        FormField::Bathrooms => spec.bathroom_count.to_string(),
        FormField::Size => spec.size_sqft.clone(),
        FormField::YearBuilt => spec.year_built.clone(),
        FormField::Location => spec
            .location_zone
            .map(|zone| zone.label().to_string())
            .unwrap_or_else(|| LOCATION_PLACEHOLDER.to_string()),
        FormField::Predictor => format!(
            "{} ({})",
            spec.selected_predictor.label(),
            spec.selected_predictor.model_name()
        ),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
