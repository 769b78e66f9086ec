// Keyboard input handling and command dispatch.
//
// Translates crossterm key events into UserCommand messages for the app
// event loop, or into local ViewState changes (focus movement).

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use homeval_core::store::{LocationZone, Predictor, BATHROOM_OPTIONS, BEDROOM_OPTIONS};

use super::ViewState;
use crate::protocol::{FormField, UserCommand};

/// Longest accepted text in the size field.
const MAX_SIZE_LEN: usize = 9;
/// Longest accepted text in the year field.
const MAX_YEAR_LEN: usize = 4;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key press should go to the app
/// event loop; `None` when it was handled locally or ignored.
///
/// Field edits are also applied to the local snapshot so fast typing
/// builds on the latest text; `apply_ui_update` keeps the focused text
/// field's local value when echoes arrive.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // Only process key press events. On Windows, crossterm emits both
    // Press and Release events for each physical keypress.
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(UserCommand::Quit),

        KeyCode::Up | KeyCode::BackTab => {
            view_state.focus = view_state.focus.prev();
            None
        }
        KeyCode::Down | KeyCode::Tab => {
            view_state.focus = view_state.focus.next();
            None
        }

        KeyCode::Left => step_choice(view_state, false),
        KeyCode::Right => step_choice(view_state, true),

        KeyCode::Enter => {
            if view_state.can_submit() {
                Some(UserCommand::Submit)
            } else {
                None
            }
        }

        KeyCode::Backspace => edit_text(view_state, None),
        KeyCode::Char(c) if c.is_ascii_digit() || c == '.' => edit_text(view_state, Some(c)),

        _ => None,
    }
}

/// Cycle the focused choice field one step forward or back.
fn step_choice(view_state: &mut ViewState, forward: bool) -> Option<UserCommand> {
    let spec = &mut view_state.snapshot.specification;
    match view_state.focus {
        FormField::Bedrooms => {
            let next = step_count(
                spec.bedroom_count,
                *BEDROOM_OPTIONS.start(),
                *BEDROOM_OPTIONS.end(),
                forward,
            )?;
            spec.bedroom_count = next;
            Some(UserCommand::SetBedrooms(next))
        }
        FormField::Bathrooms => {
            let next = step_count(
                spec.bathroom_count,
                *BATHROOM_OPTIONS.start(),
                *BATHROOM_OPTIONS.end(),
                forward,
            )?;
            spec.bathroom_count = next;
            Some(UserCommand::SetBathrooms(next))
        }
        FormField::Location => {
            let next = cycle_location(spec.location_zone, forward);
            spec.location_zone = Some(next);
            Some(UserCommand::SetLocation(Some(next)))
        }
        FormField::Predictor => {
            let next = match spec.selected_predictor {
                Predictor::Predictor1 => Predictor::Predictor2,
                Predictor::Predictor2 => Predictor::Predictor1,
            };
            spec.selected_predictor = next;
            Some(UserCommand::SetPredictor(next))
        }
        FormField::Size | FormField::YearBuilt => None,
    }
}

/// Step within `min..=max`, stopping at the ends. `None` when already there.
fn step_count(current: u8, min: u8, max: u8, forward: bool) -> Option<u8> {
    let next = if forward {
        current.saturating_add(1).min(max)
    } else {
        current.saturating_sub(1).max(min)
    };
    (next != current).then_some(next)
}

/// Unset → City; then City → Suburb → Rural → City (reverse going back).
pub fn cycle_location(current: Option<LocationZone>, forward: bool) -> LocationZone {
    let all = LocationZone::ALL;
    let Some(zone) = current else {
        return if forward { all[0] } else { all[all.len() - 1] };
    };
    let idx = all.iter().position(|z| *z == zone).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

/// Append `ch` to (or, with `None`, delete the last character of) the
/// focused text field.
fn edit_text(view_state: &mut ViewState, ch: Option<char>) -> Option<UserCommand> {
    let spec = &mut view_state.snapshot.specification;
    let (text, max_len, allow_dot) = match view_state.focus {
        FormField::Size => (&mut spec.size_sqft, MAX_SIZE_LEN, true),
        FormField::YearBuilt => (&mut spec.year_built, MAX_YEAR_LEN, false),
        _ => return None,
    };

    match ch {
        None => {
            text.pop()?;
        }
        Some('.') if !allow_dot || text.contains('.') => return None,
        Some(c) => {
            if text.len() >= max_len {
                return None;
            }
            text.push(c);
        }
    }

    let text = text.clone();
    match view_state.focus {
        FormField::Size => Some(UserCommand::SetSize(text)),
        _ => Some(UserCommand::SetYearBuilt(text)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
