// TUI: valuation form, result panel, and key handling.
//
// The TUI owns a `ViewState` holding the latest store snapshot plus local
// concerns (focus). The app event loop pushes `UiUpdate` snapshots over an
// mpsc channel; the TUI applies them and re-renders at ~30 fps.

pub mod input;
pub mod layout;
pub mod widgets;

use std::time::Duration;

use crossterm::event::{Event, EventStream};
use futures_util::StreamExt;
use ratatui::Frame;
use tokio::sync::mpsc;

use homeval_core::store::ValuationSnapshot;

use crate::protocol::{FormField, UiUpdate, UserCommand};

use layout::build_layout;

// ---------------------------------------------------------------------------
// ViewState
// ---------------------------------------------------------------------------

/// TUI-local state: the last store snapshot plus which field has focus.
#[derive(Debug, Clone, Default)]
pub struct ViewState {
    pub snapshot: ValuationSnapshot,
    pub focus: FormField,
}

impl ViewState {
    /// Whether Enter should currently trigger a submission.
    pub fn can_submit(&self) -> bool {
        !self.snapshot.in_flight
    }
}

/// Apply a single UiUpdate to the ViewState.
///
/// The focused text field keeps its local text: keystrokes are applied
/// here first, so an echo of an earlier edit is older than what is shown.
pub fn apply_ui_update(state: &mut ViewState, update: UiUpdate) {
    match update {
        UiUpdate::Snapshot(snapshot) => {
            let mut snapshot = *snapshot;
            let local = &state.snapshot.specification;
            match state.focus {
                FormField::Size => {
                    snapshot.specification.size_sqft = local.size_sqft.clone();
                }
                FormField::YearBuilt => {
                    snapshot.specification.year_built = local.year_built.clone();
                }
                _ => {}
            }
            state.snapshot = snapshot;
        }
    }
}

// ---------------------------------------------------------------------------
// Render frame
// ---------------------------------------------------------------------------

pub fn render_frame(frame: &mut Frame, state: &ViewState) {
    let layout = build_layout(frame.area());

    widgets::title::render(frame, layout.title);
    widgets::form::render(frame, layout.form, state);
    widgets::result::render(frame, layout.result, state);
    widgets::help_bar::render(frame, layout.help_bar, state);
}

// ---------------------------------------------------------------------------
// Main TUI loop
// ---------------------------------------------------------------------------

/// Run the TUI event loop until the user quits or the app loop exits.
///
/// Initializes the terminal, installs a panic hook that restores it, then
/// selects over UI updates, keyboard input, and render ticks.
pub async fn run(
    mut ui_rx: mpsc::Receiver<UiUpdate>,
    cmd_tx: mpsc::Sender<UserCommand>,
) -> anyhow::Result<()> {
    let mut terminal = ratatui::init();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = ratatui::restore();
        original_hook(panic_info);
    }));

    let mut view_state = ViewState::default();
    let mut event_stream = EventStream::new();

    let mut render_tick = tokio::time::interval(Duration::from_millis(33));
    render_tick.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            update = ui_rx.recv() => {
                match update {
                    Some(ui_update) => apply_ui_update(&mut view_state, ui_update),
                    // App loop is gone
                    None => break,
                }
            }

            maybe_event = event_stream.next() => {
                match maybe_event {
                    Some(Ok(Event::Key(key_event))) => {
                        if let Some(cmd) = input::handle_key(key_event, &mut view_state) {
                            let quit = cmd == UserCommand::Quit;
                            let _ = cmd_tx.send(cmd).await;
                            if quit {
                                break;
                            }
                        }
                    }
                    Some(Ok(_)) => {}
                    Some(Err(_)) | None => break,
                }
            }

            _ = render_tick.tick() => {
                terminal.draw(|frame| render_frame(frame, &view_state))?;
            }
        }
    }

    ratatui::restore();

    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
