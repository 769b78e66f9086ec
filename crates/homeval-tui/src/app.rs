// Application state and event loop.
//
// Owns the ValuationStore. User commands from the TUI mutate it; submissions
// are prepared here and the network call runs in a spawned task that reports
// back over the prediction channel. Every state change is pushed to the TUI
// as a snapshot.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use homeval_core::orchestrator::ValuationOrchestrator;
use homeval_core::store::ValuationStore;

use crate::protocol::{PredictionEvent, UiUpdate, UserCommand};

// ---------------------------------------------------------------------------
// AppState
// ---------------------------------------------------------------------------

pub struct AppState {
    pub store: ValuationStore,
    /// Shared with spawned prediction tasks.
    pub orchestrator: Arc<ValuationOrchestrator>,
    /// Spawned tasks send their outcome through a clone of this sender.
    pub prediction_tx: mpsc::Sender<PredictionEvent>,
}

impl AppState {
    pub fn new(
        orchestrator: ValuationOrchestrator,
        prediction_tx: mpsc::Sender<PredictionEvent>,
    ) -> Self {
        AppState {
            store: ValuationStore::new(),
            orchestrator: Arc::new(orchestrator),
            prediction_tx,
        }
    }

    /// Apply a field edit or submission. Returns `true` when the store
    /// changed and a new snapshot should be pushed.
    pub fn apply_command(&mut self, cmd: UserCommand) -> bool {
        let result = match cmd {
            UserCommand::SetBedrooms(n) => self.store.set_bedroom_count(n),
            UserCommand::SetBathrooms(n) => self.store.set_bathroom_count(n),
            UserCommand::SetSize(text) => {
                self.store.set_size_sqft(text);
                Ok(())
            }
            UserCommand::SetYearBuilt(text) => {
                self.store.set_year_built(text);
                Ok(())
            }
            UserCommand::SetLocation(zone) => {
                self.store.set_location_zone(zone);
                Ok(())
            }
            UserCommand::SetPredictor(predictor) => {
                self.store.set_selected_predictor(predictor);
                Ok(())
            }
            UserCommand::Submit => {
                self.trigger_submission();
                Ok(())
            }
            // Handled in the main loop
            UserCommand::Quit => return false,
        };

        match result {
            Ok(()) => true,
            Err(e) => {
                warn!("Ignoring invalid field value: {}", e);
                false
            }
        }
    }

    /// Validate and, if the form is complete, spawn the prediction request.
    ///
    /// Returns `true` if a request was spawned. Validation failures are
    /// already recorded in the store by `prepare`.
    pub fn trigger_submission(&mut self) -> bool {
        let pending = match self.orchestrator.prepare(&mut self.store) {
            Ok(pending) => pending,
            Err(_) => return false,
        };

        let orchestrator = Arc::clone(&self.orchestrator);
        let tx = self.prediction_tx.clone();
        tokio::spawn(async move {
            let outcome = orchestrator.execute(&pending).await;
            let event = PredictionEvent {
                generation: pending.generation,
                outcome,
            };
            if tx.send(event).await.is_err() {
                debug!("Prediction channel closed before outcome was delivered");
            }
        });
        true
    }

    /// Apply a prediction outcome. Outcomes from superseded submissions are
    /// discarded; returns `true` only when the store changed.
    pub fn handle_prediction_event(&mut self, event: PredictionEvent) -> bool {
        let applied = self.store.resolve(event.generation, event.outcome);
        if !applied {
            debug!(
                "Discarding stale prediction outcome (event gen: {}, current gen: {})",
                event.generation,
                self.store.generation()
            );
        }
        applied
    }

    fn snapshot_update(&self) -> UiUpdate {
        UiUpdate::Snapshot(Box::new(self.store.snapshot()))
    }
}

// ---------------------------------------------------------------------------
// Event loop
// ---------------------------------------------------------------------------

/// Run the app event loop until `Quit` or the command channel closes.
///
/// Pushes an initial snapshot, then one after every change.
pub async fn run(
    mut cmd_rx: mpsc::Receiver<UserCommand>,
    mut prediction_rx: mpsc::Receiver<PredictionEvent>,
    ui_tx: mpsc::Sender<UiUpdate>,
    mut state: AppState,
) -> anyhow::Result<()> {
    info!("Application event loop started");

    let _ = ui_tx.send(state.snapshot_update()).await;

    // AppState holds a sender, so this channel only closes if the state's
    // sender is replaced; guard anyway so select! never spins on it.
    let mut prediction_open = true;

    loop {
        tokio::select! {
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(UserCommand::Quit) => {
                        info!("Quit command received, shutting down");
                        break;
                    }
                    Some(cmd) => {
                        if state.apply_command(cmd) {
                            let _ = ui_tx.send(state.snapshot_update()).await;
                        }
                    }
                    None => {
                        info!("Command channel closed, shutting down");
                        break;
                    }
                }
            }

            event = prediction_rx.recv(), if prediction_open => {
                match event {
                    Some(event) => {
                        if state.handle_prediction_event(event) {
                            let _ = ui_tx.send(state.snapshot_update()).await;
                        }
                    }
                    None => {
                        info!("Prediction channel closed");
                        prediction_open = false;
                    }
                }
            }
        }
    }

    info!("Application event loop exiting");
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
