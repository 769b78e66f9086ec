// Valuation request orchestration.
//
// `submit` validates the store's specification, builds the service request,
// performs it, and writes the outcome back. It is split into `prepare`
// (synchronous, mutates the store) and `execute` (async, touches only the
// service) so an event loop can run the network call in a spawned task and
// apply the outcome later with `ValuationStore::resolve`.

use std::sync::Arc;

use chrono::Datelike;
use tracing::{info, warn};

use crate::config::Config;
use crate::prediction::{
    capitalize_first, HttpPredictionService, ModelCode, PredictionRequest, PredictionService,
    ServiceError,
};
use crate::store::{PropertySpecification, ValuationError, ValuationStore};

/// Earliest accepted construction year.
pub const MIN_YEAR_BUILT: i32 = 1000;

/// A validated request that has been marked in flight.
#[derive(Debug, Clone, PartialEq)]
pub struct PendingValuation {
    /// Submission token; pass it back to `ValuationStore::resolve`.
    pub generation: u64,
    pub model: ModelCode,
    pub request: PredictionRequest,
}

/// Drives one valuation attempt from store to service and back.
#[derive(Clone)]
pub struct ValuationOrchestrator {
    service: Arc<dyn PredictionService>,
}

impl ValuationOrchestrator {
    pub fn new(service: Arc<dyn PredictionService>) -> Self {
        Self { service }
    }

    /// Orchestrator backed by the HTTP client for the configured service.
    pub fn from_config(config: &Config) -> Self {
        Self::new(Arc::new(HttpPredictionService::from_config(&config.service)))
    }

    /// Run a complete attempt. Every failure ends up in the store as a
    /// `ValuationError`; nothing is returned to the caller.
    pub async fn submit(&self, store: &mut ValuationStore) {
        let Ok(pending) = self.prepare(store) else {
            return;
        };
        let outcome = self.execute(&pending).await;
        store.resolve(pending.generation, outcome);
    }

    /// Clear the previous outcome, validate, and mark a request in flight.
    ///
    /// On a validation failure the error is recorded in the store and
    /// returned; `in_flight` stays false and no request is built.
    pub fn prepare(&self, store: &mut ValuationStore) -> Result<PendingValuation, ValuationError> {
        store.clear_outcome();

        let current_year = chrono::Local::now().year();
        let (model, request) = match build_request(store.specification(), current_year) {
            Ok(built) => built,
            Err(e) => {
                info!("Valuation not submitted: {e}");
                store.reject(e.clone());
                return Err(e);
            }
        };

        let generation = store.begin_attempt();
        info!(
            "Submitting valuation (gen: {}, model: {}, {} sqft, {} bd / {} ba, built {}, {})",
            generation,
            model,
            request.size_sqft,
            request.bedrooms,
            request.bathrooms,
            request.year_built,
            request.location
        );

        Ok(PendingValuation {
            generation,
            model,
            request,
        })
    }

    /// Perform the service call for a prepared attempt and map its failures
    /// to user-facing errors. Transport causes are logged, not surfaced.
    pub async fn execute(&self, pending: &PendingValuation) -> Result<f64, ValuationError> {
        match self.service.predict(pending.model, &pending.request).await {
            Ok(value) => {
                info!(
                    "Valuation complete (gen: {}): {}",
                    pending.generation, value
                );
                Ok(value)
            }
            Err(ServiceError::Transport(cause)) => {
                warn!(
                    "Prediction request failed (gen: {}): {}",
                    pending.generation, cause
                );
                Err(ValuationError::TransportFailure)
            }
            Err(ServiceError::Rejected { status, message }) => {
                info!(
                    "Prediction service rejected request (gen: {}, status: {}): {:?}",
                    pending.generation, status, message
                );
                Err(ValuationError::RequestRejected { message })
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Validation and request construction
// ---------------------------------------------------------------------------

/// Validate a specification and map it to the service's request schema.
///
/// Checks run in order: location, size, year built. The first failure wins.
pub fn build_request(
    spec: &PropertySpecification,
    current_year: i32,
) -> Result<(ModelCode, PredictionRequest), ValuationError> {
    let location = spec.location_zone.ok_or(ValuationError::MissingLocation)?;
    let size_sqft = parse_size_sqft(&spec.size_sqft).ok_or(ValuationError::InvalidSize)?;
    let year_built =
        parse_year_built(&spec.year_built, current_year).ok_or(ValuationError::InvalidYearBuilt)?;

    let request = PredictionRequest {
        size_sqft,
        bedrooms: spec.bedroom_count,
        bathrooms: spec.bathroom_count,
        year_built,
        location: capitalize_first(location.as_str()),
    };
    Ok((spec.selected_predictor.model_code(), request))
}

/// A finite, strictly positive number.
pub fn parse_size_sqft(input: &str) -> Option<f64> {
    input
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

/// Exactly four ASCII digits, no later than `current_year`.
pub fn parse_year_built(input: &str, current_year: i32) -> Option<i32> {
    let trimmed = input.trim();
    if trimmed.len() != 4 || !trimmed.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let year: i32 = trimmed.parse().ok()?;
    (MIN_YEAR_BUILT..=current_year).contains(&year).then_some(year)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
