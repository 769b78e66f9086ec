// Valuation state store: form inputs, last outcome, in-flight flag.
//
// Pure data plus transition rules. The orchestrator drives the transitions;
// the presentation layer reads snapshots and calls the per-field setters.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

use crate::prediction::ModelCode;

// ---------------------------------------------------------------------------
// Field domains
// ---------------------------------------------------------------------------

/// Selectable bedroom counts.
pub const BEDROOM_OPTIONS: std::ops::RangeInclusive<u8> = 1..=6;

/// Selectable bathroom counts.
pub const BATHROOM_OPTIONS: std::ops::RangeInclusive<u8> = 1..=5;

pub const DEFAULT_BEDROOMS: u8 = 3;
pub const DEFAULT_BATHROOMS: u8 = 1;
pub const DEFAULT_SIZE_SQFT: &str = "2575";
pub const DEFAULT_YEAR_BUILT: &str = "1975";

/// Where the property sits. Serialized to the service capitalized
/// (`"City"`, `"Suburb"`, `"Rural"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LocationZone {
    City,
    Suburb,
    Rural,
}

impl LocationZone {
    pub const ALL: [LocationZone; 3] = [
        LocationZone::City,
        LocationZone::Suburb,
        LocationZone::Rural,
    ];

    /// The form value: `"city"`, `"suburb"`, `"rural"`.
    pub fn as_str(self) -> &'static str {
        match self {
            LocationZone::City => "city",
            LocationZone::Suburb => "suburb",
            LocationZone::Rural => "rural",
        }
    }
}

impl fmt::Display for LocationZone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LocationZone {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "city" => Ok(LocationZone::City),
            "suburb" => Ok(LocationZone::Suburb),
            "rural" => Ok(LocationZone::Rural),
            other => Err(FieldError::UnknownLocation(other.to_string())),
        }
    }
}

/// Which remote model produces the estimate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Predictor {
    #[default]
    Predictor1,
    Predictor2,
}

impl Predictor {
    pub const ALL: [Predictor; 2] = [Predictor::Predictor1, Predictor::Predictor2];

    /// The form value: `"predictor-1"` or `"predictor-2"`.
    pub fn as_str(self) -> &'static str {
        match self {
            Predictor::Predictor1 => "predictor-1",
            Predictor::Predictor2 => "predictor-2",
        }
    }

    /// Model code sent as the `model` query parameter.
    pub fn model_code(self) -> ModelCode {
        match self {
            Predictor::Predictor1 => ModelCode::Lr,
            Predictor::Predictor2 => ModelCode::Rf,
        }
    }
}

impl fmt::Display for Predictor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Predictor {
    type Err = FieldError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "predictor-1" => Ok(Predictor::Predictor1),
            "predictor-2" => Ok(Predictor::Predictor2),
            other => Err(FieldError::UnknownPredictor(other.to_string())),
        }
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// A setter was handed a value outside the field's domain.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldError {
    #[error("bedroom count must be between 1 and 6, got {0}")]
    BedroomsOutOfRange(u8),

    #[error("bathroom count must be between 1 and 5, got {0}")]
    BathroomsOutOfRange(u8),

    #[error("unknown location `{0}`")]
    UnknownLocation(String),

    #[error("unknown predictor `{0}`")]
    UnknownPredictor(String),
}

/// Why a valuation attempt produced no result. `Display` is the message
/// shown to the user.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValuationError {
    #[error("Please select a location")]
    MissingLocation,

    #[error("Please enter a valid property size")]
    InvalidSize,

    #[error("Please enter a valid four-digit year built")]
    InvalidYearBuilt,

    #[error("Backend request failed")]
    TransportFailure,

    #[error("{}", .message.as_deref().unwrap_or(REJECTED_FALLBACK))]
    RequestRejected { message: Option<String> },
}

const REJECTED_FALLBACK: &str = "Failed to get prediction from backend";

// ---------------------------------------------------------------------------
// PropertySpecification
// ---------------------------------------------------------------------------

/// User-entered property attributes for one form session.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertySpecification {
    pub bedroom_count: u8,
    pub bathroom_count: u8,
    /// Raw text as typed; parsed on submission.
    pub size_sqft: String,
    /// Raw text as typed; parsed on submission.
    pub year_built: String,
    pub location_zone: Option<LocationZone>,
    pub selected_predictor: Predictor,
}

impl Default for PropertySpecification {
    fn default() -> Self {
        PropertySpecification {
            bedroom_count: DEFAULT_BEDROOMS,
            bathroom_count: DEFAULT_BATHROOMS,
            size_sqft: DEFAULT_SIZE_SQFT.to_string(),
            year_built: DEFAULT_YEAR_BUILT.to_string(),
            location_zone: None,
            selected_predictor: Predictor::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// ValuationStore
// ---------------------------------------------------------------------------

/// Read-only copy of the store handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct ValuationSnapshot {
    pub specification: PropertySpecification,
    pub result: Option<f64>,
    pub error: Option<ValuationError>,
    pub in_flight: bool,
}

impl Default for ValuationSnapshot {
    fn default() -> Self {
        ValuationStore::new().snapshot()
    }
}

/// Holds the form state and the outcome of the latest valuation attempt.
///
/// `result` and `error` are never both set. `in_flight` is only set between
/// [`begin_attempt`](Self::begin_attempt) and the matching
/// [`resolve`](Self::resolve), and a later `begin_attempt` or
/// [`reject`](Self::reject) supersedes it.
#[derive(Debug, Clone, Default)]
pub struct ValuationStore {
    spec: PropertySpecification,
    result: Option<f64>,
    error: Option<ValuationError>,
    in_flight: bool,
    /// Monotonically increasing submission token. Outcomes tagged with an
    /// older generation are discarded in `resolve`.
    generation: u64,
}

impl ValuationStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn specification(&self) -> &PropertySpecification {
        &self.spec
    }

    pub fn result(&self) -> Option<f64> {
        self.result
    }

    pub fn error(&self) -> Option<&ValuationError> {
        self.error.as_ref()
    }

    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn snapshot(&self) -> ValuationSnapshot {
        ValuationSnapshot {
            specification: self.spec.clone(),
            result: self.result,
            error: self.error.clone(),
            in_flight: self.in_flight,
        }
    }

    // -- Field setters --

    pub fn set_bedroom_count(&mut self, count: u8) -> Result<(), FieldError> {
        if !BEDROOM_OPTIONS.contains(&count) {
            return Err(FieldError::BedroomsOutOfRange(count));
        }
        self.spec.bedroom_count = count;
        Ok(())
    }

    pub fn set_bathroom_count(&mut self, count: u8) -> Result<(), FieldError> {
        if !BATHROOM_OPTIONS.contains(&count) {
            return Err(FieldError::BathroomsOutOfRange(count));
        }
        self.spec.bathroom_count = count;
        Ok(())
    }

    pub fn set_size_sqft(&mut self, size: impl Into<String>) {
        self.spec.size_sqft = size.into();
    }

    pub fn set_year_built(&mut self, year: impl Into<String>) {
        self.spec.year_built = year.into();
    }

    pub fn set_location_zone(&mut self, zone: Option<LocationZone>) {
        self.spec.location_zone = zone;
    }

    pub fn set_selected_predictor(&mut self, predictor: Predictor) {
        self.spec.selected_predictor = predictor;
    }

    // -- Attempt transitions --

    /// Drop the previous result and error ahead of a new attempt.
    pub fn clear_outcome(&mut self) {
        self.result = None;
        self.error = None;
    }

    /// Record a failure detected before any request was issued.
    ///
    /// This still counts as the latest attempt: the generation advances so
    /// any request still in flight goes stale, and `in_flight` is cleared.
    pub fn reject(&mut self, error: ValuationError) {
        self.result = None;
        self.error = Some(error);
        self.in_flight = false;
        self.generation += 1;
    }

    /// Mark a new request as in flight and return its submission token.
    pub fn begin_attempt(&mut self) -> u64 {
        self.clear_outcome();
        self.in_flight = true;
        self.generation += 1;
        self.generation
    }

    /// Apply the outcome of the request issued with `generation`.
    ///
    /// Returns `false` (and changes nothing) when a newer attempt has
    /// started since; that attempt still owns `in_flight`.
    pub fn resolve(&mut self, generation: u64, outcome: Result<f64, ValuationError>) -> bool {
        if generation != self.generation {
            return false;
        }
        match outcome {
            Ok(value) => {
                self.result = Some(value);
                self.error = None;
            }
            Err(error) => {
                self.result = None;
                self.error = Some(error);
            }
        }
        self.in_flight = false;
        true
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
