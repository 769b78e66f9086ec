// Prediction Service wire types and the client seam.

pub mod client;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use client::HttpPredictionService;

/// Remote model identifier, sent as `?model=`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelCode {
    /// Linear regression.
    Lr,
    /// Random forest regression.
    Rf,
}

impl ModelCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ModelCode::Lr => "lr",
            ModelCode::Rf => "rf",
        }
    }
}

impl fmt::Display for ModelCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// JSON body of `POST /predict`. Field names follow the service's
/// training-set column names.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionRequest {
    #[serde(rename = "Size_sqft")]
    pub size_sqft: f64,
    #[serde(rename = "Bedrooms")]
    pub bedrooms: u8,
    #[serde(rename = "Bathrooms")]
    pub bathrooms: u8,
    #[serde(rename = "YearBuilt")]
    pub year_built: i32,
    #[serde(rename = "Location")]
    pub location: String,
}

/// Response body. Success carries `prediction`; failures may carry `error`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PredictionReply {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prediction: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ServiceError {
    /// The exchange itself failed: connection error, unreadable body, or a
    /// success response without a numeric `prediction`.
    #[error("transport failure: {0}")]
    Transport(String),

    /// The service answered with a non-success status.
    #[error("service rejected request with status {status}")]
    Rejected { status: u16, message: Option<String> },
}

/// Anything that can turn a property description into a price estimate.
#[async_trait]
pub trait PredictionService: Send + Sync {
    async fn predict(
        &self,
        model: ModelCode,
        request: &PredictionRequest,
    ) -> Result<f64, ServiceError>;
}

/// Upper-case the first character and leave the rest unchanged
/// (`"city"` → `"City"`).
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
