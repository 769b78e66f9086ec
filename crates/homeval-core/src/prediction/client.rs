// HTTP client for the Prediction Service.
//
// One POST per valuation: `{base_url}/predict?model={code}` with a JSON body.
// No retries and no request timeout; a hung request stays pending.

use async_trait::async_trait;
use tracing::debug;

use crate::config::ServiceConfig;

use super::{ModelCode, PredictionReply, PredictionRequest, PredictionService, ServiceError};

/// reqwest-backed [`PredictionService`].
#[derive(Debug, Clone)]
pub struct HttpPredictionService {
    http: reqwest::Client,
    base_url: String,
}

impl HttpPredictionService {
    /// `base_url` must already be validated (see [`crate::config`]); a
    /// trailing `/` is tolerated.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    pub fn from_config(config: &ServiceConfig) -> Self {
        Self::new(config.base_url.clone())
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Full endpoint URL for the given model.
    pub fn predict_url(&self, model: ModelCode) -> String {
        format!("{}/predict?model={}", self.base_url, model)
    }
}

#[async_trait]
impl PredictionService for HttpPredictionService {
    async fn predict(
        &self,
        model: ModelCode,
        request: &PredictionRequest,
    ) -> Result<f64, ServiceError> {
        let url = self.predict_url(model);
        debug!(%url, "sending prediction request");

        // `.json()` sets `Content-Type: application/json`.
        let response = self
            .http
            .post(&url)
            .json(request)
            .send()
            .await
            .map_err(|e| ServiceError::Transport(format!("request to {url} failed: {e}")))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ServiceError::Transport(format!("failed to read response body: {e}")))?;

        interpret_response(status.as_u16(), status.is_success(), &body)
    }
}

/// Map a completed HTTP exchange to a prediction or a [`ServiceError`].
///
/// The body must be a JSON reply whatever the status; anything else is a
/// transport failure. A success status also needs a numeric `prediction`.
/// A failure status keeps the reply's `error` string when it is non-empty.
pub(crate) fn interpret_response(
    status: u16,
    success: bool,
    body: &str,
) -> Result<f64, ServiceError> {
    let reply = serde_json::from_str::<PredictionReply>(body).map_err(|e| {
        ServiceError::Transport(format!("malformed response body (status {status}): {e}"))
    })?;

    if success {
        return reply.prediction.ok_or_else(|| {
            ServiceError::Transport("response body has no numeric `prediction`".to_string())
        });
    }

    let message = reply.error.filter(|m| !m.is_empty());
    Err(ServiceError::Rejected { status, message })
}
