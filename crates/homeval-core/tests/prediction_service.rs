// Integration tests: the real HTTP client and orchestrator against an
// in-process mock Prediction Service.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use homeval_core::orchestrator::ValuationOrchestrator;
use homeval_core::prediction::{
    HttpPredictionService, ModelCode, PredictionRequest, PredictionService, ServiceError,
};
use homeval_core::store::{LocationZone, Predictor, ValuationError, ValuationStore};

// ===========================================================================
// Mock server
// ===========================================================================

/// One request as the mock server saw it.
#[derive(Debug, Clone)]
struct Received {
    model: Option<String>,
    content_type: Option<String>,
    body: Value,
}

#[derive(Clone)]
struct MockState {
    status: StatusCode,
    reply: String,
    received: Arc<Mutex<Vec<Received>>>,
}

async fn predict_handler(
    State(state): State<MockState>,
    Query(query): Query<HashMap<String, String>>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> impl IntoResponse {
    state.received.lock().unwrap().push(Received {
        model: query.get("model").cloned(),
        content_type: headers
            .get("content-type")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body,
    });
    (
        state.status,
        [("content-type", "application/json")],
        state.reply.clone(),
    )
}

/// Start a mock service answering every `/predict` with `status` and
/// `reply`. Returns the base URL and the request log.
async fn spawn_mock(status: StatusCode, reply: &str) -> (String, Arc<Mutex<Vec<Received>>>) {
    let received = Arc::new(Mutex::new(Vec::new()));
    let state = MockState {
        status,
        reply: reply.to_string(),
        received: received.clone(),
    };

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let app = Router::new()
        .route("/predict", post(predict_handler))
        .with_state(state);
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });

    (format!("http://{addr}"), received)
}

fn sample_request() -> PredictionRequest {
    PredictionRequest {
        size_sqft: 2575.0,
        bedrooms: 3,
        bathrooms: 1,
        year_built: 1975,
        location: "City".into(),
    }
}

fn http_orchestrator(base_url: &str) -> ValuationOrchestrator {
    ValuationOrchestrator::new(Arc::new(HttpPredictionService::new(base_url)))
}

// ===========================================================================
// HTTP client
// ===========================================================================

#[tokio::test]
async fn posts_json_to_predict_with_model_query() {
    let (base_url, received) = spawn_mock(StatusCode::OK, r#"{"prediction": 452000}"#).await;
    let client = HttpPredictionService::new(&base_url);

    let value = client
        .predict(ModelCode::Rf, &sample_request())
        .await
        .expect("prediction should succeed");
    assert_eq!(value, 452_000.0);

    let log = received.lock().unwrap().clone();
    assert_eq!(log.len(), 1);
    assert_eq!(log[0].model.as_deref(), Some("rf"));
    assert_eq!(log[0].content_type.as_deref(), Some("application/json"));
    assert_eq!(
        log[0].body,
        json!({
            "Size_sqft": 2575.0,
            "Bedrooms": 3,
            "Bathrooms": 1,
            "YearBuilt": 1975,
            "Location": "City",
        })
    );
}

#[tokio::test]
async fn non_success_status_is_rejection() {
    let (base_url, _) =
        spawn_mock(StatusCode::BAD_REQUEST, r#"{"error": "Invalid size"}"#).await;
    let client = HttpPredictionService::new(base_url);

    let err = client
        .predict(ModelCode::Lr, &sample_request())
        .await
        .unwrap_err();
    assert_eq!(
        err,
        ServiceError::Rejected {
            status: 400,
            message: Some("Invalid size".into()),
        }
    );
}

#[tokio::test]
async fn connection_refused_is_transport_failure() {
    // Grab a free port, then close it so nothing is listening.
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);

    let client = HttpPredictionService::new(format!("http://{addr}"));
    let err = client
        .predict(ModelCode::Lr, &sample_request())
        .await
        .unwrap_err();
    assert!(matches!(err, ServiceError::Transport(_)), "got {err:?}");
}

// ===========================================================================
// Orchestrator end to end
// ===========================================================================

#[tokio::test]
async fn submit_success_end_to_end() {
    let (base_url, received) = spawn_mock(StatusCode::OK, r#"{"prediction": 452000}"#).await;
    let orch = http_orchestrator(&base_url);

    let mut store = ValuationStore::new();
    store.set_location_zone(Some(LocationZone::Suburb));
    store.set_selected_predictor(Predictor::Predictor2);
    store.set_bedroom_count(4).unwrap();

    orch.submit(&mut store).await;

    assert_eq!(store.result(), Some(452_000.0));
    assert!(store.error().is_none());
    assert!(!store.is_in_flight());

    let log = received.lock().unwrap().clone();
    assert_eq!(log[0].model.as_deref(), Some("rf"));
    assert_eq!(log[0].body["Location"], "Suburb");
    assert_eq!(log[0].body["Bedrooms"], 4);
}

#[tokio::test]
async fn submit_rejection_end_to_end() {
    let (base_url, _) =
        spawn_mock(StatusCode::BAD_REQUEST, r#"{"error": "Invalid size"}"#).await;
    let orch = http_orchestrator(&base_url);

    let mut store = ValuationStore::new();
    store.set_location_zone(Some(LocationZone::City));
    orch.submit(&mut store).await;

    assert_eq!(store.error_message().as_deref(), Some("Invalid size"));
    assert!(store.result().is_none());
    assert!(!store.is_in_flight());
}

#[tokio::test]
async fn submit_malformed_success_body_end_to_end() {
    let (base_url, _) = spawn_mock(StatusCode::OK, "not json at all").await;
    let orch = http_orchestrator(&base_url);

    let mut store = ValuationStore::new();
    store.set_location_zone(Some(LocationZone::Rural));
    orch.submit(&mut store).await;

    assert_eq!(store.error(), Some(&ValuationError::TransportFailure));
    assert!(!store.is_in_flight());
}

#[tokio::test]
async fn submit_html_error_page_end_to_end() {
    let (base_url, _) = spawn_mock(
        StatusCode::INTERNAL_SERVER_ERROR,
        "<html>Internal Server Error</html>",
    )
    .await;
    let orch = http_orchestrator(&base_url);

    let mut store = ValuationStore::new();
    store.set_location_zone(Some(LocationZone::City));
    orch.submit(&mut store).await;

    assert_eq!(store.error(), Some(&ValuationError::TransportFailure));
    assert_eq!(store.error_message().as_deref(), Some("Backend request failed"));
    assert!(!store.is_in_flight());
}

#[tokio::test]
async fn submit_without_location_sends_nothing() {
    let (base_url, received) = spawn_mock(StatusCode::OK, r#"{"prediction": 1}"#).await;
    let orch = http_orchestrator(&base_url);

    let mut store = ValuationStore::new();
    orch.submit(&mut store).await;

    assert_eq!(store.error(), Some(&ValuationError::MissingLocation));
    assert!(received.lock().unwrap().is_empty());
}

#[tokio::test]
async fn repeated_submission_returns_same_value() {
    let (base_url, received) = spawn_mock(StatusCode::OK, r#"{"prediction": 318250.5}"#).await;
    let orch = http_orchestrator(&base_url);

    let mut store = ValuationStore::new();
    store.set_location_zone(Some(LocationZone::City));

    orch.submit(&mut store).await;
    let first = store.result();
    orch.submit(&mut store).await;

    assert_eq!(first, Some(318_250.5));
    assert_eq!(store.result(), first);
    assert_eq!(received.lock().unwrap().len(), 2);
}
