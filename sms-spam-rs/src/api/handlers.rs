//! API request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, warn};

use crate::pipeline::{PredictRequest, ServiceContext};

/// Shared application state
pub struct AppState {
    pub context: Arc<ServiceContext>,
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    pub fn new(msg: &str) -> Self {
        Self {
            error: msg.to_string(),
        }
    }
}

/// POST /predict - Classify a message and render its feature chart
pub async fn predict(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PredictRequest>, JsonRejection>,
) -> impl IntoResponse {
    let Json(request) = match payload {
        Ok(payload) => payload,
        Err(rejection) => {
            warn!("Rejected predict request: {}", rejection.body_text());
            return (rejection.status(), Json(ApiError::new(&rejection.body_text())))
                .into_response();
        }
    };

    // Tokenization and the encoder forward pass are CPU-bound
    let context = state.context.clone();
    let result = tokio::task::spawn_blocking(move || context.predict(request)).await;

    match result {
        Ok(Ok(response)) => (StatusCode::OK, Json(response)).into_response(),
        Ok(Err(e)) => {
            error!("Prediction failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new(&e.to_string())),
            )
                .into_response()
        }
        Err(e) => {
            error!("Prediction task panicked: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError::new("Prediction task failed")),
            )
                .into_response()
        }
    }
}
