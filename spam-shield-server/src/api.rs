//! Classification API endpoints

use axum::{extract::State, http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use spam_shield::{ModelSummary, PredictionResult, SpamClassifier, SpamError};
use std::sync::Arc;
use tracing::{error, warn};

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub classifier: Arc<SpamClassifier>,
}

/// API response wrapper
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(msg: &str) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(msg.to_string()),
        }
    }
}

type ApiResult<T> = Result<Json<ApiResponse<T>>, (StatusCode, Json<ApiResponse<T>>)>;

/// Text submitted for classification or normalization
#[derive(Debug, Deserialize, Serialize)]
pub struct TextRequest {
    pub text: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct NormalizeResponse {
    pub normalized: String,
    pub tokens: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub model_loaded: bool,
}

/// HTTP status for a classifier error
pub fn error_status(err: &SpamError) -> StatusCode {
    match err {
        SpamError::EmptyInput => StatusCode::BAD_REQUEST,
        SpamError::ArtifactNotFound { .. } | SpamError::InvalidArtifact { .. } => {
            StatusCode::SERVICE_UNAVAILABLE
        }
        SpamError::Config(_) | SpamError::Io(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

fn failure<T>(err: SpamError) -> (StatusCode, Json<ApiResponse<T>>) {
    let status = error_status(&err);
    if err.is_user_error() {
        warn!("Rejected request: {}", err);
    } else {
        error!("Request failed: {}", err);
    }
    (status, Json(ApiResponse::error(&err.to_string())))
}

// === API Handlers ===

/// GET /health
pub async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        model_loaded: state.classifier.is_model_loaded(),
    })
}

/// POST /api/classify
pub async fn classify(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> ApiResult<PredictionResult> {
    let classifier = Arc::clone(&state.classifier);

    // The first call may read the artifacts from disk
    let result = tokio::task::spawn_blocking(move || classifier.classify(&req.text))
        .await
        .map_err(|e| {
            error!("Classification task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Classification task failed")),
            )
        })?;

    match result {
        Ok(prediction) => Ok(Json(ApiResponse::success(prediction))),
        Err(e) => Err(failure(e)),
    }
}

/// POST /api/normalize
pub async fn normalize(
    State(state): State<AppState>,
    Json(req): Json<TextRequest>,
) -> ApiResult<NormalizeResponse> {
    let classifier = Arc::clone(&state.classifier);

    let tokens = tokio::task::spawn_blocking(move || classifier.normalizer().tokens(&req.text))
        .await
        .map_err(|e| {
            error!("Normalization task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Normalization task failed")),
            )
        })?;

    Ok(Json(ApiResponse::success(NormalizeResponse {
        normalized: tokens.join(" "),
        tokens,
    })))
}

/// GET /api/model
pub async fn model_info(State(state): State<AppState>) -> ApiResult<ModelSummary> {
    let classifier = Arc::clone(&state.classifier);

    let model = tokio::task::spawn_blocking(move || classifier.model())
        .await
        .map_err(|e| {
            error!("Model load task failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error("Model load task failed")),
            )
        })?;

    match model {
        Ok(model) => Ok(Json(ApiResponse::success(model.summary()))),
        Err(e) => Err(failure(e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_error_status_mapping() {
        assert_eq!(error_status(&SpamError::EmptyInput), StatusCode::BAD_REQUEST);
        assert_eq!(
            error_status(&SpamError::ArtifactNotFound {
                path: PathBuf::from("Model/spam_vectorizer.json")
            }),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            error_status(&SpamError::Io("disk".to_string())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_api_response_shape() {
        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], 1);
        assert!(ok["error"].is_null());

        let err = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "boom");
    }
}
