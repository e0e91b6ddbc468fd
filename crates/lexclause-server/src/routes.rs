use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use lexclause_ai::ClassifyOptions;
use lexclause_core::ClassificationOutcome;
use lexclause_extract::ExtractError;
use serde::{Deserialize, Serialize};
use tokio::task::JoinError;
use tracing::{debug, error, info, warn};

use crate::AppState;

/// Body of `POST /classify`. One of `text` or `pdf_base64` is required; a PDF
/// wins when both are present.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClassifyRequest {
    pub text: Option<String>,
    pub pdf_base64: Option<String>,
    pub model: Option<String>,
    pub clause_types: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub supported_models: Vec<String>,
    pub default_clause_types: Vec<String>,
    pub pdf_support: bool,
}

type Reply = (StatusCode, Json<ClassificationOutcome>);

fn reject(status: StatusCode, message: impl Into<String>) -> Reply {
    let message = message.into();
    warn!(status = status.as_u16(), %message, "classify request rejected");
    (status, Json(ClassificationOutcome::failure(message)))
}

fn non_empty(field: Option<String>) -> Option<String> {
    field.filter(|s| !s.is_empty())
}

pub(crate) async fn classify(
    State(state): State<AppState>,
    payload: Result<Json<ClassifyRequest>, JsonRejection>,
) -> Reply {
    let request = match payload {
        Ok(Json(request)) => request,
        Err(rejection) => {
            return reject(
                StatusCode::BAD_REQUEST,
                format!("Invalid request: {}", rejection.body_text()),
            );
        }
    };

    let text = match (non_empty(request.pdf_base64), non_empty(request.text)) {
        (Some(encoded), _) => match extract_pdf(&state, &encoded).await {
            Ok(text) => text,
            Err(reply) => return reply,
        },
        (None, Some(text)) => text,
        (None, None) => {
            return reject(
                StatusCode::BAD_REQUEST,
                "Missing 'text' or 'pdf_base64' field in request",
            );
        }
    };

    let config = state.classifier.config();
    let model = request
        .model
        .unwrap_or_else(|| config.default_model.clone());
    if !state.classifier.is_supported_model(&model) {
        return reject(
            StatusCode::BAD_REQUEST,
            format!(
                "Invalid model. Choose from: {}",
                config.supported_models.join(", ")
            ),
        );
    }

    let options = ClassifyOptions {
        model: Some(model),
        clause_types: request.clause_types,
        temperature: None,
    };
    match state.classifier.classify(&text, &options).await {
        Ok(outcome) => {
            info!(records = outcome.results.len(), "classify request served");
            (StatusCode::OK, Json(outcome))
        }
        Err(e) if e.is_input_error() => reject(StatusCode::BAD_REQUEST, e.to_string()),
        Err(e) => {
            error!(error = %e, "classification failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ClassificationOutcome::failure(e.to_string())),
            )
        }
    }
}

async fn extract_pdf(state: &AppState, encoded: &str) -> Result<String, Reply> {
    if !state.extractor.is_available() {
        return Err(reject(
            StatusCode::BAD_REQUEST,
            ExtractError::Unsupported.to_string(),
        ));
    }

    let bytes = STANDARD
        .decode(encoded.trim())
        .map_err(|e| reject(StatusCode::BAD_REQUEST, format!("PDF processing error: {e}")))?;
    debug!(bytes = bytes.len(), "decoded PDF payload");

    let extractor = state.extractor.clone();
    let extracted = tokio::task::spawn_blocking(move || extractor.extract_bytes(&bytes))
        .await
        .map_err(extraction_aborted)?;

    extracted.map_err(|e| reject(StatusCode::BAD_REQUEST, format!("PDF processing error: {e}")))
}

/// The extraction task panicked or was cancelled.
fn extraction_aborted(e: JoinError) -> Reply {
    error!(error = %e, "PDF extraction task aborted");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ClassificationOutcome::failure(format!(
            "PDF processing error: {e}"
        ))),
    )
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let config = state.classifier.config();
    Json(HealthResponse {
        status: "ok".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        supported_models: config.supported_models.clone(),
        default_clause_types: config.clause_types.clone(),
        pdf_support: state.extractor.is_available(),
    })
}
