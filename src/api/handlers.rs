//! Webhook endpoint handlers

use crate::error::{ComplianceError, SkillError};
use crate::metrics::METRICS;
use crate::skill::{RequestEnvelope, Skill};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tracing::{error, warn};

/// Application state shared by the webhook handlers
#[derive(Clone)]
pub struct AppState {
    pub skill: Arc<Skill>,
}

/// Error body returned when an invocation produces no speech
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }
}

fn status_for(err: &SkillError) -> StatusCode {
    match err {
        SkillError::InvalidIntent(_) | SkillError::InvalidEnvelope(_) => StatusCode::BAD_REQUEST,
        SkillError::InvalidApplicationId(_) => StatusCode::FORBIDDEN,
        SkillError::Compliance(ComplianceError::Timeout(_)) => StatusCode::GATEWAY_TIMEOUT,
        SkillError::Compliance(_) => StatusCode::BAD_GATEWAY,
        SkillError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for SkillError {
    fn into_response(self) -> Response {
        let status = status_for(&self);
        (status, Json(ApiError::new(self.code(), self.to_string()))).into_response()
    }
}

/// Handle one skill invocation
///
/// POST /alexa
pub async fn handle_envelope(
    State(state): State<AppState>,
    body: std::result::Result<Json<Value>, JsonRejection>,
) -> Result<Response, SkillError> {
    let Json(body) = body.map_err(|e| {
        warn!("Rejecting unreadable envelope: {}", e.body_text());
        SkillError::InvalidEnvelope(e.body_text())
    })?;

    let envelope: RequestEnvelope = serde_json::from_value(body).map_err(|e| {
        warn!("Rejecting malformed envelope: {}", e);
        SkillError::InvalidEnvelope(e.to_string())
    })?;

    match state.skill.handle(envelope).await {
        Ok(Some(response)) => Ok((StatusCode::OK, Json(response)).into_response()),
        Ok(None) => Ok(StatusCode::NO_CONTENT.into_response()),
        Err(e) => {
            error!("Invocation failed: {}", e);
            Err(e)
        }
    }
}

/// Liveness probe
///
/// GET /health
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Prometheus exposition
///
/// GET /metrics
pub async fn metrics() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        METRICS.export_prometheus(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            status_for(&SkillError::InvalidIntent("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&SkillError::InvalidApplicationId("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            status_for(&SkillError::Compliance(ComplianceError::Timeout("t".into()))),
            StatusCode::GATEWAY_TIMEOUT
        );
        assert_eq!(
            status_for(&SkillError::Compliance(ComplianceError::InvalidResponse("j".into()))),
            StatusCode::BAD_GATEWAY
        );
    }
}
