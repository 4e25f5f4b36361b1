//! Error types for the compliance skill

use thiserror::Error;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, SkillError>;

/// Errors raised while talking to the compliance server
#[derive(Debug, Error)]
pub enum ComplianceError {
    /// The server answered, but not with 200
    #[error("Compliance server returned status {0}")]
    UpstreamStatus(u16),

    #[error("Request failed: {0}")]
    RequestFailed(String),

    #[error("Timeout: {0}")]
    Timeout(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for ComplianceError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            ComplianceError::Timeout(e.to_string())
        } else if e.is_decode() {
            ComplianceError::InvalidResponse(e.to_string())
        } else {
            ComplianceError::RequestFailed(e.to_string())
        }
    }
}

/// Errors that abort a skill invocation without a speech response
#[derive(Debug, Error)]
pub enum SkillError {
    #[error("Invalid intent: {0}")]
    InvalidIntent(String),

    #[error("Invalid application id: {0}")]
    InvalidApplicationId(String),

    #[error("Invalid request envelope: {0}")]
    InvalidEnvelope(String),

    #[error(transparent)]
    Compliance(#[from] ComplianceError),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl SkillError {
    /// Stable machine-readable code for the HTTP error body
    pub fn code(&self) -> &'static str {
        match self {
            SkillError::InvalidIntent(_) => "INVALID_INTENT",
            SkillError::InvalidApplicationId(_) => "FORBIDDEN",
            SkillError::InvalidEnvelope(_) => "VALIDATION_ERROR",
            SkillError::Compliance(ComplianceError::Timeout(_)) => "TIMEOUT",
            SkillError::Compliance(_) => "UPSTREAM_ERROR",
            SkillError::Configuration(_) => "CONFIGURATION_ERROR",
        }
    }
}

impl From<serde_json::Error> for SkillError {
    fn from(e: serde_json::Error) -> Self {
        SkillError::Compliance(ComplianceError::InvalidResponse(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(SkillError::InvalidIntent("x".into()).code(), "INVALID_INTENT");
        assert_eq!(
            SkillError::Compliance(ComplianceError::Timeout("slow".into())).code(),
            "TIMEOUT"
        );
        assert_eq!(
            SkillError::Compliance(ComplianceError::UpstreamStatus(500)).code(),
            "UPSTREAM_ERROR"
        );
    }

    #[test]
    fn test_upstream_status_message() {
        let err = SkillError::from(ComplianceError::UpstreamStatus(503));
        assert_eq!(err.to_string(), "Compliance server returned status 503");
    }
}
