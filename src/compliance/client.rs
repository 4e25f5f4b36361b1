//! HTTP client for the Chef Compliance REST API

use crate::config::{ServerConfig, ValidComplianceConfig};
use crate::error::ComplianceError;
use crate::metrics::METRICS;
use async_trait::async_trait;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use reqwest::{Client, StatusCode};
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use std::time::Instant;
use tracing::{debug, warn};

/// Read access to the compliance server
#[async_trait]
pub trait ComplianceApi: Send + Sync {
    /// GET `path` relative to the server base URL and return the JSON body.
    ///
    /// Any status other than 200 is reported as
    /// [`ComplianceError::UpstreamStatus`].
    async fn get_json(&self, path: &str) -> Result<Value, ComplianceError>;
}

/// Build the shared HTTP client used for every invocation
pub fn build_http_client(config: &ServerConfig) -> Result<Client, ComplianceError> {
    if config.accept_invalid_certs {
        warn!("TLS certificate verification is disabled for compliance server calls");
    }

    Client::builder()
        .timeout(config.timeout())
        .danger_accept_invalid_certs(config.accept_invalid_certs)
        .build()
        .map_err(|e| ComplianceError::RequestFailed(e.to_string()))
}

/// Compliance server client scoped to a single invocation
pub struct ComplianceClient {
    http: Client,
    base_url: String,
    token: SecretString,
}

impl ComplianceClient {
    pub fn new(http: Client, config: &ValidComplianceConfig) -> Self {
        Self {
            http,
            base_url: config.api_url.clone(),
            token: SecretString::new(config.auth_token.expose_secret().clone()),
        }
    }
}

#[async_trait]
impl ComplianceApi for ComplianceClient {
    async fn get_json(&self, path: &str) -> Result<Value, ComplianceError> {
        let url = format!("{}{}", self.base_url, path);
        let start = Instant::now();

        debug!("Calling compliance server: GET {}", url);

        let response = self
            .http
            .get(&url)
            .header(ACCEPT, "application/json")
            .header(CONTENT_TYPE, "application/json")
            .bearer_auth(self.token.expose_secret())
            .send()
            .await
            .map_err(|e| {
                METRICS.record_compliance_call("error", start.elapsed().as_secs_f64());
                ComplianceError::from(e)
            })?;

        let status = response.status();
        METRICS.record_compliance_call(status.as_str(), start.elapsed().as_secs_f64());

        if status != StatusCode::OK {
            warn!("Compliance server returned {} for GET {}", status, path);
            return Err(ComplianceError::UpstreamStatus(status.as_u16()));
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| ComplianceError::InvalidResponse(e.to_string()))
    }
}
