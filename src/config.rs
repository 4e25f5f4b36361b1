//! Configuration for the compliance skill
//!
//! Server settings are loaded once at start-up. Compliance settings are
//! rebuilt from the environment at every intent dispatch, so a change to
//! `USER`, `API_URL` or `AUTH_TOKEN` is picked up by the next utterance.

use crate::error::{Result, SkillError};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Environment variable holding the target owner id
pub const USER_VAR: &str = "USER";
/// Environment variable holding the compliance server base URL
pub const API_URL_VAR: &str = "API_URL";
/// Environment variable holding the bearer token
pub const AUTH_TOKEN_VAR: &str = "AUTH_TOKEN";

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Socket address to listen on
    #[serde(default = "default_bind_addr")]
    pub bind_addr: String,

    /// Expected skill application id; envelopes for any other id are rejected
    #[serde(default)]
    pub application_id: Option<String>,

    /// Skip TLS certificate verification on calls to the compliance server
    #[serde(default)]
    pub accept_invalid_certs: bool,

    /// Outbound request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum accepted envelope size
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,
}

fn default_bind_addr() -> String { "0.0.0.0:8080".to_string() }
fn default_timeout_ms() -> u64 { 10_000 }
fn default_max_body_bytes() -> usize { 256 * 1024 }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            application_id: None,
            accept_invalid_certs: false,
            timeout_ms: default_timeout_ms(),
            max_body_bytes: default_max_body_bytes(),
            log_json: false,
        }
    }
}

impl ServerConfig {
    /// Load from an optional TOML file overlaid with `SKILL__*` variables
    pub fn load(path: &str) -> Result<Self> {
        let settings = ::config::Config::builder()
            .add_source(::config::File::with_name(path).required(false))
            .add_source(
                ::config::Environment::with_prefix("SKILL")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| SkillError::Configuration(e.to_string()))?;

        settings
            .try_deserialize()
            .map_err(|e| SkillError::Configuration(e.to_string()))
    }

    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// Where compliance settings are read from
#[derive(Debug, Clone, Default)]
pub enum EnvSource {
    /// The process environment
    #[default]
    Process,
    /// A fixed set of values
    Fixed(HashMap<String, String>),
}

impl EnvSource {
    pub fn fixed<I, K, V>(vars: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::Fixed(vars.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        match self {
            Self::Process => std::env::var(key).ok(),
            Self::Fixed(vars) => vars.get(key).cloned(),
        }
    }
}

/// Per-invocation settings for reaching the compliance server
#[derive(Debug)]
pub struct ComplianceConfig {
    pub user: Option<String>,
    pub api_url: Option<String>,
    pub auth_token: Option<SecretString>,
}

impl ComplianceConfig {
    /// Read `USER`, `API_URL` and `AUTH_TOKEN` from the given source
    pub fn from_source(source: &EnvSource) -> Self {
        let non_blank = |key: &str| {
            source
                .get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        Self {
            user: non_blank(USER_VAR),
            api_url: non_blank(API_URL_VAR).map(|url| url.trim_end_matches('/').to_string()),
            auth_token: non_blank(AUTH_TOKEN_VAR).map(SecretString::new),
        }
    }

    /// Names of required variables that are missing or blank
    pub fn missing(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.user.is_none() {
            missing.push(USER_VAR);
        }
        if self.api_url.is_none() {
            missing.push(API_URL_VAR);
        }
        if self.auth_token.is_none() {
            missing.push(AUTH_TOKEN_VAR);
        }
        missing
    }

    /// Resolve into settings that are known to be complete
    pub fn validate(&self) -> std::result::Result<ValidComplianceConfig, Vec<&'static str>> {
        match (&self.user, &self.api_url, &self.auth_token) {
            (Some(user), Some(api_url), Some(token)) => Ok(ValidComplianceConfig {
                user: user.clone(),
                api_url: api_url.clone(),
                auth_token: SecretString::new(token.expose_secret().clone()),
            }),
            _ => Err(self.missing()),
        }
    }
}

/// Compliance settings with every required value present
#[derive(Debug)]
pub struct ValidComplianceConfig {
    pub user: String,
    pub api_url: String,
    pub auth_token: SecretString,
}
