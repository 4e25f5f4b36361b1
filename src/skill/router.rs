//! Envelope routing
//!
//! One call to [`Skill::handle`] is one invocation: the request type picks the
//! launch, intent or session-ended path, and intent names pick a handler.

use super::envelope::{
    IntentRequest, LaunchRequest, RequestEnvelope, ResponseEnvelope, Session,
    SessionEndedRequest, SkillRequest, SpeechletResponse,
};
use super::handlers;
use super::intents::SkillIntent;
use crate::compliance::ComplianceClient;
use crate::config::{ComplianceConfig, EnvSource};
use crate::error::{Result, SkillError};
use crate::metrics::METRICS;
use reqwest::Client;
use tracing::{error, info, warn};

/// The compliance skill
pub struct Skill {
    http: Client,
    application_id: Option<String>,
    env: EnvSource,
}

impl Skill {
    /// Create a skill.
    ///
    /// `application_id`, when set, must match the id carried by every envelope.
    pub fn new(http: Client, application_id: Option<String>, env: EnvSource) -> Self {
        Self {
            http,
            application_id,
            env,
        }
    }

    /// Route one envelope.
    ///
    /// Returns `Ok(None)` for a session-ended request, which has nothing to
    /// render. An unknown intent name is an error, not a spoken response.
    pub async fn handle(&self, envelope: RequestEnvelope) -> Result<Option<ResponseEnvelope>> {
        let session = &envelope.session;
        info!(
            "event.session.application.applicationId={}",
            session.application.application_id
        );
        self.verify_application(&session.application.application_id)?;

        METRICS.record_request(envelope.request.kind());

        if session.new {
            on_session_started(envelope.request.request_id(), session);
        }

        match &envelope.request {
            SkillRequest::LaunchRequest(request) => {
                Ok(Some(ResponseEnvelope::new(on_launch(request, session))))
            }
            SkillRequest::IntentRequest(request) => {
                let speechlet = self.on_intent(request, session).await?;
                Ok(Some(ResponseEnvelope::new(speechlet)))
            }
            SkillRequest::SessionEndedRequest(request) => {
                on_session_ended(request, session);
                Ok(None)
            }
        }
    }

    fn verify_application(&self, application_id: &str) -> Result<()> {
        match &self.application_id {
            Some(expected) if expected != application_id => {
                warn!("Rejecting envelope for application {}", application_id);
                Err(SkillError::InvalidApplicationId(application_id.to_string()))
            }
            _ => Ok(()),
        }
    }

    async fn on_intent(
        &self,
        request: &IntentRequest,
        session: &Session,
    ) -> Result<SpeechletResponse> {
        info!(
            "on_intent requestId={}, sessionId={}",
            request.request_id, session.session_id
        );

        let config = ComplianceConfig::from_source(&self.env);
        let name = request.intent.name.as_str();

        let intent = name.parse::<SkillIntent>().map_err(|e| {
            error!("Unsupported intent {}", name);
            METRICS.record_intent("unknown", "invalid");
            e
        })?;

        let result = match handlers::builtin_response(intent) {
            Some(response) => Ok(response),
            None => match config.validate() {
                Ok(valid) => {
                    let client = ComplianceClient::new(self.http.clone(), &valid);
                    handlers::handle_intent(intent, name, &client, &valid.user).await
                }
                Err(missing) => {
                    warn!("Missing compliance configuration: {}", missing.join(", "));
                    Ok(handlers::missing_configuration(&missing))
                }
            },
        };

        match &result {
            Ok(_) => METRICS.record_intent(intent.as_str(), "ok"),
            Err(e) => {
                error!("Intent {} failed: {}", name, e);
                METRICS.record_intent(intent.as_str(), "error");
            }
        }

        result
    }
}

fn on_session_started(request_id: &str, session: &Session) {
    info!(
        "on_session_started requestId={}, sessionId={}",
        request_id, session.session_id
    );
}

fn on_launch(request: &LaunchRequest, session: &Session) -> SpeechletResponse {
    info!(
        "on_launch requestId={}, sessionId={}",
        request.request_id, session.session_id
    );
    handlers::welcome()
}

fn on_session_ended(request: &SessionEndedRequest, session: &Session) {
    info!(
        "on_session_ended requestId={}, sessionId={}, reason={}",
        request.request_id,
        session.session_id,
        request.reason.as_deref().unwrap_or("none")
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{API_URL_VAR, AUTH_TOKEN_VAR, USER_VAR};
    use serde_json::{json, Value};

    fn envelope(request: Value) -> RequestEnvelope {
        serde_json::from_value(json!({
            "session": {
                "new": true,
                "sessionId": "SessionId.1",
                "application": { "applicationId": "amzn1.ask.skill.test" },
                "attributes": {}
            },
            "request": request
        }))
        .unwrap()
    }

    fn intent(name: &str) -> RequestEnvelope {
        envelope(json!({
            "type": "IntentRequest",
            "requestId": "EdwRequestId.1",
            "intent": { "name": name }
        }))
    }

    fn unconfigured() -> Skill {
        Skill::new(Client::new(), None, EnvSource::fixed(Vec::<(String, String)>::new()))
    }

    #[tokio::test]
    async fn test_launch_returns_welcome() {
        let response = unconfigured()
            .handle(envelope(json!({"type": "LaunchRequest", "requestId": "r1"})))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(response.version, "1.0");
        assert!(response.session_attributes.is_empty());
        assert_eq!(response.response.card.title, "SessionSpeechlet - Welcome");
        assert!(!response.response.should_end_session);
    }

    #[tokio::test]
    async fn test_session_ended_has_no_response() {
        let response = unconfigured()
            .handle(envelope(json!({
                "type": "SessionEndedRequest",
                "requestId": "r2",
                "reason": "USER_INITIATED"
            })))
            .await
            .unwrap();

        assert!(response.is_none());
    }

    #[tokio::test]
    async fn test_builtin_intents_work_without_configuration() {
        let skill = unconfigured();

        let help = skill.handle(intent("AMAZON.HelpIntent")).await.unwrap().unwrap();
        assert_eq!(help.response.card.title, "SessionSpeechlet - Welcome");

        for name in ["AMAZON.CancelIntent", "AMAZON.StopIntent"] {
            let stop = skill.handle(intent(name)).await.unwrap().unwrap();
            assert!(stop.response.should_end_session, "intent {}", name);
        }
    }

    #[tokio::test]
    async fn test_unknown_intent_is_an_error() {
        let result = unconfigured().handle(intent("OrderPizza")).await;
        assert!(matches!(result, Err(SkillError::InvalidIntent(_))));
    }

    #[tokio::test]
    async fn test_missing_configuration_is_spoken() {
        let skill = Skill::new(
            Client::new(),
            None,
            EnvSource::fixed([(USER_VAR, "admin")]),
        );

        let response = skill.handle(intent("CountUsers")).await.unwrap().unwrap();
        let speech = response.response.speech();

        assert!(speech.contains("API_URL"));
        assert!(speech.contains("AUTH_TOKEN"));
        assert!(!speech.contains("USER,"));
        assert!(!response.response.should_end_session);
    }

    #[tokio::test]
    async fn test_application_id_mismatch_is_rejected() {
        let skill = Skill::new(
            Client::new(),
            Some("amzn1.ask.skill.other".to_string()),
            EnvSource::fixed([
                (USER_VAR, "admin"),
                (API_URL_VAR, "http://127.0.0.1:1"),
                (AUTH_TOKEN_VAR, "t"),
            ]),
        );

        let result = skill
            .handle(envelope(json!({"type": "LaunchRequest", "requestId": "r3"})))
            .await;
        assert!(matches!(result, Err(SkillError::InvalidApplicationId(_))));
    }

    #[tokio::test]
    async fn test_count_users_against_server() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/users")
            .match_header("authorization", "Bearer t")
            .with_status(200)
            .with_body(r#"[{"id": "admin"}, {"id": "ops"}]"#)
            .create_async()
            .await;

        let skill = Skill::new(
            Client::new(),
            Some("amzn1.ask.skill.test".to_string()),
            EnvSource::fixed([
                (USER_VAR, "admin".to_string()),
                (API_URL_VAR, server.url()),
                (AUTH_TOKEN_VAR, "t".to_string()),
            ]),
        );

        let response = skill.handle(intent("CountUsers")).await.unwrap().unwrap();
        assert_eq!(response.response.speech(), "There are 2 users.");
        assert_eq!(response.response.card.title, "SessionSpeechlet - CountUsers");
    }
}
