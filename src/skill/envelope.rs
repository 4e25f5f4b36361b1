//! Request and response envelopes exchanged with the voice platform

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Envelope format version sent back to the platform
pub const RESPONSE_VERSION: &str = "1.0";

/// Prefix applied to every card title and body
pub const CARD_PREFIX: &str = "SessionSpeechlet - ";

/// Inbound envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestEnvelope {
    #[serde(default)]
    pub version: Option<String>,
    pub session: Session,
    pub request: SkillRequest,
}

/// Conversation session
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// True on the first request of a conversation
    pub new: bool,
    pub session_id: String,
    pub application: Application,
    #[serde(default)]
    pub attributes: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Application {
    pub application_id: String,
}

/// The request carried by an envelope, keyed by its `type`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SkillRequest {
    LaunchRequest(LaunchRequest),
    IntentRequest(IntentRequest),
    SessionEndedRequest(SessionEndedRequest),
}

impl SkillRequest {
    pub fn request_id(&self) -> &str {
        match self {
            Self::LaunchRequest(r) => &r.request_id,
            Self::IntentRequest(r) => &r.request_id,
            Self::SessionEndedRequest(r) => &r.request_id,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::LaunchRequest(_) => "LaunchRequest",
            Self::IntentRequest(_) => "IntentRequest",
            Self::SessionEndedRequest(_) => "SessionEndedRequest",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaunchRequest {
    pub request_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntentRequest {
    pub request_id: String,
    pub intent: Intent,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Intent {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slots: Option<Value>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionEndedRequest {
    pub request_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outbound envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub version: String,
    /// Always empty; this skill keeps no conversation state
    pub session_attributes: Map<String, Value>,
    pub response: SpeechletResponse,
}

impl ResponseEnvelope {
    pub fn new(response: SpeechletResponse) -> Self {
        Self {
            version: RESPONSE_VERSION.to_string(),
            session_attributes: Map::new(),
            response,
        }
    }
}

/// Speech, card and reprompt for one turn
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeechletResponse {
    pub output_speech: OutputSpeech,
    pub card: Card,
    pub reprompt: Reprompt,
    pub should_end_session: bool,
}

impl SpeechletResponse {
    /// Start a response whose card body defaults to the spoken text
    pub fn new(title: impl AsRef<str>, speech: impl Into<String>) -> Self {
        let speech = speech.into();
        Self {
            card: Card::simple(title.as_ref(), &speech),
            output_speech: OutputSpeech::plain(Some(speech)),
            reprompt: Reprompt {
                output_speech: OutputSpeech::plain(None),
            },
            should_end_session: false,
        }
    }

    pub fn with_reprompt(mut self, text: impl Into<String>) -> Self {
        self.reprompt.output_speech.text = Some(text.into());
        self
    }

    /// Replace the card body, keeping the title
    pub fn with_card_content(mut self, body: impl AsRef<str>) -> Self {
        self.card.content = format!("{}\n{}", CARD_PREFIX, body.as_ref());
        self
    }

    pub fn end_session(mut self) -> Self {
        self.should_end_session = true;
        self
    }

    /// The spoken text
    pub fn speech(&self) -> &str {
        self.output_speech.text.as_deref().unwrap_or_default()
    }

    pub fn reprompt_text(&self) -> Option<&str> {
        self.reprompt.output_speech.text.as_deref()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputSpeech {
    #[serde(rename = "type")]
    pub speech_type: String,
    pub text: Option<String>,
}

impl OutputSpeech {
    fn plain(text: Option<String>) -> Self {
        Self {
            speech_type: "PlainText".to_string(),
            text,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    #[serde(rename = "type")]
    pub card_type: String,
    pub title: String,
    pub content: String,
}

impl Card {
    fn simple(title: &str, body: &str) -> Self {
        Self {
            card_type: "Simple".to_string(),
            title: format!("{}{}", CARD_PREFIX, title),
            content: format!("{}\n{}", CARD_PREFIX, body),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reprompt {
    pub output_speech: OutputSpeech,
}
