//! Voice skill: envelope types, intent routing and spoken answers

pub mod envelope;
pub mod handlers;
pub mod intents;
pub mod router;

pub use envelope::{RequestEnvelope, ResponseEnvelope, SkillRequest, SpeechletResponse};
pub use intents::SkillIntent;
pub use router::Skill;
