//! Chef Compliance voice skill
//!
//! A webhook for a voice assistant platform. Each inbound envelope names an
//! intent; the skill answers it with a single GET (two for report detail)
//! against a Chef Compliance server and speaks a short summary of the result.

pub mod api;
pub mod compliance;
pub mod config;
pub mod error;
pub mod metrics;
pub mod skill;

pub use config::{ComplianceConfig, EnvSource, ServerConfig};
pub use error::{ComplianceError, Result, SkillError};
pub use skill::Skill;
