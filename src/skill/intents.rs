//! Intent names understood by the skill

use crate::error::SkillError;
use std::str::FromStr;

/// Handler selected for an intent name
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkillIntent {
    CountUsers,
    CheckVersion,
    OwnerSummary,
    OwnerScans,
    ReportDetail,
    Help,
    Stop,
}

impl SkillIntent {
    /// Whether answering needs the compliance server
    pub fn needs_server(&self) -> bool {
        !matches!(self, Self::Help | Self::Stop)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::CountUsers => "count_users",
            Self::CheckVersion => "check_version",
            Self::OwnerSummary => "owner_summary",
            Self::OwnerScans => "owner_scans",
            Self::ReportDetail => "report_detail",
            Self::Help => "help",
            Self::Stop => "stop",
        }
    }
}

impl FromStr for SkillIntent {
    type Err = SkillError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        match name {
            "CountUsers" => Ok(Self::CountUsers),
            "getVersion" => Ok(Self::CheckVersion),
            "ownerSummary" => Ok(Self::OwnerSummary),
            "getOwnerScans" => Ok(Self::OwnerScans),
            "reportDetail" => Ok(Self::ReportDetail),
            "AMAZON.HelpIntent" => Ok(Self::Help),
            "AMAZON.CancelIntent" | "AMAZON.StopIntent" => Ok(Self::Stop),
            other => Err(SkillError::InvalidIntent(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_intent_table() {
        let table = [
            ("CountUsers", SkillIntent::CountUsers),
            ("getVersion", SkillIntent::CheckVersion),
            ("ownerSummary", SkillIntent::OwnerSummary),
            ("getOwnerScans", SkillIntent::OwnerScans),
            ("reportDetail", SkillIntent::ReportDetail),
            ("AMAZON.HelpIntent", SkillIntent::Help),
            ("AMAZON.CancelIntent", SkillIntent::Stop),
            ("AMAZON.StopIntent", SkillIntent::Stop),
        ];

        for (name, expected) in table {
            assert_eq!(name.parse::<SkillIntent>().unwrap(), expected, "intent {}", name);
        }
    }

    #[test]
    fn test_unknown_intent() {
        let err = "OrderPizza".parse::<SkillIntent>().unwrap_err();
        assert!(matches!(err, SkillError::InvalidIntent(ref name) if name == "OrderPizza"));
    }

    #[test]
    fn test_names_are_case_sensitive() {
        assert!("countusers".parse::<SkillIntent>().is_err());
    }

    #[test]
    fn test_only_builtin_intents_skip_server() {
        assert!(!SkillIntent::Help.needs_server());
        assert!(!SkillIntent::Stop.needs_server());
        assert!(SkillIntent::ReportDetail.needs_server());
    }
}
