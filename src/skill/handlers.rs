//! Intent handlers and the sentences they speak
//!
//! Each `render_*` function is a pure mapping from compliance server JSON to a
//! [`SpeechletResponse`]; the async handlers fetch that JSON first.

use super::envelope::SpeechletResponse;
use super::intents::SkillIntent;
use crate::compliance::{ComplianceApi, OwnerSummary, ScanDetail, ScanReport, ServerVersion};
use crate::error::{ComplianceError, Result, SkillError};
use serde_json::Value;
use tracing::{debug, warn};

/// Reprompt after a successful answer
pub const REPROMPT_CONTINUE: &str = "How else may I help you? Or tell me to exit.";

const REPROMPT_SHORT: &str = "How else may I help you?";

/// Greeting for launch and help
pub fn welcome() -> SpeechletResponse {
    SpeechletResponse::new(
        "Welcome",
        "Welcome to the Chef Compliance sample. \
         How may I assist you with your compliance validation?",
    )
    .with_reprompt(
        "Please tell me how I can help with your compliance testing. \
         You can ask 'what version am I running?' or 'How many users do I have?'",
    )
}

/// Farewell; ends the session
pub fn session_end() -> SpeechletResponse {
    SpeechletResponse::new(
        "Session Ended",
        "Thank you for using the Chef Compliance Alexa Skill. Have a nice day! ",
    )
    .end_session()
}

/// Spoken apology for a non-200 answer from the compliance server
pub fn api_failure(status: u16) -> SpeechletResponse {
    SpeechletResponse::new(
        "RESTful API Failure",
        format!(
            "I'm having trouble contacting your Chef Compliance server. Error {}.",
            status
        ),
    )
    .with_reprompt("Please verify your API_URL and AUTH_TOKEN.")
    .with_card_content(format!("Compliance server returned status code {}", status))
}

/// Spoken notice that required settings are absent
pub fn missing_configuration(missing: &[&str]) -> SpeechletResponse {
    SpeechletResponse::new(
        "Configuration Error",
        format!(
            "Your compliance skill is missing configuration for {}. \
             Please set them and try again.",
            missing.join(", ")
        ),
    )
    .with_reprompt(REPROMPT_SHORT)
}

/// Answer for intents that never reach the compliance server
pub fn builtin_response(intent: SkillIntent) -> Option<SpeechletResponse> {
    if intent.needs_server() {
        return None;
    }
    match intent {
        SkillIntent::Stop => Some(session_end()),
        _ => Some(welcome()),
    }
}

fn no_reports(title: &str) -> SpeechletResponse {
    SpeechletResponse::new(title, "You don't have any scan reports yet.")
        .with_reprompt(REPROMPT_CONTINUE)
}

fn plural(count: u64, word: &str) -> String {
    if count == 1 {
        format!("{} {}", count, word)
    } else {
        format!("{} {}s", count, word)
    }
}

fn pretty(value: &Value) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

fn as_list<'a>(value: &'a Value, what: &str) -> Result<&'a Vec<Value>> {
    value.as_array().ok_or_else(|| {
        ComplianceError::InvalidResponse(format!("expected a list of {}", what)).into()
    })
}

/// `GET /users`
pub fn render_user_count(title: &str, users: &Value) -> Result<SpeechletResponse> {
    let count = as_list(users, "users")?.len();

    let response = match count {
        0 => SpeechletResponse::new(title, "There are no users configured")
            .with_reprompt(REPROMPT_SHORT),
        1 => SpeechletResponse::new(title, "There is 1 user.").with_reprompt(REPROMPT_CONTINUE),
        n => SpeechletResponse::new(title, format!("There are {} users.", n))
            .with_reprompt(REPROMPT_CONTINUE),
    };

    Ok(response.with_card_content(pretty(users)?))
}

/// `GET /version`
pub fn render_version(title: &str, value: &Value) -> Result<SpeechletResponse> {
    let version: ServerVersion = serde_json::from_value(value.clone())?;
    let spoken = version.version.replace('.', " dot ");

    Ok(SpeechletResponse::new(
        title,
        format!("The compliance server is running version {}.", spoken),
    )
    .with_reprompt(REPROMPT_CONTINUE)
    .with_card_content(pretty(value)?))
}

/// `GET /owners/{user}/summary`
pub fn render_owner_summary(title: &str, value: &Value) -> Result<SpeechletResponse> {
    let summary: OwnerSummary = serde_json::from_value(value.clone())?;

    Ok(SpeechletResponse::new(
        title,
        format!(
            "You have {} nodes and {} environments.",
            summary.node_count, summary.env_count
        ),
    )
    .with_reprompt(REPROMPT_CONTINUE)
    .with_card_content(pretty(value)?))
}

/// `GET /owners/{user}/sscans`; the last entry is the latest report
pub fn render_scans(title: &str, value: &Value) -> Result<SpeechletResponse> {
    let reports = as_list(value, "scan reports")?;
    let Some(latest) = reports.last() else {
        return Ok(no_reports(title));
    };
    let report: ScanReport = serde_json::from_value(latest.clone())?;

    let speech = format!(
        "You have {}. The latest report scanned {} on {}. {} failed. Status is {}",
        plural(reports.len() as u64, "report"),
        plural(report.compliance_profiles, "profile"),
        plural(report.node_count, "device"),
        report.failed_count,
        report.compliance_status,
    );

    Ok(SpeechletResponse::new(title, speech)
        .with_reprompt(REPROMPT_CONTINUE)
        .with_card_content(pretty(latest)?))
}

/// `GET /owners/{user}/scans/{id}`
///
/// Always speaks the total and success counts, then one clause per nonzero
/// category in the order minor, major, critical, skipped.
pub fn render_report_detail(title: &str, value: &Value) -> Result<SpeechletResponse> {
    let detail: ScanDetail = serde_json::from_value(value.clone())?;
    let summary = &detail.compliance_summary;

    let mut speech = format!(
        "Checked {} items. {} succeded.",
        summary.total, summary.success
    );
    for (category, count) in summary.nonzero_categories() {
        speech.push_str(&format!(" {} {} items.", count, category));
    }

    Ok(SpeechletResponse::new(title, speech)
        .with_reprompt(REPROMPT_CONTINUE)
        .with_card_content(pretty(&value["complianceSummary"])?))
}

/// Id of the most recent scan, if any
fn latest_scan_id(scans: &Value) -> Result<Option<String>> {
    let Some(latest) = as_list(scans, "scans")?.last() else {
        return Ok(None);
    };
    latest["id"]
        .as_str()
        .map(|id| Some(id.to_string()))
        .ok_or_else(|| ComplianceError::InvalidResponse("scan entry has no id".to_string()).into())
}

async fn report_detail(api: &dyn ComplianceApi, title: &str, user: &str) -> Result<SpeechletResponse> {
    let scans = api.get_json(&format!("/owners/{}/scans", user)).await?;
    let Some(scan_id) = latest_scan_id(&scans)? else {
        return Ok(no_reports(title));
    };

    debug!("Fetching detail for scan {}", scan_id);
    let detail = api
        .get_json(&format!("/owners/{}/scans/{}", user, scan_id))
        .await?;
    render_report_detail(title, &detail)
}

async fn answer(
    intent: SkillIntent,
    title: &str,
    api: &dyn ComplianceApi,
    user: &str,
) -> Result<SpeechletResponse> {
    match intent {
        SkillIntent::CountUsers => {
            let users = api.get_json("/users").await?;
            render_user_count(title, &users)
        }
        SkillIntent::CheckVersion => {
            let version = api.get_json("/version").await?;
            render_version(title, &version)
        }
        SkillIntent::OwnerSummary => {
            let summary = api.get_json(&format!("/owners/{}/summary", user)).await?;
            render_owner_summary(title, &summary)
        }
        SkillIntent::OwnerScans => {
            let scans = api.get_json(&format!("/owners/{}/sscans", user)).await?;
            render_scans(title, &scans)
        }
        SkillIntent::ReportDetail => report_detail(api, title, user).await,
        SkillIntent::Help => Ok(welcome()),
        SkillIntent::Stop => Ok(session_end()),
    }
}

/// Answer an intent.
///
/// `title` is the intent name as received and becomes the card title. A non-200
/// answer from the compliance server is turned into [`api_failure`]; any other
/// error is returned to the caller.
pub async fn handle_intent(
    intent: SkillIntent,
    title: &str,
    api: &dyn ComplianceApi,
    user: &str,
) -> Result<SpeechletResponse> {
    match answer(intent, title, api, user).await {
        Err(SkillError::Compliance(ComplianceError::UpstreamStatus(status))) => {
            warn!("Intent {} failed upstream with status {}", title, status);
            Ok(api_failure(status))
        }
        other => other,
    }
}
