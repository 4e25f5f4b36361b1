//! Data models for the compliance server REST API

use serde::{Deserialize, Serialize};

/// `GET /version`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerVersion {
    pub version: String,
}

/// `GET /owners/{user}/summary`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnerSummary {
    pub node_count: u64,
    pub env_count: u64,
}

/// One entry of `GET /owners/{user}/scans` (and the `sscans` variant)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    /// Only the scan listing used for report detail is guaranteed to carry it
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub owner: Option<String>,
    #[serde(default)]
    pub start: Option<String>,
    #[serde(default)]
    pub end: Option<String>,
    pub node_count: u64,
    pub compliance_profiles: u64,
    #[serde(default)]
    pub patchlevel_profiles: Option<u64>,
    /// Fraction of passing nodes, sent as either an integer or a float.
    ///
    /// Spoken through `f64` formatting, so `1.0` and `1` both read as "1".
    pub compliance_status: f64,
    #[serde(default)]
    pub patchlevel_status: Option<f64>,
    #[serde(default)]
    pub unknown_status: Option<f64>,
    pub failed_count: u64,
}

/// `GET /owners/{user}/scans/{id}`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanDetail {
    pub compliance_summary: ComplianceSummary,
}

/// Per-severity counts of a single scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    #[serde(default)]
    pub success: u64,
    #[serde(default)]
    pub minor: u64,
    #[serde(default)]
    pub major: u64,
    #[serde(default)]
    pub critical: u64,
    #[serde(default)]
    pub skipped: u64,
    #[serde(default)]
    pub total: u64,
}

impl ComplianceSummary {
    /// Categories other than `success` and `total`, in the order they are spoken
    pub fn categories(&self) -> [(&'static str, u64); 4] {
        [
            ("minor", self.minor),
            ("major", self.major),
            ("critical", self.critical),
            ("skipped", self.skipped),
        ]
    }

    /// Categories with a nonzero count
    pub fn nonzero_categories(&self) -> impl Iterator<Item = (&'static str, u64)> {
        self.categories().into_iter().filter(|(_, count)| *count > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_report_accepts_float_status() {
        let report: ScanReport = serde_json::from_value(serde_json::json!({
            "id": "a74566b9-b527-437f-480f-e56c5b8a1791",
            "nodeCount": 1,
            "complianceProfiles": 1,
            "complianceStatus": 0.5,
            "failedCount": 0
        }))
        .unwrap();

        assert_eq!(report.compliance_status, 0.5);
        assert!(report.owner.is_none());
    }

    #[test]
    fn test_integer_and_float_status_format_alike() {
        let parse = |status: serde_json::Value| -> ScanReport {
            serde_json::from_value(serde_json::json!({
                "nodeCount": 1,
                "complianceProfiles": 1,
                "complianceStatus": status,
                "failedCount": 0
            }))
            .unwrap()
        };

        assert_eq!(parse(serde_json::json!(1)).compliance_status.to_string(), "1");
        assert_eq!(parse(serde_json::json!(1.0)).compliance_status.to_string(), "1");
        assert!(parse(serde_json::json!(1)).id.is_empty());
    }

    #[test]
    fn test_nonzero_categories_order() {
        let summary = ComplianceSummary {
            success: 40,
            minor: 0,
            major: 3,
            critical: 2,
            skipped: 1,
            total: 46,
        };

        let spoken: Vec<_> = summary.nonzero_categories().collect();
        assert_eq!(spoken, vec![("major", 3), ("critical", 2), ("skipped", 1)]);
    }
}
