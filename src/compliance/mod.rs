//! Chef Compliance server access
//!
//! Every call is a single authenticated GET returning JSON:
//! - GET /users
//! - GET /version
//! - GET /owners/{user}/summary
//! - GET /owners/{user}/sscans
//! - GET /owners/{user}/scans
//! - GET /owners/{user}/scans/{id}

pub mod client;
pub mod models;

pub use client::{build_http_client, ComplianceApi, ComplianceClient};
pub use models::{ComplianceSummary, OwnerSummary, ScanDetail, ScanReport, ServerVersion};
