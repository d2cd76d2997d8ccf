use crate::Fingerprint;
use std::collections::BTreeSet;

#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Critical,
}

impl Severity {
    /// Analyzer output is untrusted, so anything unrecognized is treated as a warning rather
    /// than dropped or downgraded to info.
    pub fn parse_lenient(s: &str) -> Self {
        match s.trim().to_ascii_lowercase().as_str() {
            "info" | "information" | "low" => Self::Info,
            "critical" | "high" | "severe" => Self::Critical,
            _ => Self::Warning,
        }
    }
}

#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Risk {
    pub name: String,
    pub severity: Severity,
    pub explanation: String,
}

/// Normalized output of the external risk analyzer.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub document_type: String,
    /// Always within 0..=100.
    pub safety_score: u8,
    pub risks: Vec<Risk>,
    pub extracted_entities: BTreeSet<String>,
    pub summary: String,
    pub missing_clauses: Vec<String>,
    /// Present when the analyzer exited unsuccessfully but still produced a usable payload.
    #[serde(
        default,
        rename = "analyzerExitCode",
        skip_serializing_if = "Option::is_none"
    )]
    pub analyzer_exit_code_o: Option<i32>,
}

impl AnalysisReport {
    pub const UNKNOWN_DOCUMENT_TYPE: &'static str = "Unknown Document";

    pub fn highest_severity(&self) -> Option<Severity> {
        self.risks.iter().map(|risk| risk.severity).max()
    }
}

/// What the upload step presents to the caller before any ledger write is attempted.
#[derive(Clone, Debug, Eq, PartialEq, serde::Deserialize, serde::Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadAnalysis {
    pub fingerprint: Fingerprint,
    #[serde(flatten)]
    pub report: AnalysisReport,
}
