use contract_ledger_core::{AnalysisReport, Risk, Severity};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Return the substring from the first `{` to the last `}`, which is where the analyzer's JSON
/// object sits among any diagnostic noise it prints.
pub fn extract_json_payload(stdout: &str) -> Option<&str> {
    let start = stdout.find('{')?;
    let end = stdout.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&stdout[start..=end])
}

/// Build an AnalysisReport from an untrusted analyzer object.  Missing or wrongly-typed fields
/// take defaults, scores are clamped to 0..=100, entities are trimmed and de-duplicated, and
/// unknown severities become warnings.  Both the canonical field names and the short names the
/// analyzer emits (`type`, `score`, `entities`, and `status` per risk) are accepted, with the
/// canonical name taking precedence.
pub fn normalize_report(object: &Map<String, Value>) -> AnalysisReport {
    let document_type = field(object, "documentType", "type")
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(AnalysisReport::UNKNOWN_DOCUMENT_TYPE)
        .to_string();
    let safety_score = field(object, "safetyScore", "score")
        .and_then(Value::as_f64)
        .map(|score| score.clamp(0.0, 100.0).round() as u8)
        .unwrap_or(0);
    let risks = object
        .get("risks")
        .and_then(Value::as_array)
        .map(|risk_v| risk_v.iter().filter_map(normalize_risk).collect())
        .unwrap_or_default();
    let extracted_entities = field(object, "extractedEntities", "entities")
        .map(string_list)
        .unwrap_or_default()
        .into_iter()
        .collect::<BTreeSet<_>>();
    let summary = object
        .get("summary")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    let missing_clauses = object
        .get("missingClauses")
        .map(string_list)
        .unwrap_or_default();
    AnalysisReport {
        document_type,
        safety_score,
        risks,
        extracted_entities,
        summary,
        missing_clauses,
        analyzer_exit_code_o: None,
    }
}

/// True if the object is the analyzer's bare `{"error": "..."}` failure payload rather than a
/// report, and if so, returns the message.
pub(crate) fn error_payload_message(object: &Map<String, Value>) -> Option<&str> {
    const REPORT_FIELDS: &[&str] = &[
        "documentType",
        "type",
        "safetyScore",
        "score",
        "risks",
        "extractedEntities",
        "entities",
        "summary",
        "missingClauses",
    ];
    let message = object.get("error")?.as_str()?;
    if REPORT_FIELDS.iter().any(|name| object.contains_key(*name)) {
        return None;
    }
    Some(message)
}

fn field<'a>(object: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    object
        .get(name)
        .filter(|value| !value.is_null())
        .or_else(|| object.get(alias))
}

fn normalize_risk(value: &Value) -> Option<Risk> {
    match value {
        Value::Object(risk_object) => {
            let string_field = |name: &str| {
                risk_object
                    .get(name)
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string()
            };
            let severity = field(risk_object, "severity", "status")
                .and_then(Value::as_str)
                .map(Severity::parse_lenient)
                .unwrap_or(Severity::Warning);
            Some(Risk {
                name: string_field("name"),
                severity,
                explanation: string_field("explanation"),
            })
        }
        // A bare string names the risk.
        Value::String(name) => Some(Risk {
            name: name.clone(),
            severity: Severity::Warning,
            explanation: String::new(),
        }),
        _ => None,
    }
}

fn string_list(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|item_v| {
            item_v
                .iter()
                .filter_map(Value::as_str)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default()
}
