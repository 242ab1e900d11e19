//! Adapter for JSON-array feeds.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};

use crate::error::ParseError;
use crate::types::JobPosting;

/// Field mapping for a feed that returns a JSON array of job records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StructuredRule {
    /// Leading non-record elements to skip (legal notices and similar).
    #[serde(default)]
    pub skip: usize,
    pub id_field: String,
    pub title_field: String,
    pub company_field: String,
    pub link_field: String,
}

pub(super) fn extract(
    payload: &str,
    rule: &StructuredRule,
    name: &str,
    label: &str,
) -> Result<Vec<JobPosting>, ParseError> {
    let records: Vec<Value> = serde_json::from_str(payload)?;

    if records.len() <= rule.skip {
        warn!(
            source = name,
            records = records.len(),
            "no records past the preamble; feed shape may have changed"
        );
        return Ok(Vec::new());
    }

    let mut jobs = Vec::new();
    for record in records.iter().skip(rule.skip) {
        let id = field_string(record, &rule.id_field);
        let title = field_string(record, &rule.title_field);
        let link = field_string(record, &rule.link_field);
        let (Some(id), Some(title), Some(link)) = (id, title, link) else {
            debug!(source = name, "dropping record missing id/title/link");
            continue;
        };

        jobs.push(JobPosting {
            id: format!("{name}_{id}"),
            title,
            company: field_string(record, &rule.company_field),
            link,
            source: label.to_string(),
        });
    }

    Ok(jobs)
}

/// Field value as a non-empty string. Numeric ids are common in these
/// feeds, so numbers are stringified.
fn field_string(record: &Value, field: &str) -> Option<String> {
    match record.get(field)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> StructuredRule {
        StructuredRule {
            skip: 1,
            id_field: "id".to_string(),
            title_field: "position".to_string(),
            company_field: "company".to_string(),
            link_field: "url".to_string(),
        }
    }

    #[test]
    fn skips_preamble_and_extracts_records() {
        let payload = r#"[
            {"legal": "terms of use"},
            {"id": 101, "position": "Rust Engineer", "company": "Acme", "url": "https://jobs.example/101"},
            {"id": 102, "position": "Go Engineer", "company": "Beta", "url": "https://jobs.example/102"}
        ]"#;
        let jobs = extract(payload, &rule(), "board", "Board").unwrap();
        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[0].id, "board_101");
        assert_eq!(jobs[0].title, "Rust Engineer");
        assert_eq!(jobs[0].company.as_deref(), Some("Acme"));
        assert_eq!(jobs[0].source, "Board");
    }

    #[test]
    fn numeric_and_string_ids_both_work() {
        let payload = r#"[
            {"legal": true},
            {"id": 7, "position": "A", "url": "https://x/7"},
            {"id": "abc", "position": "B", "url": "https://x/abc"}
        ]"#;
        let jobs = extract(payload, &rule(), "board", "Board").unwrap();
        assert_eq!(jobs[0].id, "board_7");
        assert_eq!(jobs[1].id, "board_abc");
    }

    #[test]
    fn records_missing_required_fields_are_dropped() {
        let payload = r#"[
            {"legal": true},
            {"id": 1, "position": "Kept", "url": "https://x/1"},
            {"position": "No id", "url": "https://x/2"},
            {"id": 3, "url": "https://x/3"},
            {"id": 4, "position": "No link"},
            {"id": 5, "position": "", "url": "https://x/5"}
        ]"#;
        let jobs = extract(payload, &rule(), "board", "Board").unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Kept");
    }

    #[test]
    fn missing_company_becomes_none() {
        let payload = r#"[
            {"legal": true},
            {"id": 1, "position": "Engineer", "url": "https://x/1"}
        ]"#;
        let jobs = extract(payload, &rule(), "board", "Board").unwrap();
        assert_eq!(jobs[0].company, None);
    }

    #[test]
    fn payload_with_only_preamble_is_empty_not_an_error() {
        let jobs = extract(r#"[{"legal": true}]"#, &rule(), "board", "Board").unwrap();
        assert!(jobs.is_empty());

        let jobs = extract("[]", &rule(), "board", "Board").unwrap();
        assert!(jobs.is_empty());
    }

    #[test]
    fn non_array_payload_is_a_parse_error() {
        let err = extract(r#"{"jobs": []}"#, &rule(), "board", "Board").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));

        let err = extract("<html></html>", &rule(), "board", "Board").unwrap_err();
        assert!(matches!(err, ParseError::Json(_)));
    }
}
