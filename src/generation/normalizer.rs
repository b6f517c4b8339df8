//! Answer normalization.
//!
//! Converts the flat question-id → answer mapping collected during
//! onboarding into structured records carrying a compliance status and a
//! risk level per question. Classification is table-driven: each question
//! declares which answer values count as compliant, partially compliant or
//! non-compliant, and anything unrecognized is `Unknown` rather than an
//! error.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::ApiError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ComplianceStatus {
    Compliant,
    NonCompliant,
    Partial,
    Unknown,
}

impl ComplianceStatus {
    /// Ordering used when several answers feed one narrative field: the
    /// worst status wins.
    pub fn severity_rank(&self) -> u8 {
        match self {
            ComplianceStatus::Compliant => 0,
            ComplianceStatus::Unknown => 1,
            ComplianceStatus::Partial => 2,
            ComplianceStatus::NonCompliant => 3,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Critical,
}

/// Reference to one uploaded evidence file, flattened out of a bundle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceFileRef {
    pub file_id: String,
    pub file_name: String,
    pub uploaded_at: Option<DateTime<Utc>>,
    pub storage_path: String,
    /// Time-limited signed link; absent until minted, and left absent when
    /// minting fails.
    pub download_url: Option<String>,
}

/// One file descriptor inside a caller-supplied evidence bundle.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EvidenceFileDescriptor {
    pub file_id: String,
    pub file_name: String,
    #[serde(default)]
    pub storage_path: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<DateTime<Utc>>,
}

/// Evidence attached to a single question, as submitted by the client.
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct EvidenceBundle {
    #[serde(default)]
    pub files: Vec<EvidenceFileDescriptor>,
    #[serde(default)]
    pub attested: bool,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub submitter_ip: Option<String>,
}

/// Normalized view of one answered question. Derived per request, never
/// persisted.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct QuestionAnswer {
    pub question_id: String,
    pub raw_answer: String,
    pub compliance_status: ComplianceStatus,
    pub risk_level: RiskLevel,
    pub evidence_files: Vec<EvidenceFileRef>,
}

struct ClassificationRule {
    question_id: &'static str,
    compliant: &'static [&'static str],
    partial: &'static [&'static str],
    non_compliant: &'static [&'static str],
}

const YES: &[&str] = &["yes", "true", "y"];
const NO: &[&str] = &["no", "false", "n"];
const PARTIAL: &[&str] = &["partial", "partially", "in_progress", "in progress", "some"];

/// Per-question expected answer values. Question ids follow the onboarding
/// questionnaire numbering.
const CLASSIFICATION_RULES: &[ClassificationRule] = &[
    // q1: documented SRA within the last 12 months
    ClassificationRule { question_id: "q1", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q2: designated privacy officer
    ClassificationRule { question_id: "q2", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q3: designated security officer
    ClassificationRule { question_id: "q3", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q4: ePHI encrypted at rest
    ClassificationRule {
        question_id: "q4",
        compliant: &["yes", "true", "all_systems", "all systems"],
        partial: &["partial", "partially", "some_systems", "some systems"],
        non_compliant: NO,
    },
    // q5: ePHI encrypted in transit
    ClassificationRule { question_id: "q5", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q6: unique user accounts for all workforce members
    ClassificationRule { question_id: "q6", compliant: YES, partial: PARTIAL, non_compliant: &["no", "false", "shared_accounts", "shared accounts"] },
    // q7: role-based access reviews
    ClassificationRule {
        question_id: "q7",
        compliant: &["quarterly", "monthly", "yes"],
        partial: &["annually", "ad_hoc", "ad hoc"],
        non_compliant: &["never", "no"],
    },
    // q8: automatic session timeout / workstation locking
    ClassificationRule { question_id: "q8", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q9: documented data backup plan
    ClassificationRule { question_id: "q9", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q10: backup restore tested in the last year
    ClassificationRule { question_id: "q10", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q11: disaster recovery plan in place
    ClassificationRule { question_id: "q11", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q12: incident response procedure documented
    ClassificationRule { question_id: "q12", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q13: breach notification process documented
    ClassificationRule { question_id: "q13", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q14: annual workforce HIPAA training
    ClassificationRule {
        question_id: "q14",
        compliant: &["yes", "annually", "annual"],
        partial: &["partial", "partially", "onboarding_only", "onboarding only"],
        non_compliant: &["no", "never"],
    },
    // q15: training completion tracked per employee
    ClassificationRule { question_id: "q15", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q16: BAAs signed with all vendors handling PHI
    ClassificationRule {
        question_id: "q16",
        compliant: &["yes", "all_vendors", "all vendors"],
        partial: &["partial", "partially", "some_vendors", "some vendors"],
        non_compliant: NO,
    },
    // q17: audit logs enabled on systems holding ePHI
    ClassificationRule { question_id: "q17", compliant: YES, partial: PARTIAL, non_compliant: NO },
    // q18: termination procedure revokes access same-day
    ClassificationRule {
        question_id: "q18",
        compliant: &["yes", "same_day", "same day"],
        partial: &["within_week", "within week", "partial"],
        non_compliant: &["no", "never"],
    },
];

/// Severity overrides keyed by question and status. Anything not listed
/// defaults to `Medium`.
const SEVERITY_OVERRIDES: &[(&str, ComplianceStatus, RiskLevel)] = &[
    ("q1", ComplianceStatus::NonCompliant, RiskLevel::Critical),
    ("q1", ComplianceStatus::Partial, RiskLevel::High),
    ("q1", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q2", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q2", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q3", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q3", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q4", ComplianceStatus::NonCompliant, RiskLevel::Critical),
    ("q4", ComplianceStatus::Partial, RiskLevel::High),
    ("q4", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q5", ComplianceStatus::NonCompliant, RiskLevel::Critical),
    ("q5", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q6", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q6", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q7", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q8", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q9", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q9", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q10", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q11", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q12", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q13", ComplianceStatus::NonCompliant, RiskLevel::Critical),
    ("q13", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q14", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q14", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q16", ComplianceStatus::NonCompliant, RiskLevel::Critical),
    ("q16", ComplianceStatus::Partial, RiskLevel::High),
    ("q16", ComplianceStatus::Compliant, RiskLevel::Low),
    ("q17", ComplianceStatus::NonCompliant, RiskLevel::High),
    ("q18", ComplianceStatus::NonCompliant, RiskLevel::High),
];

fn classify(question_id: &str, answer: &str) -> ComplianceStatus {
    let normalized = answer.trim().to_ascii_lowercase();
    let rule = match CLASSIFICATION_RULES
        .iter()
        .find(|rule| rule.question_id == question_id)
    {
        Some(rule) => rule,
        None => return ComplianceStatus::Unknown,
    };

    if rule.compliant.contains(&normalized.as_str()) {
        ComplianceStatus::Compliant
    } else if rule.partial.contains(&normalized.as_str()) {
        ComplianceStatus::Partial
    } else if rule.non_compliant.contains(&normalized.as_str()) {
        ComplianceStatus::NonCompliant
    } else {
        ComplianceStatus::Unknown
    }
}

fn risk_for(question_id: &str, status: ComplianceStatus) -> RiskLevel {
    SEVERITY_OVERRIDES
        .iter()
        .find(|(id, st, _)| *id == question_id && *st == status)
        .map(|(_, _, level)| *level)
        .unwrap_or(RiskLevel::Medium)
}

fn answer_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => b.to_string(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn flatten_bundle(bundle: &EvidenceBundle) -> Vec<EvidenceFileRef> {
    bundle
        .files
        .iter()
        .map(|file| EvidenceFileRef {
            file_id: file.file_id.clone(),
            file_name: file.file_name.clone(),
            uploaded_at: file.uploaded_at.or(bundle.submitted_at),
            storage_path: file.storage_path.clone().unwrap_or_default(),
            download_url: None,
        })
        .collect()
}

/// Normalize the raw answer mapping into ordered `QuestionAnswer` records.
///
/// Pure function of its inputs. The only failure mode is a non-object
/// `answers` value.
pub fn normalize_answers(
    answers: &serde_json::Value,
    evidence: &HashMap<String, EvidenceBundle>,
) -> Result<Vec<QuestionAnswer>, ApiError> {
    let map = answers
        .as_object()
        .ok_or_else(|| ApiError::InvalidInput("answers must be a JSON object".to_string()))?;

    let mut records = Vec::with_capacity(map.len());
    for (question_id, value) in map {
        let raw_answer = answer_to_string(value);
        let compliance_status = classify(question_id, &raw_answer);
        let risk_level = risk_for(question_id, compliance_status);
        let evidence_files = evidence
            .get(question_id)
            .map(flatten_bundle)
            .unwrap_or_default();

        records.push(QuestionAnswer {
            question_id: question_id.clone(),
            raw_answer,
            compliance_status,
            risk_level,
            evidence_files,
        });
    }

    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_no_answer_classifies_non_compliant() {
        let records =
            normalize_answers(&json!({ "q1": "no" }), &HashMap::new()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].compliance_status, ComplianceStatus::NonCompliant);
        assert_eq!(records[0].risk_level, RiskLevel::Critical);
    }

    #[test]
    fn test_unrecognized_answer_defaults_to_unknown_medium() {
        let records =
            normalize_answers(&json!({ "q1": "maybe later" }), &HashMap::new()).unwrap();
        assert_eq!(records[0].compliance_status, ComplianceStatus::Unknown);
        assert_eq!(records[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_unmapped_question_defaults_to_unknown_medium() {
        let records =
            normalize_answers(&json!({ "q999": "yes" }), &HashMap::new()).unwrap();
        assert_eq!(records[0].compliance_status, ComplianceStatus::Unknown);
        assert_eq!(records[0].risk_level, RiskLevel::Medium);
    }

    #[test]
    fn test_case_and_whitespace_insensitive() {
        let records =
            normalize_answers(&json!({ "q2": "  YES " }), &HashMap::new()).unwrap();
        assert_eq!(records[0].compliance_status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_boolean_answers_are_stringified() {
        let records =
            normalize_answers(&json!({ "q5": true }), &HashMap::new()).unwrap();
        assert_eq!(records[0].raw_answer, "true");
        assert_eq!(records[0].compliance_status, ComplianceStatus::Compliant);
    }

    #[test]
    fn test_non_object_input_is_rejected() {
        let result = normalize_answers(&json!(["q1", "no"]), &HashMap::new());
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
    }

    #[test]
    fn test_evidence_bundle_is_flattened() {
        let mut evidence = HashMap::new();
        evidence.insert(
            "q4".to_string(),
            EvidenceBundle {
                files: vec![
                    EvidenceFileDescriptor {
                        file_id: "f1".into(),
                        file_name: "encryption-config.pdf".into(),
                        storage_path: Some("org/f1".into()),
                        uploaded_at: None,
                    },
                    EvidenceFileDescriptor {
                        file_id: "f2".into(),
                        file_name: "kms-screenshot.png".into(),
                        storage_path: None,
                        uploaded_at: None,
                    },
                ],
                attested: true,
                submitted_at: None,
                submitter_ip: Some("10.0.0.1".into()),
            },
        );

        let records = normalize_answers(&json!({ "q4": "yes" }), &evidence).unwrap();
        assert_eq!(records[0].evidence_files.len(), 2);
        assert_eq!(records[0].evidence_files[0].file_id, "f1");
        assert!(records[0].evidence_files[1].storage_path.is_empty());
    }

    #[test]
    fn test_questions_without_evidence_get_empty_list() {
        let records =
            normalize_answers(&json!({ "q1": "yes", "q2": "no" }), &HashMap::new()).unwrap();
        assert!(records.iter().all(|r| r.evidence_files.is_empty()));
    }
}
