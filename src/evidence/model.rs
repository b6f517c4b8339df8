use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle status of an evidence record. Stored value is re-derived at
/// read time once the validity window or review date has passed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EvidenceStatus {
    Valid,
    Expired,
    Missing,
    RequiresReview,
    Archived,
}

impl EvidenceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            EvidenceStatus::Valid => "VALID",
            EvidenceStatus::Expired => "EXPIRED",
            EvidenceStatus::Missing => "MISSING",
            EvidenceStatus::RequiresReview => "REQUIRES_REVIEW",
            EvidenceStatus::Archived => "ARCHIVED",
        }
    }

    pub fn parse(value: &str) -> Option<EvidenceStatus> {
        match value {
            "VALID" => Some(EvidenceStatus::Valid),
            "EXPIRED" => Some(EvidenceStatus::Expired),
            "MISSING" => Some(EvidenceStatus::Missing),
            "REQUIRES_REVIEW" => Some(EvidenceStatus::RequiresReview),
            "ARCHIVED" => Some(EvidenceStatus::Archived),
            _ => None,
        }
    }
}

/// Closed set of document categories an evidence artifact may fall into.
pub const EVIDENCE_TYPES: &[&str] = &[
    "policy_document",
    "procedure_document",
    "risk_assessment_report",
    "risk_management_plan",
    "training_log",
    "training_certificate",
    "training_material",
    "baa_agreement",
    "vendor_contract",
    "vendor_assessment",
    "audit_log_export",
    "access_review_record",
    "access_request_form",
    "screenshot",
    "network_diagram",
    "encryption_configuration",
    "backup_verification",
    "disaster_recovery_test",
    "incident_report",
    "breach_log",
    "sanction_record",
    "termination_checklist",
    "facility_access_log",
    "badge_record",
    "media_disposal_record",
    "asset_inventory",
    "patch_report",
    "vulnerability_scan",
    "penetration_test",
    "phishing_test_result",
    "insurance_certificate",
    "meeting_minutes",
    "officer_designation_letter",
    "attestation_statement",
    "system_activity_review",
];

pub fn is_valid_evidence_type(value: &str) -> bool {
    EVIDENCE_TYPES.contains(&value)
}

/// Persisted compliance evidence record. Soft-deleted rows keep their data
/// and are excluded from every read by `deleted_at IS NULL`.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct EvidenceRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub title: String,
    pub evidence_type: String,
    pub hipaa_category: Vec<String>,
    pub related_document_ids: Vec<String>,
    pub related_question_ids: Vec<String>,
    pub file_name: Option<String>,
    pub storage_path: Option<String>,
    pub content_type: Option<String>,
    pub file_size: Option<i64>,
    pub validity_start_date: Option<NaiveDate>,
    pub validity_end_date: Option<NaiveDate>,
    pub review_due_date: Option<NaiveDate>,
    pub status: String,
    pub attested_by: Option<String>,
    pub attested_at: Option<DateTime<Utc>>,
    pub attestation_note: Option<String>,
    pub uploaded_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl EvidenceRecord {
    /// Status as of `today`. Archived records stay archived; otherwise an
    /// elapsed validity window or review date overrides the stored value.
    pub fn derived_status(&self, today: NaiveDate) -> EvidenceStatus {
        let stored = EvidenceStatus::parse(&self.status).unwrap_or(EvidenceStatus::RequiresReview);
        if stored == EvidenceStatus::Archived {
            return stored;
        }
        if let Some(end) = self.validity_end_date {
            if today > end {
                return EvidenceStatus::Expired;
            }
        }
        if let Some(review) = self.review_due_date {
            if today > review {
                return EvidenceStatus::RequiresReview;
            }
        }
        stored
    }
}

/// Evidence record as returned by the API, with the derived status and an
/// optional signed download link.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EvidenceView {
    #[serde(flatten)]
    pub record: EvidenceRecord,
    pub derived_status: EvidenceStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub download_url: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateEvidenceRequest {
    pub title: Option<String>,
    pub evidence_type: Option<String>,
    pub hipaa_category: Option<Vec<String>>,
    pub related_document_ids: Option<Vec<String>>,
    pub related_question_ids: Option<Vec<String>>,
    pub validity_start_date: Option<NaiveDate>,
    pub validity_end_date: Option<NaiveDate>,
    pub review_due_date: Option<NaiveDate>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AttestEvidenceRequest {
    pub attested_by: String,
    pub attestation_note: Option<String>,
}

/// Multipart upload metadata accompanying the file field. Documented for
/// OpenAPI; parsing happens field by field in the handler.
#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadEvidenceRequest {
    #[allow(unused)]
    pub file: Vec<u8>,
    #[allow(unused)]
    pub title: String,
    #[allow(unused)]
    pub evidence_type: String,
    #[allow(unused)]
    pub hipaa_category: Option<String>,
    #[allow(unused)]
    pub related_document_ids: Option<String>,
    #[allow(unused)]
    pub related_question_ids: Option<String>,
    #[allow(unused)]
    pub validity_end_date: Option<NaiveDate>,
    #[allow(unused)]
    pub review_due_date: Option<NaiveDate>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn record(status: &str) -> EvidenceRecord {
        EvidenceRecord {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            title: "Encryption configuration export".to_string(),
            evidence_type: "encryption_configuration".to_string(),
            hipaa_category: vec!["164.312(a)".to_string()],
            related_document_ids: vec!["HIPAA-SEC-001".to_string()],
            related_question_ids: vec!["q4".to_string()],
            file_name: Some("kms.pdf".to_string()),
            storage_path: Some("org/kms.pdf".to_string()),
            content_type: Some("application/pdf".to_string()),
            file_size: Some(1024),
            validity_start_date: None,
            validity_end_date: None,
            review_due_date: None,
            status: status.to_string(),
            attested_by: None,
            attested_at: None,
            attestation_note: None,
            uploaded_at: chrono::Utc.with_ymd_and_hms(2026, 1, 2, 0, 0, 0).unwrap(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_status_derivation_past_validity_end() {
        let mut rec = record("VALID");
        rec.validity_end_date = Some(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 7, 1).unwrap();
        assert_eq!(rec.derived_status(today), EvidenceStatus::Expired);
    }

    #[test]
    fn test_status_derivation_past_review_date() {
        let mut rec = record("VALID");
        rec.review_due_date = Some(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 6, 2).unwrap();
        assert_eq!(rec.derived_status(today), EvidenceStatus::RequiresReview);
    }

    #[test]
    fn test_status_derivation_within_window_keeps_stored() {
        let mut rec = record("VALID");
        rec.validity_end_date = Some(NaiveDate::from_ymd_opt(2026, 6, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        assert_eq!(rec.derived_status(today), EvidenceStatus::Valid);
    }

    #[test]
    fn test_archived_never_rederived() {
        let mut rec = record("ARCHIVED");
        rec.validity_end_date = Some(NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
        let today = NaiveDate::from_ymd_opt(2026, 1, 1).unwrap();
        assert_eq!(rec.derived_status(today), EvidenceStatus::Archived);
    }

    #[test]
    fn test_evidence_type_validation() {
        assert!(is_valid_evidence_type("baa_agreement"));
        assert!(!is_valid_evidence_type("mixtape"));
        assert_eq!(EVIDENCE_TYPES.len(), 35);
    }
}
