//! Evidence location for document generation.
//!
//! Pure merging and filtering over records pulled from both link
//! representations, plus best-effort signed-URL resolution. URL minting
//! failures degrade the record to metadata only; generation never fails
//! because storage is unreachable.

use crate::evidence::model::{EvidenceRecord, EvidenceStatus};
use crate::generation::injector::EvidenceLine;
use crate::storage::ObjectStorage;
use chrono::NaiveDate;
use std::collections::HashSet;

/// Signed download links handed out with generated documents last an hour.
pub const DOWNLOAD_URL_TTL_SECS: u64 = 3600;

/// Union of the join-table and denormalized-array lookups, de-duplicated by
/// record id, newest upload first.
pub fn merge_evidence_sources(
    linked: Vec<EvidenceRecord>,
    referenced: Vec<EvidenceRecord>,
) -> Vec<EvidenceRecord> {
    let mut seen: HashSet<uuid::Uuid> = HashSet::new();
    let mut merged: Vec<EvidenceRecord> = Vec::with_capacity(linked.len() + referenced.len());
    for record in linked.into_iter().chain(referenced) {
        if seen.insert(record.id) {
            merged.push(record);
        }
    }
    merged.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    merged
}

/// Only currently-valid evidence is cited inside a generated policy.
pub fn filter_citable(records: Vec<EvidenceRecord>, today: NaiveDate) -> Vec<EvidenceRecord> {
    records
        .into_iter()
        .filter(|record| record.derived_status(today) == EvidenceStatus::Valid)
        .collect()
}

/// Mint signed URLs for records that have an uploaded file. A minting
/// failure is logged and the record is kept without a link.
pub async fn resolve_download_urls(
    storage: &(dyn ObjectStorage + Send + Sync),
    records: &[EvidenceRecord],
) -> Vec<EvidenceLine> {
    let mut lines = Vec::with_capacity(records.len());
    for record in records {
        let download_url = match &record.storage_path {
            Some(path) => match storage.create_signed_url(path, DOWNLOAD_URL_TTL_SECS).await {
                Ok(url) => Some(url),
                Err(err) => {
                    log::warn!(
                        "Failed to sign download URL for evidence {}: {}",
                        record.id,
                        err
                    );
                    None
                }
            },
            None => None,
        };
        lines.push(EvidenceLine {
            title: record.title.clone(),
            uploaded_at: Some(record.uploaded_at),
            download_url,
        });
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use uuid::Uuid;

    fn record(title: &str, day: u32) -> EvidenceRecord {
        EvidenceRecord {
            id: Uuid::new_v4(),
            organization_id: Uuid::new_v4(),
            title: title.to_string(),
            evidence_type: "policy_document".to_string(),
            hipaa_category: vec![],
            related_document_ids: vec![],
            related_question_ids: vec![],
            file_name: None,
            storage_path: None,
            content_type: None,
            file_size: None,
            validity_start_date: None,
            validity_end_date: None,
            review_due_date: None,
            status: "VALID".to_string(),
            attested_by: None,
            attested_at: None,
            attestation_note: None,
            uploaded_at: Utc.with_ymd_and_hms(2026, 3, day, 12, 0, 0).unwrap(),
            deleted_at: None,
        }
    }

    #[test]
    fn test_merge_dedupes_by_id() {
        let shared = record("Shared", 10);
        let linked = vec![shared.clone(), record("Linked only", 5)];
        let referenced = vec![shared.clone(), record("Referenced only", 7)];

        let merged = merge_evidence_sources(linked, referenced);
        assert_eq!(merged.len(), 3);
        let ids: Vec<_> = merged.iter().filter(|r| r.id == shared.id).collect();
        assert_eq!(ids.len(), 1);
    }

    #[test]
    fn test_merge_orders_newest_first() {
        let merged = merge_evidence_sources(
            vec![record("Older", 1)],
            vec![record("Newest", 20), record("Middle", 10)],
        );
        let titles: Vec<&str> = merged.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, vec!["Newest", "Middle", "Older"]);
    }

    #[test]
    fn test_filter_citable_drops_expired() {
        let mut expired = record("Expired scan", 1);
        expired.validity_end_date = Some(NaiveDate::from_ymd_opt(2026, 4, 1).unwrap());
        let valid = record("Current policy", 2);

        let today = NaiveDate::from_ymd_opt(2026, 5, 1).unwrap();
        let citable = filter_citable(vec![expired, valid], today);
        assert_eq!(citable.len(), 1);
        assert_eq!(citable[0].title, "Current policy");
    }
}
