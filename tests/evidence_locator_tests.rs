//! Evidence locator behavior against a mock storage backend.

mod common;

use chrono::{NaiveDate, TimeZone, Utc};
use common::MockObjectStorage;
use hipaa_compliance_server::evidence::locator::{
    filter_citable, merge_evidence_sources, resolve_download_urls, DOWNLOAD_URL_TTL_SECS,
};
use hipaa_compliance_server::evidence::model::EvidenceRecord;
use uuid::Uuid;

fn record(title: &str, storage_path: Option<&str>, day: u32) -> EvidenceRecord {
    EvidenceRecord {
        id: Uuid::new_v4(),
        organization_id: Uuid::new_v4(),
        title: title.to_string(),
        evidence_type: "policy_document".to_string(),
        hipaa_category: vec![],
        related_document_ids: vec!["sra-policy".to_string()],
        related_question_ids: vec![],
        file_name: storage_path.map(|_| "file.pdf".to_string()),
        storage_path: storage_path.map(|p| p.to_string()),
        content_type: storage_path.map(|_| "application/pdf".to_string()),
        file_size: storage_path.map(|_| 2048),
        validity_start_date: None,
        validity_end_date: None,
        review_due_date: None,
        status: "VALID".to_string(),
        attested_by: None,
        attested_at: None,
        attestation_note: None,
        uploaded_at: Utc.with_ymd_and_hms(2026, 4, day, 8, 0, 0).unwrap(),
        deleted_at: None,
    }
}

#[tokio::test]
async fn test_signed_urls_minted_with_hour_ttl() {
    let storage = MockObjectStorage::new();
    let records = vec![record("SRA report", Some("org/sra.pdf"), 3)];

    let lines = resolve_download_urls(&storage, &records).await;

    assert_eq!(lines.len(), 1);
    let url = lines[0].download_url.as_deref().unwrap();
    assert!(url.contains("org/sra.pdf"));
    assert!(url.contains(&format!("expires={}", DOWNLOAD_URL_TTL_SECS)));
    assert_eq!(storage.signed.lock().as_slice(), ["org/sra.pdf"]);
}

#[tokio::test]
async fn test_storage_failure_degrades_to_metadata_only() {
    let storage = MockObjectStorage::failing();
    let records = vec![
        record("SRA report", Some("org/sra.pdf"), 3),
        record("Training roster", Some("org/roster.xlsx"), 4),
    ];

    let lines = resolve_download_urls(&storage, &records).await;

    // Every record survives, just without a link.
    assert_eq!(lines.len(), 2);
    assert!(lines.iter().all(|line| line.download_url.is_none()));
    assert!(lines.iter().all(|line| line.uploaded_at.is_some()));
}

#[tokio::test]
async fn test_metadata_only_records_skip_storage() {
    let storage = MockObjectStorage::new();
    let records = vec![record("Verbal attestation", None, 5)];

    let lines = resolve_download_urls(&storage, &records).await;

    assert_eq!(lines.len(), 1);
    assert!(lines[0].download_url.is_none());
    assert!(storage.signed.lock().is_empty());
}

#[test]
fn test_union_is_deduped_and_newest_first() {
    let shared = record("Shared evidence", None, 15);
    let linked = vec![shared.clone(), record("Join-table only", None, 2)];
    let referenced = vec![record("Array only", None, 20), shared.clone()];

    let merged = merge_evidence_sources(linked, referenced);

    let titles: Vec<&str> = merged.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["Array only", "Shared evidence", "Join-table only"]);
}

#[test]
fn test_only_currently_valid_evidence_is_citable() {
    let valid = record("Current report", None, 1);
    let mut expired = record("Old report", None, 2);
    expired.validity_end_date = NaiveDate::from_ymd_opt(2026, 5, 1);
    let mut archived = record("Superseded report", None, 3);
    archived.status = "ARCHIVED".to_string();

    let today = NaiveDate::from_ymd_opt(2026, 6, 1).unwrap();
    let citable = filter_citable(vec![valid, expired, archived], today);

    assert_eq!(citable.len(), 1);
    assert_eq!(citable[0].title, "Current report");
}
