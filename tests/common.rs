//! Shared fixtures for integration tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use hipaa_compliance_server::organization::model::OrganizationData;
use hipaa_compliance_server::storage::ObjectStorage;
use parking_lot::Mutex;
use uuid::Uuid;

/// In-memory storage backend. Records every call and can be switched into
/// a failing mode to exercise degradation paths.
#[derive(Default)]
pub struct MockObjectStorage {
    pub fail: Mutex<bool>,
    pub uploads: Mutex<Vec<(String, usize, String)>>,
    pub deletions: Mutex<Vec<String>>,
    pub signed: Mutex<Vec<String>>,
}

#[allow(dead_code)]
impl MockObjectStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        let storage = Self::default();
        *storage.fail.lock() = true;
        storage
    }
}

#[async_trait]
impl ObjectStorage for MockObjectStorage {
    async fn upload_file(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), String> {
        if *self.fail.lock() {
            return Err("mock storage unavailable".to_string());
        }
        self.uploads
            .lock()
            .push((path.to_string(), data.len(), content_type.to_string()));
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<(), String> {
        if *self.fail.lock() {
            return Err("mock storage unavailable".to_string());
        }
        self.deletions.lock().push(path.to_string());
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, String> {
        if *self.fail.lock() {
            return Err("mock storage unavailable".to_string());
        }
        self.signed.lock().push(path.to_string());
        Ok(format!(
            "https://storage.test/sign/{}?expires={}",
            path, expires_in_secs
        ))
    }
}

/// A fully filled-in organization profile, the way onboarding leaves it.
#[allow(dead_code)]
pub fn acme_clinic() -> OrganizationData {
    OrganizationData {
        id: Uuid::parse_str("7b0c1a2e-9d4f-4a4b-8a4e-2f1d3c5b6a70").unwrap(),
        owner_user_id: Uuid::parse_str("11111111-2222-3333-4444-555555555555").unwrap(),
        legal_name: "Acme Clinic".to_string(),
        ein: Some("12-3456789".to_string()),
        npi: Some("1234567890".to_string()),
        phone: Some("(555) 010-0199".to_string()),
        address_line1: Some("500 Wellness Way".to_string()),
        address_line2: Some("Suite 210".to_string()),
        city: Some("Springfield".to_string()),
        state: Some("IL".to_string()),
        postal_code: Some("62701".to_string()),
        privacy_officer_name: Some("Dana Reyes".to_string()),
        privacy_officer_email: Some("dana.reyes@acmeclinic.example".to_string()),
        security_officer_name: Some("Miguel Okafor".to_string()),
        security_officer_email: Some("miguel.okafor@acmeclinic.example".to_string()),
        effective_date: NaiveDate::from_ymd_opt(2026, 1, 1),
        created_at: None,
        updated_at: None,
    }
}
