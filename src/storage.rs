//! Object storage abstraction.
//!
//! Evidence files live in a Supabase storage bucket. The trait keeps
//! handlers testable with an in-memory mock; the real implementation talks
//! to the storage REST API with the service-role key and is the only place
//! that knows how signed URLs are minted.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;

/// Storage operations the server needs. Errors are plain strings because
/// callers either degrade (signed URLs) or surface them as 500s verbatim.
#[async_trait]
pub trait ObjectStorage: Send + Sync {
    async fn upload_file(&self, path: &str, data: &[u8], content_type: &str)
        -> Result<(), String>;
    async fn delete_file(&self, path: &str) -> Result<(), String>;
    /// Mint a time-limited signed download URL for an object.
    async fn create_signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, String>;
}

#[derive(Clone, Debug)]
pub struct SupabaseConfig {
    pub url: String,
    pub service_role_key: String,
    pub bucket: String,
}

impl SupabaseConfig {
    pub fn from_env() -> Result<Self, String> {
        let url = std::env::var("SUPABASE_URL").map_err(|_| "SUPABASE_URL must be set")?;
        let service_role_key = std::env::var("SUPABASE_SERVICE_ROLE_KEY")
            .map_err(|_| "SUPABASE_SERVICE_ROLE_KEY must be set")?;
        let bucket =
            std::env::var("SUPABASE_BUCKET").unwrap_or_else(|_| "evidence".to_string());
        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            service_role_key,
            bucket,
        })
    }
}

pub struct SupabaseStorage {
    config: SupabaseConfig,
    client: reqwest::Client,
}

impl SupabaseStorage {
    pub fn new(config: SupabaseConfig, client: reqwest::Client) -> Self {
        Self { config, client }
    }

    fn object_url(&self, path: &str) -> String {
        format!(
            "{}/storage/v1/object/{}/{}",
            self.config.url, self.config.bucket, path
        )
    }
}

#[derive(Deserialize)]
struct SignedUrlResponse {
    #[serde(rename = "signedURL")]
    signed_url: String,
}

#[async_trait]
impl ObjectStorage for SupabaseStorage {
    async fn upload_file(
        &self,
        path: &str,
        data: &[u8],
        content_type: &str,
    ) -> Result<(), String> {
        let response = self
            .client
            .post(self.object_url(path))
            .bearer_auth(&self.config.service_role_key)
            .header("Content-Type", content_type)
            .header("x-upsert", "true")
            .body(data.to_vec())
            .send()
            .await
            .map_err(|e| format!("storage upload request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("storage upload failed ({}): {}", status, body));
        }
        Ok(())
    }

    async fn delete_file(&self, path: &str) -> Result<(), String> {
        let response = self
            .client
            .delete(self.object_url(path))
            .bearer_auth(&self.config.service_role_key)
            .send()
            .await
            .map_err(|e| format!("storage delete request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("storage delete failed ({})", response.status()));
        }
        Ok(())
    }

    async fn create_signed_url(&self, path: &str, expires_in_secs: u64) -> Result<String, String> {
        let sign_url = format!(
            "{}/storage/v1/object/sign/{}/{}",
            self.config.url, self.config.bucket, path
        );
        let response = self
            .client
            .post(sign_url)
            .bearer_auth(&self.config.service_role_key)
            .json(&json!({ "expiresIn": expires_in_secs }))
            .send()
            .await
            .map_err(|e| format!("signed URL request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!("signed URL minting failed ({})", response.status()));
        }

        let parsed: SignedUrlResponse = response
            .json()
            .await
            .map_err(|e| format!("signed URL response malformed: {}", e))?;

        // The API returns a path relative to the storage endpoint.
        Ok(format!(
            "{}/storage/v1{}",
            self.config.url,
            parsed.signed_url.trim_start_matches("/storage/v1")
        ))
    }
}
