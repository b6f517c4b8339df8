//! Organization profile reads.

use super::AppState;
use crate::error::ApiError;
use crate::organization::model::OrganizationData;
use uuid::Uuid;

impl AppState {
    pub async fn get_organization_by_owner(
        &self,
        owner_user_id: &Uuid,
    ) -> Result<Option<OrganizationData>, sqlx::Error> {
        sqlx::query_as::<_, OrganizationData>(
            r#"
            SELECT id, owner_user_id, legal_name, ein, npi, phone,
                   address_line1, address_line2, city, state, postal_code,
                   privacy_officer_name, privacy_officer_email,
                   security_officer_name, security_officer_email,
                   effective_date, created_at, updated_at
            FROM organizations
            WHERE owner_user_id = $1
            "#,
        )
        .bind(owner_user_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Cached profile lookup keyed by the session user id. The cache TTL
    /// is short enough that onboarding edits show up within minutes.
    pub async fn get_organization_cached(
        &self,
        user_id: &str,
    ) -> Result<Option<OrganizationData>, ApiError> {
        if let Some(cached) = self.organization_cache.get(user_id).await {
            return Ok(Some(cached));
        }

        let owner = Uuid::parse_str(user_id).map_err(|_| ApiError::Unauthorized)?;
        let organization = self.get_organization_by_owner(&owner).await?;

        if let Some(organization) = &organization {
            self.organization_cache
                .insert(user_id.to_string(), organization.clone())
                .await;
        }

        Ok(organization)
    }
}
