use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Organization profile captured during onboarding. Read-only input to
/// document generation; mutated only by the onboarding flows.
#[derive(Debug, Clone, Default, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct OrganizationData {
    pub id: Uuid,
    pub owner_user_id: Uuid,
    pub legal_name: String,
    pub ein: Option<String>,
    pub npi: Option<String>,
    pub phone: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub postal_code: Option<String>,
    pub privacy_officer_name: Option<String>,
    pub privacy_officer_email: Option<String>,
    pub security_officer_name: Option<String>,
    pub security_officer_email: Option<String>,
    pub effective_date: Option<NaiveDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
