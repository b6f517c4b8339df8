use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Security incident log entry. Incidents drive the breach-notification
/// letter flow but exist independently of it; most never become breaches.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct IncidentRecord {
    pub id: Uuid,
    pub organization_id: Uuid,
    pub description: String,
    pub incident_date: NaiveDate,
    pub discovery_date: NaiveDate,
    pub affected_individuals: Option<i32>,
    pub phi_involved: bool,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

pub const INCIDENT_STATUSES: &[&str] = &["OPEN", "INVESTIGATING", "RESOLVED", "REPORTED"];

pub fn is_valid_incident_status(value: &str) -> bool {
    INCIDENT_STATUSES.contains(&value)
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateIncidentRequest {
    pub status: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateIncidentRequest {
    pub description: String,
    pub incident_date: NaiveDate,
    pub discovery_date: NaiveDate,
    pub affected_individuals: Option<i32>,
    #[serde(default)]
    pub phi_involved: bool,
}

/// Row recording that a notification letter was produced for an incident.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
pub struct BreachNotificationRecord {
    pub id: Uuid,
    pub incident_id: Uuid,
    pub organization_id: Uuid,
    pub letter_body: String,
    pub notification_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotificationLetterResponse {
    pub success: bool,
    pub letter: String,
    pub formatted_letter: String,
    pub notification: BreachNotificationRecord,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incident_status_validation() {
        for status in INCIDENT_STATUSES {
            assert!(is_valid_incident_status(status));
        }
        assert!(!is_valid_incident_status("CLOSED"));
        assert!(!is_valid_incident_status("open"));
    }
}
