//! Incident log and breach-notification inserts.

use super::AppState;
use crate::incident::model::{BreachNotificationRecord, IncidentRecord};
use chrono::NaiveDate;
use uuid::Uuid;

impl AppState {
    pub async fn list_incidents(
        &self,
        organization_id: &Uuid,
    ) -> Result<Vec<IncidentRecord>, sqlx::Error> {
        sqlx::query_as::<_, IncidentRecord>(
            r#"
            SELECT id, organization_id, description, incident_date, discovery_date,
                   affected_individuals, phi_involved, status, created_at
            FROM incidents
            WHERE organization_id = $1
            ORDER BY discovery_date DESC, created_at DESC
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_incident_by_id(
        &self,
        organization_id: &Uuid,
        incident_id: &Uuid,
    ) -> Result<Option<IncidentRecord>, sqlx::Error> {
        sqlx::query_as::<_, IncidentRecord>(
            r#"
            SELECT id, organization_id, description, incident_date, discovery_date,
                   affected_individuals, phi_involved, status, created_at
            FROM incidents
            WHERE id = $1 AND organization_id = $2
            "#,
        )
        .bind(incident_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn insert_incident(
        &self,
        organization_id: &Uuid,
        description: &str,
        incident_date: NaiveDate,
        discovery_date: NaiveDate,
        affected_individuals: Option<i32>,
        phi_involved: bool,
    ) -> Result<IncidentRecord, sqlx::Error> {
        sqlx::query_as::<_, IncidentRecord>(
            r#"
            INSERT INTO incidents (
                id, organization_id, description, incident_date, discovery_date,
                affected_individuals, phi_involved, status, created_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, 'OPEN', NOW())
            RETURNING id, organization_id, description, incident_date, discovery_date,
                      affected_individuals, phi_involved, status, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(description)
        .bind(incident_date)
        .bind(discovery_date)
        .bind(affected_individuals)
        .bind(phi_involved)
        .fetch_one(&self.pool)
        .await
    }

    pub async fn update_incident_status(
        &self,
        organization_id: &Uuid,
        incident_id: &Uuid,
        status: &str,
    ) -> Result<Option<IncidentRecord>, sqlx::Error> {
        sqlx::query_as::<_, IncidentRecord>(
            r#"
            UPDATE incidents SET status = $3
            WHERE id = $1 AND organization_id = $2
            RETURNING id, organization_id, description, incident_date, discovery_date,
                      affected_individuals, phi_involved, status, created_at
            "#,
        )
        .bind(incident_id)
        .bind(organization_id)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    /// Single insert per letter. Regenerating a letter for the same incident
    /// creates a new row; prior letters are kept for the audit trail.
    pub async fn insert_breach_notification(
        &self,
        incident_id: &Uuid,
        organization_id: &Uuid,
        letter_body: &str,
        notification_date: NaiveDate,
    ) -> Result<BreachNotificationRecord, sqlx::Error> {
        sqlx::query_as::<_, BreachNotificationRecord>(
            r#"
            INSERT INTO breach_notifications (
                id, incident_id, organization_id, letter_body, notification_date, created_at
            )
            VALUES ($1, $2, $3, $4, $5, NOW())
            RETURNING id, incident_id, organization_id, letter_body, notification_date, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(incident_id)
        .bind(organization_id)
        .bind(letter_body)
        .bind(notification_date)
        .fetch_one(&self.pool)
        .await
    }
}
