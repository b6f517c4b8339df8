//! Stored risk-assessment answers.

use super::AppState;
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct AnswerRow {
    question_id: String,
    answer: String,
}

impl AppState {
    /// Load the organization's stored onboarding answers as a JSON object
    /// in the same shape the generation endpoint accepts, so
    /// request-supplied answers can be overlaid on top.
    pub async fn get_assessment_answers(
        &self,
        organization_id: &Uuid,
    ) -> Result<serde_json::Map<String, serde_json::Value>, sqlx::Error> {
        let rows = sqlx::query_as::<_, AnswerRow>(
            r#"
            SELECT question_id, answer
            FROM risk_assessment_answers
            WHERE organization_id = $1
            ORDER BY question_id
            "#,
        )
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await?;

        let mut map = serde_json::Map::new();
        for row in rows {
            map.insert(row.question_id, serde_json::Value::String(row.answer));
        }
        Ok(map)
    }
}
