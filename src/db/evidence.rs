//! Compliance evidence queries.
//!
//! Evidence rows can be linked to policy documents two ways: the
//! `evidence_document_links` join table and a denormalized
//! `related_document_ids` array on the row itself. Document-scoped reads
//! take the union of both so records created through either path show up.

use super::AppState;
use crate::evidence::model::EvidenceRecord;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

const EVIDENCE_COLUMNS: &str = r#"
    id, organization_id, title, evidence_type, hipaa_category,
    related_document_ids, related_question_ids,
    file_name, storage_path, content_type, file_size,
    validity_start_date, validity_end_date, review_due_date,
    status, attested_by, attested_at, attestation_note,
    uploaded_at, deleted_at
"#;

impl AppState {
    pub async fn list_evidence(
        &self,
        organization_id: &Uuid,
    ) -> Result<Vec<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            SELECT {EVIDENCE_COLUMNS}
            FROM compliance_evidence
            WHERE organization_id = $1 AND deleted_at IS NULL
            ORDER BY uploaded_at DESC
            "#
        ))
        .bind(organization_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn get_evidence_by_id(
        &self,
        organization_id: &Uuid,
        evidence_id: &Uuid,
    ) -> Result<Option<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            SELECT {EVIDENCE_COLUMNS}
            FROM compliance_evidence
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            "#
        ))
        .bind(evidence_id)
        .bind(organization_id)
        .fetch_optional(&self.pool)
        .await
    }

    /// Evidence linked to a policy document through the join table.
    pub async fn evidence_linked_by_table(
        &self,
        organization_id: &Uuid,
        document_id: &str,
    ) -> Result<Vec<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            SELECT {EVIDENCE_COLUMNS}
            FROM compliance_evidence e
            WHERE e.organization_id = $1
              AND e.deleted_at IS NULL
              AND EXISTS (
                  SELECT 1 FROM evidence_document_links l
                  WHERE l.evidence_id = e.id AND l.document_id = $2
              )
            ORDER BY e.uploaded_at DESC
            "#
        ))
        .bind(organization_id)
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
    }

    /// Evidence referencing a policy document through its denormalized
    /// `related_document_ids` array.
    pub async fn evidence_linked_by_array(
        &self,
        organization_id: &Uuid,
        document_id: &str,
    ) -> Result<Vec<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            SELECT {EVIDENCE_COLUMNS}
            FROM compliance_evidence
            WHERE organization_id = $1
              AND deleted_at IS NULL
              AND $2 = ANY(related_document_ids)
            ORDER BY uploaded_at DESC
            "#
        ))
        .bind(organization_id)
        .bind(document_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn evidence_by_question(
        &self,
        organization_id: &Uuid,
        question_id: &str,
    ) -> Result<Vec<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            SELECT {EVIDENCE_COLUMNS}
            FROM compliance_evidence
            WHERE organization_id = $1
              AND deleted_at IS NULL
              AND $2 = ANY(related_question_ids)
            ORDER BY uploaded_at DESC
            "#
        ))
        .bind(organization_id)
        .bind(question_id)
        .fetch_all(&self.pool)
        .await
    }

    pub async fn evidence_by_safeguard(
        &self,
        organization_id: &Uuid,
        hipaa_category: &str,
    ) -> Result<Vec<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            SELECT {EVIDENCE_COLUMNS}
            FROM compliance_evidence
            WHERE organization_id = $1
              AND deleted_at IS NULL
              AND $2 = ANY(hipaa_category)
            ORDER BY uploaded_at DESC
            "#
        ))
        .bind(organization_id)
        .bind(hipaa_category)
        .fetch_all(&self.pool)
        .await
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn insert_evidence(
        &self,
        organization_id: &Uuid,
        title: &str,
        evidence_type: &str,
        hipaa_category: &[String],
        related_document_ids: &[String],
        related_question_ids: &[String],
        file_name: Option<&str>,
        storage_path: Option<&str>,
        content_type: Option<&str>,
        file_size: Option<i64>,
        validity_end_date: Option<NaiveDate>,
        review_due_date: Option<NaiveDate>,
    ) -> Result<EvidenceRecord, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            INSERT INTO compliance_evidence (
                id, organization_id, title, evidence_type, hipaa_category,
                related_document_ids, related_question_ids,
                file_name, storage_path, content_type, file_size,
                validity_end_date, review_due_date, status, uploaded_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'VALID', NOW())
            RETURNING {EVIDENCE_COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(organization_id)
        .bind(title)
        .bind(evidence_type)
        .bind(hipaa_category)
        .bind(related_document_ids)
        .bind(related_question_ids)
        .bind(file_name)
        .bind(storage_path)
        .bind(content_type)
        .bind(file_size)
        .bind(validity_end_date)
        .bind(review_due_date)
        .fetch_one(&self.pool)
        .await
    }

    /// Partial update via COALESCE so omitted fields keep their values.
    #[allow(clippy::too_many_arguments)]
    pub async fn update_evidence(
        &self,
        organization_id: &Uuid,
        evidence_id: &Uuid,
        title: Option<&str>,
        evidence_type: Option<&str>,
        hipaa_category: Option<&[String]>,
        related_document_ids: Option<&[String]>,
        related_question_ids: Option<&[String]>,
        validity_start_date: Option<NaiveDate>,
        validity_end_date: Option<NaiveDate>,
        review_due_date: Option<NaiveDate>,
        status: Option<&str>,
    ) -> Result<Option<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            UPDATE compliance_evidence SET
                title = COALESCE($3, title),
                evidence_type = COALESCE($4, evidence_type),
                hipaa_category = COALESCE($5, hipaa_category),
                related_document_ids = COALESCE($6, related_document_ids),
                related_question_ids = COALESCE($7, related_question_ids),
                validity_start_date = COALESCE($8, validity_start_date),
                validity_end_date = COALESCE($9, validity_end_date),
                review_due_date = COALESCE($10, review_due_date),
                status = COALESCE($11, status)
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            RETURNING {EVIDENCE_COLUMNS}
            "#
        ))
        .bind(evidence_id)
        .bind(organization_id)
        .bind(title)
        .bind(evidence_type)
        .bind(hipaa_category)
        .bind(related_document_ids)
        .bind(related_question_ids)
        .bind(validity_start_date)
        .bind(validity_end_date)
        .bind(review_due_date)
        .bind(status)
        .fetch_optional(&self.pool)
        .await
    }

    pub async fn attest_evidence(
        &self,
        organization_id: &Uuid,
        evidence_id: &Uuid,
        attested_by: &str,
        attestation_note: Option<&str>,
    ) -> Result<Option<EvidenceRecord>, sqlx::Error> {
        sqlx::query_as::<_, EvidenceRecord>(&format!(
            r#"
            UPDATE compliance_evidence SET
                attested_by = $3,
                attested_at = $4,
                attestation_note = $5,
                status = 'VALID'
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            RETURNING {EVIDENCE_COLUMNS}
            "#
        ))
        .bind(evidence_id)
        .bind(organization_id)
        .bind(attested_by)
        .bind(Utc::now())
        .bind(attestation_note)
        .fetch_optional(&self.pool)
        .await
    }

    /// Soft delete. The row and any uploaded file stay in place; the record
    /// simply disappears from reads.
    pub async fn soft_delete_evidence(
        &self,
        organization_id: &Uuid,
        evidence_id: &Uuid,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE compliance_evidence
            SET deleted_at = NOW()
            WHERE id = $1 AND organization_id = $2 AND deleted_at IS NULL
            "#,
        )
        .bind(evidence_id)
        .bind(organization_id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn insert_document_links(
        &self,
        evidence_id: &Uuid,
        document_ids: &[String],
    ) -> Result<(), sqlx::Error> {
        for document_id in document_ids {
            sqlx::query(
                r#"
                INSERT INTO evidence_document_links (evidence_id, document_id)
                VALUES ($1, $2)
                ON CONFLICT DO NOTHING
                "#,
            )
            .bind(evidence_id)
            .bind(document_id)
            .execute(&self.pool)
            .await?;
        }
        Ok(())
    }
}
