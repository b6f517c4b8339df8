use actix_multipart::Multipart;
use actix_web::{web, HttpRequest, HttpResponse};
use chrono::{NaiveDate, Utc};
use futures_util::TryStreamExt;
use log::{info, warn};
use sanitize_filename::sanitize;
use serde::Deserialize;
use std::path::Path as StdPath;
use utoipa::ToSchema;
use uuid::Uuid;

use crate::auth::middleware::validate_request_token;
use crate::db::AppState;
use crate::error::ApiError;
use crate::evidence::locator::{merge_evidence_sources, DOWNLOAD_URL_TTL_SECS};
use crate::evidence::model::{
    is_valid_evidence_type, AttestEvidenceRequest, EvidenceRecord, EvidenceStatus, EvidenceView,
    UpdateEvidenceRequest, UploadEvidenceRequest,
};
use crate::generation::DocumentType;
use crate::organization::model::OrganizationData;

/// Collected multipart fields for an evidence upload.
struct UploadFields {
    file_name: Option<String>,
    file_data: Vec<u8>,
    content_type: Option<String>,
    title: Option<String>,
    evidence_type: Option<String>,
    hipaa_category: Vec<String>,
    related_document_ids: Vec<String>,
    related_question_ids: Vec<String>,
    validity_end_date: Option<NaiveDate>,
    review_due_date: Option<NaiveDate>,
}

fn split_csv(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

async fn read_text_field(field: &mut actix_multipart::Field) -> Result<String, ApiError> {
    let mut bytes = Vec::new();
    while let Some(chunk) = field
        .try_next()
        .await
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?
    {
        bytes.extend_from_slice(&chunk);
    }
    String::from_utf8(bytes).map_err(|_| ApiError::InvalidInput("field is not UTF-8".to_string()))
}

async fn collect_upload_fields(mut payload: Multipart) -> Result<UploadFields, ApiError> {
    let mut fields = UploadFields {
        file_name: None,
        file_data: Vec::new(),
        content_type: None,
        title: None,
        evidence_type: None,
        hipaa_category: Vec::new(),
        related_document_ids: Vec::new(),
        related_question_ids: Vec::new(),
        validity_end_date: None,
        review_due_date: None,
    };

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| ApiError::InvalidInput(e.to_string()))?
    {
        let content_disposition = field
            .content_disposition()
            .ok_or_else(|| ApiError::InvalidInput("Content-Disposition not set".to_string()))?;
        let field_name = content_disposition
            .get_name()
            .ok_or_else(|| ApiError::InvalidInput("multipart field has no name".to_string()))?
            .to_string();

        match field_name.as_str() {
            "file" => {
                let file_name = field
                    .content_disposition()
                    .and_then(|cd| cd.get_filename())
                    .ok_or_else(|| ApiError::InvalidInput("file field has no filename".to_string()))?;
                let sanitized = sanitize(file_name);
                fields.content_type = Some(
                    mime_guess::from_path(StdPath::new(&sanitized))
                        .first_or_octet_stream()
                        .to_string(),
                );
                fields.file_name = Some(sanitized);

                while let Some(chunk) = field
                    .try_next()
                    .await
                    .map_err(|e| ApiError::InvalidInput(e.to_string()))?
                {
                    fields.file_data.extend_from_slice(&chunk);
                }
            }
            "title" => fields.title = Some(read_text_field(&mut field).await?),
            "evidence_type" => fields.evidence_type = Some(read_text_field(&mut field).await?),
            "hipaa_category" => {
                fields.hipaa_category = split_csv(&read_text_field(&mut field).await?)
            }
            "related_document_ids" => {
                fields.related_document_ids = split_csv(&read_text_field(&mut field).await?)
            }
            "related_question_ids" => {
                fields.related_question_ids = split_csv(&read_text_field(&mut field).await?)
            }
            "validity_end_date" => {
                let raw = read_text_field(&mut field).await?;
                fields.validity_end_date = Some(
                    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                        ApiError::InvalidInput("validity_end_date must be YYYY-MM-DD".to_string())
                    })?,
                );
            }
            "review_due_date" => {
                let raw = read_text_field(&mut field).await?;
                fields.review_due_date = Some(
                    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").map_err(|_| {
                        ApiError::InvalidInput("review_due_date must be YYYY-MM-DD".to_string())
                    })?,
                );
            }
            _ => continue,
        }
    }

    Ok(fields)
}

fn validate_document_ids(ids: &[String]) -> Result<(), ApiError> {
    for id in ids {
        if DocumentType::parse(id).is_none() {
            return Err(ApiError::InvalidInput(format!(
                "unknown document type '{}'; supported: {}",
                id,
                DocumentType::supported_values()
            )));
        }
    }
    Ok(())
}

async fn require_organization(
    state: &AppState,
    user_id: &str,
) -> Result<OrganizationData, ApiError> {
    state.get_organization_cached(user_id).await?.ok_or_else(|| {
        ApiError::NotFound("organization not found; complete onboarding first".to_string())
    })
}

async fn to_view(state: &AppState, record: EvidenceRecord) -> EvidenceView {
    let today = Utc::now().date_naive();
    let derived_status = record.derived_status(today);
    let download_url = match &record.storage_path {
        Some(path) => match state.storage.create_signed_url(path, DOWNLOAD_URL_TTL_SECS).await {
            Ok(url) => Some(url),
            Err(err) => {
                warn!("Failed to sign download URL for evidence {}: {}", record.id, err);
                None
            }
        },
        None => None,
    };
    EvidenceView {
        record,
        derived_status,
        download_url,
    }
}

async fn to_views(state: &AppState, records: Vec<EvidenceRecord>) -> Vec<EvidenceView> {
    let mut views = Vec::with_capacity(records.len());
    for record in records {
        views.push(to_view(state, record).await);
    }
    views
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    get,
    path = "/evidence",
    responses(
        (status = 200, description = "All active evidence for the organization", body = [EvidenceView]),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 404, description = "Organization not found", body = crate::error::ErrorBody)
    )
)]
pub async fn list_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let records = state.list_evidence(&organization.id).await?;
    Ok(HttpResponse::Ok().json(to_views(&state, records).await))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    post,
    path = "/evidence",
    request_body(content = inline(UploadEvidenceRequest), content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Evidence record created", body = EvidenceView),
        (status = 400, description = "Invalid upload", body = crate::error::ErrorBody),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody)
    )
)]
pub async fn upload_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let fields = collect_upload_fields(payload).await?;
    let title = fields
        .title
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::InvalidInput("title is required".to_string()))?;
    let evidence_type = fields
        .evidence_type
        .ok_or_else(|| ApiError::InvalidInput("evidence_type is required".to_string()))?;
    if !is_valid_evidence_type(&evidence_type) {
        return Err(ApiError::InvalidInput(format!(
            "unknown evidence_type '{}'",
            evidence_type
        )));
    }
    validate_document_ids(&fields.related_document_ids)?;

    // Metadata-only records are allowed; a file is optional.
    let (file_name, storage_path, content_type, file_size) = match fields.file_name {
        Some(name) if !fields.file_data.is_empty() => {
            let content_type = fields
                .content_type
                .unwrap_or_else(|| "application/octet-stream".to_string());
            let path = format!("{}/{}_{}", organization.id, Uuid::new_v4(), name);
            state
                .storage
                .upload_file(&path, &fields.file_data, &content_type)
                .await
                .map_err(|e| ApiError::InvalidInput(format!("file upload failed: {}", e)))?;
            (
                Some(name),
                Some(path),
                Some(content_type),
                Some(fields.file_data.len() as i64),
            )
        }
        _ => (None, None, None, None),
    };

    let record = state
        .insert_evidence(
            &organization.id,
            &title,
            &evidence_type,
            &fields.hipaa_category,
            &fields.related_document_ids,
            &fields.related_question_ids,
            file_name.as_deref(),
            storage_path.as_deref(),
            content_type.as_deref(),
            file_size,
            fields.validity_end_date,
            fields.review_due_date,
        )
        .await?;

    if !fields.related_document_ids.is_empty() {
        state
            .insert_document_links(&record.id, &fields.related_document_ids)
            .await?;
    }

    info!(
        "evidence {} uploaded for organization {}",
        record.id, organization.id
    );
    let view = to_view(&state, record).await;
    Ok(HttpResponse::Created().json(view))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    get,
    path = "/evidence/{id}",
    params(("id" = Uuid, Path, description = "Evidence record id")),
    responses(
        (status = 200, description = "Evidence record", body = EvidenceView),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let record = state
        .get_evidence_by_id(&organization.id, &path)
        .await?
        .ok_or_else(|| ApiError::NotFound("evidence record not found".to_string()))?;
    let view = to_view(&state, record).await;
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    put,
    path = "/evidence/{id}",
    params(("id" = Uuid, Path, description = "Evidence record id")),
    request_body = UpdateEvidenceRequest,
    responses(
        (status = 200, description = "Updated record", body = EvidenceView),
        (status = 400, description = "Invalid update", body = crate::error::ErrorBody),
        (status = 404, description = "Not found", body = crate::error::ErrorBody)
    )
)]
pub async fn update_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateEvidenceRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    if let Some(evidence_type) = &body.evidence_type {
        if !is_valid_evidence_type(evidence_type) {
            return Err(ApiError::InvalidInput(format!(
                "unknown evidence_type '{}'",
                evidence_type
            )));
        }
    }
    if let Some(status) = &body.status {
        if EvidenceStatus::parse(status).is_none() {
            return Err(ApiError::InvalidInput(format!(
                "unknown status '{}'",
                status
            )));
        }
    }
    if let Some(ids) = &body.related_document_ids {
        validate_document_ids(ids)?;
    }

    let record = state
        .update_evidence(
            &organization.id,
            &path,
            body.title.as_deref(),
            body.evidence_type.as_deref(),
            body.hipaa_category.as_deref(),
            body.related_document_ids.as_deref(),
            body.related_question_ids.as_deref(),
            body.validity_start_date,
            body.validity_end_date,
            body.review_due_date,
            body.status.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("evidence record not found".to_string()))?;

    if let Some(ids) = &body.related_document_ids {
        state.insert_document_links(&record.id, ids).await?;
    }

    let view = to_view(&state, record).await;
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    post,
    path = "/evidence/{id}/attest",
    params(("id" = Uuid, Path, description = "Evidence record id")),
    request_body = AttestEvidenceRequest,
    responses(
        (status = 200, description = "Attested record", body = EvidenceView),
        (status = 404, description = "Not found", body = crate::error::ErrorBody)
    )
)]
pub async fn attest_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<AttestEvidenceRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    if body.attested_by.trim().is_empty() {
        return Err(ApiError::InvalidInput("attested_by is required".to_string()));
    }

    let record = state
        .attest_evidence(
            &organization.id,
            &path,
            body.attested_by.trim(),
            body.attestation_note.as_deref(),
        )
        .await?
        .ok_or_else(|| ApiError::NotFound("evidence record not found".to_string()))?;

    info!("evidence {} attested by {}", record.id, body.attested_by);
    let view = to_view(&state, record).await;
    Ok(HttpResponse::Ok().json(view))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    delete,
    path = "/evidence/{id}",
    params(("id" = Uuid, Path, description = "Evidence record id")),
    responses(
        (status = 204, description = "Record soft-deleted"),
        (status = 404, description = "Not found", body = crate::error::ErrorBody)
    )
)]
pub async fn delete_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let deleted = state.soft_delete_evidence(&organization.id, &path).await?;
    if !deleted {
        return Err(ApiError::NotFound("evidence record not found".to_string()));
    }
    // The uploaded object stays in the bucket so the record can be restored
    // by support if needed.
    Ok(HttpResponse::NoContent().finish())
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EvidenceFilterQuery {
    pub question_id: Option<String>,
    pub hipaa_category: Option<String>,
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    get,
    path = "/evidence/by-document/{document_type}",
    params(
        ("document_type" = String, Path, description = "Policy document type, e.g. sra-policy")
    ),
    responses(
        (status = 200, description = "Evidence linked to the document, newest first", body = [EvidenceView]),
        (status = 400, description = "Unknown document type", body = crate::error::ErrorBody)
    )
)]
pub async fn evidence_by_document(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let document_type = DocumentType::parse(&path).ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "unknown document type '{}'; supported: {}",
            path,
            DocumentType::supported_values()
        ))
    })?;

    let linked = state
        .evidence_linked_by_table(&organization.id, document_type.as_str())
        .await?;
    let referenced = state
        .evidence_linked_by_array(&organization.id, document_type.as_str())
        .await?;
    let merged = merge_evidence_sources(linked, referenced);

    Ok(HttpResponse::Ok().json(to_views(&state, merged).await))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Evidence",
    get,
    path = "/evidence/search",
    params(
        ("question_id" = Option<String>, Query, description = "Assessment question id, e.g. q4"),
        ("hipaa_category" = Option<String>, Query, description = "HIPAA safeguard citation, e.g. 164.312(a)")
    ),
    responses(
        (status = 200, description = "Matching evidence, newest first", body = [EvidenceView]),
        (status = 400, description = "No filter supplied", body = crate::error::ErrorBody)
    )
)]
pub async fn search_evidence(
    req: HttpRequest,
    state: web::Data<AppState>,
    query: web::Query<EvidenceFilterQuery>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let records = if let Some(question_id) = &query.question_id {
        state
            .evidence_by_question(&organization.id, question_id)
            .await?
    } else if let Some(category) = &query.hipaa_category {
        state
            .evidence_by_safeguard(&organization.id, category)
            .await?
    } else {
        return Err(ApiError::InvalidInput(
            "supply question_id or hipaa_category".to_string(),
        ));
    };

    Ok(HttpResponse::Ok().json(to_views(&state, records).await))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/evidence")
            .route(web::get().to(list_evidence))
            .route(web::post().to(upload_evidence)),
    )
    .service(web::resource("/evidence/search").route(web::get().to(search_evidence)))
    .service(
        web::resource("/evidence/by-document/{document_type}")
            .route(web::get().to(evidence_by_document)),
    )
    .service(
        web::resource("/evidence/{id}")
            .route(web::get().to(get_evidence))
            .route(web::put().to(update_evidence))
            .route(web::delete().to(delete_evidence)),
    )
    .service(web::resource("/evidence/{id}/attest").route(web::post().to(attest_evidence)));
}
