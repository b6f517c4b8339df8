use actix_web::{web, HttpRequest, HttpResponse};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use utoipa::ToSchema;

use crate::auth::middleware::validate_request_token;
use crate::db::AppState;
use crate::error::ApiError;
use crate::evidence::locator::{filter_citable, merge_evidence_sources, resolve_download_urls};
use crate::generation::injector::EvidenceLine;
use crate::generation::normalizer::EvidenceBundle;
use crate::generation::{
    normalize_answers, render_policy_document, DocumentType, RemediationAction,
};
use crate::ratelimit::RateLimiter;

#[derive(Debug, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentRequest {
    /// One of the supported document types, e.g. `sra-policy`.
    pub document_type: String,
    /// Answers keyed by question id (`q1`..`q18`). Merged over any stored
    /// onboarding answers, with request values winning.
    #[serde(default)]
    pub answers: Option<serde_json::Value>,
    /// Optional per-question evidence bundles. When present they replace
    /// the stored evidence lookup for this request.
    #[serde(default)]
    pub evidence_data: Option<HashMap<String, EvidenceBundle>>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GenerateDocumentResponse {
    pub success: bool,
    /// Plain-text policy document with every placeholder resolved.
    pub document: String,
    /// Print-ready A4 HTML rendering of the same document.
    pub formatted_document: String,
    pub document_type: String,
    pub remediation_actions: Vec<RemediationAction>,
    pub field_count: usize,
}

/// Evidence cited inside a generated document. Pulled from both link
/// representations, restricted to currently-valid records, with signed
/// URLs minted best-effort. Any failure here degrades to an empty list;
/// generation itself never fails on evidence problems.
async fn locate_document_evidence(
    state: &AppState,
    organization_id: &uuid::Uuid,
    document_type: DocumentType,
) -> Vec<EvidenceLine> {
    let linked = match state
        .evidence_linked_by_table(organization_id, document_type.as_str())
        .await
    {
        Ok(records) => records,
        Err(err) => {
            warn!("evidence link lookup failed: {}", err);
            Vec::new()
        }
    };
    let referenced = match state
        .evidence_linked_by_array(organization_id, document_type.as_str())
        .await
    {
        Ok(records) => records,
        Err(err) => {
            warn!("evidence reference lookup failed: {}", err);
            Vec::new()
        }
    };

    let today = chrono::Utc::now().date_naive();
    let citable = filter_citable(merge_evidence_sources(linked, referenced), today);
    resolve_download_urls(state.storage.as_ref(), &citable).await
}

fn bundle_evidence_lines(bundles: &HashMap<String, EvidenceBundle>) -> Vec<EvidenceLine> {
    let mut lines: Vec<EvidenceLine> = bundles
        .values()
        .flat_map(|bundle| bundle.files.iter())
        .map(|file| EvidenceLine {
            title: file.file_name.clone(),
            uploaded_at: file.uploaded_at,
            download_url: None,
        })
        .collect();
    lines.sort_by(|a, b| b.uploaded_at.cmp(&a.uploaded_at));
    lines
}

#[utoipa::path(
    context_path = "/api",
    tag = "Document Generation",
    post,
    path = "/documents/generate",
    request_body = GenerateDocumentRequest,
    responses(
        (status = 200, description = "Generated policy document", body = GenerateDocumentResponse),
        (status = 400, description = "Unknown document type or malformed answers", body = crate::error::ErrorBody),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 404, description = "Organization not found", body = crate::error::ErrorBody),
        (status = 429, description = "Rate limit exceeded", body = crate::error::ErrorBody)
    )
)]
pub async fn generate_document(
    req: HttpRequest,
    state: web::Data<AppState>,
    limiter: web::Data<RateLimiter>,
    body: web::Json<GenerateDocumentRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;

    // Rate limit before any pipeline or database work.
    let status = limiter
        .try_acquire(&claims.sub)
        .map_err(|status| ApiError::RateLimited {
            limit: status.limit,
            remaining: status.remaining,
            reset_after: status.reset_after_secs,
        })?;
    info!(
        "generation request from {} ({} remaining this window)",
        claims.sub, status.remaining
    );

    let document_type = DocumentType::parse(&body.document_type).ok_or_else(|| {
        ApiError::InvalidInput(format!(
            "unknown document type '{}'; supported: {}",
            body.document_type,
            DocumentType::supported_values()
        ))
    })?;

    let organization = state
        .get_organization_cached(&claims.sub)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("organization not found; complete onboarding first".to_string())
        })?;

    // Stored onboarding answers form the base; request answers overlay
    // them. This read is required: a failure here fails the whole request
    // rather than producing a document from partial data.
    let mut merged_answers = state.get_assessment_answers(&organization.id).await?;
    if let Some(request_answers) = &body.answers {
        let overlay = request_answers.as_object().ok_or_else(|| {
            ApiError::InvalidInput("answers must be a JSON object keyed by question id".to_string())
        })?;
        for (question_id, value) in overlay {
            merged_answers.insert(question_id.clone(), value.clone());
        }
    }
    if merged_answers.is_empty() {
        return Err(ApiError::InvalidInput(
            "no answers supplied and none stored; submit answers first".to_string(),
        ));
    }

    let bundles = body.evidence_data.clone().unwrap_or_default();
    let evidence_lines = if bundles.is_empty() {
        locate_document_evidence(&state, &organization.id, document_type).await
    } else {
        bundle_evidence_lines(&bundles)
    };

    let answers = normalize_answers(&serde_json::Value::Object(merged_answers), &bundles)?;
    let rendered = render_policy_document(document_type, &answers, &organization, &evidence_lines);

    crate::metrics::DOCUMENTS_GENERATED
        .with_label_values(&[document_type.as_str()])
        .inc();
    info!(
        "generated {} for organization {} ({} fields, {} remediation actions)",
        document_type.as_str(),
        organization.id,
        rendered.field_count,
        rendered.remediation_actions.len()
    );

    Ok(HttpResponse::Ok().json(GenerateDocumentResponse {
        success: true,
        document: rendered.document,
        formatted_document: rendered.formatted_document,
        document_type: document_type.as_str().to_string(),
        remediation_actions: rendered.remediation_actions,
        field_count: rendered.field_count,
    }))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Document Generation",
    get,
    path = "/documents/types",
    responses(
        (status = 200, description = "Supported document types with titles and policy ids")
    )
)]
pub async fn list_document_types() -> HttpResponse {
    let types: Vec<serde_json::Value> = DocumentType::ALL
        .iter()
        .map(|doc| {
            serde_json::json!({
                "documentType": doc.as_str(),
                "title": doc.title(),
                "policyId": doc.policy_id(),
            })
        })
        .collect();
    HttpResponse::Ok().json(types)
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/documents/generate").route(web::post().to(generate_document)))
        .service(web::resource("/documents/types").route(web::get().to(list_document_types)));
}
