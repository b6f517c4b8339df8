use actix_web::{web, HttpRequest, HttpResponse};
use chrono::Utc;
use log::{info, warn};
use uuid::Uuid;

use crate::auth::middleware::validate_request_token;
use crate::db::AppState;
use crate::error::ApiError;
use crate::generation::cleanup::{cleanup, force_strip};
use crate::generation::formatter::format_print_document;
use crate::generation::injector::inject_values;
use crate::generation::templates::BREACH_NOTIFICATION_LETTER_TEMPLATE;
use crate::incident::model::{
    is_valid_incident_status, CreateIncidentRequest, IncidentRecord, NotificationLetterResponse,
    UpdateIncidentRequest, INCIDENT_STATUSES,
};
use crate::organization::model::OrganizationData;

async fn require_organization(
    state: &AppState,
    user_id: &str,
) -> Result<OrganizationData, ApiError> {
    state.get_organization_cached(user_id).await?.ok_or_else(|| {
        ApiError::NotFound("organization not found; complete onboarding first".to_string())
    })
}

#[utoipa::path(
    context_path = "/api",
    tag = "Incidents",
    get,
    path = "/incidents",
    responses(
        (status = 200, description = "Incident log, most recently discovered first", body = [IncidentRecord]),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody)
    )
)]
pub async fn list_incidents(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let incidents = state.list_incidents(&organization.id).await?;
    Ok(HttpResponse::Ok().json(incidents))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Incidents",
    post,
    path = "/incidents",
    request_body = CreateIncidentRequest,
    responses(
        (status = 201, description = "Incident logged", body = IncidentRecord),
        (status = 400, description = "Invalid incident", body = crate::error::ErrorBody)
    )
)]
pub async fn create_incident(
    req: HttpRequest,
    state: web::Data<AppState>,
    body: web::Json<CreateIncidentRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    if body.description.trim().is_empty() {
        return Err(ApiError::InvalidInput("description is required".to_string()));
    }
    if body.discovery_date < body.incident_date {
        return Err(ApiError::InvalidInput(
            "discovery_date cannot precede incident_date".to_string(),
        ));
    }

    let incident = state
        .insert_incident(
            &organization.id,
            body.description.trim(),
            body.incident_date,
            body.discovery_date,
            body.affected_individuals,
            body.phi_involved,
        )
        .await?;

    info!(
        "incident {} logged for organization {}",
        incident.id, organization.id
    );
    Ok(HttpResponse::Created().json(incident))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Incidents",
    put,
    path = "/incidents/{id}",
    params(("id" = Uuid, Path, description = "Incident id")),
    request_body = UpdateIncidentRequest,
    responses(
        (status = 200, description = "Updated incident", body = IncidentRecord),
        (status = 400, description = "Unknown status", body = crate::error::ErrorBody),
        (status = 404, description = "Incident not found", body = crate::error::ErrorBody)
    )
)]
pub async fn update_incident(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<UpdateIncidentRequest>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    if !is_valid_incident_status(&body.status) {
        return Err(ApiError::InvalidInput(format!(
            "unknown status '{}'; supported: {}",
            body.status,
            INCIDENT_STATUSES.join(", ")
        )));
    }

    let incident = state
        .update_incident_status(&organization.id, &path, &body.status)
        .await?
        .ok_or_else(|| ApiError::NotFound("incident not found".to_string()))?;

    info!("incident {} moved to {}", incident.id, incident.status);
    Ok(HttpResponse::Ok().json(incident))
}

#[utoipa::path(
    context_path = "/api",
    tag = "Incidents",
    post,
    path = "/incidents/{id}/notification-letter",
    params(("id" = Uuid, Path, description = "Incident id")),
    responses(
        (status = 200, description = "Generated breach notification letter", body = NotificationLetterResponse),
        (status = 404, description = "Incident not found", body = crate::error::ErrorBody)
    )
)]
pub async fn generate_notification_letter(
    req: HttpRequest,
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    let organization = require_organization(&state, &claims.sub).await?;

    let incident = state
        .get_incident_by_id(&organization.id, &path)
        .await?
        .ok_or_else(|| ApiError::NotFound("incident not found".to_string()))?;

    let notification_date = Utc::now().date_naive();
    let values = [
        ("INCIDENT_DESCRIPTION", incident.description.clone()),
        (
            "INCIDENT_DATE",
            incident.incident_date.format("%B %-d, %Y").to_string(),
        ),
        (
            "DISCOVERY_DATE",
            incident.discovery_date.format("%B %-d, %Y").to_string(),
        ),
        (
            "NOTIFICATION_DATE",
            notification_date.format("%B %-d, %Y").to_string(),
        ),
    ];

    let letter = inject_values(BREACH_NOTIFICATION_LETTER_TEMPLATE, &values, &organization);
    // Cleanup is idempotent; running it twice also covers tokens that only
    // surface after the first default substitution.
    let mut letter = cleanup(&cleanup(&letter));
    if letter.contains("{{") {
        warn!(
            "unresolved placeholders in notification letter for incident {}",
            incident.id
        );
        letter = force_strip(&letter);
    }

    let formatted_letter =
        format_print_document(&letter, "Breach Notification Letter", Some("HIPAA-BRN-001"));

    let notification = state
        .insert_breach_notification(&incident.id, &organization.id, &letter, notification_date)
        .await?;
    crate::metrics::NOTIFICATION_LETTERS_GENERATED
        .with_label_values(&[&organization.id.to_string()])
        .inc();

    Ok(HttpResponse::Ok().json(NotificationLetterResponse {
        success: true,
        letter,
        formatted_letter,
        notification,
    }))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/incidents")
            .route(web::get().to(list_incidents))
            .route(web::post().to(create_incident)),
    )
    .service(web::resource("/incidents/{id}").route(web::put().to(update_incident)))
    .service(
        web::resource("/incidents/{id}/notification-letter")
            .route(web::post().to(generate_notification_letter)),
    );
}
