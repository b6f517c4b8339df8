use actix_web::{web, HttpRequest, HttpResponse};
use log::info;

use crate::auth::middleware::validate_request_token;
use crate::db::AppState;
use crate::error::ApiError;
use crate::organization::model::OrganizationData;

#[utoipa::path(
    context_path = "/api",
    tag = "Organization",
    get,
    path = "/organization",
    responses(
        (status = 200, description = "Organization profile for the authenticated user", body = OrganizationData),
        (status = 401, description = "No valid session", body = crate::error::ErrorBody),
        (status = 404, description = "Organization not found", body = crate::error::ErrorBody)
    )
)]
pub async fn get_organization(
    req: HttpRequest,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ApiError> {
    let claims = validate_request_token(&req)?;
    info!("fetching organization profile for user {}", claims.sub);

    let organization = state
        .get_organization_cached(&claims.sub)
        .await?
        .ok_or_else(|| {
            ApiError::NotFound("organization not found; complete onboarding first".to_string())
        })?;

    Ok(HttpResponse::Ok().json(organization))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/organization").route(web::get().to(get_organization)));
}
