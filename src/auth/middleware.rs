use actix_web::HttpRequest;

use super::jwt::validate_token;
use super::model::Claims;
use crate::error::ApiError;

/// Extract the bearer token from the Authorization header.
fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer ").map(|t| t.to_string()))
}

/// Validate the session token on a request and return its claims.
pub fn validate_request_token(req: &HttpRequest) -> Result<Claims, ApiError> {
    let token = extract_token(req).ok_or(ApiError::Unauthorized)?;

    validate_token(&token).map_err(|e| {
        log::warn!("session token validation failed: {:?}", e);
        ApiError::Unauthorized
    })
}
