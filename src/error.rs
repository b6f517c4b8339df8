//! Request-level error taxonomy.
//!
//! Every handler failure maps onto one of these variants; the
//! `ResponseError` impl renders the JSON `{ error, details }` body the
//! frontend expects and attaches rate-limit headers on 429.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;

/// JSON body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorBody {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    /// Missing or malformed request fields. Never retried.
    #[error("{0}")]
    InvalidInput(String),

    /// No valid session token on the request.
    #[error("missing or invalid session token")]
    Unauthorized,

    /// A required record (usually the organization) does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Token bucket for this user is empty.
    #[error("rate limit exceeded, retry after {reset_after} seconds")]
    RateLimited {
        limit: u32,
        remaining: u32,
        reset_after: u64,
    },

    /// A required database read failed. Optional reads (evidence, signed
    /// URLs) are degraded in place and never surface here.
    #[error("upstream data store failure")]
    Database(#[from] sqlx::Error),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let details = match self {
            ApiError::Database(source) => Some(source.to_string()),
            _ => None,
        };
        let body = ErrorBody {
            error: self.to_string(),
            details,
        };

        let mut builder = HttpResponse::build(self.status_code());
        if let ApiError::RateLimited {
            limit,
            remaining,
            reset_after,
        } = self
        {
            builder
                .insert_header(("Retry-After", reset_after.to_string()))
                .insert_header(("X-RateLimit-Limit", limit.to_string()))
                .insert_header(("X-RateLimit-Remaining", remaining.to_string()))
                .insert_header(("X-RateLimit-Reset", reset_after.to_string()));
        }
        builder.json(body)
    }
}
