// Route exports
pub mod fruits;
pub mod matches;

use actix_web::{http::StatusCode, web, HttpResponse};
use std::sync::Arc;

use crate::config::MatchingSettings;
use crate::core::Matcher;
use crate::models::ErrorResponse;
use crate::services::{Explainer, FruitStore, StoreError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn FruitStore>,
    pub matcher: Matcher,
    pub explainer: Arc<Explainer>,
    pub matching: MatchingSettings,
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(fruits::configure),
    );
}

pub(crate) fn error_response(status: StatusCode, error: &str, message: String) -> HttpResponse {
    HttpResponse::build(status).json(ErrorResponse {
        error: error.to_string(),
        message,
        status_code: status.as_u16(),
    })
}

pub(crate) fn validation_error(errors: validator::ValidationErrors) -> HttpResponse {
    error_response(StatusCode::BAD_REQUEST, "Validation failed", errors.to_string())
}

pub(crate) fn store_error(context: &str, err: StoreError) -> HttpResponse {
    tracing::error!("{}: {}", context, err);
    let status = match err {
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
    };
    error_response(status, context, err.to_string())
}
