use actix_web::{web, HttpResponse, Responder};
use validator::Validate;

use crate::core::build_dashboard;
use crate::models::{FindMatchesRequest, FindMatchesResponse, FruitKind, HealthResponse, MatchSummary};
use crate::routes::{store_error, validation_error, AppState};

/// Configure health, matching and dashboard routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/find", web::post().to(find_matches))
        .route("/dashboard", web::get().to(dashboard));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> impl Responder {
    let apples = state.store.count(FruitKind::Apple).await;
    let oranges = state.store.count(FruitKind::Orange).await;

    let status = if apples.is_ok() && oranges.is_ok() { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
        apples: apples.unwrap_or(0),
        oranges: oranges.unwrap_or(0),
    })
}

/// Find matches endpoint
///
/// POST /api/v1/matches/find
///
/// Ranks an unsaved fruit against every stored fruit of the opposite kind.
///
/// Request body:
/// ```json
/// {
///   "kind": "apple",
///   "attributes": { "size": 7.2, "hasWorm": false },
///   "preferences": { "size": { "min": 6, "max": 9 }, "hasWorm": false },
///   "limit": 3
/// }
/// ```
async fn find_matches(
    state: web::Data<AppState>,
    req: web::Json<FindMatchesRequest>,
) -> impl Responder {
    if let Err(errors) = req.validate() {
        tracing::info!("Validation failed for find_matches request: {:?}", errors);
        return validation_error(errors);
    }

    let req = req.into_inner();
    let limit = state.matching.effective_limit(req.limit);

    let candidates = match state.store.list(req.kind.opposite()).await {
        Ok(candidates) => candidates,
        Err(e) => return store_error("Failed to load candidates", e),
    };

    tracing::debug!("Found {} {} candidates", candidates.len(), req.kind.opposite());

    let result = state
        .matcher
        .find_matches(req.kind, &req.preferences, &req.attributes, candidates, limit);

    tracing::info!(
        "Returning {} matches for an unsaved {} (from {} candidates)",
        result.matches.len(),
        req.kind,
        result.total_candidates
    );

    HttpResponse::Ok().json(FindMatchesResponse {
        matches: result.matches.into_iter().map(MatchSummary::from).collect(),
        total_candidates: result.total_candidates,
    })
}

/// Dashboard statistics over stored fruit and matchmaking history
async fn dashboard(state: web::Data<AppState>) -> impl Responder {
    let apples = match state.store.list(FruitKind::Apple).await {
        Ok(apples) => apples,
        Err(e) => return store_error("Failed to load apples", e),
    };
    let oranges = match state.store.list(FruitKind::Orange).await {
        Ok(oranges) => oranges,
        Err(e) => return store_error("Failed to load oranges", e),
    };
    let history = match state.store.conversations().await {
        Ok(history) => history,
        Err(e) => return store_error("Failed to load match history", e),
    };

    HttpResponse::Ok().json(build_dashboard(&apples, &oranges, &history))
}
