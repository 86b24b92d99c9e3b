use actix_web::{http::StatusCode, web, HttpResponse, Responder};
use validator::Validate;

use crate::models::{
    Conversation, CreateFruitRequest, FruitKind, IncomingFruitRequest, IncomingFruitResponse,
    MatchOutcome, MatchSummary,
};
use crate::routes::{error_response, store_error, validation_error, AppState};
use crate::services::{generate_fruit, FruitContext};

/// Configure fruit routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/fruits/{kind}", web::post().to(create_fruit))
        .route("/fruits/{kind}", web::get().to(list_fruits))
        .route("/fruits/{kind}/incoming", web::post().to(incoming_fruit))
        .route("/fruits/{kind}/{id}", web::get().to(get_fruit));
}

/// Store a fruit
///
/// POST /api/v1/fruits/{kind}
async fn create_fruit(
    state: web::Data<AppState>,
    kind: web::Path<FruitKind>,
    req: web::Json<CreateFruitRequest>,
) -> impl Responder {
    let kind = kind.into_inner();
    let req = req.into_inner();

    match state.store.store(kind, req.attributes, req.preferences).await {
        Ok(record) => {
            tracing::info!("Stored new {} {}", kind, record.id);
            HttpResponse::Created().json(record)
        }
        Err(e) => store_error("Failed to store fruit", e),
    }
}

/// All stored fruit of one kind
///
/// GET /api/v1/fruits/{kind}
async fn list_fruits(state: web::Data<AppState>, kind: web::Path<FruitKind>) -> impl Responder {
    match state.store.list(kind.into_inner()).await {
        Ok(records) => HttpResponse::Ok().json(records),
        Err(e) => store_error("Failed to list fruits", e),
    }
}

/// GET /api/v1/fruits/{kind}/{id}
async fn get_fruit(state: web::Data<AppState>, path: web::Path<(FruitKind, String)>) -> impl Responder {
    let (kind, id) = path.into_inner();

    match state.store.get(kind, &id).await {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => store_error("Failed to load fruit", e),
    }
}

/// Incoming fruit endpoint
///
/// POST /api/v1/fruits/{kind}/incoming
///
/// The body is optional; an empty body uses the default limit.
///
/// 1. Generate a new fruit of the given kind
/// 2. Store it
/// 3. Rank it against every stored fruit of the opposite kind
/// 4. Explain the top matches
/// 5. Record the round in the match history
async fn incoming_fruit(
    state: web::Data<AppState>,
    kind: web::Path<FruitKind>,
    body: web::Bytes,
) -> impl Responder {
    let kind = kind.into_inner();
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        IncomingFruitRequest::default()
    } else {
        match serde_json::from_slice::<IncomingFruitRequest>(&body) {
            Ok(req) => req,
            Err(e) => {
                tracing::info!("Rejected incoming {} request body: {}", kind, e);
                return error_response(StatusCode::BAD_REQUEST, "invalid_json", format!("Invalid JSON: {}", e));
            }
        }
    };

    if let Err(errors) = req.validate() {
        return validation_error(errors);
    }
    let limit = state.matching.effective_limit(req.limit);

    let generated = generate_fruit(kind);

    let record = match state
        .store
        .store(kind, generated.attributes, generated.preferences.clone())
        .await
    {
        Ok(record) => record,
        Err(e) => return store_error("Failed to store incoming fruit", e),
    };

    let candidates = match state.store.list(kind.opposite()).await {
        Ok(candidates) => candidates,
        Err(e) => return store_error("Failed to load candidates", e),
    };

    let result = state.matcher.find_matches(
        kind,
        &record.preferences,
        &record.attributes,
        candidates,
        limit,
    );

    let explanation = state
        .explainer
        .explain(FruitContext::from(&generated), &result.matches)
        .await;

    let conversation = Conversation {
        fruit_id: record.id.clone(),
        kind,
        matches: result.matches.iter().map(MatchOutcome::from).collect(),
        created_at: chrono::Utc::now(),
    };
    if let Err(e) = state.store.record_conversation(conversation).await {
        tracing::warn!("Failed to record match history for {}: {}", record.id, e);
    }

    tracing::info!(
        "Incoming {} {} matched {} of {} candidates (explanation: {})",
        kind,
        record.id,
        result.matches.len(),
        result.total_candidates,
        if explanation.is_fallback() { "fallback" } else { "generated" }
    );

    HttpResponse::Ok().json(IncomingFruitResponse {
        fruit: record,
        communication: generated.communication,
        matches: result.matches.into_iter().map(MatchSummary::from).collect(),
        total_candidates: result.total_candidates,
        explanation,
    })
}
