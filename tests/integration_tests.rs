// Integration tests for Fruit Match

use actix_web::{error, test as actix_test, web, App};
use fruit_match::config::{ExplainerSettings, MatchingSettings};
use fruit_match::core::Matcher;
use fruit_match::models::{
    Attributes, FruitKind, FruitRecord, NumericRange, Preferences, ShineFactor,
};
use fruit_match::routes::{self, AppState};
use fruit_match::services::{Explainer, MemoryStore};
use serde_json::{json, Value};
use std::sync::Arc;

fn create_test_fruit(id: &str, kind: FruitKind, attributes: Attributes, preferences: Preferences) -> FruitRecord {
    FruitRecord {
        id: id.to_string(),
        kind,
        attributes,
        preferences,
        created_at: chrono::Utc::now(),
    }
}

fn ideal_orange() -> Attributes {
    Attributes {
        size: Some(7.0),
        weight: Some(200.0),
        has_stem: Some(true),
        has_leaf: Some(true),
        has_worm: Some(false),
        shine_factor: Some(ShineFactor::Shiny),
        has_chemicals: Some(false),
    }
}

fn picky_apple() -> Preferences {
    Preferences::new()
        .size(NumericRange::between(6.0, 8.0).unwrap())
        .has_worm(false)
        .has_chemicals(false)
}

fn apple_attributes() -> Attributes {
    Attributes {
        size: Some(6.5),
        weight: Some(160.0),
        has_stem: Some(true),
        has_leaf: Some(false),
        has_worm: Some(false),
        shine_factor: Some(ShineFactor::Neutral),
        has_chemicals: Some(false),
    }
}

/// Pool order is worst-first so the ranking has to reorder it
fn three_oranges() -> Vec<FruitRecord> {
    vec![
        create_test_fruit(
            "orange:wormy",
            FruitKind::Orange,
            Attributes { has_worm: Some(true), ..ideal_orange() },
            Preferences::new(),
        ),
        create_test_fruit(
            "orange:huge",
            FruitKind::Orange,
            Attributes { size: Some(13.5), ..ideal_orange() },
            Preferences::new(),
        ),
        create_test_fruit("orange:perfect", FruitKind::Orange, ideal_orange(), Preferences::new()),
    ]
}

fn test_state(store: MemoryStore) -> AppState {
    AppState {
        store: Arc::new(store),
        matcher: Matcher::default(),
        explainer: Arc::new(Explainer::new(&ExplainerSettings::default()).unwrap()),
        matching: MatchingSettings::default(),
    }
}

fn path_error(err: error::PathError, _req: &actix_web::HttpRequest) -> actix_web::Error {
    error::ErrorBadRequest(err.to_string())
}

macro_rules! test_app {
    ($state:expr) => {
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($state))
                .app_data(web::PathConfig::default().error_handler(path_error))
                .configure(routes::configure_routes),
        )
        .await
    };
}

#[test]
fn test_end_to_end_ranking() {
    let matcher = Matcher::with_default_tables();

    let results = matcher.rank(FruitKind::Apple, &picky_apple(), &apple_attributes(), three_oranges());

    let ids: Vec<&str> = results.iter().map(|r| r.fruit.id.as_str()).collect();
    assert_eq!(ids, ["orange:perfect", "orange:huge", "orange:wormy"]);
    assert_eq!(results[0].score, 100);

    for pair in results.windows(2) {
        assert!(pair[0].score > pair[1].score);
    }
}

#[test]
fn test_candidates_without_preferences_are_fully_satisfied() {
    let matcher = Matcher::default();

    let results = matcher.rank(FruitKind::Apple, &picky_apple(), &apple_attributes(), three_oranges());

    assert!(results.iter().all(|r| r.their_score == 100));
    assert!(results.iter().all(|r| r.their_breakdown.is_empty()));
}

#[test]
fn test_mutual_symmetry_through_matcher() {
    let matcher = Matcher::default();
    let orange_prefs = Preferences::new().has_stem(false).weight(NumericRange::at_least(180.0).unwrap());

    let forward = matcher.mutual(&picky_apple(), &apple_attributes(), &orange_prefs, &ideal_orange());
    let reverse = matcher.mutual(&orange_prefs, &ideal_orange(), &picky_apple(), &apple_attributes());

    assert_eq!(forward.mutual, reverse.mutual);
    assert_eq!(forward.our_score(), reverse.their_score());
    assert_eq!(forward.their_score(), reverse.our_score());
}

#[test]
fn test_find_matches_truncates_after_ranking() {
    let matcher = Matcher::default();

    let result = matcher.find_matches(FruitKind::Apple, &picky_apple(), &apple_attributes(), three_oranges(), 1);

    assert_eq!(result.total_candidates, 3);
    assert_eq!(result.matches.len(), 1);
    assert_eq!(result.matches[0].fruit.id, "orange:perfect");
}

#[actix_web::test]
async fn test_health_endpoint() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["status"], "healthy");
    assert_eq!(body["apples"], 0);
    assert_eq!(body["oranges"], 0);
}

#[actix_web::test]
async fn test_create_and_list_fruit() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/fruits/orange")
        .set_json(json!({
            "attributes": { "size": 7.5, "hasWorm": false, "shineFactor": "extraShiny" },
            "preferences": { "size": { "min": 5, "max": 9 }, "shineFactor": ["shiny", "extraShiny"] }
        }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);

    let created: Value = actix_test::read_body_json(resp).await;
    assert!(created["id"].as_str().unwrap().starts_with("orange:"));
    assert_eq!(created["attributes"]["shineFactor"], "extraShiny");
    assert_eq!(created["attributes"]["weight"], Value::Null);

    let req = actix_test::TestRequest::get().uri("/api/v1/fruits/orange").to_request();
    let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed.as_array().unwrap().len(), 1);

    let req = actix_test::TestRequest::get().uri("/api/v1/fruits/apple").to_request();
    let listed: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert!(listed.as_array().unwrap().is_empty());

    let uri = format!("/api/v1/fruits/orange/{}", created["id"].as_str().unwrap());
    let req = actix_test::TestRequest::get().uri(&uri).to_request();
    let fetched: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(fetched["id"], created["id"]);
}

#[actix_web::test]
async fn test_missing_fruit_is_not_found() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::get().uri("/api/v1/fruits/apple/apple:missing").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 404);
}

#[actix_web::test]
async fn test_rejects_malformed_preferences() {
    let app = test_app!(test_state(MemoryStore::new()));

    let bad_bodies = [
        json!({ "preferences": { "size": { "min": 9, "max": 5 } } }),
        json!({ "preferences": { "hasWings": true } }),
        json!({ "preferences": { "shineFactor": [] } }),
        json!({ "preferences": { "hasWorm": "no" } }),
        json!({ "attributes": { "shineFactor": "sparkly" } }),
    ];

    for body in bad_bodies {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/fruits/apple")
            .set_json(&body)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "body {} should be rejected", body);
    }
}

#[actix_web::test]
async fn test_unknown_kind_is_rejected() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::get().uri("/api/v1/fruits/banana").to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);
}

#[actix_web::test]
async fn test_find_matches_endpoint() {
    let store = MemoryStore::new();
    store.seed(three_oranges()).await;
    let app = test_app!(test_state(store));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({
            "kind": "apple",
            "attributes": { "size": 6.5, "weight": 160, "hasWorm": false, "hasChemicals": false },
            "preferences": { "size": { "min": 6, "max": 8 }, "hasWorm": false, "hasChemicals": false },
            "limit": 2
        }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalCandidates"], 3);
    let matches = body["matches"].as_array().unwrap();
    assert_eq!(matches.len(), 2);
    assert_eq!(matches[0]["id"], "orange:perfect");
    assert_eq!(matches[0]["score"], 100);
    assert_eq!(matches[0]["breakdown"]["our"].as_array().unwrap().len(), 3);
    assert_eq!(matches[1]["id"], "orange:huge");

    // Finding never stores the searching fruit
    let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
    let health: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["apples"], 0);
}

#[actix_web::test]
async fn test_find_matches_rejects_zero_limit() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/matches/find")
        .set_json(json!({ "kind": "orange", "limit": 0 }))
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 400);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["statusCode"], 400);
}

#[actix_web::test]
async fn test_incoming_fruit_uses_fallback_explanation() {
    let store = MemoryStore::new();
    store.seed(three_oranges()).await;
    let app = test_app!(test_state(store));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/fruits/apple/incoming")
        .to_request();
    let resp = actix_test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = actix_test::read_body_json(resp).await;
    assert_eq!(body["fruit"]["kind"], "apple");
    assert_eq!(body["totalCandidates"], 3);
    assert_eq!(body["matches"].as_array().unwrap().len(), 3);
    assert!(body["communication"]["attributes"].as_str().is_some());
    assert!(body["communication"]["preferences"].as_str().is_some());

    let fallback = body["explanation"]["fallbackExplanations"].as_array().unwrap();
    assert_eq!(fallback.len(), 3);
    assert_eq!(fallback[0]["matchRank"], 1);
    assert_eq!(fallback[0]["matchId"], body["matches"][0]["id"]);

    let req = actix_test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let dashboard: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(dashboard["totalApples"], 1);
    assert_eq!(dashboard["totalOranges"], 3);
    assert_eq!(dashboard["overview"]["conversations"], 1);
}

#[actix_web::test]
async fn test_incoming_fruit_respects_limit() {
    let store = MemoryStore::new();
    store.seed(three_oranges()).await;
    let app = test_app!(test_state(store));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/fruits/apple/incoming")
        .set_json(json!({ "limit": 1 }))
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalCandidates"], 3);
    assert_eq!(body["matches"].as_array().unwrap().len(), 1);
}

#[actix_web::test]
async fn test_incoming_fruit_rejects_malformed_body() {
    let store = MemoryStore::new();
    store.seed(three_oranges()).await;
    let app = test_app!(test_state(store));

    let bad_bodies = [r#"{"limit":300}"#, r#"{"limit":"two"}"#, r#"{"limt":1}"#, r#"{"limit":0}"#, "{"];

    for body in bad_bodies {
        let req = actix_test::TestRequest::post()
            .uri("/api/v1/fruits/apple/incoming")
            .insert_header(("content-type", "application/json"))
            .set_payload(body)
            .to_request();
        let resp = actix_test::call_service(&app, req).await;
        assert_eq!(resp.status(), 400, "body {} should be rejected", body);

        let error: Value = actix_test::read_body_json(resp).await;
        assert_eq!(error["statusCode"], 400);
    }

    // Nothing was generated or stored for the rejected requests
    let req = actix_test::TestRequest::get().uri("/api/v1/health").to_request();
    let health: Value = actix_test::call_and_read_body_json(&app, req).await;
    assert_eq!(health["apples"], 0);
}

#[actix_web::test]
async fn test_incoming_fruit_with_empty_pool() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::post()
        .uri("/api/v1/fruits/orange/incoming")
        .to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalCandidates"], 0);
    assert!(body["matches"].as_array().unwrap().is_empty());
    assert!(body["explanation"]["fallbackExplanations"].as_array().unwrap().is_empty());
}

#[actix_web::test]
async fn test_dashboard_on_empty_store() {
    let app = test_app!(test_state(MemoryStore::new()));

    let req = actix_test::TestRequest::get().uri("/api/v1/dashboard").to_request();
    let body: Value = actix_test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["totalApples"], 0);
    assert_eq!(body["overview"]["conversations"], 0);
    assert_eq!(body["overview"]["averageScore"], Value::Null);
}
