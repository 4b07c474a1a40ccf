use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use fight_elo::api::handlers::AppState;
use fight_elo::api::routes::create_router;
use fight_elo::config::settings::AppConfig;
use fight_elo::database;
use fight_elo::query::QueryService;
use fight_elo::services::ingestion::IngestionService;
use fight_elo::services::processing::rebuild_from_database;
use fight_elo::store::RatingStore;

fn app() -> (TempDir, Router) {
    let dir = tempfile::tempdir().unwrap();
    let config = AppConfig::default()
        .with_database_path(dir.path().join("ledger.db").to_string_lossy());
    let fixture = Path::new(env!("CARGO_MANIFEST_DIR")).join("tests/fixtures/fights.csv");
    IngestionService::new(&config)
        .unwrap()
        .run(&fixture, false)
        .unwrap();

    let pool = database::create_pool(&config.storage.database_path).unwrap();
    let store = Arc::new(RatingStore::new(config.rating.clone()));
    rebuild_from_database(&pool, &store).unwrap();

    let state = Arc::new(AppState {
        pool,
        queries: Arc::new(QueryService::new(store)),
    });
    (dir, create_router(state))
}

async fn call(app: &Router, method: Method, uri: &str) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
}

#[tokio::test]
async fn current_leaderboard_is_sorted_and_tagged() {
    let (_dir, app) = app();
    let (status, body) = call(&app, Method::GET, "/api/current").await;
    assert_eq!(status, StatusCode::OK);

    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 4);
    assert_eq!(rows[0]["Fighter"], "Royce Gracie");
    assert_eq!(rows[0]["Record"], "3-0-0");
    assert_eq!(rows[0]["Weight Class"], "Open Weight");
    let elos: Vec<f64> = rows.iter().map(|r| r["Elo"].as_f64().unwrap()).collect();
    assert!(elos.windows(2).all(|w| w[0] >= w[1]));
}

#[tokio::test]
async fn leaderboard_params_filter_and_limit() {
    let (_dir, app) = app();

    let (_, body) = call(&app, Method::GET, "/api/current?limit=2&weight_class=all").await;
    assert_eq!(body.as_array().unwrap().len(), 2);

    let (_, body) = call(&app, Method::GET, "/api/peak?search=smith").await;
    let rows = body.as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["Fighter"], "Patrick Smith");
    assert_eq!(rows[0]["Peak Elo"], 1500.0);
    assert!(rows[0].get("Elo").is_none());

    let (_, body) = call(&app, Method::GET, "/api/current?weight_class=Flyweight").await;
    assert!(body.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn trend_lists_fights_in_order() {
    let (_dir, app) = app();
    let (status, body) = call(&app, Method::GET, "/api/trends/Ken%20Shamrock").await;
    assert_eq!(status, StatusCode::OK);

    let points = body.as_array().unwrap();
    assert_eq!(points.len(), 2);
    assert_eq!(points[0]["Date"], "1993-11-12");
    assert_eq!(points[0]["Opponent"], "Royce Gracie");
    assert_eq!(points[0]["Result"], "Loss");
    assert_eq!(points[0]["EloBefore"], 1500.0);
    assert_eq!(points[0]["EloAfter"], 1484.0);
    assert_eq!(points[0]["EloChange"], -16.0);
    assert_eq!(points[1]["Result"], "No Contest");
    assert_eq!(points[1]["EloChange"], 0.0);
}

#[tokio::test]
async fn unknown_fighter_is_404() {
    let (_dir, app) = app();
    let (status, body) = call(&app, Method::GET, "/api/trends/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(body["error"].as_str().unwrap().contains("Nobody"));

    let (status, _) = call(&app, Method::GET, "/api/fighter/Nobody").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn fighter_summary_by_name() {
    let (_dir, app) = app();
    let (status, body) = call(&app, Method::GET, "/api/fighter/royce%20gracie").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["Fighter"], "Royce Gracie");
    assert_eq!(body["Status"], "Champion (1 defenses)");
    assert_eq!(body["Last_Fight"], "1994-03-11");
}

#[tokio::test]
async fn admin_rebuild_reports_counts() {
    let (_dir, app) = app();
    let (status, body) = call(&app, Method::POST, "/api/admin/rebuild").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["fighters"], 4);
    assert_eq!(body["bouts"], 4);
}

#[tokio::test]
async fn health_check() {
    let (_dir, app) = app();
    let response = app
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
}
