use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;

use crate::api::handlers::{
    admin::admin_rebuild,
    fighters::{get_fighter, get_trend},
    health,
    leaderboard::{get_current, get_peak},
    AppState,
};

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(health))
        .route("/api/current", get(get_current))
        .route("/api/peak", get(get_peak))
        .route("/api/trends/:name", get(get_trend))
        .route("/api/fighter/:name", get(get_fighter))
        .route("/api/admin/rebuild", post(admin_rebuild))
        .with_state(state)
}
