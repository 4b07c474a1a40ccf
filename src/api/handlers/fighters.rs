use axum::{
    extract::{Path, State},
    response::{IntoResponse, Json, Response},
};
use std::sync::Arc;

use super::{rating_error_response, AppState};
use crate::api::models::TrendEntry;

pub async fn get_trend(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    match state.queries.trend_by_name(&name) {
        Ok(trend) => {
            let entries: Vec<TrendEntry> = trend.points.into_iter().map(TrendEntry::from).collect();
            Json(entries).into_response()
        }
        Err(e) => rating_error_response(e),
    }
}

pub async fn get_fighter(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> Response {
    let summary = state
        .queries
        .fighter_by_name(&name)
        .and_then(|id| state.queries.summary(id));

    match summary {
        Ok(entry) => Json(entry).into_response(),
        Err(e) => rating_error_response(e),
    }
}
