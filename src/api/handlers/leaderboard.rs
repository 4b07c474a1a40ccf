use axum::{
    extract::{Query, State},
    response::Json,
};
use std::sync::Arc;

use super::AppState;
use crate::api::models::LeaderboardParams;
use crate::query::{LeaderboardEntry, LeaderboardKind};

pub async fn get_current(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> Json<Vec<LeaderboardEntry>> {
    leaderboard(&state, LeaderboardKind::Current, &params)
}

pub async fn get_peak(
    State(state): State<Arc<AppState>>,
    Query(params): Query<LeaderboardParams>,
) -> Json<Vec<LeaderboardEntry>> {
    leaderboard(&state, LeaderboardKind::Peak, &params)
}

fn leaderboard(
    state: &AppState,
    kind: LeaderboardKind,
    params: &LeaderboardParams,
) -> Json<Vec<LeaderboardEntry>> {
    Json(
        state
            .queries
            .leaderboard_filtered(kind, &params.filter(), params.limit()),
    )
}
