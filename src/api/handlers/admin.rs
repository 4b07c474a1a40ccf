use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::{error, info};
use std::sync::Arc;

use super::{error_response, rating_error_response, AppState};
use crate::api::models::RebuildResponse;
use crate::errors::RatingError;
use crate::services::processing::rebuild_from_database;

/// Reloads the ledger from the database and swaps in a freshly replayed
/// snapshot. The served snapshot is untouched when the rebuild fails.
pub async fn admin_rebuild(State(state): State<Arc<AppState>>) -> Response {
    info!("Admin triggered rebuild started");

    let pool = state.pool.clone();
    let store = state.queries.store().clone();
    let result = tokio::task::spawn_blocking(move || rebuild_from_database(&pool, &store)).await;

    match result {
        Ok(Ok(snapshot)) => {
            info!("Admin triggered rebuild completed successfully");
            Json(RebuildResponse {
                fighters: snapshot.fighter_count(),
                bouts: snapshot.bouts_processed(),
            })
            .into_response()
        }
        Ok(Err(e)) => match e.downcast::<RatingError>() {
            Ok(rating_err) => rating_error_response(rating_err),
            Err(e) => {
                error!("Rebuild failed: {:?}", e);
                error_response(StatusCode::INTERNAL_SERVER_ERROR, e.to_string())
            }
        },
        Err(join_err) => {
            error!("Rebuild task panicked: {}", join_err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Rebuild task failed")
        }
    }
}
