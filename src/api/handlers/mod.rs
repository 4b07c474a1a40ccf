use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use log::error;
use std::sync::Arc;

use crate::api::models::ErrorResponse;
use crate::database::DbPool;
use crate::errors::RatingError;
use crate::query::QueryService;

pub mod admin;
pub mod fighters;
pub mod leaderboard;

pub struct AppState {
    pub pool: DbPool,
    pub queries: Arc<QueryService>,
}

pub(crate) fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// Maps a rating-core failure onto an HTTP status.
pub(crate) fn rating_error_response(err: RatingError) -> Response {
    match err {
        RatingError::NotFound(fighter) => {
            error_response(StatusCode::NOT_FOUND, format!("Fighter '{}' not found", fighter))
        }
        RatingError::Validation { .. } => {
            error_response(StatusCode::UNPROCESSABLE_ENTITY, err.to_string())
        }
        RatingError::ComputationInvariant { .. } => {
            error!("{}", err);
            error_response(StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

pub async fn health() -> &'static str {
    "Fight Elo API is running"
}
