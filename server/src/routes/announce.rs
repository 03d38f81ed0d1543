//! Announcement and featured-speaker endpoint routes.

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};

use crate::error::Result;
use crate::handlers::announce::{
    handle_get_announcement, handle_get_featured_speaker, handle_set_announcement,
};
use crate::handlers::StringMessage;
use crate::AppState;

/// Create announcement routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/announcement", get(get_announcement))
        .route("/featured-speaker", get(get_featured_speaker))
        .route("/crons/set-announcement", get(set_announcement))
}

/// GET /announcement - Current nearly-sold-out announcement.
async fn get_announcement(State(state): State<AppState>) -> Json<StringMessage> {
    Json(handle_get_announcement(&state.cache))
}

/// GET /featured-speaker - Current featured speaker.
async fn get_featured_speaker(State(state): State<AppState>) -> Json<StringMessage> {
    Json(handle_get_featured_speaker(&state.cache))
}

/// GET /crons/set-announcement - Scheduler hook that recomputes the
/// announcement from the store.
async fn set_announcement(State(state): State<AppState>) -> Result<StatusCode> {
    handle_set_announcement(&state.pool, &state.cache).await?;
    Ok(StatusCode::NO_CONTENT)
}
