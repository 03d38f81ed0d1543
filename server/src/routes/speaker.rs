//! Speaker endpoint routes.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::speaker::{
    handle_all, handle_by_name, handle_create, handle_get, SpeakerForm, SpeakerForms,
    SpeakerInput,
};
use crate::AppState;

/// Create speaker routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/speakers", get(all).post(create))
        .route("/speakers/{id}", get(get_one))
        .route("/speakers/name/{name}", get(by_name))
}

/// POST /speakers - Register a speaker.
async fn create(
    State(state): State<AppState>,
    _auth: AuthUser,
    Json(input): Json<SpeakerInput>,
) -> Result<Json<SpeakerForm>> {
    let form = handle_create(&state.pool, input).await?;
    Ok(Json(form))
}

/// GET /speakers/{id} - Fetch one speaker.
async fn get_one(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<Json<SpeakerForm>> {
    let form = handle_get(&state.pool, id).await?;
    Ok(Json(form))
}

/// GET /speakers/name/{name} - Speakers with an exact display name.
async fn by_name(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<SpeakerForms>> {
    let forms = handle_by_name(&state.pool, &name).await?;
    Ok(Json(forms))
}

/// GET /speakers - All registered speakers.
async fn all(State(state): State<AppState>) -> Result<Json<SpeakerForms>> {
    let forms = handle_all(&state.pool).await?;
    Ok(Json(forms))
}
