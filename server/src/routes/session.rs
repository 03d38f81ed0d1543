//! Session endpoint routes.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::session::{
    handle_by_conference, handle_by_duration, handle_by_speaker, handle_by_time,
    handle_by_type, handle_create, handle_get, handle_update, DurationQueryForm, SessionForm,
    SessionForms, SessionInput, TimeQueryForm,
};
use crate::AppState;

/// Create session routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/conferences/{websafe_key}/sessions",
            post(create).get(by_conference),
        )
        .route(
            "/conferences/{websafe_key}/sessions/type/{session_type}",
            get(by_type),
        )
        .route(
            "/conferences/{websafe_key}/sessions/duration",
            post(by_duration),
        )
        .route("/conferences/{websafe_key}/sessions/time", post(by_time))
        .route("/sessions/{websafe_key}", put(update).get(get_one))
        .route("/sessions/speakers/{speaker_id}", get(by_speaker))
}

/// POST /conferences/{websafeKey}/sessions - Create a session.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
    Json(input): Json<SessionInput>,
) -> Result<Json<SessionForm>> {
    let form = handle_create(&state.pool, &state.tasks, &auth, &websafe_key, input).await?;
    Ok(Json(form))
}

/// PUT /sessions/{websafeKey} - Update a session.
async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
    Json(input): Json<SessionInput>,
) -> Result<Json<SessionForm>> {
    let form = handle_update(&state.pool, &auth, &websafe_key, input).await?;
    Ok(Json(form))
}

/// GET /sessions/{websafeKey} - Fetch one session.
async fn get_one(
    State(state): State<AppState>,
    Path(websafe_key): Path<String>,
) -> Result<Json<SessionForm>> {
    let form = handle_get(&state.pool, &websafe_key).await?;
    Ok(Json(form))
}

/// GET /conferences/{websafeKey}/sessions - Sessions of a conference.
async fn by_conference(
    State(state): State<AppState>,
    Path(websafe_key): Path<String>,
) -> Result<Json<SessionForms>> {
    let forms = handle_by_conference(&state.pool, &websafe_key).await?;
    Ok(Json(forms))
}

/// GET /conferences/{websafeKey}/sessions/type/{type} - Sessions of one type.
async fn by_type(
    State(state): State<AppState>,
    Path((websafe_key, session_type)): Path<(String, String)>,
) -> Result<Json<SessionForms>> {
    let forms = handle_by_type(&state.pool, &websafe_key, &session_type).await?;
    Ok(Json(forms))
}

/// POST /conferences/{websafeKey}/sessions/duration - Compare by duration.
async fn by_duration(
    State(state): State<AppState>,
    Path(websafe_key): Path<String>,
    Json(form): Json<DurationQueryForm>,
) -> Result<Json<SessionForms>> {
    let forms = handle_by_duration(&state.pool, &websafe_key, form).await?;
    Ok(Json(forms))
}

/// POST /conferences/{websafeKey}/sessions/time - Compare by start time.
async fn by_time(
    State(state): State<AppState>,
    Path(websafe_key): Path<String>,
    Json(form): Json<TimeQueryForm>,
) -> Result<Json<SessionForms>> {
    let forms = handle_by_time(&state.pool, &websafe_key, form).await?;
    Ok(Json(forms))
}

/// GET /sessions/speakers/{speakerId} - All sessions by a speaker.
async fn by_speaker(
    State(state): State<AppState>,
    Path(speaker_id): Path<i64>,
) -> Result<Json<SessionForms>> {
    let forms = handle_by_speaker(&state.pool, speaker_id).await?;
    Ok(Json(forms))
}
