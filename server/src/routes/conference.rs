//! Conference endpoint routes.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::conference::{
    handle_create, handle_created, handle_get, handle_query, handle_similar, handle_update,
    ConferenceForm, ConferenceForms, ConferenceInput, QueryForm, SimilarForm,
};
use crate::AppState;

/// Create conference routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/conferences", post(create))
        .route("/conferences/created", get(created))
        .route("/conferences/query", post(query))
        .route("/conferences/{websafe_key}", put(update).get(get_one))
        .route("/conferences/{websafe_key}/similar", post(similar))
}

/// POST /conferences - Create a conference.
async fn create(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(input): Json<ConferenceInput>,
) -> Result<Json<ConferenceForm>> {
    let form = handle_create(&state.pool, &state.tasks, &auth, input).await?;
    Ok(Json(form))
}

/// PUT /conferences/{websafeKey} - Update a conference.
async fn update(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
    Json(input): Json<ConferenceInput>,
) -> Result<Json<ConferenceForm>> {
    let form = handle_update(&state.pool, &auth, &websafe_key, input).await?;
    Ok(Json(form))
}

/// GET /conferences/{websafeKey} - Fetch one conference.
async fn get_one(
    State(state): State<AppState>,
    Path(websafe_key): Path<String>,
) -> Result<Json<ConferenceForm>> {
    let form = handle_get(&state.pool, &websafe_key).await?;
    Ok(Json(form))
}

/// GET /conferences/created - Conferences the caller organizes.
async fn created(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ConferenceForms>> {
    let forms = handle_created(&state.pool, &auth).await?;
    Ok(Json(forms))
}

/// POST /conferences/query - Run a dynamically composed query.
async fn query(
    State(state): State<AppState>,
    Json(form): Json<QueryForm>,
) -> Result<Json<ConferenceForms>> {
    let forms = handle_query(&state.pool, form).await?;
    Ok(Json(forms))
}

/// POST /conferences/{websafeKey}/similar - Other conferences by the
/// same organizer.
async fn similar(
    State(state): State<AppState>,
    Path(websafe_key): Path<String>,
    Json(form): Json<SimilarForm>,
) -> Result<Json<ConferenceForms>> {
    let forms = handle_similar(&state.pool, &websafe_key, form).await?;
    Ok(Json(forms))
}
