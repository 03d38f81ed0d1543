//! Profile and wishlist endpoint routes.

use axum::{
    extract::{Path, State},
    routing::{get, post},
    Json, Router,
};

use crate::auth::AuthUser;
use crate::error::Result;
use crate::handlers::profile::{handle_get, handle_save, ProfileForm, ProfileMiniForm};
use crate::handlers::registration::{
    handle_attending, handle_register, handle_unregister, handle_wishlist, handle_wishlist_add,
    handle_wishlist_remove,
};
use crate::handlers::session::SessionForms;
use crate::handlers::conference::ConferenceForms;
use crate::handlers::BooleanMessage;
use crate::AppState;

/// Create profile routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/profile", get(get_profile).post(save_profile))
        .route(
            "/conferences/{websafe_key}/registration",
            post(register).delete(unregister),
        )
        .route("/conferences/attending", get(attending))
        .route(
            "/profile/wishlist/{websafe_key}",
            post(wishlist_add).delete(wishlist_remove),
        )
        .route("/profile/wishlist", get(wishlist))
}

/// GET /profile - Fetch the caller's profile.
async fn get_profile(State(state): State<AppState>, auth: AuthUser) -> Result<Json<ProfileForm>> {
    let form = handle_get(&state.pool, &auth).await?;
    Ok(Json(form))
}

/// POST /profile - Save the caller's profile.
async fn save_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(form): Json<ProfileMiniForm>,
) -> Result<Json<ProfileForm>> {
    let form = handle_save(&state.pool, &auth, form).await?;
    Ok(Json(form))
}

/// POST /conferences/{websafeKey}/registration - Register for a conference.
async fn register(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
) -> Result<Json<BooleanMessage>> {
    let message = handle_register(&state.pool, &auth, &websafe_key).await?;
    Ok(Json(message))
}

/// DELETE /conferences/{websafeKey}/registration - Leave a conference.
async fn unregister(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
) -> Result<Json<BooleanMessage>> {
    let message = handle_unregister(&state.pool, &auth, &websafe_key).await?;
    Ok(Json(message))
}

/// GET /conferences/attending - Conferences the caller attends.
async fn attending(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<Json<ConferenceForms>> {
    let forms = handle_attending(&state.pool, &auth).await?;
    Ok(Json(forms))
}

/// POST /profile/wishlist/{websafeKey} - Wishlist a session.
async fn wishlist_add(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
) -> Result<Json<BooleanMessage>> {
    let message = handle_wishlist_add(&state.pool, &auth, &websafe_key).await?;
    Ok(Json(message))
}

/// DELETE /profile/wishlist/{websafeKey} - Drop a session from the wishlist.
async fn wishlist_remove(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(websafe_key): Path<String>,
) -> Result<Json<BooleanMessage>> {
    let message = handle_wishlist_remove(&state.pool, &auth, &websafe_key).await?;
    Ok(Json(message))
}

/// GET /profile/wishlist - Sessions in the caller's wishlist.
async fn wishlist(State(state): State<AppState>, auth: AuthUser) -> Result<Json<SessionForms>> {
    let forms = handle_wishlist(&state.pool, &auth).await?;
    Ok(Json(forms))
}
