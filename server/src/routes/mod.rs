//! HTTP route definitions.

mod announce;
mod conference;
mod health;
mod profile;
mod session;
mod speaker;

use crate::AppState;
use axum::Router;

/// Create all application routes.
pub fn create_routes() -> Router<AppState> {
    Router::new()
        .merge(health::routes())
        .merge(conference::routes())
        .merge(session::routes())
        .merge(profile::routes())
        .merge(speaker::routes())
        .merge(announce::routes())
}
