//! Registration handlers - conference attendance and the session wishlist.
//!
//! Every transition runs in one transaction that locks the profile (and the
//! conference, when seats move) before applying the in-memory transition and
//! writing both sides back.

use sqlx::PgPool;
use summit_engine::registration;

use crate::auth::AuthUser;
use crate::db;
use crate::error::{ApiError, Result};
use crate::handlers::conference::{conference_id, conference_to_form, ConferenceForms};
use crate::handlers::session::{session_id, session_to_form, SessionForms};
use crate::handlers::BooleanMessage;

/// Register the caller for a conference.
pub async fn handle_register(
    pool: &PgPool,
    auth: &AuthUser,
    websafe_key: &str,
) -> Result<BooleanMessage> {
    let id = conference_id(websafe_key)?;

    let mut tx = pool.begin().await?;

    let mut profile = db::profiles::get_or_create_for_update(&mut tx, auth).await?;
    let mut conference = db::conferences::get_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?
        .to_conference()?;

    let registered = registration::register(&mut profile, &mut conference)?;

    db::profiles::update(&mut *tx, &profile).await?;
    db::conferences::update_seats(&mut *tx, id, conference.seats_available).await?;
    tx.commit().await?;

    Ok(BooleanMessage { data: registered })
}

/// Unregister the caller from a conference. Leaving a conference the
/// caller never joined succeeds with `false`.
pub async fn handle_unregister(
    pool: &PgPool,
    auth: &AuthUser,
    websafe_key: &str,
) -> Result<BooleanMessage> {
    let id = conference_id(websafe_key)?;

    let mut tx = pool.begin().await?;

    let mut profile = db::profiles::get_or_create_for_update(&mut tx, auth).await?;
    let mut conference = db::conferences::get_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?
        .to_conference()?;

    let unregistered = registration::unregister(&mut profile, &mut conference)?;

    if unregistered {
        db::profiles::update(&mut *tx, &profile).await?;
        db::conferences::update_seats(&mut *tx, id, conference.seats_available).await?;
    }
    tx.commit().await?;

    Ok(BooleanMessage { data: unregistered })
}

/// All conferences the caller is registered for.
pub async fn handle_attending(pool: &PgPool, auth: &AuthUser) -> Result<ConferenceForms> {
    let mut conn = pool.acquire().await?;
    let profile = db::profiles::get_or_create(&mut conn, auth).await?;

    let mut ids = Vec::with_capacity(profile.conference_keys_to_attend.len());
    for key in &profile.conference_keys_to_attend {
        ids.push(conference_id(key)?);
    }

    let rows = db::conferences::get_many(&mut *conn, &ids).await?;

    let organizer_ids: Vec<String> = rows
        .iter()
        .map(|row| row.organizer_user_id.clone())
        .collect();
    let names = db::profiles::display_names(&mut *conn, &organizer_ids).await?;

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        let display_name = names
            .get(&row.organizer_user_id)
            .map(String::as_str)
            .unwrap_or_default();
        items.push(conference_to_form(&row.to_conference()?, display_name));
    }
    Ok(ConferenceForms { items })
}

/// Add a session to the caller's wishlist.
pub async fn handle_wishlist_add(
    pool: &PgPool,
    auth: &AuthUser,
    websafe_key: &str,
) -> Result<BooleanMessage> {
    let id = session_id(websafe_key)?;

    let mut tx = pool.begin().await?;

    let mut profile = db::profiles::get_or_create_for_update(&mut tx, auth).await?;
    let session = db::sessions::get(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?
        .to_session();

    let added = registration::add_to_wishlist(&mut profile, &session)?;

    db::profiles::update(&mut *tx, &profile).await?;
    tx.commit().await?;

    Ok(BooleanMessage { data: added })
}

/// Remove a session from the caller's wishlist. Removing a session that
/// was never wishlisted is a conflict.
pub async fn handle_wishlist_remove(
    pool: &PgPool,
    auth: &AuthUser,
    websafe_key: &str,
) -> Result<BooleanMessage> {
    let id = session_id(websafe_key)?;

    let mut tx = pool.begin().await?;

    let mut profile = db::profiles::get_or_create_for_update(&mut tx, auth).await?;
    let session = db::sessions::get(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?
        .to_session();

    let removed = registration::remove_from_wishlist(&mut profile, &session)?;

    db::profiles::update(&mut *tx, &profile).await?;
    tx.commit().await?;

    Ok(BooleanMessage { data: removed })
}

/// All sessions in the caller's wishlist.
pub async fn handle_wishlist(pool: &PgPool, auth: &AuthUser) -> Result<SessionForms> {
    let mut conn = pool.acquire().await?;
    let profile = db::profiles::get_or_create(&mut conn, auth).await?;

    let mut ids = Vec::with_capacity(profile.session_keys_in_wishlist.len());
    for key in &profile.session_keys_in_wishlist {
        ids.push(session_id(key)?);
    }

    let rows = db::sessions::get_many(&mut *conn, &ids).await?;
    let items = rows
        .iter()
        .map(|row| session_to_form(&row.to_session()))
        .collect();
    Ok(SessionForms { items })
}
