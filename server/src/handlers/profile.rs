//! Profile handlers.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use summit_engine::{entity::TeeShirtSize, Profile};

use crate::auth::AuthUser;
use crate::db;
use crate::error::Result;

/// Caller-writable profile fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileMiniForm {
    pub display_name: Option<String>,
    pub tee_shirt_size: Option<String>,
}

/// Outbound profile representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileForm {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: String,
    pub conference_keys_to_attend: Vec<String>,
    pub session_keys_in_wishlist: Vec<String>,
}

fn profile_to_form(profile: &Profile) -> ProfileForm {
    ProfileForm {
        user_id: profile.user_id.clone(),
        display_name: profile.display_name.clone(),
        main_email: profile.main_email.clone(),
        tee_shirt_size: profile.tee_shirt_size.as_str().to_string(),
        conference_keys_to_attend: profile.conference_keys_to_attend.clone(),
        session_keys_in_wishlist: profile.session_keys_in_wishlist.clone(),
    }
}

/// Fetch the caller's profile, creating it on first access.
pub async fn handle_get(pool: &PgPool, auth: &AuthUser) -> Result<ProfileForm> {
    let mut conn = pool.acquire().await?;
    let profile = db::profiles::get_or_create(&mut conn, auth).await?;
    Ok(profile_to_form(&profile))
}

/// Save the caller-writable profile fields.
pub async fn handle_save(
    pool: &PgPool,
    auth: &AuthUser,
    form: ProfileMiniForm,
) -> Result<ProfileForm> {
    let mut tx = pool.begin().await?;

    let mut profile = db::profiles::get_or_create_for_update(&mut tx, auth).await?;

    if let Some(display_name) = form.display_name.filter(|n| !n.is_empty()) {
        profile.display_name = display_name;
    }
    if let Some(size) = form.tee_shirt_size {
        profile.tee_shirt_size = TeeShirtSize::parse(&size)?;
    }

    db::profiles::update(&mut *tx, &profile).await?;
    tx.commit().await?;

    Ok(profile_to_form(&profile))
}
