//! Database operations for the profiles table.

use std::collections::HashMap;

use sqlx::{PgConnection, Row};
use summit_engine::{entity::TeeShirtSize, Profile};

use crate::auth::AuthUser;
use crate::error::{ApiError, Result};

/// A stored profile row from the database.
#[derive(Debug)]
pub struct ProfileRow {
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: String,
    pub conference_keys_to_attend: serde_json::Value,
    pub session_keys_in_wishlist: serde_json::Value,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for ProfileRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(ProfileRow {
            user_id: row.try_get("user_id")?,
            display_name: row.try_get("display_name")?,
            main_email: row.try_get("main_email")?,
            tee_shirt_size: row.try_get("tee_shirt_size")?,
            conference_keys_to_attend: row.try_get("conference_keys_to_attend")?,
            session_keys_in_wishlist: row.try_get("session_keys_in_wishlist")?,
        })
    }
}

impl ProfileRow {
    /// Convert database row to an engine Profile.
    pub fn to_profile(&self) -> Result<Profile> {
        let conference_keys: Vec<String> =
            serde_json::from_value(self.conference_keys_to_attend.clone())
                .map_err(|e| ApiError::Internal(format!("corrupt attend-set: {e}")))?;
        let session_keys: Vec<String> =
            serde_json::from_value(self.session_keys_in_wishlist.clone())
                .map_err(|e| ApiError::Internal(format!("corrupt wishlist: {e}")))?;

        Ok(Profile {
            user_id: self.user_id.clone(),
            display_name: self.display_name.clone(),
            main_email: self.main_email.clone(),
            tee_shirt_size: TeeShirtSize::parse(&self.tee_shirt_size)?,
            conference_keys_to_attend: conference_keys,
            session_keys_in_wishlist: session_keys,
        })
    }
}

const SELECT_COLUMNS: &str = "user_id, display_name, main_email, tee_shirt_size, \
     conference_keys_to_attend, session_keys_in_wishlist";

/// Get a profile by user id.
pub async fn get(
    executor: impl sqlx::PgExecutor<'_>,
    user_id: &str,
) -> Result<Option<ProfileRow>> {
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM profiles WHERE user_id = $1"
    ))
    .bind(user_id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// Insert a fresh profile.
pub async fn insert(executor: impl sqlx::PgExecutor<'_>, profile: &Profile) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO profiles (
            user_id, display_name, main_email, tee_shirt_size,
            conference_keys_to_attend, session_keys_in_wishlist
        )
        VALUES ($1, $2, $3, $4, $5, $6)
        "#,
    )
    .bind(&profile.user_id)
    .bind(&profile.display_name)
    .bind(&profile.main_email)
    .bind(profile.tee_shirt_size.as_str())
    .bind(serde_json::json!(profile.conference_keys_to_attend))
    .bind(serde_json::json!(profile.session_keys_in_wishlist))
    .execute(executor)
    .await?;
    Ok(())
}

/// Write back a profile's mutable fields.
pub async fn update(executor: impl sqlx::PgExecutor<'_>, profile: &Profile) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE profiles SET
            display_name = $2,
            tee_shirt_size = $3,
            conference_keys_to_attend = $4,
            session_keys_in_wishlist = $5
        WHERE user_id = $1
        "#,
    )
    .bind(&profile.user_id)
    .bind(&profile.display_name)
    .bind(profile.tee_shirt_size.as_str())
    .bind(serde_json::json!(profile.conference_keys_to_attend))
    .bind(serde_json::json!(profile.session_keys_in_wishlist))
    .execute(executor)
    .await?;
    Ok(())
}

/// Fetch the caller's profile, creating it lazily on first access.
pub async fn get_or_create(conn: &mut PgConnection, auth: &AuthUser) -> Result<Profile> {
    get_or_create_inner(conn, auth, false).await
}

/// Same as [`get_or_create`], but locks the row for the enclosing
/// transaction. New profiles are born locked by their INSERT.
pub async fn get_or_create_for_update(
    conn: &mut PgConnection,
    auth: &AuthUser,
) -> Result<Profile> {
    get_or_create_inner(conn, auth, true).await
}

async fn get_or_create_inner(
    conn: &mut PgConnection,
    auth: &AuthUser,
    for_update: bool,
) -> Result<Profile> {
    let suffix = if for_update { " FOR UPDATE" } else { "" };
    let row = sqlx::query_as::<_, ProfileRow>(&format!(
        "SELECT {SELECT_COLUMNS} FROM profiles WHERE user_id = $1{suffix}"
    ))
    .bind(&auth.user_id)
    .fetch_optional(&mut *conn)
    .await?;

    if let Some(row) = row {
        return row.to_profile();
    }

    let profile = Profile::new(&auth.user_id, auth.nickname(), &auth.email);
    insert(&mut *conn, &profile).await?;
    Ok(profile)
}

/// Display names for a batch of organizers, keyed by user id.
pub async fn display_names(
    executor: impl sqlx::PgExecutor<'_>,
    user_ids: &[String],
) -> Result<HashMap<String, String>> {
    let rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT user_id, display_name FROM profiles WHERE user_id = ANY($1)",
    )
    .bind(user_ids)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().collect())
}
