//! Database operations for the speakers table.

use sqlx::Row;
use summit_engine::Speaker;

use crate::error::Result;

/// A stored speaker row from the database.
#[derive(Debug)]
pub struct SpeakerRow {
    pub id: i64,
    pub display_name: String,
    pub main_email: String,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SpeakerRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(SpeakerRow {
            id: row.try_get("id")?,
            display_name: row.try_get("display_name")?,
            main_email: row.try_get("main_email")?,
        })
    }
}

impl SpeakerRow {
    /// Convert database row to an engine Speaker.
    pub fn to_speaker(&self) -> Speaker {
        Speaker {
            id: Some(self.id),
            display_name: self.display_name.clone(),
            main_email: self.main_email.clone(),
        }
    }
}

/// Insert a speaker and return the allocated id.
pub async fn insert(executor: impl sqlx::PgExecutor<'_>, speaker: &Speaker) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as(
        "INSERT INTO speakers (display_name, main_email) VALUES ($1, $2) RETURNING id",
    )
    .bind(&speaker.display_name)
    .bind(&speaker.main_email)
    .fetch_one(executor)
    .await?;
    Ok(id)
}

/// Get a speaker by id.
pub async fn get(executor: impl sqlx::PgExecutor<'_>, id: i64) -> Result<Option<SpeakerRow>> {
    let row = sqlx::query_as::<_, SpeakerRow>(
        "SELECT id, display_name, main_email FROM speakers WHERE id = $1",
    )
    .bind(id)
    .fetch_optional(executor)
    .await?;
    Ok(row)
}

/// All speakers with an exact display name.
pub async fn by_name(executor: impl sqlx::PgExecutor<'_>, name: &str) -> Result<Vec<SpeakerRow>> {
    let rows = sqlx::query_as::<_, SpeakerRow>(
        "SELECT id, display_name, main_email FROM speakers WHERE display_name = $1 ORDER BY id",
    )
    .bind(name)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// All registered speakers.
pub async fn all(executor: impl sqlx::PgExecutor<'_>) -> Result<Vec<SpeakerRow>> {
    let rows = sqlx::query_as::<_, SpeakerRow>(
        "SELECT id, display_name, main_email FROM speakers ORDER BY id",
    )
    .fetch_all(executor)
    .await?;
    Ok(rows)
}
