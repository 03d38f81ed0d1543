//! Database operations for the sessions table.
//!
//! Session keys carry the full ancestor path, so every select joins the
//! parent conference to recover the organizer id.

use chrono::{NaiveDate, NaiveTime};
use sqlx::Row;
use summit_engine::{filter::Operator, Key, Session};

use crate::error::{ApiError, Result};

/// A stored session row joined with its parent conference.
#[derive(Debug)]
pub struct SessionRow {
    pub id: i64,
    pub conference_id: i64,
    pub organizer_user_id: String,
    pub name: String,
    pub session_type: String,
    pub speaker_id: Option<i64>,
    pub highlight: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
}

impl<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> for SessionRow {
    fn from_row(row: &'r sqlx::postgres::PgRow) -> std::result::Result<Self, sqlx::Error> {
        Ok(SessionRow {
            id: row.try_get("id")?,
            conference_id: row.try_get("conference_id")?,
            organizer_user_id: row.try_get("organizer_user_id")?,
            name: row.try_get("name")?,
            session_type: row.try_get("session_type")?,
            speaker_id: row.try_get("speaker_id")?,
            highlight: row.try_get("highlight")?,
            date: row.try_get("date")?,
            start_time: row.try_get("start_time")?,
            duration_minutes: row.try_get("duration_minutes")?,
        })
    }
}

impl SessionRow {
    /// Convert database row to an engine Session.
    pub fn to_session(&self) -> Session {
        let conference_key = Key::conference(&self.organizer_user_id, self.conference_id);
        Session {
            key: Key::session(conference_key, self.id),
            name: self.name.clone(),
            session_type: self.session_type.clone(),
            speaker_id: self.speaker_id,
            highlight: self.highlight.clone(),
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
        }
    }
}

const SELECT: &str = "SELECT s.id, s.conference_id, c.organizer_user_id, s.name, \
     s.session_type, s.speaker_id, s.highlight, s.date, s.start_time, s.duration_minutes \
     FROM sessions s JOIN conferences c ON c.id = s.conference_id";

/// Allocate a fresh session id.
pub async fn allocate_id(executor: impl sqlx::PgExecutor<'_>) -> Result<i64> {
    let (id,): (i64,) = sqlx::query_as("SELECT nextval('sessions_id_seq')")
        .fetch_one(executor)
        .await?;
    Ok(id)
}

fn numeric_ids(session: &Session) -> Result<(i64, i64)> {
    let id = session
        .key
        .id
        .as_number()
        .ok_or_else(|| ApiError::Internal("session key is not numeric".into()))?;
    let conference_id = session
        .conference_key()
        .and_then(|key| key.id.as_number())
        .ok_or_else(|| ApiError::Internal("session key has no conference ancestor".into()))?;
    Ok((id, conference_id))
}

/// Insert a session under a previously allocated id.
pub async fn insert(executor: impl sqlx::PgExecutor<'_>, session: &Session) -> Result<()> {
    let (id, conference_id) = numeric_ids(session)?;
    sqlx::query(
        r#"
        INSERT INTO sessions (
            id, conference_id, name, session_type, speaker_id,
            highlight, date, start_time, duration_minutes
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
        "#,
    )
    .bind(id)
    .bind(conference_id)
    .bind(&session.name)
    .bind(&session.session_type)
    .bind(session.speaker_id)
    .bind(&session.highlight)
    .bind(session.date)
    .bind(session.start_time)
    .bind(session.duration_minutes)
    .execute(executor)
    .await?;
    Ok(())
}

/// Write back a session's mutable fields.
pub async fn update(executor: impl sqlx::PgExecutor<'_>, session: &Session) -> Result<()> {
    let (id, _) = numeric_ids(session)?;
    sqlx::query(
        r#"
        UPDATE sessions SET
            name = $2,
            session_type = $3,
            speaker_id = $4,
            highlight = $5,
            date = $6,
            start_time = $7,
            duration_minutes = $8
        WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(&session.name)
    .bind(&session.session_type)
    .bind(session.speaker_id)
    .bind(&session.highlight)
    .bind(session.date)
    .bind(session.start_time)
    .bind(session.duration_minutes)
    .execute(executor)
    .await?;
    Ok(())
}

/// Get a session by id.
pub async fn get(executor: impl sqlx::PgExecutor<'_>, id: i64) -> Result<Option<SessionRow>> {
    let row = sqlx::query_as::<_, SessionRow>(&format!("{SELECT} WHERE s.id = $1"))
        .bind(id)
        .fetch_optional(executor)
        .await?;
    Ok(row)
}

/// Batch fetch by id, ordered by name.
pub async fn get_many(executor: impl sqlx::PgExecutor<'_>, ids: &[i64]) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        "{SELECT} WHERE s.id = ANY($1) ORDER BY s.name"
    ))
    .bind(ids)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// All sessions of a conference.
pub async fn by_conference(
    executor: impl sqlx::PgExecutor<'_>,
    conference_id: i64,
) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        "{SELECT} WHERE s.conference_id = $1 ORDER BY s.name"
    ))
    .bind(conference_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// Sessions of a conference with an exact type match.
pub async fn by_conference_and_type(
    executor: impl sqlx::PgExecutor<'_>,
    conference_id: i64,
    session_type: &str,
) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        "{SELECT} WHERE s.conference_id = $1 AND s.session_type = $2 ORDER BY s.name"
    ))
    .bind(conference_id)
    .bind(session_type)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// All sessions by a speaker, across conferences.
pub async fn by_speaker(
    executor: impl sqlx::PgExecutor<'_>,
    speaker_id: i64,
) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        "{SELECT} WHERE s.speaker_id = $1 ORDER BY s.name"
    ))
    .bind(speaker_id)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// Names of a speaker's sessions within one conference, for the featured
/// speaker check.
pub async fn names_by_conference_and_speaker(
    executor: impl sqlx::PgExecutor<'_>,
    conference_id: i64,
    speaker_id: i64,
) -> Result<Vec<String>> {
    let rows: Vec<(String,)> = sqlx::query_as(
        "SELECT name FROM sessions \
         WHERE conference_id = $1 AND speaker_id = $2 ORDER BY name",
    )
    .bind(conference_id)
    .bind(speaker_id)
    .fetch_all(executor)
    .await?;
    Ok(rows.into_iter().map(|(name,)| name).collect())
}

/// Sessions of a conference compared by duration. Sessions without a
/// duration never match.
pub async fn by_duration(
    executor: impl sqlx::PgExecutor<'_>,
    conference_id: i64,
    operator: Operator,
    minutes: i32,
) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        "{SELECT} WHERE s.conference_id = $1 AND s.duration_minutes IS NOT NULL \
         AND s.duration_minutes {} $2 ORDER BY s.duration_minutes, s.name",
        sql_operator(operator)
    ))
    .bind(conference_id)
    .bind(minutes)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

/// Sessions of a conference compared by start time against a whole hour.
/// Sessions without a start time never match.
pub async fn by_time(
    executor: impl sqlx::PgExecutor<'_>,
    conference_id: i64,
    operator: Operator,
    hour: i32,
) -> Result<Vec<SessionRow>> {
    let rows = sqlx::query_as::<_, SessionRow>(&format!(
        "{SELECT} WHERE s.conference_id = $1 AND s.start_time IS NOT NULL \
         AND s.start_time {} make_time($2, 0, 0.0) ORDER BY s.start_time, s.name",
        sql_operator(operator)
    ))
    .bind(conference_id)
    .bind(hour)
    .fetch_all(executor)
    .await?;
    Ok(rows)
}

fn sql_operator(operator: Operator) -> &'static str {
    match operator {
        Operator::Ne => "<>",
        other => other.symbol(),
    }
}
