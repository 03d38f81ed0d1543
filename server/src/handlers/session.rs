//! Session handlers - creation, update, and the conference-scoped queries.

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use summit_engine::{FilterConfig, Key, Kind, Session, SessionBuilder, SessionPatch};

use crate::auth::AuthUser;
use crate::db;
use crate::error::{ApiError, Result};
use crate::handlers::conference::{conference_id, parse_date};
use crate::tasks::{Task, TaskQueue};

/// Inbound session fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionInput {
    pub name: Option<String>,
    pub session_type: Option<String>,
    pub speaker_id: Option<i64>,
    pub highlight: Option<String>,
    pub date: Option<String>,
    /// 24-hour wall clock, `HH:MM`.
    pub start_time: Option<String>,
    pub duration_minutes: Option<i32>,
}

/// Outbound session representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionForm {
    pub websafe_key: String,
    pub websafe_conference_key: Option<String>,
    pub name: String,
    pub session_type: String,
    pub speaker_id: Option<i64>,
    pub highlight: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
}

/// List wrapper for session responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct SessionForms {
    pub items: Vec<SessionForm>,
}

/// Duration comparison request: both parts are required.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DurationQueryForm {
    pub operator: Option<String>,
    pub minutes: Option<i32>,
}

/// Start-time comparison request against a whole hour, optionally
/// excluding one session type from the result.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeQueryForm {
    pub operator: Option<String>,
    pub hour: Option<i32>,
    pub exclude_session_type: Option<String>,
}

fn parse_time(value: Option<&str>) -> Result<Option<NaiveTime>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let time = NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ApiError::BadRequest(format!("invalid startTime '{value}'")))?;
    Ok(Some(time))
}

/// Decode a URL-safe session key down to its numeric id.
pub fn session_id(websafe_key: &str) -> Result<i64> {
    let key = Key::from_urlsafe_of(websafe_key, Kind::Session)?;
    key.id
        .as_number()
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))
}

pub fn session_to_form(session: &Session) -> SessionForm {
    SessionForm {
        websafe_key: session.key.urlsafe(),
        websafe_conference_key: session.conference_key().map(Key::urlsafe),
        name: session.name.clone(),
        session_type: session.session_type.clone(),
        speaker_id: session.speaker_id,
        highlight: session.highlight.clone(),
        date: session.date,
        start_time: session.start_time,
        duration_minutes: session.duration_minutes,
    }
}

fn builder_from_input(input: &SessionInput) -> Result<SessionBuilder> {
    Ok(Session::builder()
        .name(input.name.clone())
        .session_type(input.session_type.clone())
        .speaker_id(input.speaker_id)
        .highlight(input.highlight.clone())
        .date(parse_date("date", input.date.as_deref())?)
        .start_time(parse_time(input.start_time.as_deref())?)
        .duration_minutes(input.duration_minutes))
}

async fn require_speaker(pool: &PgPool, speaker_id: Option<i64>) -> Result<()> {
    if let Some(speaker_id) = speaker_id {
        if db::speakers::get(pool, speaker_id).await?.is_none() {
            return Err(ApiError::NotFound(format!("speaker {speaker_id}")));
        }
    }
    Ok(())
}

/// Create a session under a conference. Only the organizer may do this.
pub async fn handle_create(
    pool: &PgPool,
    tasks: &TaskQueue,
    auth: &AuthUser,
    websafe_conference_key: &str,
    input: SessionInput,
) -> Result<SessionForm> {
    let conf_id = conference_id(websafe_conference_key)?;
    let conference = db::conferences::get(pool, conf_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_conference_key.to_string()))?
        .to_conference()?;

    if conference.organizer_user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can add sessions to the conference.".into(),
        ));
    }
    require_speaker(pool, input.speaker_id).await?;

    let mut tx = pool.begin().await?;
    let id = db::sessions::allocate_id(&mut *tx).await?;
    let session = builder_from_input(&input)?.build(Key::session(conference.key.clone(), id))?;
    db::sessions::insert(&mut *tx, &session).await?;
    tx.commit().await?;

    if let Some(speaker_id) = session.speaker_id {
        tasks.enqueue(Task::CheckFeaturedSpeaker {
            conference_id: conf_id,
            speaker_id,
        });
    }

    Ok(session_to_form(&session))
}

/// Update a session. Only the conference organizer may do this.
pub async fn handle_update(
    pool: &PgPool,
    auth: &AuthUser,
    websafe_key: &str,
    input: SessionInput,
) -> Result<SessionForm> {
    let id = session_id(websafe_key)?;

    let mut tx = pool.begin().await?;

    let row = db::sessions::get(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?;
    if row.organizer_user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can update sessions of the conference.".into(),
        ));
    }
    let mut session = row.to_session();

    require_speaker(pool, input.speaker_id).await?;

    let patch = SessionPatch {
        name: input.name.filter(|n| !n.is_empty()),
        session_type: input.session_type,
        speaker_id: input.speaker_id,
        highlight: input.highlight,
        date: parse_date("date", input.date.as_deref())?,
        start_time: parse_time(input.start_time.as_deref())?,
        duration_minutes: input.duration_minutes,
    };
    patch.apply(&mut session);

    db::sessions::update(&mut *tx, &session).await?;
    tx.commit().await?;

    Ok(session_to_form(&session))
}

/// Fetch one session by its URL-safe key.
pub async fn handle_get(pool: &PgPool, websafe_key: &str) -> Result<SessionForm> {
    let id = session_id(websafe_key)?;
    let row = db::sessions::get(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?;
    Ok(session_to_form(&row.to_session()))
}

/// All sessions of a conference.
pub async fn handle_by_conference(
    pool: &PgPool,
    websafe_conference_key: &str,
) -> Result<SessionForms> {
    let conf_id = require_conference(pool, websafe_conference_key).await?;
    let rows = db::sessions::by_conference(pool, conf_id).await?;
    Ok(rows_to_forms(rows))
}

/// Sessions of a conference with an exact type match.
pub async fn handle_by_type(
    pool: &PgPool,
    websafe_conference_key: &str,
    session_type: &str,
) -> Result<SessionForms> {
    let conf_id = require_conference(pool, websafe_conference_key).await?;
    let rows = db::sessions::by_conference_and_type(pool, conf_id, session_type).await?;
    Ok(rows_to_forms(rows))
}

/// All sessions by a speaker, across conferences.
pub async fn handle_by_speaker(pool: &PgPool, speaker_id: i64) -> Result<SessionForms> {
    let rows = db::sessions::by_speaker(pool, speaker_id).await?;
    Ok(rows_to_forms(rows))
}

/// Sessions of a conference compared by duration.
pub async fn handle_by_duration(
    pool: &PgPool,
    websafe_conference_key: &str,
    form: DurationQueryForm,
) -> Result<SessionForms> {
    let conf_id = require_conference(pool, websafe_conference_key).await?;

    let (operator, minutes) = match (form.operator, form.minutes) {
        (Some(operator), Some(minutes)) => (operator, minutes),
        (None, None) | (Some(_), None) | (None, Some(_)) => {
            return Err(summit_engine::Error::IncompleteFilter.into());
        }
    };
    let operator = FilterConfig::conferences().operator(&operator)?;

    let rows = db::sessions::by_duration(pool, conf_id, operator, minutes).await?;
    Ok(rows_to_forms(rows))
}

/// Sessions of a conference compared by start time against a whole hour.
/// An excluded type is filtered after the comparison.
pub async fn handle_by_time(
    pool: &PgPool,
    websafe_conference_key: &str,
    form: TimeQueryForm,
) -> Result<SessionForms> {
    let conf_id = require_conference(pool, websafe_conference_key).await?;

    let (operator, hour) = match (form.operator, form.hour) {
        (Some(operator), Some(hour)) => (operator, hour),
        _ => return Err(summit_engine::Error::IncompleteFilter.into()),
    };
    if !(0..=23).contains(&hour) {
        return Err(ApiError::BadRequest(format!("invalid hour {hour}")));
    }
    let operator = FilterConfig::conferences().operator(&operator)?;

    let rows = db::sessions::by_time(pool, conf_id, operator, hour).await?;
    let rows = match form.exclude_session_type {
        Some(excluded) => rows
            .into_iter()
            .filter(|row| row.session_type != excluded)
            .collect(),
        None => rows,
    };
    Ok(rows_to_forms(rows))
}

async fn require_conference(pool: &PgPool, websafe_key: &str) -> Result<i64> {
    let id = conference_id(websafe_key)?;
    if db::conferences::get(pool, id).await?.is_none() {
        return Err(ApiError::NotFound(websafe_key.to_string()));
    }
    Ok(id)
}

fn rows_to_forms(rows: Vec<db::sessions::SessionRow>) -> SessionForms {
    SessionForms {
        items: rows
            .iter()
            .map(|row| session_to_form(&row.to_session()))
            .collect(),
    }
}
