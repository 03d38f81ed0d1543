//! Conference handlers - creation, update, lookup, and queries.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use summit_engine::{
    compile, filter::FilterSpec, Conference, ConferencePatch, FilterConfig, Key, Kind,
};

use crate::auth::AuthUser;
use crate::db;
use crate::error::{ApiError, Result};
use crate::tasks::{Task, TaskQueue};

/// Inbound conference fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceInput {
    pub name: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub topics: Vec<String>,
    pub city: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub max_attendees: Option<i32>,
}

/// Outbound conference representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConferenceForm {
    pub websafe_key: String,
    pub name: String,
    pub description: Option<String>,
    pub organizer_user_id: String,
    pub organizer_display_name: String,
    pub topics: Vec<String>,
    pub city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub month: i32,
    pub max_attendees: i32,
    pub seats_available: i32,
}

/// Batch query request: a list of filter tuples.
#[derive(Debug, Default, Deserialize)]
pub struct QueryForm {
    #[serde(default)]
    pub filters: Vec<FilterSpec>,
}

/// Single optional filter for the similar-conferences lookup.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarForm {
    pub field: Option<String>,
    pub operator: Option<String>,
    pub value: Option<String>,
}

/// List wrapper for conference responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct ConferenceForms {
    pub items: Vec<ConferenceForm>,
}

/// Parse a wire date. Longer timestamps are truncated to their date part.
pub fn parse_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    let Some(value) = value else {
        return Ok(None);
    };
    let prefix: String = value.chars().take(10).collect();
    let date = NaiveDate::parse_from_str(&prefix, "%Y-%m-%d")
        .map_err(|_| ApiError::BadRequest(format!("invalid {field} '{value}'")))?;
    Ok(Some(date))
}

/// Decode a URL-safe conference key down to its numeric id.
pub fn conference_id(websafe_key: &str) -> Result<i64> {
    let key = Key::from_urlsafe_of(websafe_key, Kind::Conference)?;
    key.id
        .as_number()
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))
}

pub fn conference_to_form(conference: &Conference, organizer_display_name: &str) -> ConferenceForm {
    ConferenceForm {
        websafe_key: conference.key.urlsafe(),
        name: conference.name.clone(),
        description: conference.description.clone(),
        organizer_user_id: conference.organizer_user_id.clone(),
        organizer_display_name: organizer_display_name.to_string(),
        topics: conference.topics.clone(),
        city: conference.city.clone(),
        start_date: conference.start_date,
        end_date: conference.end_date,
        month: conference.month,
        max_attendees: conference.max_attendees,
        seats_available: conference.seats_available,
    }
}

/// Create a conference owned by the caller.
pub async fn handle_create(
    pool: &PgPool,
    tasks: &TaskQueue,
    auth: &AuthUser,
    input: ConferenceInput,
) -> Result<ConferenceForm> {
    let mut tx = pool.begin().await?;

    let profile = db::profiles::get_or_create(&mut tx, auth).await?;
    let id = db::conferences::allocate_id(&mut *tx).await?;

    let conference = Conference::builder()
        .name(input.name)
        .description(input.description)
        .topics(input.topics)
        .city(input.city)
        .start_date(parse_date("startDate", input.start_date.as_deref())?)
        .end_date(parse_date("endDate", input.end_date.as_deref())?)
        .max_attendees(input.max_attendees)
        .build(Key::conference(&auth.user_id, id), &auth.user_id)?;

    db::conferences::insert(&mut *tx, &conference).await?;
    tx.commit().await?;

    tasks.enqueue(Task::SendConfirmationEmail {
        email: profile.main_email.clone(),
        conference_name: conference.name.clone(),
    });

    Ok(conference_to_form(&conference, &profile.display_name))
}

/// Update a conference. Only the organizer may do this.
pub async fn handle_update(
    pool: &PgPool,
    auth: &AuthUser,
    websafe_key: &str,
    input: ConferenceInput,
) -> Result<ConferenceForm> {
    let id = conference_id(websafe_key)?;

    let mut tx = pool.begin().await?;

    let row = db::conferences::get_for_update(&mut *tx, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?;
    let mut conference = row.to_conference()?;

    if conference.organizer_user_id != auth.user_id {
        return Err(ApiError::Forbidden(
            "Only the owner can update the conference.".into(),
        ));
    }

    let patch = ConferencePatch {
        name: input.name.filter(|n| !n.is_empty()),
        description: input.description,
        topics: (!input.topics.is_empty()).then_some(input.topics),
        city: input.city,
        start_date: parse_date("startDate", input.start_date.as_deref())?,
        end_date: parse_date("endDate", input.end_date.as_deref())?,
        max_attendees: input.max_attendees,
    };
    patch.apply(&mut conference);

    db::conferences::update(&mut *tx, &conference).await?;

    let display_name = db::profiles::get(&mut *tx, &auth.user_id)
        .await?
        .map(|p| p.display_name)
        .unwrap_or_default();

    tx.commit().await?;

    Ok(conference_to_form(&conference, &display_name))
}

/// Fetch one conference by its URL-safe key.
pub async fn handle_get(pool: &PgPool, websafe_key: &str) -> Result<ConferenceForm> {
    let id = conference_id(websafe_key)?;
    let row = db::conferences::get(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?;
    let conference = row.to_conference()?;

    let display_name = db::profiles::get(pool, &conference.organizer_user_id)
        .await?
        .map(|p| p.display_name)
        .unwrap_or_default();

    Ok(conference_to_form(&conference, &display_name))
}

/// All conferences the caller organizes.
pub async fn handle_created(pool: &PgPool, auth: &AuthUser) -> Result<ConferenceForms> {
    let mut conn = pool.acquire().await?;
    let profile = db::profiles::get_or_create(&mut conn, auth).await?;

    let rows = db::conferences::by_organizer(&mut *conn, &auth.user_id).await?;
    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(conference_to_form(
            &row.to_conference()?,
            &profile.display_name,
        ));
    }
    Ok(ConferenceForms { items })
}

/// Run a dynamically composed conference query.
pub async fn handle_query(pool: &PgPool, form: QueryForm) -> Result<ConferenceForms> {
    let config = FilterConfig::conferences();
    let plan = compile(&config, &form.filters)?;

    let rows = db::conferences::execute_plan(pool, &plan).await?;

    let organizer_ids: Vec<String> = rows
        .iter()
        .map(|row| row.organizer_user_id.clone())
        .collect();
    let names = db::profiles::display_names(pool, &organizer_ids).await?;

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

/// Other conferences by the same organizer, optionally narrowed by a
/// single filter. The three filter parts come together or not at all.
pub async fn handle_similar(
    pool: &PgPool,
    websafe_key: &str,
    form: SimilarForm,
) -> Result<ConferenceForms> {
    let id = conference_id(websafe_key)?;
    let row = db::conferences::get(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(websafe_key.to_string()))?;

    let spec = FilterSpec::from_parts(form.field, form.operator, form.value)?;
    let clause = match spec {
        Some(spec) => {
            let config = FilterConfig::conferences();
            compile(&config, &[spec])?.clauses.pop()
        }
        None => None,
    };

    let rows = db::conferences::by_organizer_excluding(
        pool,
        &row.organizer_user_id,
        id,
        clause.as_ref(),
    )
    .await?;

    // Historical quirk kept for wire compatibility: this endpoint labels
    // the organizer with their email rather than their display name.
    let organizer_email = db::profiles::get(pool, &row.organizer_user_id)
        .await?
        .map(|p| p.main_email)
        .unwrap_or_default();

    let mut items = Vec::with_capacity(rows.len());
    for row in rows {
        items.push(conference_to_form(&row.to_conference()?, &organizer_email));
    }
    Ok(ConferenceForms { items })
}
