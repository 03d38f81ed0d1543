//! Speaker handlers.

use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use summit_engine::Speaker;

use crate::db;
use crate::error::{ApiError, Result};

/// Inbound speaker fields.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerInput {
    pub display_name: Option<String>,
    pub main_email: Option<String>,
}

/// Outbound speaker representation.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SpeakerForm {
    pub id: i64,
    pub display_name: String,
    pub main_email: String,
}

/// List wrapper for speaker responses.
#[derive(Debug, Serialize, Deserialize)]
pub struct SpeakerForms {
    pub items: Vec<SpeakerForm>,
}

fn row_to_form(row: &db::speakers::SpeakerRow) -> SpeakerForm {
    SpeakerForm {
        id: row.id,
        display_name: row.display_name.clone(),
        main_email: row.main_email.clone(),
    }
}

/// Register a speaker.
pub async fn handle_create(pool: &PgPool, input: SpeakerInput) -> Result<SpeakerForm> {
    let speaker = Speaker::new(input.display_name, input.main_email)?;
    let id = db::speakers::insert(pool, &speaker).await?;
    Ok(SpeakerForm {
        id,
        display_name: speaker.display_name,
        main_email: speaker.main_email,
    })
}

/// Fetch one speaker by id.
pub async fn handle_get(pool: &PgPool, id: i64) -> Result<SpeakerForm> {
    let row = db::speakers::get(pool, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("speaker {id}")))?;
    Ok(row_to_form(&row))
}

/// All speakers with an exact display name.
pub async fn handle_by_name(pool: &PgPool, name: &str) -> Result<SpeakerForms> {
    let rows = db::speakers::by_name(pool, name).await?;
    Ok(SpeakerForms {
        items: rows.iter().map(row_to_form).collect(),
    })
}

/// All registered speakers.
pub async fn handle_all(pool: &PgPool) -> Result<SpeakerForms> {
    let rows = db::speakers::all(pool).await?;
    Ok(SpeakerForms {
        items: rows.iter().map(row_to_form).collect(),
    })
}
