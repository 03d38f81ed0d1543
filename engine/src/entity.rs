//! Typed entities and their validated builders.
//!
//! Inbound wire forms are mapped into these types through explicit builders
//! and patches. A builder applies the documented defaults and rejects
//! structurally invalid input before anything reaches the store; a patch
//! copies only the fields the caller provided.

use crate::error::{Error, Result};
use crate::key::Key;
use chrono::{Datelike, NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// T-shirt size choices for a profile.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[allow(clippy::upper_case_acronyms)]
pub enum TeeShirtSize {
    #[default]
    NotSpecified,
    XsM,
    XsW,
    SM,
    SW,
    MM,
    MW,
    LM,
    LW,
    XlM,
    XlW,
    XxlM,
    XxlW,
    XxxlM,
    XxxlW,
}

impl TeeShirtSize {
    /// Storage representation (stable, matches the wire form).
    pub fn as_str(&self) -> &'static str {
        match self {
            TeeShirtSize::NotSpecified => "NOT_SPECIFIED",
            TeeShirtSize::XsM => "XS_M",
            TeeShirtSize::XsW => "XS_W",
            TeeShirtSize::SM => "S_M",
            TeeShirtSize::SW => "S_W",
            TeeShirtSize::MM => "M_M",
            TeeShirtSize::MW => "M_W",
            TeeShirtSize::LM => "L_M",
            TeeShirtSize::LW => "L_W",
            TeeShirtSize::XlM => "XL_M",
            TeeShirtSize::XlW => "XL_W",
            TeeShirtSize::XxlM => "XXL_M",
            TeeShirtSize::XxlW => "XXL_W",
            TeeShirtSize::XxxlM => "XXXL_M",
            TeeShirtSize::XxxlW => "XXXL_W",
        }
    }

    /// Parse the storage representation.
    pub fn parse(s: &str) -> Result<Self> {
        let size = match s {
            "NOT_SPECIFIED" => TeeShirtSize::NotSpecified,
            "XS_M" => TeeShirtSize::XsM,
            "XS_W" => TeeShirtSize::XsW,
            "S_M" => TeeShirtSize::SM,
            "S_W" => TeeShirtSize::SW,
            "M_M" => TeeShirtSize::MM,
            "M_W" => TeeShirtSize::MW,
            "L_M" => TeeShirtSize::LM,
            "L_W" => TeeShirtSize::LW,
            "XL_M" => TeeShirtSize::XlM,
            "XL_W" => TeeShirtSize::XlW,
            "XXL_M" => TeeShirtSize::XxlM,
            "XXL_W" => TeeShirtSize::XxlW,
            "XXXL_M" => TeeShirtSize::XxxlM,
            "XXXL_W" => TeeShirtSize::XxxlW,
            other => {
                return Err(Error::InvalidValue {
                    field: "teeShirtSize".into(),
                    reason: format!("unknown size '{other}'"),
                })
            }
        };
        Ok(size)
    }
}

/// A user profile, created lazily on first profile access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Opaque user id from the identity provider.
    pub user_id: String,
    pub display_name: String,
    pub main_email: String,
    pub tee_shirt_size: TeeShirtSize,
    /// URL-safe conference keys the user is registered for, in join order.
    pub conference_keys_to_attend: Vec<String>,
    /// URL-safe session keys in the user's wishlist, in add order.
    pub session_keys_in_wishlist: Vec<String>,
}

impl Profile {
    /// Create a fresh profile for a first-time caller.
    pub fn new(
        user_id: impl Into<String>,
        display_name: impl Into<String>,
        main_email: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.into(),
            display_name: display_name.into(),
            main_email: main_email.into(),
            tee_shirt_size: TeeShirtSize::default(),
            conference_keys_to_attend: Vec::new(),
            session_keys_in_wishlist: Vec::new(),
        }
    }

    /// The profile's own key.
    pub fn key(&self) -> Key {
        Key::profile(self.user_id.clone())
    }

    /// Whether the profile is registered for the given conference.
    pub fn is_attending(&self, conference_key: &str) -> bool {
        self.conference_keys_to_attend
            .iter()
            .any(|k| k == conference_key)
    }

    /// Whether the given session is in the wishlist.
    pub fn has_wishlisted(&self, session_key: &str) -> bool {
        self.session_keys_in_wishlist
            .iter()
            .any(|k| k == session_key)
    }
}

/// Default city applied when a conference is created without one.
pub const DEFAULT_CITY: &str = "Default City";
/// Default topics applied when a conference is created without any.
pub const DEFAULT_TOPICS: [&str; 2] = ["Default", "Topic"];
/// Default session type applied when a session is created without one.
pub const DEFAULT_SESSION_TYPE: &str = "Default Type";
/// Default highlight applied when a session is created without one.
pub const DEFAULT_HIGHLIGHT: &str = "Default Highlight";

/// A conference, parented under its organizer's profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conference {
    pub key: Key,
    pub name: String,
    pub description: Option<String>,
    /// Owner; immutable after creation.
    pub organizer_user_id: String,
    pub topics: Vec<String>,
    pub city: String,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    /// Derived from `start_date` (0 when unset); kept queryable.
    pub month: i32,
    pub max_attendees: i32,
    pub seats_available: i32,
}

impl Conference {
    pub fn builder() -> ConferenceBuilder {
        ConferenceBuilder::default()
    }
}

/// Validated construction for [`Conference`].
#[derive(Debug, Default)]
pub struct ConferenceBuilder {
    name: Option<String>,
    description: Option<String>,
    topics: Vec<String>,
    city: Option<String>,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
    max_attendees: Option<i32>,
}

impl ConferenceBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.is_empty());
        self
    }

    pub fn description(mut self, description: Option<String>) -> Self {
        self.description = description;
        self
    }

    pub fn topics(mut self, topics: Vec<String>) -> Self {
        self.topics = topics;
        self
    }

    pub fn city(mut self, city: Option<String>) -> Self {
        self.city = city;
        self
    }

    pub fn start_date(mut self, date: Option<NaiveDate>) -> Self {
        self.start_date = date;
        self
    }

    pub fn end_date(mut self, date: Option<NaiveDate>) -> Self {
        self.end_date = date;
        self
    }

    pub fn max_attendees(mut self, max: Option<i32>) -> Self {
        self.max_attendees = max;
        self
    }

    /// Build the conference under its allocated key for the given organizer.
    ///
    /// Applies defaults, derives `month` from the start date, and seeds
    /// `seats_available` from `max_attendees`.
    pub fn build(self, key: Key, organizer_user_id: impl Into<String>) -> Result<Conference> {
        let name = self
            .name
            .ok_or_else(|| Error::MissingRequiredField("name".into()))?;

        let max_attendees = self.max_attendees.unwrap_or(0);
        if max_attendees < 0 {
            return Err(Error::InvalidValue {
                field: "maxAttendees".into(),
                reason: "must not be negative".into(),
            });
        }

        let topics = if self.topics.is_empty() {
            DEFAULT_TOPICS.iter().map(|t| t.to_string()).collect()
        } else {
            self.topics
        };

        Ok(Conference {
            key,
            name,
            description: self.description,
            organizer_user_id: organizer_user_id.into(),
            topics,
            city: self.city.unwrap_or_else(|| DEFAULT_CITY.to_string()),
            month: self.start_date.map(|d| d.month() as i32).unwrap_or(0),
            start_date: self.start_date,
            end_date: self.end_date,
            seats_available: max_attendees,
            max_attendees,
        })
    }
}

/// Partial update for a conference. Only fields present are copied; the
/// organizer, seat counter, and derived month are not caller-writable.
#[derive(Debug, Clone, Default)]
pub struct ConferencePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub topics: Option<Vec<String>>,
    pub city: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub max_attendees: Option<i32>,
}

impl ConferencePatch {
    /// Apply this patch, recomputing `month` when the start date moves.
    pub fn apply(self, conference: &mut Conference) {
        if let Some(name) = self.name {
            conference.name = name;
        }
        if let Some(description) = self.description {
            conference.description = Some(description);
        }
        if let Some(topics) = self.topics {
            conference.topics = topics;
        }
        if let Some(city) = self.city {
            conference.city = city;
        }
        if let Some(start_date) = self.start_date {
            conference.month = start_date.month() as i32;
            conference.start_date = Some(start_date);
        }
        if let Some(end_date) = self.end_date {
            conference.end_date = Some(end_date);
        }
        if let Some(max) = self.max_attendees {
            conference.max_attendees = max;
        }
    }
}

/// A session, parented under its conference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub key: Key,
    pub name: String,
    pub session_type: String,
    pub speaker_id: Option<i64>,
    pub highlight: String,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::default()
    }

    /// Key of the conference this session belongs to.
    pub fn conference_key(&self) -> Option<&Key> {
        self.key.parent.as_deref()
    }
}

/// Validated construction for [`Session`].
#[derive(Debug, Default)]
pub struct SessionBuilder {
    name: Option<String>,
    session_type: Option<String>,
    speaker_id: Option<i64>,
    highlight: Option<String>,
    date: Option<NaiveDate>,
    start_time: Option<NaiveTime>,
    duration_minutes: Option<i32>,
}

impl SessionBuilder {
    pub fn name(mut self, name: Option<String>) -> Self {
        self.name = name.filter(|n| !n.is_empty());
        self
    }

    pub fn session_type(mut self, session_type: Option<String>) -> Self {
        self.session_type = session_type;
        self
    }

    pub fn speaker_id(mut self, speaker_id: Option<i64>) -> Self {
        self.speaker_id = speaker_id;
        self
    }

    pub fn highlight(mut self, highlight: Option<String>) -> Self {
        self.highlight = highlight;
        self
    }

    pub fn date(mut self, date: Option<NaiveDate>) -> Self {
        self.date = date;
        self
    }

    pub fn start_time(mut self, time: Option<NaiveTime>) -> Self {
        self.start_time = time;
        self
    }

    pub fn duration_minutes(mut self, minutes: Option<i32>) -> Self {
        self.duration_minutes = minutes;
        self
    }

    /// Build the session under its allocated key, applying defaults.
    pub fn build(self, key: Key) -> Result<Session> {
        let name = self
            .name
            .ok_or_else(|| Error::MissingRequiredField("name".into()))?;

        Ok(Session {
            key,
            name,
            session_type: self
                .session_type
                .unwrap_or_else(|| DEFAULT_SESSION_TYPE.to_string()),
            speaker_id: self.speaker_id,
            highlight: self
                .highlight
                .unwrap_or_else(|| DEFAULT_HIGHLIGHT.to_string()),
            date: self.date,
            start_time: self.start_time,
            duration_minutes: self.duration_minutes,
        })
    }
}

/// Partial update for a session.
#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub name: Option<String>,
    pub session_type: Option<String>,
    pub speaker_id: Option<i64>,
    pub highlight: Option<String>,
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub duration_minutes: Option<i32>,
}

impl SessionPatch {
    pub fn apply(self, session: &mut Session) {
        if let Some(name) = self.name {
            session.name = name;
        }
        if let Some(session_type) = self.session_type {
            session.session_type = session_type;
        }
        if let Some(speaker_id) = self.speaker_id {
            session.speaker_id = Some(speaker_id);
        }
        if let Some(highlight) = self.highlight {
            session.highlight = highlight;
        }
        if let Some(date) = self.date {
            session.date = Some(date);
        }
        if let Some(start_time) = self.start_time {
            session.start_time = Some(start_time);
        }
        if let Some(minutes) = self.duration_minutes {
            session.duration_minutes = Some(minutes);
        }
    }
}

/// A speaker, referenced by id from sessions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Speaker {
    /// Store-allocated id; `None` until persisted.
    pub id: Option<i64>,
    pub display_name: String,
    pub main_email: String,
}

impl Speaker {
    /// Create a speaker; both fields are required.
    pub fn new(display_name: Option<String>, main_email: Option<String>) -> Result<Self> {
        let display_name = display_name
            .filter(|n| !n.is_empty())
            .ok_or_else(|| Error::MissingRequiredField("displayName".into()))?;
        let main_email = main_email
            .filter(|e| !e.is_empty())
            .ok_or_else(|| Error::MissingRequiredField("mainEmail".into()))?;
        Ok(Self {
            id: None,
            display_name,
            main_email,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::Key;

    fn conference_key() -> Key {
        Key::conference("organizer-1", 10)
    }

    #[test]
    fn conference_defaults() {
        let conf = Conference::builder()
            .name(Some("GopherCon".into()))
            .build(conference_key(), "organizer-1")
            .unwrap();

        assert_eq!(conf.city, DEFAULT_CITY);
        assert_eq!(conf.topics, vec!["Default", "Topic"]);
        assert_eq!(conf.max_attendees, 0);
        assert_eq!(conf.seats_available, 0);
        assert_eq!(conf.month, 0);
    }

    #[test]
    fn conference_name_required() {
        let result = Conference::builder().build(conference_key(), "organizer-1");
        assert!(matches!(result, Err(Error::MissingRequiredField(f)) if f == "name"));

        let result = Conference::builder()
            .name(Some(String::new()))
            .build(conference_key(), "organizer-1");
        assert!(matches!(result, Err(Error::MissingRequiredField(_))));
    }

    #[test]
    fn conference_month_derived_from_start_date() {
        let conf = Conference::builder()
            .name(Some("RustConf".into()))
            .start_date(NaiveDate::from_ymd_opt(2026, 9, 12))
            .max_attendees(Some(150))
            .build(conference_key(), "organizer-1")
            .unwrap();

        assert_eq!(conf.month, 9);
        assert_eq!(conf.seats_available, 150);
    }

    #[test]
    fn conference_rejects_negative_capacity() {
        let result = Conference::builder()
            .name(Some("RustConf".into()))
            .max_attendees(Some(-5))
            .build(conference_key(), "organizer-1");
        assert!(matches!(result, Err(Error::InvalidValue { field, .. }) if field == "maxAttendees"));
    }

    #[test]
    fn patch_recomputes_month() {
        let mut conf = Conference::builder()
            .name(Some("RustConf".into()))
            .start_date(NaiveDate::from_ymd_opt(2026, 9, 12))
            .build(conference_key(), "organizer-1")
            .unwrap();

        ConferencePatch {
            start_date: NaiveDate::from_ymd_opt(2027, 2, 1),
            ..Default::default()
        }
        .apply(&mut conf);

        assert_eq!(conf.month, 2);
        assert_eq!(conf.name, "RustConf"); // untouched
    }

    #[test]
    fn patch_cannot_change_owner_or_seats() {
        let mut conf = Conference::builder()
            .name(Some("RustConf".into()))
            .max_attendees(Some(10))
            .build(conference_key(), "organizer-1")
            .unwrap();
        conf.seats_available = 3;

        ConferencePatch {
            max_attendees: Some(20),
            ..Default::default()
        }
        .apply(&mut conf);

        assert_eq!(conf.organizer_user_id, "organizer-1");
        assert_eq!(conf.max_attendees, 20);
        // The seat counter only moves through registration transitions.
        assert_eq!(conf.seats_available, 3);
    }

    #[test]
    fn session_defaults() {
        let key = Key::session(conference_key(), 3);
        let session = Session::builder()
            .name(Some("Intro to Lifetimes".into()))
            .build(key)
            .unwrap();

        assert_eq!(session.session_type, DEFAULT_SESSION_TYPE);
        assert_eq!(session.highlight, DEFAULT_HIGHLIGHT);
        assert!(session.duration_minutes.is_none());
        assert_eq!(session.conference_key(), Some(&conference_key()));
    }

    #[test]
    fn speaker_requires_name_and_email() {
        assert!(matches!(
            Speaker::new(None, Some("a@b.c".into())),
            Err(Error::MissingRequiredField(f)) if f == "displayName"
        ));
        assert!(matches!(
            Speaker::new(Some("Ada".into()), None),
            Err(Error::MissingRequiredField(f)) if f == "mainEmail"
        ));
        assert!(Speaker::new(Some("Ada".into()), Some("a@b.c".into())).is_ok());
    }

    #[test]
    fn tee_shirt_size_roundtrip() {
        for size in [
            TeeShirtSize::NotSpecified,
            TeeShirtSize::XsW,
            TeeShirtSize::MM,
            TeeShirtSize::XxxlW,
        ] {
            assert_eq!(TeeShirtSize::parse(size.as_str()).unwrap(), size);
        }
        assert!(TeeShirtSize::parse("HUGE").is_err());
    }
}
