//! Opaque, URL-safe entity keys.
//!
//! A key identifies an entity by kind and id, optionally nested under a
//! parent key (Conference under Profile, Session under Conference). Keys
//! encode their full ancestor path into a URL-safe string that callers
//! treat as a black box. A string that fails to decode is reported as
//! [`Error::NotFound`], never as a decode fault.

use crate::error::{Error, Result};
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde::{Deserialize, Serialize};

/// Entity kinds stored in the datastore.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Kind {
    Profile,
    Conference,
    Session,
    Speaker,
}

impl std::fmt::Display for Kind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Kind::Profile => write!(f, "Profile"),
            Kind::Conference => write!(f, "Conference"),
            Kind::Session => write!(f, "Session"),
            Kind::Speaker => write!(f, "Speaker"),
        }
    }
}

/// An entity id within its kind: either a store-allocated number or an
/// externally supplied name (user ids for profiles).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeyId {
    Number(i64),
    Name(String),
}

impl KeyId {
    /// Numeric id, if this id is store-allocated.
    pub fn as_number(&self) -> Option<i64> {
        match self {
            KeyId::Number(n) => Some(*n),
            KeyId::Name(_) => None,
        }
    }

    /// Name id, if this id is externally supplied.
    pub fn as_name(&self) -> Option<&str> {
        match self {
            KeyId::Number(_) => None,
            KeyId::Name(s) => Some(s),
        }
    }
}

/// A reference to a specific entity, including its ancestor path.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Key {
    pub kind: Kind,
    pub id: KeyId,
    pub parent: Option<Box<Key>>,
}

impl Key {
    /// Create a root key with a name id.
    pub fn named(kind: Kind, name: impl Into<String>) -> Self {
        Self {
            kind,
            id: KeyId::Name(name.into()),
            parent: None,
        }
    }

    /// Create a root key with a numeric id.
    pub fn numbered(kind: Kind, id: i64) -> Self {
        Self {
            kind,
            id: KeyId::Number(id),
            parent: None,
        }
    }

    /// Nest this key under a parent.
    pub fn with_parent(mut self, parent: Key) -> Self {
        self.parent = Some(Box::new(parent));
        self
    }

    /// The key for a user's profile.
    pub fn profile(user_id: impl Into<String>) -> Self {
        Key::named(Kind::Profile, user_id)
    }

    /// The key for a conference owned by the given user.
    pub fn conference(user_id: impl Into<String>, conference_id: i64) -> Self {
        Key::numbered(Kind::Conference, conference_id).with_parent(Key::profile(user_id))
    }

    /// The key for a session under its conference.
    pub fn session(conference: Key, session_id: i64) -> Self {
        Key::numbered(Kind::Session, session_id).with_parent(conference)
    }

    /// The key for a speaker.
    pub fn speaker(speaker_id: i64) -> Self {
        Key::numbered(Kind::Speaker, speaker_id)
    }

    /// Encode this key, ancestor path included, as a URL-safe string.
    pub fn urlsafe(&self) -> String {
        let mut path: Vec<(&str, &KeyId)> = Vec::new();
        self.collect_path(&mut path);
        // Path is serialized root-first so decoding can rebuild parents in order.
        let json = serde_json::to_vec(
            &path
                .iter()
                .map(|(kind, id)| serde_json::json!([kind, id]))
                .collect::<Vec<_>>(),
        )
        .expect("key path serializes");
        URL_SAFE_NO_PAD.encode(json)
    }

    fn collect_path<'a>(&'a self, out: &mut Vec<(&'a str, &'a KeyId)>) {
        if let Some(parent) = &self.parent {
            parent.collect_path(out);
        }
        let kind = match self.kind {
            Kind::Profile => "Profile",
            Kind::Conference => "Conference",
            Kind::Session => "Session",
            Kind::Speaker => "Speaker",
        };
        out.push((kind, &self.id));
    }

    /// Decode a URL-safe key string back into a key.
    ///
    /// Any malformed input maps to [`Error::NotFound`] carrying the original
    /// string, matching how callers experience a dangling reference.
    pub fn from_urlsafe(encoded: &str) -> Result<Key> {
        let not_found = || Error::NotFound(encoded.to_string());

        let bytes = URL_SAFE_NO_PAD.decode(encoded).map_err(|_| not_found())?;
        let path: Vec<(String, KeyId)> =
            serde_json::from_slice(&bytes).map_err(|_| not_found())?;

        let mut key: Option<Key> = None;
        for (kind, id) in path {
            let kind = match kind.as_str() {
                "Profile" => Kind::Profile,
                "Conference" => Kind::Conference,
                "Session" => Kind::Session,
                "Speaker" => Kind::Speaker,
                _ => return Err(not_found()),
            };
            key = Some(Key {
                kind,
                id,
                parent: key.map(Box::new),
            });
        }
        key.ok_or_else(not_found)
    }

    /// Decode and require a specific kind; mismatch is also `NotFound`.
    pub fn from_urlsafe_of(encoded: &str, kind: Kind) -> Result<Key> {
        let key = Key::from_urlsafe(encoded)?;
        if key.kind != kind {
            return Err(Error::NotFound(encoded.to_string()));
        }
        Ok(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn roundtrip_profile_key() {
        let key = Key::profile("user-123");
        let encoded = key.urlsafe();
        let decoded = Key::from_urlsafe(&encoded).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn roundtrip_nested_keys() {
        let conf = Key::conference("organizer@example.com", 42);
        let session = Key::session(conf.clone(), 7);

        let decoded = Key::from_urlsafe(&session.urlsafe()).unwrap();
        assert_eq!(decoded.kind, Kind::Session);
        assert_eq!(decoded.id, KeyId::Number(7));
        assert_eq!(decoded.parent.as_deref(), Some(&conf));
    }

    #[test]
    fn malformed_key_is_not_found() {
        let result = Key::from_urlsafe("not a key!!");
        assert!(matches!(result, Err(Error::NotFound(s)) if s == "not a key!!"));

        // Valid base64 but garbage inside
        let garbage = URL_SAFE_NO_PAD.encode(b"{\"nope\": true}");
        assert!(matches!(Key::from_urlsafe(&garbage), Err(Error::NotFound(_))));
    }

    #[test]
    fn empty_path_is_not_found() {
        let empty = URL_SAFE_NO_PAD.encode(b"[]");
        assert!(matches!(Key::from_urlsafe(&empty), Err(Error::NotFound(_))));
    }

    #[test]
    fn kind_mismatch_is_not_found() {
        let encoded = Key::profile("user-1").urlsafe();
        let result = Key::from_urlsafe_of(&encoded, Kind::Conference);
        assert!(matches!(result, Err(Error::NotFound(_))));

        assert!(Key::from_urlsafe_of(&encoded, Kind::Profile).is_ok());
    }

    #[test]
    fn urlsafe_uses_no_padding_or_slashes() {
        // Profile ids can be arbitrary strings; the encoding must stay URL-safe.
        let key = Key::conference("weird/user+id=", 1);
        let encoded = key.urlsafe();
        assert!(!encoded.contains('/'));
        assert!(!encoded.contains('+'));
        assert!(!encoded.contains('='));
        assert_eq!(Key::from_urlsafe(&encoded).unwrap(), key);
    }
}
