//! Integration tests for the public wire protocol.
//!
//! These exercise the wire shapes the HTTP API exchanges: camelCase JSON
//! forms, opaque URL-safe entity keys, bearer token claims, and the filter
//! tuples the query endpoint accepts.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine as _;
use serde_json::json;
use summit_engine::{compile, FilterConfig, FilterSpec, Key, Kind};

/// Bearer token the identity gateway forwards: base64url JSON claims.
fn bearer_token(sub: &str, email: &str) -> String {
    URL_SAFE_NO_PAD.encode(
        serde_json::to_vec(&json!({ "sub": sub, "email": email })).unwrap(),
    )
}

#[cfg(test)]
mod wire_tests {
    use super::*;

    #[test]
    fn filter_specs_deserialize_from_camel_case() {
        let body = json!({
            "filters": [
                { "field": "CITY", "operator": "EQ", "value": "London" },
                { "field": "MONTH", "operator": "GT", "value": "6" }
            ]
        });

        let filters: Vec<FilterSpec> =
            serde_json::from_value(body["filters"].clone()).unwrap();
        assert_eq!(filters.len(), 2);
        assert_eq!(filters[0].field, "CITY");
        assert_eq!(filters[1].value, "6");

        let plan = compile(&FilterConfig::conferences(), &filters).unwrap();
        assert_eq!(plan.clauses.len(), 2);
        assert_eq!(plan.order_by, vec!["month", "name"]);
    }

    #[test]
    fn query_with_two_inequality_fields_is_rejected() {
        let filters = vec![
            FilterSpec {
                field: "MONTH".into(),
                operator: "GT".into(),
                value: "3".into(),
            },
            FilterSpec {
                field: "MAX_ATTENDEES".into(),
                operator: "LT".into(),
                value: "500".into(),
            },
        ];
        let result = compile(&FilterConfig::conferences(), &filters);
        assert_eq!(result, Err(summit_engine::Error::MultipleInequalityFields));
    }

    #[test]
    fn conference_keys_survive_a_url_round_trip() {
        let key = Key::conference("auth0|user-42", 1001);
        let websafe = key.urlsafe();

        // Must be usable as a raw path segment.
        assert!(!websafe.contains('/'));
        assert!(!websafe.contains('+'));
        assert!(!websafe.contains('='));

        let decoded = Key::from_urlsafe_of(&websafe, Kind::Conference).unwrap();
        assert_eq!(decoded, key);
    }

    #[test]
    fn session_key_carries_its_conference_ancestor() {
        let conference = Key::conference("organizer-1", 7);
        let session = Key::session(conference.clone(), 3);

        let decoded = Key::from_urlsafe(&session.urlsafe()).unwrap();
        assert_eq!(decoded.parent.as_deref(), Some(&conference));
    }

    #[test]
    fn dangling_key_strings_read_as_not_found() {
        for garbage in ["", "!!!", "bm90IGEga2V5"] {
            let result = Key::from_urlsafe(garbage);
            assert!(
                matches!(result, Err(summit_engine::Error::NotFound(_))),
                "{garbage:?}"
            );
        }

        // The wrong kind is indistinguishable from a missing entity.
        let profile_key = Key::profile("user-1").urlsafe();
        assert!(matches!(
            Key::from_urlsafe_of(&profile_key, Kind::Session),
            Err(summit_engine::Error::NotFound(_))
        ));
    }

    #[test]
    fn bearer_token_is_urlsafe_json_claims() {
        let token = bearer_token("auth0|12345", "ada@example.com");
        assert!(!token.contains('='));

        let bytes = URL_SAFE_NO_PAD.decode(&token).unwrap();
        let claims: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(claims["sub"], "auth0|12345");
        assert_eq!(claims["email"], "ada@example.com");
    }

    #[test]
    fn entities_serialize_in_camel_case() {
        let conference = summit_engine::Conference::builder()
            .name(Some("RustConf".into()))
            .city(Some("Portland".into()))
            .max_attendees(Some(300))
            .build(Key::conference("organizer-1", 5), "organizer-1")
            .unwrap();

        let value = serde_json::to_value(&conference).unwrap();
        assert_eq!(value["maxAttendees"], 300);
        assert_eq!(value["seatsAvailable"], 300);
        assert_eq!(value["organizerUserId"], "organizer-1");
        assert!(value.get("max_attendees").is_none());
    }

    #[test]
    fn tee_shirt_sizes_use_screaming_snake_case_on_the_wire() {
        use summit_engine::TeeShirtSize;

        let value = serde_json::to_value(TeeShirtSize::XxlW).unwrap();
        assert_eq!(value, "XXL_W");

        let parsed: TeeShirtSize = serde_json::from_value(json!("NOT_SPECIFIED")).unwrap();
        assert_eq!(parsed, TeeShirtSize::NotSpecified);
    }
}
