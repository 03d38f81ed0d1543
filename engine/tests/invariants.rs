//! Cross-module tests for summit-engine
//!
//! These exercise the documented guarantees of the filter compiler and the
//! registration transitions together, including property-based coverage of
//! the single-inequality-field rule.

use summit_engine::{
    compile, registration, Conference, Error, FilterConfig, FilterSpec, Key, Profile, Session,
};

fn spec(field: &str, operator: &str, value: &str) -> FilterSpec {
    FilterSpec {
        field: field.into(),
        operator: operator.into(),
        value: value.into(),
    }
}

// ============================================================================
// Filter compiler guarantees
// ============================================================================

#[test]
fn month_and_city_scenario() {
    let config = FilterConfig::conferences();
    let plan = compile(
        &config,
        &[spec("MONTH", "GT", "3"), spec("CITY", "EQ", "London")],
    )
    .unwrap();

    // month > 3, city = "London", sorted month then name
    assert_eq!(plan.clauses[0].column, "month");
    assert_eq!(plan.clauses[0].operator.symbol(), ">");
    assert_eq!(plan.clauses[1].column, "city");
    assert_eq!(plan.clauses[1].operator.symbol(), "=");
    assert_eq!(plan.order_by, vec!["month", "name"]);
}

#[test]
fn month_and_attendees_inequalities_rejected() {
    let config = FilterConfig::conferences();
    let result = compile(
        &config,
        &[spec("MONTH", "GT", "3"), spec("MAX_ATTENDEES", "LT", "100")],
    );
    assert_eq!(result, Err(Error::MultipleInequalityFields));
}

#[test]
fn filter_order_does_not_rescue_invalid_input() {
    let config = FilterConfig::conferences();
    // The invalid entry fails regardless of where it sits in the sequence.
    for position in 0..3 {
        let mut specs = vec![
            spec("CITY", "EQ", "London"),
            spec("MONTH", "GTEQ", "1"),
        ];
        specs.insert(position.min(specs.len()), spec("VENUE", "EQ", "Hall A"));
        assert!(matches!(
            compile(&config, &specs),
            Err(Error::InvalidFilter(_))
        ));
    }
}

mod filter_properties {
    use super::*;
    use proptest::prelude::*;

    fn arb_field() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("CITY"),
            Just("TOPIC"),
            Just("MONTH"),
            Just("MAX_ATTENDEES"),
        ]
    }

    fn arb_operator() -> impl Strategy<Value = &'static str> {
        prop_oneof![
            Just("EQ"),
            Just("GT"),
            Just("GTEQ"),
            Just("LT"),
            Just("LTEQ"),
            Just("NE"),
        ]
    }

    fn arb_spec() -> impl Strategy<Value = FilterSpec> {
        (arb_field(), arb_operator(), 0i64..500).prop_map(|(field, operator, value)| {
            // Numeric strings are valid for every whitelisted field.
            spec(field, operator, &value.to_string())
        })
    }

    fn inequality_columns(specs: &[FilterSpec]) -> Vec<&'static str> {
        let mut columns: Vec<&'static str> = Vec::new();
        for s in specs {
            if s.operator == "EQ" {
                continue;
            }
            let column = match s.field.as_str() {
                "CITY" => "city",
                "TOPIC" => "topics",
                "MONTH" => "month",
                "MAX_ATTENDEES" => "max_attendees",
                _ => unreachable!(),
            };
            if !columns.contains(&column) {
                columns.push(column);
            }
        }
        columns
    }

    proptest! {
        #[test]
        fn prop_single_inequality_field_rule(specs in prop::collection::vec(arb_spec(), 0..6)) {
            let config = FilterConfig::conferences();
            let distinct = inequality_columns(&specs);
            let result = compile(&config, &specs);

            if distinct.len() > 1 {
                prop_assert_eq!(result, Err(Error::MultipleInequalityFields));
            } else {
                let plan = result.unwrap();
                match distinct.first() {
                    // The inequality field always leads the sort order.
                    Some(column) => prop_assert_eq!(&plan.order_by, &vec![*column, "name"]),
                    None => prop_assert_eq!(&plan.order_by, &vec!["name"]),
                }
                prop_assert_eq!(plan.clauses.len(), specs.len());
            }
        }

        #[test]
        fn prop_compile_is_deterministic(specs in prop::collection::vec(arb_spec(), 0..6)) {
            let config = FilterConfig::conferences();
            prop_assert_eq!(compile(&config, &specs), compile(&config, &specs));
        }
    }
}

// ============================================================================
// Registration + wishlist end to end
// ============================================================================

fn conference_with_seats(id: i64, seats: i32) -> Conference {
    Conference::builder()
        .name(Some(format!("Conference {id}")))
        .max_attendees(Some(seats))
        .build(Key::conference("organizer", id), "organizer")
        .unwrap()
}

#[test]
fn registration_then_wishlist_lifecycle() {
    let mut conf = conference_with_seats(1, 10);
    let mut other_conf = conference_with_seats(2, 10);
    let mut prof = Profile::new("user-1", "User One", "one@example.com");

    let session = Session::builder()
        .name(Some("Opening Keynote".into()))
        .build(Key::session(conf.key.clone(), 1))
        .unwrap();
    let foreign_session = Session::builder()
        .name(Some("Closing Panel".into()))
        .build(Key::session(other_conf.key.clone(), 1))
        .unwrap();

    // Wishlisting before registering for the parent conference is a conflict,
    // regardless of the session existing.
    assert!(matches!(
        registration::add_to_wishlist(&mut prof, &session),
        Err(Error::Conflict(_))
    ));

    registration::register(&mut prof, &mut conf).unwrap();
    assert_eq!(conf.seats_available, 9);

    registration::add_to_wishlist(&mut prof, &session).unwrap();

    // Registered for conf 1 does not grant wishlist access to conf 2.
    assert!(matches!(
        registration::add_to_wishlist(&mut prof, &foreign_session),
        Err(Error::Conflict(_))
    ));

    registration::remove_from_wishlist(&mut prof, &session).unwrap();
    registration::unregister(&mut prof, &mut conf).unwrap();
    assert_eq!(conf.seats_available, 10);

    // Leave when already gone: no-op false for conferences.
    assert_eq!(registration::unregister(&mut prof, &mut conf), Ok(false));
    let _ = registration::register(&mut prof, &mut other_conf);
}

#[test]
fn seats_decrement_and_increment_by_exactly_one() {
    let mut conf = conference_with_seats(1, 4);
    let mut profiles: Vec<Profile> = (0..3)
        .map(|i| Profile::new(format!("u{i}"), format!("U{i}"), format!("u{i}@example.com")))
        .collect();

    for (i, prof) in profiles.iter_mut().enumerate() {
        registration::register(prof, &mut conf).unwrap();
        assert_eq!(conf.seats_available, 4 - (i as i32 + 1));
    }

    for (i, prof) in profiles.iter_mut().enumerate() {
        registration::unregister(prof, &mut conf).unwrap();
        assert_eq!(conf.seats_available, 1 + (i as i32 + 1));
    }
}
