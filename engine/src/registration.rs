//! Registration state transitions.
//!
//! Each transition touches exactly one profile and one target entity and is
//! expected to run inside a store transaction that writes both back
//! atomically. The functions here only decide and mutate in memory; they
//! never do IO.
//!
//! Leave semantics are deliberately asymmetric: leaving a conference you
//! never joined is an idempotent no-op (`Ok(false)`), while removing a
//! session that was never wishlisted is a conflict.

use crate::entity::{Conference, Profile, Session};
use crate::error::{Error, Result};

/// Register the profile for a conference, taking one seat.
///
/// Fails with [`Error::Conflict`] when already registered or when no seats
/// remain; neither entity is mutated on failure.
pub fn register(profile: &mut Profile, conference: &mut Conference) -> Result<bool> {
    let conference_key = conference.key.urlsafe();

    if profile.is_attending(&conference_key) {
        return Err(Error::Conflict(
            "you have already registered for this conference".into(),
        ));
    }
    if conference.seats_available <= 0 {
        return Err(Error::Conflict("there are no seats available".into()));
    }

    profile.conference_keys_to_attend.push(conference_key);
    conference.seats_available -= 1;
    Ok(true)
}

/// Unregister the profile from a conference, returning one seat.
///
/// Leaving while not registered is not a fault: returns `Ok(false)` and
/// mutates nothing. A leave that would push the seat counter past the
/// conference capacity is an invariant violation, not a silent write.
pub fn unregister(profile: &mut Profile, conference: &mut Conference) -> Result<bool> {
    let conference_key = conference.key.urlsafe();

    let Some(position) = profile
        .conference_keys_to_attend
        .iter()
        .position(|k| k == &conference_key)
    else {
        return Ok(false);
    };

    if conference.seats_available >= conference.max_attendees {
        return Err(Error::InvariantViolation(format!(
            "seat counter would exceed capacity ({} of {})",
            conference.seats_available + 1,
            conference.max_attendees
        )));
    }

    profile.conference_keys_to_attend.remove(position);
    conference.seats_available += 1;
    Ok(true)
}

/// Add a session to the profile's wishlist.
///
/// Requires prior registration for the session's parent conference, and
/// rejects duplicates; both violations are conflicts.
pub fn add_to_wishlist(profile: &mut Profile, session: &Session) -> Result<bool> {
    require_parent_registration(profile, session)?;

    let session_key = session.key.urlsafe();
    if profile.has_wishlisted(&session_key) {
        return Err(Error::Conflict(
            "you have already placed this session in your wishlist".into(),
        ));
    }

    profile.session_keys_in_wishlist.push(session_key);
    Ok(true)
}

/// Remove a session from the profile's wishlist.
///
/// Unlike conference leave, removing an absent session is a conflict.
pub fn remove_from_wishlist(profile: &mut Profile, session: &Session) -> Result<bool> {
    require_parent_registration(profile, session)?;

    let session_key = session.key.urlsafe();
    let Some(position) = profile
        .session_keys_in_wishlist
        .iter()
        .position(|k| k == &session_key)
    else {
        return Err(Error::Conflict(
            "this session was not in your wishlist".into(),
        ));
    };

    profile.session_keys_in_wishlist.remove(position);
    Ok(true)
}

fn require_parent_registration(profile: &Profile, session: &Session) -> Result<()> {
    let conference_key = session
        .conference_key()
        .ok_or_else(|| Error::NotFound(session.key.urlsafe()))?
        .urlsafe();

    if !profile.is_attending(&conference_key) {
        return Err(Error::Conflict(
            "you have yet to register for the conference where this session will take place"
                .into(),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{Conference, Profile, Session};
    use crate::key::Key;

    fn conference(seats: i32) -> Conference {
        let mut conf = Conference::builder()
            .name(Some("RustConf".into()))
            .max_attendees(Some(seats))
            .build(Key::conference("organizer-1", 1), "organizer-1")
            .unwrap();
        conf.seats_available = seats;
        conf
    }

    fn profile() -> Profile {
        Profile::new("attendee-1", "Attendee", "a@example.com")
    }

    fn session_under(conf: &Conference) -> Session {
        Session::builder()
            .name(Some("Borrow Checker Deep Dive".into()))
            .build(Key::session(conf.key.clone(), 5))
            .unwrap()
    }

    #[test]
    fn register_takes_a_seat() {
        let mut prof = profile();
        let mut conf = conference(3);

        assert_eq!(register(&mut prof, &mut conf), Ok(true));
        assert_eq!(conf.seats_available, 2);
        assert!(prof.is_attending(&conf.key.urlsafe()));
    }

    #[test]
    fn double_register_conflicts_without_mutation() {
        let mut prof = profile();
        let mut conf = conference(3);

        register(&mut prof, &mut conf).unwrap();
        let result = register(&mut prof, &mut conf);

        assert!(matches!(result, Err(Error::Conflict(_))));
        assert_eq!(conf.seats_available, 2);
        assert_eq!(prof.conference_keys_to_attend.len(), 1);
    }

    #[test]
    fn register_full_conference_conflicts() {
        let mut prof = profile();
        let mut conf = conference(0);

        let result = register(&mut prof, &mut conf);
        assert!(matches!(result, Err(Error::Conflict(m)) if m.contains("no seats")));
        assert!(prof.conference_keys_to_attend.is_empty());
    }

    #[test]
    fn unregister_returns_a_seat() {
        let mut prof = profile();
        let mut conf = conference(2);

        register(&mut prof, &mut conf).unwrap();
        assert_eq!(unregister(&mut prof, &mut conf), Ok(true));
        assert_eq!(conf.seats_available, 2);
        assert!(prof.conference_keys_to_attend.is_empty());
    }

    #[test]
    fn unregister_when_never_joined_is_false_not_error() {
        let mut prof = profile();
        let mut conf = conference(2);

        assert_eq!(unregister(&mut prof, &mut conf), Ok(false));
        assert_eq!(conf.seats_available, 2);
    }

    #[test]
    fn unregister_cannot_exceed_capacity() {
        let mut prof = profile();
        let mut conf = conference(2);
        // Corrupted state: registered but the counter is already at capacity.
        prof.conference_keys_to_attend.push(conf.key.urlsafe());

        let result = unregister(&mut prof, &mut conf);
        assert!(matches!(result, Err(Error::InvariantViolation(_))));
        assert_eq!(conf.seats_available, 2);
        assert_eq!(prof.conference_keys_to_attend.len(), 1);
    }

    #[test]
    fn capacity_two_scenario() {
        let mut conf = conference(2);
        let mut a = Profile::new("a", "A", "a@example.com");
        let mut b = Profile::new("b", "B", "b@example.com");
        let mut c = Profile::new("c", "C", "c@example.com");

        assert_eq!(register(&mut a, &mut conf), Ok(true));
        assert_eq!(conf.seats_available, 1);

        assert!(matches!(register(&mut a, &mut conf), Err(Error::Conflict(_))));

        assert_eq!(register(&mut b, &mut conf), Ok(true));
        assert_eq!(conf.seats_available, 0);

        let result = register(&mut c, &mut conf);
        assert!(matches!(result, Err(Error::Conflict(m)) if m.contains("no seats")));

        assert_eq!(unregister(&mut a, &mut conf), Ok(true));
        assert_eq!(conf.seats_available, 1);
    }

    #[test]
    fn wishlist_requires_parent_registration() {
        let mut prof = profile();
        let mut conf = conference(5);
        let session = session_under(&conf);

        let result = add_to_wishlist(&mut prof, &session);
        assert!(matches!(result, Err(Error::Conflict(m)) if m.contains("yet to register")));

        register(&mut prof, &mut conf).unwrap();
        assert_eq!(add_to_wishlist(&mut prof, &session), Ok(true));
        assert!(prof.has_wishlisted(&session.key.urlsafe()));
    }

    #[test]
    fn duplicate_wishlist_add_conflicts() {
        let mut prof = profile();
        let mut conf = conference(5);
        let session = session_under(&conf);

        register(&mut prof, &mut conf).unwrap();
        add_to_wishlist(&mut prof, &session).unwrap();

        let result = add_to_wishlist(&mut prof, &session);
        assert!(matches!(result, Err(Error::Conflict(m)) if m.contains("already placed")));
        assert_eq!(prof.session_keys_in_wishlist.len(), 1);
    }

    #[test]
    fn wishlist_remove_when_absent_is_conflict() {
        let mut prof = profile();
        let mut conf = conference(5);
        let session = session_under(&conf);

        register(&mut prof, &mut conf).unwrap();

        // Asymmetric with conference leave, which returns Ok(false).
        let result = remove_from_wishlist(&mut prof, &session);
        assert!(matches!(result, Err(Error::Conflict(m)) if m.contains("not in your wishlist")));

        add_to_wishlist(&mut prof, &session).unwrap();
        assert_eq!(remove_from_wishlist(&mut prof, &session), Ok(true));
        assert!(prof.session_keys_in_wishlist.is_empty());
    }
}
