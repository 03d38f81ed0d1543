//! Rendering for the derived cache entries.
//!
//! The announcement and featured-speaker strings are denormalized values
//! recomputed on a trigger (cron or post-write task), never on read. The
//! rendering itself is pure; the server owns the cache plumbing.

/// Conferences with `0 < seats_available <= SOLD_OUT_THRESHOLD` make the
/// nearly-sold-out announcement.
pub const SOLD_OUT_THRESHOLD: i32 = 5;

/// A speaker with at least this many sessions in one conference is featured.
pub const FEATURED_SESSION_COUNT: usize = 2;

/// Render the nearly-sold-out announcement from the matching conference
/// names. `None` means the cache entry should be cleared, not set to "".
pub fn announcement(conference_names: &[String]) -> Option<String> {
    if conference_names.is_empty() {
        return None;
    }
    Some(format!(
        "Last chance to attend! The following conferences are nearly sold out: {}",
        conference_names.join(", ")
    ))
}

/// Render the featured-speaker string, given the speaker's sessions within
/// one conference. `None` (fewer than two sessions) leaves any previous
/// cache value untouched.
pub fn featured_speaker(speaker_name: &str, session_names: &[String]) -> Option<String> {
    if session_names.len() < FEATURED_SESSION_COUNT {
        return None;
    }
    Some(format!(
        "Featured Speaker - {}. You can find the speaker in the following sessions: {}",
        speaker_name,
        session_names.join(", ")
    ))
}
