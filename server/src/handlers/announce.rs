//! Announcement and featured-speaker handlers.
//!
//! Both values are derived and served from the cache. An absent entry is
//! a defined state that reads as an empty string.

use sqlx::PgPool;
use summit_engine::announce::{self, SOLD_OUT_THRESHOLD};

use crate::cache::{Cache, FEATURED_SPEAKER_KEY, RECENT_ANNOUNCEMENTS_KEY};
use crate::error::Result;
use crate::handlers::StringMessage;

/// Current nearly-sold-out announcement, if any.
pub fn handle_get_announcement(cache: &Cache) -> StringMessage {
    StringMessage {
        data: cache.get(RECENT_ANNOUNCEMENTS_KEY).unwrap_or_default(),
    }
}

/// Current featured speaker string, if any.
pub fn handle_get_featured_speaker(cache: &Cache) -> StringMessage {
    StringMessage {
        data: cache.get(FEATURED_SPEAKER_KEY).unwrap_or_default(),
    }
}

/// Recompute the announcement from the store (scheduler entry point).
///
/// When no conference is nearly sold out the cached entry is removed, so
/// a stale announcement never outlives the state that produced it.
pub async fn handle_set_announcement(pool: &PgPool, cache: &Cache) -> Result<StringMessage> {
    let names = crate::db::conferences::almost_sold_out_names(pool, SOLD_OUT_THRESHOLD).await?;

    match announce::announcement(&names) {
        Some(message) => {
            cache.set(RECENT_ANNOUNCEMENTS_KEY, message.clone());
            Ok(StringMessage { data: message })
        }
        None => {
            cache.delete(RECENT_ANNOUNCEMENTS_KEY);
            Ok(StringMessage {
                data: String::new(),
            })
        }
    }
}
