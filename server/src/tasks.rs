//! Deferred work queue.
//!
//! Request handlers enqueue tasks and return immediately; a background
//! worker drains the queue. Losing a task on overflow degrades derived
//! data, never entity state.

use tokio::sync::mpsc;

use crate::cache::{Cache, FEATURED_SPEAKER_KEY};
use crate::db::{self, Pool};
use summit_engine::announce;

/// Queue capacity before enqueue starts dropping tasks.
const QUEUE_CAPACITY: usize = 256;

/// A unit of deferred work.
#[derive(Debug)]
pub enum Task {
    /// Notify an organizer that their conference was created.
    SendConfirmationEmail {
        email: String,
        conference_name: String,
    },
    /// Re-derive the featured speaker after a session was added.
    CheckFeaturedSpeaker {
        conference_id: i64,
        speaker_id: i64,
    },
}

/// Handle for enqueueing deferred tasks.
#[derive(Clone)]
pub struct TaskQueue {
    tx: mpsc::Sender<Task>,
}

impl TaskQueue {
    /// Create a queue and the receiving end for its worker.
    pub fn new() -> (Self, mpsc::Receiver<Task>) {
        let (tx, rx) = mpsc::channel(QUEUE_CAPACITY);
        (Self { tx }, rx)
    }

    /// Enqueue a task without blocking the request.
    pub fn enqueue(&self, task: Task) {
        if let Err(e) = self.tx.try_send(task) {
            tracing::warn!("Dropping deferred task: {}", e);
        }
    }
}

/// Spawn the background worker that drains the task queue.
pub fn spawn_worker(mut rx: mpsc::Receiver<Task>, pool: Pool, cache: Cache) {
    tokio::spawn(async move {
        while let Some(task) = rx.recv().await {
            if let Err(e) = run_task(&pool, &cache, task).await {
                tracing::error!("Deferred task failed: {}", e);
            }
        }
    });
}

async fn run_task(pool: &Pool, cache: &Cache, task: Task) -> crate::error::Result<()> {
    match task {
        Task::SendConfirmationEmail {
            email,
            conference_name,
        } => {
            // Mail delivery goes through the hosting platform; record the
            // send here.
            tracing::info!(
                "Sending confirmation email to {} for conference '{}'",
                email,
                conference_name
            );
            Ok(())
        }
        Task::CheckFeaturedSpeaker {
            conference_id,
            speaker_id,
        } => {
            let Some(row) = db::speakers::get(pool, speaker_id).await? else {
                tracing::warn!("Featured speaker check for unknown speaker {}", speaker_id);
                return Ok(());
            };
            let speaker = row.to_speaker();
            let session_names =
                db::sessions::names_by_conference_and_speaker(pool, conference_id, speaker_id)
                    .await?;
            if let Some(message) =
                announce::featured_speaker(&speaker.display_name, &session_names)
            {
                cache.set(FEATURED_SPEAKER_KEY, message);
            }
            Ok(())
        }
    }
}
