//! Transcode lifecycle events.
//!
//! [`EventBus`] wraps a `tokio::sync::broadcast` channel with a bounded
//! ring-buffer of recent events so that late subscribers (status pages,
//! the CLI) can catch up.

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::path::PathBuf;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::ids::{JobId, JobKey, PipelineId};

/// Maximum number of events retained in the ring buffer.
const MAX_RECENT_EVENTS: usize = 100;

// ---------------------------------------------------------------------------
// EventPayload
// ---------------------------------------------------------------------------

/// Payload describing what happened.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum EventPayload {
    // -- Job lifecycle -------------------------------------------------------
    TranscodeQueued {
        job_id: JobId,
        key: JobKey,
        pipeline_id: PipelineId,
    },
    TranscodeStarted {
        job_id: JobId,
        key: JobKey,
    },
    TranscodeCompleted {
        job_id: JobId,
        key: JobKey,
        output: PathBuf,
    },
    TranscodeFailed {
        job_id: JobId,
        key: JobKey,
        error: String,
    },
    TranscodeStopped {
        job_id: JobId,
        key: JobKey,
    },

    // -- Cache ---------------------------------------------------------------
    /// A request attached to an existing record instead of starting a job.
    CacheHit {
        job_id: JobId,
        key: JobKey,
    },
}

impl EventPayload {
    /// Key of the job the event refers to.
    pub fn key(&self) -> &JobKey {
        match self {
            Self::TranscodeQueued { key, .. }
            | Self::TranscodeStarted { key, .. }
            | Self::TranscodeCompleted { key, .. }
            | Self::TranscodeFailed { key, .. }
            | Self::TranscodeStopped { key, .. }
            | Self::CacheHit { key, .. } => key,
        }
    }
}

// ---------------------------------------------------------------------------
// Event
// ---------------------------------------------------------------------------

/// A timestamped event ready for broadcast.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub payload: EventPayload,
}

impl Event {
    /// Create a new event with a fresh UUID and the current timestamp.
    pub fn new(payload: EventPayload) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: Utc::now(),
            payload,
        }
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Broadcast channel with a bounded ring buffer of recent events.
pub struct EventBus {
    tx: broadcast::Sender<Event>,
    recent: RwLock<VecDeque<Event>>,
}

impl EventBus {
    /// Create a new event bus. A zero `capacity` is raised to one.
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity.max(1));
        Self {
            tx,
            recent: RwLock::new(VecDeque::with_capacity(MAX_RECENT_EVENTS)),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.tx.subscribe()
    }

    /// Broadcast an event to all current subscribers and store it in the
    /// ring buffer.
    pub fn broadcast(&self, payload: EventPayload) {
        let event = Event::new(payload);

        {
            let mut recent = self.recent.write();
            if recent.len() >= MAX_RECENT_EVENTS {
                recent.pop_back();
            }
            recent.push_front(event.clone());
        }

        // No subscribers is fine.
        let _ = self.tx.send(event);
    }

    /// Return the `n` most recent events (newest first).
    pub fn recent_events(&self, n: usize) -> Vec<Event> {
        let recent = self.recent.read();
        recent.iter().take(n).cloned().collect()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(256)
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscribers", &self.tx.receiver_count())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn started(key: &str) -> EventPayload {
        EventPayload::TranscodeStarted {
            job_id: JobId::new(),
            key: JobKey::from(key),
        }
    }

    #[test]
    fn broadcast_and_receive() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.broadcast(started("console:/m/a.avi"));

        let event = rx.try_recv().unwrap();
        assert_eq!(event.payload.key().as_str(), "console:/m/a.avi");
    }

    #[test]
    fn recent_events_capped() {
        let bus = EventBus::new(256);
        for _ in 0..150 {
            bus.broadcast(started("k"));
        }
        assert_eq!(bus.recent_events(200).len(), MAX_RECENT_EVENTS);
    }

    #[test]
    fn recent_events_newest_first() {
        let bus = EventBus::new(16);
        bus.broadcast(started("first"));
        bus.broadcast(EventPayload::TranscodeStopped {
            job_id: JobId::new(),
            key: JobKey::from("second"),
        });

        let recent = bus.recent_events(1);
        assert_eq!(recent.len(), 1);
        assert!(matches!(recent[0].payload, EventPayload::TranscodeStopped { .. }));
    }

    #[test]
    fn zero_capacity_does_not_panic() {
        let bus = EventBus::new(0);
        bus.broadcast(started("k"));
        assert_eq!(bus.recent_events(5).len(), 1);
    }

    #[test]
    fn payload_serializes_with_type_tag() {
        let payload = EventPayload::TranscodeFailed {
            job_id: JobId::new(),
            key: JobKey::from("k"),
            error: "exit status 1".into(),
        };
        let json = serde_json::to_value(&payload).unwrap();
        assert_eq!(json["type"], "transcode_failed");
        assert_eq!(json["key"], "k");
    }
}
