/// In-process task change broadcasting
///
/// Every task mutation publishes a [`TaskEvent`] to a per-project broadcast
/// channel. Subscribers (the SSE endpoint) receive events after the write
/// commits, so reads through the API are always at least as fresh as any
/// event already delivered.
///
/// Delivery is best-effort: a subscriber that falls behind the channel
/// capacity loses the oldest events and resumes from the current position.
/// Late subscribers see no history; they should fetch the task list first
/// and then apply events.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::task::TaskStatus;

/// Events a lagging receiver can tolerate losing
const CHANNEL_CAPACITY: usize = 256;

/// What happened to a task
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskEventKind {
    /// Task was created
    Created,

    /// Task fields were edited
    Updated,

    /// Task moved to a different board column
    StatusChanged,

    /// Task was deleted
    Deleted,
}

/// A single change to a project's tasks
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaskEvent {
    /// Project the task belongs to
    pub project_id: Uuid,

    /// Task that changed
    pub task_id: Uuid,

    /// What happened
    pub kind: TaskEventKind,

    /// New column, present for Created and StatusChanged
    pub status: Option<TaskStatus>,

    /// When the change was published
    pub at: DateTime<Utc>,
}

impl TaskEvent {
    /// Builds an event stamped with the current time
    pub fn new(
        project_id: Uuid,
        task_id: Uuid,
        kind: TaskEventKind,
        status: Option<TaskStatus>,
    ) -> Self {
        Self {
            project_id,
            task_id,
            kind,
            status,
            at: Utc::now(),
        }
    }
}

/// Per-project broadcast hub
///
/// Cloning is cheap; all clones share the same channel map. Channels are
/// created lazily on first use and never removed; the map only grows for
/// projects that saw activity, which is bounded by project count.
#[derive(Debug, Clone, Default)]
pub struct EventHub {
    channels: Arc<RwLock<HashMap<Uuid, broadcast::Sender<TaskEvent>>>>,
}

impl EventHub {
    /// Creates an empty hub
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribes to a project's change stream
    ///
    /// The receiver only sees events published after this call.
    pub fn subscribe(&self, project_id: Uuid) -> broadcast::Receiver<TaskEvent> {
        self.sender(project_id).subscribe()
    }

    /// Publishes an event to the task's project channel
    ///
    /// Returns the number of subscribers the event reached. Publishing to a
    /// project with no subscribers is fine; the event is dropped.
    pub fn publish(&self, event: TaskEvent) -> usize {
        let sender = self.sender(event.project_id);
        sender.send(event).unwrap_or(0)
    }

    fn sender(&self, project_id: Uuid) -> broadcast::Sender<TaskEvent> {
        {
            let channels = self
                .channels
                .read()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            if let Some(sender) = channels.get(&project_id) {
                return sender.clone();
            }
        }

        let mut channels = self
            .channels
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        channels
            .entry(project_id)
            .or_insert_with(|| broadcast::channel(CHANNEL_CAPACITY).0)
            .clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_subscriber_receives_published_event() {
        let hub = EventHub::new();
        let project = Uuid::new_v4();
        let task = Uuid::new_v4();

        let mut rx = hub.subscribe(project);

        let reached = hub.publish(TaskEvent::new(
            project,
            task,
            TaskEventKind::StatusChanged,
            Some(TaskStatus::Done),
        ));
        assert_eq!(reached, 1);

        let event = rx.recv().await.unwrap();
        assert_eq!(event.task_id, task);
        assert_eq!(event.kind, TaskEventKind::StatusChanged);
        assert_eq!(event.status, Some(TaskStatus::Done));
    }

    #[tokio::test]
    async fn test_projects_are_isolated() {
        let hub = EventHub::new();
        let project_a = Uuid::new_v4();
        let project_b = Uuid::new_v4();

        let mut rx_a = hub.subscribe(project_a);
        let mut rx_b = hub.subscribe(project_b);

        hub.publish(TaskEvent::new(
            project_a,
            Uuid::new_v4(),
            TaskEventKind::Created,
            Some(TaskStatus::Todo),
        ));

        assert!(rx_a.recv().await.is_ok());
        assert!(rx_b.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_publish_without_subscribers_is_dropped() {
        let hub = EventHub::new();

        let reached = hub.publish(TaskEvent::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TaskEventKind::Deleted,
            None,
        ));

        assert_eq!(reached, 0);
    }

    #[tokio::test]
    async fn test_late_subscriber_sees_no_history() {
        let hub = EventHub::new();
        let project = Uuid::new_v4();

        hub.publish(TaskEvent::new(
            project,
            Uuid::new_v4(),
            TaskEventKind::Created,
            Some(TaskStatus::Todo),
        ));

        let mut rx = hub.subscribe(project);
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_lagged_receiver_resumes() {
        let hub = EventHub::new();
        let project = Uuid::new_v4();
        let mut rx = hub.subscribe(project);

        // Overflow the channel so the receiver lags
        for _ in 0..(CHANNEL_CAPACITY + 10) {
            hub.publish(TaskEvent::new(
                project,
                Uuid::new_v4(),
                TaskEventKind::Updated,
                None,
            ));
        }

        // First recv reports the lag, subsequent recvs deliver events
        match rx.recv().await {
            Err(broadcast::error::RecvError::Lagged(skipped)) => assert!(skipped > 0),
            other => panic!("expected lag, got {:?}", other),
        }
        assert!(rx.recv().await.is_ok());
    }

    #[test]
    fn test_event_serializes_kind_snake_case() {
        let event = TaskEvent::new(
            Uuid::new_v4(),
            Uuid::new_v4(),
            TaskEventKind::StatusChanged,
            Some(TaskStatus::InProgress),
        );

        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["kind"], "status_changed");
        assert_eq!(json["status"], "in_progress");
    }
}
