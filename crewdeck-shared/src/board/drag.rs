/// Drag interaction state machine for the board
///
/// Models the lifecycle of dragging a card between columns as a small,
/// closed state machine. The controller is pure: it never touches the
/// database, it only decides whether a drop should become a status change.
/// The caller applies the resulting [`StatusChange`] and broadcasts it.
///
/// A drop target is identified by an opaque string id, which is either a
/// column id (`"todo"`, `"in_progress"`, `"review"`, `"done"`) or another
/// card's task id; dropping on a card means "move into that card's column".
/// Ids that resolve to neither are ignored.
///
/// Between drag start and drop nothing is locked, so a concurrent move of
/// the same task is last-write-wins at the store.

use std::str::FromStr;

use uuid::Uuid;

use crate::models::task::TaskStatus;

/// Drag interaction state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    /// No drag in progress
    #[default]
    Idle,

    /// A card is being dragged
    Dragging {
        /// The task being dragged
        task_id: Uuid,
    },
}

/// The mutation a completed drop asks for
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatusChange {
    /// Task to move
    pub task_id: Uuid,

    /// Column to move it to
    pub status: TaskStatus,
}

/// Resolves a drop target id to a column
///
/// The id is tried as a column id first, then as a task id looked up
/// through `task_status`. Returns None when it is neither.
fn resolve_target<F>(over_id: &str, task_status: F) -> Option<TaskStatus>
where
    F: Fn(Uuid) -> Option<TaskStatus>,
{
    if let Ok(status) = TaskStatus::from_str(over_id) {
        return Some(status);
    }

    let task_id = Uuid::parse_str(over_id).ok()?;
    task_status(task_id)
}

/// Drag state machine controller
///
/// # Example
///
/// ```
/// use crewdeck_shared::board::drag::{DragController, DragState};
/// use crewdeck_shared::models::task::TaskStatus;
/// use uuid::Uuid;
///
/// let mut controller = DragController::new();
/// let card = Uuid::new_v4();
///
/// controller.on_drag_start(card);
/// assert_eq!(controller.state(), DragState::Dragging { task_id: card });
///
/// // Dropping on the "done" column asks for a move
/// let change = controller.on_drag_end("done", |_| Some(TaskStatus::Todo));
/// assert_eq!(change.unwrap().status, TaskStatus::Done);
/// assert_eq!(controller.state(), DragState::Idle);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct DragController {
    state: DragState,
}

impl DragController {
    /// Creates an idle controller
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Begins dragging a card
    ///
    /// Starting a drag while another is in progress replaces it; there is
    /// only ever one active drag.
    pub fn on_drag_start(&mut self, task_id: Uuid) {
        self.state = DragState::Dragging { task_id };
    }

    /// Cancels an in-progress drag without dropping
    pub fn on_drag_cancel(&mut self) {
        self.state = DragState::Idle;
    }

    /// Completes a drag over the target `over_id`
    ///
    /// Always returns to [`DragState::Idle`]. Returns the status change the
    /// drop asks for, or None when the drop is a no-op:
    ///
    /// - no drag was in progress
    /// - the card was dropped on itself
    /// - the target resolves to the card's current column (when the dragged
    ///   card's column is known to `task_status`)
    /// - the target id resolves to neither a column nor a known card
    pub fn on_drag_end<F>(&mut self, over_id: &str, task_status: F) -> Option<StatusChange>
    where
        F: Fn(Uuid) -> Option<TaskStatus>,
    {
        let DragState::Dragging { task_id } = self.state else {
            return None;
        };
        self.state = DragState::Idle;

        // Dropping a card on itself never mutates
        if Uuid::parse_str(over_id) == Ok(task_id) {
            return None;
        }

        let status = resolve_target(over_id, &task_status)?;

        // Moving into the column the card already occupies is a no-op
        if task_status(task_id) == Some(status) {
            return None;
        }

        Some(StatusChange { task_id, status })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(
        tasks: &HashMap<Uuid, TaskStatus>,
    ) -> impl Fn(Uuid) -> Option<TaskStatus> + '_ {
        move |id| tasks.get(&id).copied()
    }

    #[test]
    fn test_starts_idle() {
        let controller = DragController::new();
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_drag_start_and_cancel() {
        let mut controller = DragController::new();
        let card = Uuid::new_v4();

        controller.on_drag_start(card);
        assert_eq!(controller.state(), DragState::Dragging { task_id: card });

        controller.on_drag_cancel();
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_on_column_produces_one_change() {
        let card = Uuid::new_v4();
        let tasks = HashMap::from([(card, TaskStatus::Todo)]);

        let mut controller = DragController::new();
        controller.on_drag_start(card);

        let change = controller.on_drag_end("in_progress", lookup(&tasks));

        assert_eq!(
            change,
            Some(StatusChange {
                task_id: card,
                status: TaskStatus::InProgress,
            })
        );
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_on_card_adopts_its_column() {
        let dragged = Uuid::new_v4();
        let target = Uuid::new_v4();
        let tasks = HashMap::from([
            (dragged, TaskStatus::Todo),
            (target, TaskStatus::Review),
        ]);

        let mut controller = DragController::new();
        controller.on_drag_start(dragged);

        let change = controller.on_drag_end(&target.to_string(), lookup(&tasks));

        assert_eq!(
            change,
            Some(StatusChange {
                task_id: dragged,
                status: TaskStatus::Review,
            })
        );
    }

    #[test]
    fn test_drop_on_self_is_noop() {
        let card = Uuid::new_v4();
        let tasks = HashMap::from([(card, TaskStatus::Todo)]);

        let mut controller = DragController::new();
        controller.on_drag_start(card);

        let change = controller.on_drag_end(&card.to_string(), lookup(&tasks));

        assert_eq!(change, None);
        assert_eq!(controller.state(), DragState::Idle);
    }

    #[test]
    fn test_drop_on_own_column_is_noop() {
        let card = Uuid::new_v4();
        let tasks = HashMap::from([(card, TaskStatus::Review)]);

        let mut controller = DragController::new();
        controller.on_drag_start(card);

        let change = controller.on_drag_end("review", lookup(&tasks));

        assert_eq!(change, None);
    }

    #[test]
    fn test_drop_on_card_in_same_column_is_noop() {
        let dragged = Uuid::new_v4();
        let neighbor = Uuid::new_v4();
        let tasks = HashMap::from([
            (dragged, TaskStatus::Todo),
            (neighbor, TaskStatus::Todo),
        ]);

        let mut controller = DragController::new();
        controller.on_drag_start(dragged);

        let change = controller.on_drag_end(&neighbor.to_string(), lookup(&tasks));

        assert_eq!(change, None);
    }

    #[test]
    fn test_unknown_target_is_noop() {
        let card = Uuid::new_v4();
        let tasks = HashMap::from([(card, TaskStatus::Todo)]);

        let mut controller = DragController::new();
        controller.on_drag_start(card);

        // Neither a column id nor a known card id
        assert_eq!(controller.on_drag_end("trash", lookup(&tasks)), None);
        assert_eq!(controller.state(), DragState::Idle);

        controller.on_drag_start(card);
        let stranger = Uuid::new_v4();
        assert_eq!(
            controller.on_drag_end(&stranger.to_string(), lookup(&tasks)),
            None
        );
    }

    #[test]
    fn test_drop_without_drag_is_noop() {
        let tasks = HashMap::new();
        let mut controller = DragController::new();

        assert_eq!(controller.on_drag_end("done", lookup(&tasks)), None);
    }

    #[test]
    fn test_new_drag_replaces_previous() {
        let first = Uuid::new_v4();
        let second = Uuid::new_v4();
        let tasks = HashMap::from([
            (first, TaskStatus::Todo),
            (second, TaskStatus::Todo),
        ]);

        let mut controller = DragController::new();
        controller.on_drag_start(first);
        controller.on_drag_start(second);

        let change = controller.on_drag_end("done", lookup(&tasks));
        assert_eq!(change.map(|c| c.task_id), Some(second));
    }

    #[test]
    fn test_every_column_id_resolves() {
        let card = Uuid::new_v4();
        let tasks = HashMap::from([(card, TaskStatus::Done)]);

        for status in TaskStatus::ALL {
            let mut controller = DragController::new();
            controller.on_drag_start(card);
            let change = controller.on_drag_end(status.as_str(), lookup(&tasks));

            if status == TaskStatus::Done {
                assert_eq!(change, None);
            } else {
                assert_eq!(change.map(|c| c.status), Some(status));
            }
        }
    }
}
