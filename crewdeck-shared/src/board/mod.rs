//! Board projections over a project's tasks
//!
//! Pure functions that partition a task list into the views the board
//! renders: four status columns, and four deadline groups for the timeline.
//! Both are total — every input task lands in exactly one bucket — and both
//! preserve the relative order of the input.
//!
//! Deadline grouping takes `now` as an explicit argument so the boundary
//! cases are testable; callers pass `Utc::now()`.

pub mod drag;

use chrono::{DateTime, Datelike, Duration, Utc};

use crate::models::task::TaskStatus;

/// Anything that can be placed on the board
///
/// Implemented by [`Task`](crate::models::task::Task) and by test fixtures.
pub trait BoardItem {
    /// Current board column
    fn status(&self) -> TaskStatus;

    /// Due date
    fn deadline(&self) -> DateTime<Utc>;
}

impl BoardItem for crate::models::task::Task {
    fn status(&self) -> TaskStatus {
        self.status
    }

    fn deadline(&self) -> DateTime<Utc> {
        self.deadline
    }
}

impl BoardItem for crate::models::task::TaskWithAssignee {
    fn status(&self) -> TaskStatus {
        self.task.status
    }

    fn deadline(&self) -> DateTime<Utc> {
        self.task.deadline
    }
}

/// Tasks partitioned into the four status columns
#[derive(Debug, Clone, serde::Serialize)]
pub struct StatusColumns<T> {
    /// Not started
    pub todo: Vec<T>,

    /// Being worked on
    pub in_progress: Vec<T>,

    /// Waiting on review
    pub review: Vec<T>,

    /// Finished
    pub done: Vec<T>,
}

impl<T> Default for StatusColumns<T> {
    fn default() -> Self {
        Self {
            todo: Vec::new(),
            in_progress: Vec::new(),
            review: Vec::new(),
            done: Vec::new(),
        }
    }
}

impl<T> StatusColumns<T> {
    /// Total number of tasks across all columns
    pub fn len(&self) -> usize {
        self.todo.len() + self.in_progress.len() + self.review.len() + self.done.len()
    }

    /// True when every column is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Tasks partitioned into the four timeline groups
#[derive(Debug, Clone, serde::Serialize)]
pub struct DeadlineGroups<T> {
    /// Past due, and not finished
    pub overdue: Vec<T>,

    /// Due today
    pub today: Vec<T>,

    /// Due tomorrow
    pub tomorrow: Vec<T>,

    /// Everything else (later dates, and past-due finished work)
    pub upcoming: Vec<T>,
}

impl<T> Default for DeadlineGroups<T> {
    fn default() -> Self {
        Self {
            overdue: Vec::new(),
            today: Vec::new(),
            tomorrow: Vec::new(),
            upcoming: Vec::new(),
        }
    }
}

impl<T> DeadlineGroups<T> {
    /// Total number of tasks across all groups
    pub fn len(&self) -> usize {
        self.overdue.len() + self.today.len() + self.tomorrow.len() + self.upcoming.len()
    }

    /// True when every group is empty
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Partitions tasks into the four status columns
///
/// Every task lands in exactly one column; relative order within a column
/// follows the input order.
pub fn group_by_status<T: BoardItem>(tasks: Vec<T>) -> StatusColumns<T> {
    let mut columns = StatusColumns::default();

    for task in tasks {
        match task.status() {
            TaskStatus::Todo => columns.todo.push(task),
            TaskStatus::InProgress => columns.in_progress.push(task),
            TaskStatus::Review => columns.review.push(task),
            TaskStatus::Done => columns.done.push(task),
        }
    }

    columns
}

/// True when the two instants fall on the same calendar day (UTC)
fn same_day(a: DateTime<Utc>, b: DateTime<Utc>) -> bool {
    a.year() == b.year() && a.ordinal() == b.ordinal()
}

/// Partitions tasks into the four timeline groups relative to `now`
///
/// Grouping rules, checked in order:
///
/// 1. **overdue** — deadline strictly before `now`, not due today, and the
///    task is not done. Finished work never shows as overdue.
/// 2. **today** — deadline on the same calendar day as `now`, regardless of
///    status. A task due earlier today is "today", not "overdue".
/// 3. **tomorrow** — deadline on the next calendar day.
/// 4. **upcoming** — everything else, including past-due done tasks.
///
/// Day boundaries are calendar days in UTC.
pub fn group_by_deadline<T: BoardItem>(tasks: Vec<T>, now: DateTime<Utc>) -> DeadlineGroups<T> {
    let tomorrow = now + Duration::days(1);
    let mut groups = DeadlineGroups::default();

    for task in tasks {
        let deadline = task.deadline();
        let due_today = same_day(deadline, now);

        if deadline < now && !due_today && task.status() != TaskStatus::Done {
            groups.overdue.push(task);
        } else if due_today {
            groups.today.push(task);
        } else if same_day(deadline, tomorrow) {
            groups.tomorrow.push(task);
        } else {
            groups.upcoming.push(task);
        }
    }

    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    /// Minimal board item for projection tests
    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: u32,
        status: TaskStatus,
        deadline: DateTime<Utc>,
    }

    impl BoardItem for Item {
        fn status(&self) -> TaskStatus {
            self.status
        }

        fn deadline(&self) -> DateTime<Utc> {
            self.deadline
        }
    }

    fn item(id: u32, status: TaskStatus, deadline: DateTime<Utc>) -> Item {
        Item { id, status, deadline }
    }

    fn noon(year: i32, month: u32, day: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(year, month, day, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_group_by_status_is_stable_partition() {
        let now = noon(2026, 3, 10);
        let tasks = vec![
            item(1, TaskStatus::Todo, now),
            item(2, TaskStatus::Done, now),
            item(3, TaskStatus::Todo, now),
            item(4, TaskStatus::InProgress, now),
            item(5, TaskStatus::Review, now),
            item(6, TaskStatus::Todo, now),
        ];

        let columns = group_by_status(tasks.clone());

        // Every task in exactly one column
        assert_eq!(columns.len(), tasks.len());

        // Input order preserved within a column
        let todo_ids: Vec<u32> = columns.todo.iter().map(|t| t.id).collect();
        assert_eq!(todo_ids, vec![1, 3, 6]);

        assert_eq!(columns.in_progress.len(), 1);
        assert_eq!(columns.review.len(), 1);
        assert_eq!(columns.done.len(), 1);
    }

    #[test]
    fn test_group_by_status_empty() {
        let columns = group_by_status(Vec::<Item>::new());
        assert!(columns.is_empty());
    }

    #[test]
    fn test_group_by_deadline_is_partition() {
        let now = noon(2026, 3, 10);
        let tasks = vec![
            item(1, TaskStatus::Todo, noon(2026, 3, 8)),   // overdue
            item(2, TaskStatus::Todo, noon(2026, 3, 10)),  // today
            item(3, TaskStatus::Todo, noon(2026, 3, 11)),  // tomorrow
            item(4, TaskStatus::Todo, noon(2026, 3, 20)),  // upcoming
            item(5, TaskStatus::Done, noon(2026, 3, 8)),   // past but done -> upcoming
        ];

        let groups = group_by_deadline(tasks.clone(), now);

        assert_eq!(groups.len(), tasks.len());
        assert_eq!(groups.overdue.len(), 1);
        assert_eq!(groups.overdue[0].id, 1);
        assert_eq!(groups.today.len(), 1);
        assert_eq!(groups.tomorrow.len(), 1);
        assert_eq!(groups.upcoming.len(), 2);
    }

    #[test]
    fn test_done_task_with_past_deadline_is_not_overdue() {
        let now = noon(2026, 3, 10);
        let tasks = vec![
            item(1, TaskStatus::Done, noon(2026, 3, 1)),
            item(2, TaskStatus::Todo, noon(2026, 3, 1)),
        ];

        let groups = group_by_deadline(tasks, now);

        assert_eq!(groups.overdue.len(), 1);
        assert_eq!(groups.overdue[0].id, 2);
        assert_eq!(groups.upcoming.len(), 1);
        assert_eq!(groups.upcoming[0].id, 1);
    }

    #[test]
    fn test_deadline_earlier_today_is_today_not_overdue() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 18, 0, 0).unwrap();
        let earlier_today = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();

        let groups = group_by_deadline(vec![item(1, TaskStatus::Todo, earlier_today)], now);

        assert!(groups.overdue.is_empty());
        assert_eq!(groups.today.len(), 1);
    }

    #[test]
    fn test_deadline_later_today_is_today() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 9, 0, 0).unwrap();
        let later_today = Utc.with_ymd_and_hms(2026, 3, 10, 23, 59, 0).unwrap();

        let groups = group_by_deadline(vec![item(1, TaskStatus::Todo, later_today)], now);

        assert_eq!(groups.today.len(), 1);
    }

    #[test]
    fn test_tomorrow_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 3, 10, 23, 0, 0).unwrap();
        let tomorrow_early = Utc.with_ymd_and_hms(2026, 3, 11, 0, 30, 0).unwrap();
        let day_after = Utc.with_ymd_and_hms(2026, 3, 12, 0, 30, 0).unwrap();

        let groups = group_by_deadline(
            vec![
                item(1, TaskStatus::Todo, tomorrow_early),
                item(2, TaskStatus::Todo, day_after),
            ],
            now,
        );

        assert_eq!(groups.tomorrow.len(), 1);
        assert_eq!(groups.tomorrow[0].id, 1);
        assert_eq!(groups.upcoming.len(), 1);
        assert_eq!(groups.upcoming[0].id, 2);
    }

    #[test]
    fn test_year_boundary() {
        let now = Utc.with_ymd_and_hms(2026, 12, 31, 12, 0, 0).unwrap();
        let new_years_day = Utc.with_ymd_and_hms(2027, 1, 1, 10, 0, 0).unwrap();

        let groups = group_by_deadline(vec![item(1, TaskStatus::Todo, new_years_day)], now);

        assert_eq!(groups.tomorrow.len(), 1);
    }

    #[test]
    fn test_overdue_respects_status_not_column_order() {
        let now = noon(2026, 3, 10);
        let past = noon(2026, 3, 1);

        // Only done escapes overdue; review and in_progress do not
        for status in [TaskStatus::Todo, TaskStatus::InProgress, TaskStatus::Review] {
            let groups = group_by_deadline(vec![item(1, status, past)], now);
            assert_eq!(groups.overdue.len(), 1, "{:?} should be overdue", status);
        }

        let groups = group_by_deadline(vec![item(1, TaskStatus::Done, past)], now);
        assert!(groups.overdue.is_empty());
    }
}
