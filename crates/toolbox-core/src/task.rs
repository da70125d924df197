use serde::{Deserialize, Serialize};
use time::{Date, OffsetDateTime};

use crate::datefmt::iso_date;
use crate::id::EntityId;
use crate::patch::OptionalPatch;
use crate::status::{Priority, TaskStatus};

/// Category applied when a task is created without one.
pub const DEFAULT_CATEGORY: &str = "Umum";

/// Upper bound of [`Task::progress`].
pub const MAX_PROGRESS: u8 = 100;

/// A unit of work tracked on the kanban board.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Identifier unique within the task collection.
    pub id: EntityId,
    /// Short summary.
    pub title: String,
    /// Optional longer body.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Kanban column.
    pub status: TaskStatus,
    /// Urgency.
    #[serde(default)]
    pub priority: Priority,
    /// Deadline.
    #[serde(default, with = "iso_date::option")]
    pub due_date: Option<Date>,
    /// Directory entry of the assignee, when resolvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assignee_id: Option<EntityId>,
    /// Display name of the assignee.
    pub assignee: String,
    /// Free-form grouping.
    pub category: String,
    /// Completion percentage in `0..=100`.
    pub progress: u8,
    /// Creation timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last modification timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Fields supplied when creating a task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDraft {
    /// Short summary.
    pub title: String,
    /// Optional longer body.
    pub description: Option<String>,
    /// Initial column.
    pub status: TaskStatus,
    /// Urgency.
    pub priority: Priority,
    /// Deadline.
    pub due_date: Option<Date>,
    /// Resolved directory entry.
    pub assignee_id: Option<EntityId>,
    /// Display name of the assignee.
    pub assignee: String,
    /// Free-form grouping.
    pub category: String,
    /// Initial completion percentage.
    pub progress: u8,
}

impl Default for TaskDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: None,
            status: TaskStatus::Pending,
            priority: Priority::default(),
            due_date: None,
            assignee_id: None,
            assignee: String::new(),
            category: DEFAULT_CATEGORY.to_owned(),
            progress: 0,
        }
    }
}

/// Partial update for a task; `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskPatch {
    /// New title.
    pub title: Option<String>,
    /// Description edit.
    pub description: Option<OptionalPatch<String>>,
    /// New column.
    pub status: Option<TaskStatus>,
    /// New urgency.
    pub priority: Option<Priority>,
    /// Deadline edit.
    pub due_date: Option<OptionalPatch<Date>>,
    /// Assignee change (directory id and display name).
    pub assignee: Option<(Option<EntityId>, String)>,
    /// New category.
    pub category: Option<String>,
    /// New completion percentage (clamped).
    pub progress: Option<u8>,
}

impl TaskPatch {
    /// Patch that only moves the task to another column.
    #[must_use]
    pub fn status(status: TaskStatus) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    /// Returns true when applying the patch would change nothing.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.assignee.is_none()
            && self.category.is_none()
            && self.progress.is_none()
    }
}

impl Task {
    /// Materialize a draft; both timestamps are set to `now`.
    #[must_use]
    pub fn from_draft(id: EntityId, draft: TaskDraft, now: OffsetDateTime) -> Self {
        let TaskDraft {
            title,
            description,
            status,
            priority,
            due_date,
            assignee_id,
            assignee,
            category,
            progress,
        } = draft;
        Self {
            id,
            title,
            description,
            status,
            priority,
            due_date,
            assignee_id,
            assignee,
            category,
            progress: progress.min(MAX_PROGRESS),
            created_at: now,
            updated_at: now,
        }
    }

    /// Merge `patch` into the task. Timestamps are left to the caller.
    pub fn apply_patch(&mut self, patch: TaskPatch) {
        let TaskPatch {
            title,
            description,
            status,
            priority,
            due_date,
            assignee,
            category,
            progress,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(description) = description {
            description.apply_to(&mut self.description);
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(priority) = priority {
            self.priority = priority;
        }
        if let Some(due_date) = due_date {
            due_date.apply_to(&mut self.due_date);
        }
        if let Some((assignee_id, assignee)) = assignee {
            self.assignee_id = assignee_id;
            self.assignee = assignee;
        }
        if let Some(category) = category {
            self.category = category;
        }
        if let Some(progress) = progress {
            self.progress = progress.min(MAX_PROGRESS);
        }
    }

    /// Whether the deadline has passed without the task being completed.
    #[must_use]
    pub fn is_overdue(&self, today: Date) -> bool {
        self.status != TaskStatus::Completed && self.due_date.is_some_and(|due| due < today)
    }
}
