//! Filter specifications applied by list views.
//!
//! Every criterion is optional; a record is kept only when it satisfies all
//! of the criteria that are set.

use serde::{Deserialize, Serialize};
use time::Date;

use crate::meeting::Meeting;
use crate::member::TeamMember;
use crate::status::{MeetingStatus, MemberRole, MemberStatus, Priority, TaskStatus};
use crate::task::Task;
use crate::text_matcher::TextMatcher;

/// Predicate over one record kind.
pub trait RecordFilter<R> {
    /// Returns true when the filter places no restriction.
    fn is_empty(&self) -> bool;

    /// Whether `record` satisfies every configured criterion.
    fn matches(&self, record: &R) -> bool;
}

fn text_matches<R: crate::text_matcher::Searchable>(text: Option<&str>, record: &R) -> bool {
    text.and_then(TextMatcher::new)
        .is_none_or(|matcher| matcher.matches(record))
}

fn eq_ignore_case(left: &str, right: &str) -> bool {
    left.trim().to_lowercase() == right.trim().to_lowercase()
}

/// Criteria for the task list and board.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskFilter {
    /// Search text over title and description.
    pub text: Option<String>,
    /// Required status.
    pub status: Option<TaskStatus>,
    /// Required priority.
    pub priority: Option<Priority>,
    /// Required assignee name (case-insensitive).
    pub assignee: Option<String>,
    /// Required category (case-insensitive).
    pub category: Option<String>,
}

impl RecordFilter<Task> for TaskFilter {
    fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.assignee.is_none()
            && self.category.is_none()
    }

    fn matches(&self, task: &Task) -> bool {
        text_matches(self.text.as_deref(), task)
            && self.status.is_none_or(|status| task.status == status)
            && self.priority.is_none_or(|priority| task.priority == priority)
            && self
                .assignee
                .as_deref()
                .is_none_or(|assignee| eq_ignore_case(&task.assignee, assignee))
            && self
                .category
                .as_deref()
                .is_none_or(|category| eq_ignore_case(&task.category, category))
    }
}

/// Criteria for the team directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemberFilter {
    /// Search text over name, staff number, email, department and position.
    pub text: Option<String>,
    /// Required department (case-insensitive).
    pub department: Option<String>,
    /// Required role.
    pub role: Option<MemberRole>,
    /// Required employment status.
    pub status: Option<MemberStatus>,
}

impl RecordFilter<TeamMember> for MemberFilter {
    fn is_empty(&self) -> bool {
        self.text.is_none() && self.department.is_none() && self.role.is_none() && self.status.is_none()
    }

    fn matches(&self, member: &TeamMember) -> bool {
        text_matches(self.text.as_deref(), member)
            && self
                .department
                .as_deref()
                .is_none_or(|department| eq_ignore_case(&member.department, department))
            && self.role.is_none_or(|role| member.role == role)
            && self.status.is_none_or(|status| member.status == status)
    }
}

/// Criteria for the meeting list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeetingFilter {
    /// Search text over title, organizer and location.
    pub text: Option<String>,
    /// Required lifecycle state.
    pub status: Option<MeetingStatus>,
    /// Earliest meeting day (inclusive).
    pub date_from: Option<Date>,
    /// Latest meeting day (inclusive).
    pub date_until: Option<Date>,
}

impl RecordFilter<Meeting> for MeetingFilter {
    fn is_empty(&self) -> bool {
        self.text.is_none()
            && self.status.is_none()
            && self.date_from.is_none()
            && self.date_until.is_none()
    }

    fn matches(&self, meeting: &Meeting) -> bool {
        text_matches(self.text.as_deref(), meeting)
            && self.status.is_none_or(|status| meeting.status == status)
            && self.date_from.is_none_or(|from| meeting.date >= from)
            && self.date_until.is_none_or(|until| meeting.date <= until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::id::EntityId;
    use crate::task::TaskDraft;
    use time::macros::datetime;

    fn task(id: u64, title: &str, status: TaskStatus, assignee: &str) -> Task {
        Task::from_draft(
            EntityId(id),
            TaskDraft {
                title: title.into(),
                status,
                assignee: assignee.into(),
                ..TaskDraft::default()
            },
            datetime!(2024-08-01 08:00 UTC),
        )
    }

    fn tasks() -> Vec<Task> {
        vec![
            task(1, "Audit kas", TaskStatus::Pending, "Budi"),
            task(2, "Audit aset", TaskStatus::Completed, "Siti"),
            task(3, "Rekap absensi", TaskStatus::Pending, "Budi"),
        ]
    }

    fn ids(tasks: &[Task], filter: &TaskFilter) -> Vec<u64> {
        tasks
            .iter()
            .filter(|task| filter.matches(task))
            .map(|task| task.id.0)
            .collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let filter = TaskFilter::default();
        assert!(filter.is_empty());
        assert_eq!(ids(&tasks(), &filter), vec![1, 2, 3]);
    }

    #[test]
    fn criteria_combine_with_and() {
        let filter = TaskFilter {
            text: Some("audit".into()),
            status: Some(TaskStatus::Pending),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&tasks(), &filter), vec![1]);
    }

    #[test]
    fn blank_text_places_no_restriction() {
        let filter = TaskFilter {
            text: Some("   ".into()),
            assignee: Some("budi".into()),
            ..TaskFilter::default()
        };
        assert_eq!(ids(&tasks(), &filter), vec![1, 3]);
    }

    #[test]
    fn no_match_is_an_empty_result() {
        let filter = TaskFilter {
            status: Some(TaskStatus::Overdue),
            ..TaskFilter::default()
        };
        assert!(ids(&tasks(), &filter).is_empty());
    }
}
