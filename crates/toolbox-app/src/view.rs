//! Filtered, sorted projections over a [`Collection`].

use std::cmp::Ordering;

use tokio::sync::watch;
use toolbox_core::{Meeting, RecordFilter, Task, TeamMember};

use crate::collection::{Collection, Record};

/// Ordering applied to a view.
pub trait SortKey<R> {
    /// Compare two records.
    fn compare(&self, left: &R, right: &R) -> Ordering;
}

/// Task orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TaskSort {
    /// Insertion order.
    #[default]
    Created,
    /// Earliest deadline first; tasks without a deadline go last.
    DueDate,
    /// Most urgent first.
    Priority,
    /// Alphabetical, case-insensitive.
    Title,
}

impl SortKey<Task> for TaskSort {
    fn compare(&self, left: &Task, right: &Task) -> Ordering {
        match self {
            Self::Created => left.created_at.cmp(&right.created_at),
            Self::DueDate => match (left.due_date, right.due_date) {
                (Some(a), Some(b)) => a.cmp(&b),
                (Some(_), None) => Ordering::Less,
                (None, Some(_)) => Ordering::Greater,
                (None, None) => Ordering::Equal,
            },
            Self::Priority => right.priority.cmp(&left.priority),
            Self::Title => left.title.to_lowercase().cmp(&right.title.to_lowercase()),
        }
    }
}

/// Member orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MemberSort {
    /// Alphabetical by name.
    #[default]
    Name,
    /// Longest-serving first.
    JoinDate,
}

impl SortKey<TeamMember> for MemberSort {
    fn compare(&self, left: &TeamMember, right: &TeamMember) -> Ordering {
        match self {
            Self::Name => left.name.to_lowercase().cmp(&right.name.to_lowercase()),
            Self::JoinDate => left.join_date.cmp(&right.join_date),
        }
    }
}

/// Meeting orderings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MeetingSort {
    /// Chronological by date then start time.
    #[default]
    Date,
}

impl SortKey<Meeting> for MeetingSort {
    fn compare(&self, left: &Meeting, right: &Meeting) -> Ordering {
        match self {
            Self::Date => (left.date, left.start_time).cmp(&(right.date, right.start_time)),
        }
    }
}

/// Cached subset of a collection.
///
/// The cache is recomputed lazily: only when the collection revision moved or
/// when the filter or sort key was replaced.
#[derive(Debug)]
pub struct FilteredView<F, S> {
    filter: F,
    sort: S,
    revision: watch::Receiver<u64>,
    visible: Vec<usize>,
    dirty: bool,
}

impl<F, S> FilteredView<F, S> {
    /// Bind a view to `collection`.
    #[must_use]
    pub fn new<R: Record>(collection: &Collection<R>, filter: F, sort: S) -> Self {
        Self {
            filter,
            sort,
            revision: collection.subscribe(),
            visible: Vec::new(),
            dirty: true,
        }
    }

    /// Active filter.
    #[must_use]
    pub const fn filter(&self) -> &F {
        &self.filter
    }

    /// Active sort key.
    #[must_use]
    pub const fn sort(&self) -> &S {
        &self.sort
    }

    /// Replace the filter; the next refresh recomputes.
    pub fn set_filter(&mut self, filter: F) {
        self.filter = filter;
        self.dirty = true;
    }

    /// Replace the sort key; the next refresh recomputes.
    pub fn set_sort(&mut self, sort: S) {
        self.sort = sort;
        self.dirty = true;
    }

    /// Recompute the visible subset when needed. Returns true when it did.
    pub fn refresh<R>(&mut self, collection: &Collection<R>) -> bool
    where
        R: Record,
        F: RecordFilter<R>,
        S: SortKey<R>,
    {
        let moved = self.revision.has_changed().unwrap_or(true);
        if !self.dirty && !moved {
            return false;
        }
        self.revision.borrow_and_update();

        let records = collection.list();
        let mut visible: Vec<usize> = records
            .iter()
            .enumerate()
            .filter(|(_, record)| self.filter.matches(record))
            .map(|(index, _)| index)
            .collect();
        visible.sort_by(|&a, &b| self.sort.compare(&records[a], &records[b]));
        self.visible = visible;
        self.dirty = false;
        true
    }

    /// Current subset, refreshed first when stale.
    pub fn visible<'a, R>(&mut self, collection: &'a Collection<R>) -> Vec<&'a R>
    where
        R: Record,
        F: RecordFilter<R>,
        S: SortKey<R>,
    {
        self.refresh(collection);
        let records = collection.list();
        self.visible.iter().filter_map(|&index| records.get(index)).collect()
    }
}

#[cfg(test)]
mod tests {
    use std::rc::Rc;

    use super::*;
    use crate::collection::ManualClock;
    use time::Duration;
    use time::macros::{date, datetime};
    use toolbox_core::{EntityId, Priority, TaskDraft, TaskFilter, TaskPatch, TaskStatus};

    fn seeded() -> Collection<Task> {
        let clock = Rc::new(ManualClock::new(datetime!(2024-08-01 08:00 UTC)));
        let mut tasks = Collection::new(Box::new(Rc::clone(&clock)));
        for (title, due, priority) in [
            ("Rekap absensi", Some(date!(2024 - 09 - 10)), Priority::Low),
            ("audit kas", Some(date!(2024 - 09 - 01)), Priority::Urgent),
            ("Bersih gudang", None, Priority::Medium),
        ] {
            tasks.add(TaskDraft {
                title: title.into(),
                due_date: due,
                priority,
                assignee: "Budi".into(),
                ..TaskDraft::default()
            });
            clock.advance(Duration::minutes(1));
        }
        tasks
    }

    fn titles(tasks: &[&Task]) -> Vec<String> {
        tasks.iter().map(|task| task.title.clone()).collect()
    }

    #[test]
    fn sorts_apply_to_visible_subset() {
        let tasks = seeded();
        let mut view = FilteredView::new(&tasks, TaskFilter::default(), TaskSort::DueDate);
        assert_eq!(
            titles(&view.visible(&tasks)),
            vec!["audit kas", "Rekap absensi", "Bersih gudang"]
        );

        view.set_sort(TaskSort::Title);
        assert_eq!(
            titles(&view.visible(&tasks)),
            vec!["audit kas", "Bersih gudang", "Rekap absensi"]
        );

        view.set_sort(TaskSort::Priority);
        assert_eq!(titles(&view.visible(&tasks))[0], "audit kas");
    }

    #[test]
    fn refresh_happens_only_after_changes() {
        let mut tasks = seeded();
        let mut view = FilteredView::new(
            &tasks,
            TaskFilter {
                status: Some(TaskStatus::Pending),
                ..TaskFilter::default()
            },
            TaskSort::Created,
        );
        assert!(view.refresh(&tasks));
        assert!(!view.refresh(&tasks));

        tasks.update(EntityId(99), TaskPatch::status(TaskStatus::Completed));
        assert!(!view.refresh(&tasks));

        tasks.update(EntityId(1), TaskPatch::status(TaskStatus::Completed));
        assert!(view.refresh(&tasks));
        assert_eq!(view.visible(&tasks).len(), 2);

        view.set_filter(TaskFilter::default());
        assert!(view.refresh(&tasks));
        assert_eq!(view.visible(&tasks).len(), 3);
    }

    #[test]
    fn deletes_do_not_leave_stale_entries() {
        let mut tasks = seeded();
        let mut view = FilteredView::new(&tasks, TaskFilter::default(), TaskSort::Created);
        assert_eq!(view.visible(&tasks).len(), 3);
        tasks.delete(EntityId(3));
        assert_eq!(
            titles(&view.visible(&tasks)),
            vec!["Rekap absensi", "audit kas"]
        );
    }
}
