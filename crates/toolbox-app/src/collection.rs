//! In-memory record collections shared by every front-end.

use std::cell::Cell;
use std::fmt;
use std::rc::Rc;

use time::{Date, Duration, OffsetDateTime};
use tokio::sync::watch;
use toolbox_core::id::next_after;
use toolbox_core::{
    EntityId, Meeting, MeetingDraft, MeetingPatch, MemberDraft, MemberPatch, Task, TaskDraft, TaskPatch,
    TeamMember,
};
use tracing::debug;

/// Source of timestamps for record bookkeeping.
pub trait Clock: fmt::Debug {
    /// Current instant in UTC.
    fn now(&self) -> OffsetDateTime;

    /// Current calendar day.
    fn today(&self) -> Date {
        self.now().date()
    }
}

impl<C: Clock + ?Sized> Clock for Rc<C> {
    fn now(&self) -> OffsetDateTime {
        (**self).now()
    }
}

/// Wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    now: Cell<OffsetDateTime>,
}

impl ManualClock {
    /// Start at `now`.
    #[must_use]
    pub const fn new(now: OffsetDateTime) -> Self {
        Self { now: Cell::new(now) }
    }

    /// Move the clock forward (or backward with a negative duration).
    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }

    /// Jump to an absolute instant.
    pub fn set(&self, now: OffsetDateTime) {
        self.now.set(now);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> OffsetDateTime {
        self.now.get()
    }
}

/// Record kind stored in a [`Collection`].
pub trait Record: Clone {
    /// Creation payload.
    type Draft;
    /// Partial update payload.
    type Patch;

    /// Name used in logs and messages.
    const KIND: &'static str;

    /// Identifier of the record.
    fn id(&self) -> EntityId;

    /// Build a record from a draft; timestamped records use `now` for both stamps.
    fn create(id: EntityId, draft: Self::Draft, now: OffsetDateTime) -> Self;

    /// Merge a patch into the record.
    fn apply(&mut self, patch: Self::Patch);

    /// Last modification stamp, for records that carry one.
    fn updated_at(&self) -> Option<OffsetDateTime> {
        None
    }

    /// Record a modification at `now`.
    fn touch(&mut self, _now: OffsetDateTime) {}
}

impl Record for Task {
    type Draft = TaskDraft;
    type Patch = TaskPatch;

    const KIND: &'static str = "task";

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, draft: TaskDraft, now: OffsetDateTime) -> Self {
        Self::from_draft(id, draft, now)
    }

    fn apply(&mut self, patch: TaskPatch) {
        self.apply_patch(patch);
    }

    fn updated_at(&self) -> Option<OffsetDateTime> {
        Some(self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

impl Record for Meeting {
    type Draft = MeetingDraft;
    type Patch = MeetingPatch;

    const KIND: &'static str = "meeting";

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, draft: MeetingDraft, now: OffsetDateTime) -> Self {
        Self::from_draft(id, draft, now)
    }

    fn apply(&mut self, patch: MeetingPatch) {
        self.apply_patch(patch);
    }

    fn updated_at(&self) -> Option<OffsetDateTime> {
        Some(self.updated_at)
    }

    fn touch(&mut self, now: OffsetDateTime) {
        self.updated_at = now;
    }
}

impl Record for TeamMember {
    type Draft = MemberDraft;
    type Patch = MemberPatch;

    const KIND: &'static str = "member";

    fn id(&self) -> EntityId {
        self.id
    }

    fn create(id: EntityId, draft: MemberDraft, _now: OffsetDateTime) -> Self {
        Self::from_draft(id, draft)
    }

    fn apply(&mut self, patch: MemberPatch) {
        self.apply_patch(patch);
    }
}

/// Ordered, exclusively owned set of records of one kind.
///
/// Every effective mutation bumps a revision counter published through a
/// [`watch`] channel so subscribed views know when to recompute. Misses
/// (unknown ids) leave both the records and the revision untouched.
#[derive(Debug)]
pub struct Collection<R> {
    records: Vec<R>,
    next_id: EntityId,
    clock: Box<dyn Clock>,
    last_stamp: Option<OffsetDateTime>,
    revision: watch::Sender<u64>,
}

impl<R: Record> Collection<R> {
    /// Empty collection.
    #[must_use]
    pub fn new(clock: Box<dyn Clock>) -> Self {
        Self::with_records(Vec::new(), clock)
    }

    /// Collection seeded with existing records (kept in the given order).
    #[must_use]
    pub fn with_records(records: Vec<R>, clock: Box<dyn Clock>) -> Self {
        let next_id = next_after(records.iter().map(Record::id));
        let last_stamp = records.iter().filter_map(Record::updated_at).max();
        let (revision, _) = watch::channel(0);
        Self {
            records,
            next_id,
            clock,
            last_stamp,
            revision,
        }
    }

    /// Records in insertion order.
    #[must_use]
    pub fn list(&self) -> &[R] {
        &self.records
    }

    /// Iterate over records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &R> {
        self.records.iter()
    }

    /// Number of records.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the collection holds no records.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Look up a record by id.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&R> {
        self.records.iter().find(|record| record.id() == id)
    }

    /// Whether a record with `id` exists.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.get(id).is_some()
    }

    /// Records satisfying `predicate`, in insertion order.
    #[must_use]
    pub fn query<P>(&self, mut predicate: P) -> Vec<&R>
    where
        P: FnMut(&R) -> bool,
    {
        self.records.iter().filter(|record| predicate(record)).collect()
    }

    /// Append a new record built from `draft` and return a copy of it.
    pub fn add(&mut self, draft: R::Draft) -> R {
        let id = self.next_id;
        self.next_id = id.next();
        let now = self.stamp();
        let record = R::create(id, draft, now);
        self.records.push(record.clone());
        self.bump();
        debug!(kind = R::KIND, %id, "record added");
        record
    }

    /// Merge `patch` into the record with `id`.
    ///
    /// Returns false (and changes nothing) when the id is unknown.
    pub fn update(&mut self, id: EntityId, patch: R::Patch) -> bool {
        self.update_with(id, |record| record.apply(patch))
    }

    /// Edit the record with `id` in place.
    ///
    /// Returns false (and changes nothing) when the id is unknown.
    pub fn update_with<F>(&mut self, id: EntityId, edit: F) -> bool
    where
        F: FnOnce(&mut R),
    {
        let Some(index) = self.position(id) else {
            debug!(kind = R::KIND, %id, "update ignored for unknown id");
            return false;
        };
        let now = self.stamp();
        let record = &mut self.records[index];
        edit(record);
        record.touch(now);
        self.bump();
        debug!(kind = R::KIND, %id, "record updated");
        true
    }

    /// Remove the record with `id`, returning it when it existed.
    pub fn delete(&mut self, id: EntityId) -> Option<R> {
        let Some(index) = self.position(id) else {
            debug!(kind = R::KIND, %id, "delete ignored for unknown id");
            return None;
        };
        let removed = self.records.remove(index);
        self.bump();
        debug!(kind = R::KIND, %id, "record deleted");
        Some(removed)
    }

    /// Subscribe to revision changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.revision.subscribe()
    }

    /// Current revision; increases by one per effective mutation.
    #[must_use]
    pub fn revision(&self) -> u64 {
        *self.revision.borrow()
    }

    fn position(&self, id: EntityId) -> Option<usize> {
        self.records.iter().position(|record| record.id() == id)
    }

    /// Next timestamp, strictly later than every stamp issued before.
    fn stamp(&mut self) -> OffsetDateTime {
        let now = self.clock.now();
        let stamp = match self.last_stamp {
            Some(last) if now <= last => last + Duration::microseconds(1),
            _ => now,
        };
        self.last_stamp = Some(stamp);
        stamp
    }

    fn bump(&self) {
        self.revision.send_modify(|revision| *revision += 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::{date, datetime};
    use toolbox_core::TaskStatus;

    fn clock() -> Rc<ManualClock> {
        Rc::new(ManualClock::new(datetime!(2024-08-01 08:00 UTC)))
    }

    fn draft(title: &str) -> TaskDraft {
        TaskDraft {
            title: title.into(),
            due_date: Some(date!(2024 - 09 - 01)),
            assignee: "Budi".into(),
            ..TaskDraft::default()
        }
    }

    fn collection(clock: &Rc<ManualClock>) -> Collection<Task> {
        Collection::new(Box::new(Rc::clone(clock)))
    }

    #[test]
    fn add_assigns_fresh_ids_and_equal_stamps() {
        let clock = clock();
        let mut tasks = collection(&clock);
        let first = tasks.add(draft("first"));
        let second = tasks.add(draft("second"));

        assert_ne!(first.id, second.id);
        assert_eq!(first.created_at, first.updated_at);
        assert_eq!(second.created_at, second.updated_at);
        assert_eq!(
            tasks.list().iter().map(|task| task.title.as_str()).collect::<Vec<_>>(),
            vec!["first", "second"]
        );
    }

    #[test]
    fn ids_are_not_reused_after_delete() {
        let clock = clock();
        let mut tasks = collection(&clock);
        let first = tasks.add(draft("first"));
        let second = tasks.add(draft("second"));
        assert!(tasks.delete(second.id).is_some());
        let third = tasks.add(draft("third"));
        assert_ne!(third.id, second.id);
        assert_ne!(third.id, first.id);
    }

    #[test]
    fn seeded_collection_continues_after_largest_id() {
        let clock = clock();
        let mut seeded = collection(&clock);
        seeded.add(draft("a"));
        seeded.add(draft("b"));
        let records = seeded.list().to_vec();

        let mut tasks = Collection::with_records(records, Box::new(Rc::clone(&clock)));
        let added = tasks.add(draft("c"));
        assert_eq!(added.id, EntityId(3));
    }

    #[test]
    fn update_stamps_strictly_later_even_with_frozen_clock() {
        let clock = clock();
        let mut tasks = collection(&clock);
        let task = tasks.add(draft("frozen"));

        assert!(tasks.update(task.id, TaskPatch::status(TaskStatus::InProgress)));
        let updated = tasks.get(task.id).cloned().unwrap_or_else(|| panic!("task must exist"));
        assert_eq!(updated.status, TaskStatus::InProgress);
        assert!(updated.updated_at > task.updated_at);
        assert_eq!(updated.created_at, task.created_at);
    }

    #[test]
    fn update_uses_clock_when_it_moves_forward() {
        let clock = clock();
        let mut tasks = collection(&clock);
        let task = tasks.add(draft("moving"));
        clock.advance(Duration::hours(1));
        tasks.update(task.id, TaskPatch::status(TaskStatus::Completed));
        let updated = tasks.get(task.id).unwrap_or_else(|| panic!("task must exist"));
        assert_eq!(updated.updated_at, datetime!(2024-08-01 09:00 UTC));
    }

    #[test]
    fn misses_change_nothing() {
        let clock = clock();
        let mut tasks = collection(&clock);
        tasks.add(draft("only"));
        let before = tasks.list().to_vec();
        let revision = tasks.revision();

        assert!(!tasks.update(EntityId(42), TaskPatch::status(TaskStatus::Completed)));
        assert!(tasks.delete(EntityId(42)).is_none());
        assert_eq!(tasks.list(), before.as_slice());
        assert_eq!(tasks.revision(), revision);
    }

    #[test]
    fn delete_is_idempotent() {
        let clock = clock();
        let mut tasks = collection(&clock);
        let task = tasks.add(draft("gone"));
        tasks.add(draft("stays"));

        assert!(tasks.delete(task.id).is_some());
        assert_eq!(tasks.len(), 1);
        assert!(tasks.delete(task.id).is_none());
        assert_eq!(tasks.len(), 1);
    }

    #[test]
    fn subscribers_observe_every_effective_mutation() {
        let clock = clock();
        let mut tasks = collection(&clock);
        let mut rx = tasks.subscribe();
        assert!(!rx.has_changed().unwrap_or(true));

        let task = tasks.add(draft("watched"));
        assert!(rx.has_changed().unwrap_or(false));
        assert_eq!(*rx.borrow_and_update(), 1);

        tasks.update(EntityId(999), TaskPatch::default());
        assert!(!rx.has_changed().unwrap_or(true));

        tasks.update(task.id, TaskPatch::status(TaskStatus::Completed));
        tasks.delete(task.id);
        assert_eq!(*rx.borrow_and_update(), 3);
    }

    #[test]
    fn query_is_a_pure_read() {
        let clock = clock();
        let mut tasks = collection(&clock);
        tasks.add(draft("a"));
        let b = tasks.add(draft("b"));
        tasks.update(b.id, TaskPatch::status(TaskStatus::Completed));
        let revision = tasks.revision();

        let done = tasks.query(|task| task.status == TaskStatus::Completed);
        assert_eq!(done.len(), 1);
        assert_eq!(done[0].id, b.id);
        assert_eq!(tasks.revision(), revision);
    }
}
