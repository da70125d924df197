use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;

use serde::Serialize;
use time::{Date, Time};
use toolbox_core::datefmt::{clock_time, iso_date};
use toolbox_core::member::employee_id_key;
use toolbox_core::task::DEFAULT_CATEGORY;
use toolbox_core::{
    AgendaDraft, AgendaStatus, EntityId, Meeting, MeetingDraft, MeetingPatch, MeetingStatus, MemberDraft,
    MemberPatch, MemberRole, MemberStatus, OptionalPatch, Participant, Priority, Task, TaskDraft, TaskPatch,
    TaskStatus, TeamMember, User,
};
use tracing::{debug, info};

use crate::collection::{Clock, Collection};
use crate::config::{BoardConfig, ExportConfig, ProjectConfig};
use crate::error::{ToolboxError, ToolboxResult};
use crate::export::MinutesDocument;
use crate::fixtures::Seed;

const UPCOMING_LIMIT: usize = 5;

fn required(entity: &'static str, field: &'static str, value: &str) -> ToolboxResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ToolboxError::missing(entity, field));
    }
    Ok(trimmed.to_owned())
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|value| !value.trim().is_empty())
}

/// Service façade owning the three collections and enforcing input rules.
#[derive(Debug)]
pub struct Toolbox {
    tasks: Collection<Task>,
    meetings: Collection<Meeting>,
    members: Collection<TeamMember>,
    board: BoardConfig,
    export: ExportConfig,
    user: User,
    clock: Rc<dyn Clock>,
}

impl Toolbox {
    /// Build a toolbox over `seed`, sharing `clock` between the collections.
    #[must_use]
    pub fn new(config: &ProjectConfig, user: User, seed: Seed, clock: Rc<dyn Clock>) -> Self {
        let Seed {
            tasks,
            meetings,
            members,
        } = seed;
        Self {
            tasks: Collection::with_records(tasks, Box::new(Rc::clone(&clock))),
            meetings: Collection::with_records(meetings, Box::new(Rc::clone(&clock))),
            members: Collection::with_records(members, Box::new(Rc::clone(&clock))),
            board: config.board.clone(),
            export: config.export.clone(),
            user,
            clock,
        }
    }

    /// Task store.
    #[must_use]
    pub const fn tasks(&self) -> &Collection<Task> {
        &self.tasks
    }

    /// Mutable task store, for the kanban drag machine.
    pub const fn tasks_mut(&mut self) -> &mut Collection<Task> {
        &mut self.tasks
    }

    /// Meeting store.
    #[must_use]
    pub const fn meetings(&self) -> &Collection<Meeting> {
        &self.meetings
    }

    /// Team directory.
    #[must_use]
    pub const fn members(&self) -> &Collection<TeamMember> {
        &self.members
    }

    /// Board column layout from the settings.
    #[must_use]
    pub const fn board(&self) -> &BoardConfig {
        &self.board
    }

    /// Export settings for minutes documents.
    #[must_use]
    pub const fn export_config(&self) -> &ExportConfig {
        &self.export
    }

    /// Current user, used as default organizer.
    #[must_use]
    pub const fn user(&self) -> &User {
        &self.user
    }

    /// Calendar day according to the injected clock.
    #[must_use]
    pub fn today(&self) -> Date {
        self.clock.today()
    }

    /// Directory id of the member called `name` (case-insensitive).
    #[must_use]
    pub fn resolve_member(&self, name: &str) -> Option<EntityId> {
        self.members
            .iter()
            .find(|member| member.is_named(name))
            .map(|member| member.id)
    }

    /// Create a task.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] when title, due date or assignee is missing.
    pub fn create_task(&mut self, input: CreateTaskInput) -> ToolboxResult<Task> {
        let CreateTaskInput {
            title,
            description,
            due_date,
            assignee,
            priority,
            category,
            status,
            progress,
        } = input;

        let title = required("task", "title", &title)?;
        let due_date = due_date.ok_or(ToolboxError::missing("task", "due_date"))?;
        let assignee = required("task", "assignee", &assignee)?;
        let draft = TaskDraft {
            title,
            description: non_blank(description),
            status: status.unwrap_or_else(|| self.board.default_status()),
            priority: priority.unwrap_or_default(),
            due_date: Some(due_date),
            assignee_id: self.resolve_member(&assignee),
            assignee,
            category: non_blank(category).unwrap_or_else(|| DEFAULT_CATEGORY.to_owned()),
            progress: progress.unwrap_or(0),
        };
        Ok(self.tasks.add(draft))
    }

    /// Edit a task. Returns `Ok(false)` when the task does not exist.
    ///
    /// An assignee without an id is resolved against the directory; a blank
    /// category resets to the default one.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] when a required field is blanked.
    pub fn update_task(&mut self, id: EntityId, mut patch: TaskPatch) -> ToolboxResult<bool> {
        if let Some(title) = patch.title.as_mut() {
            *title = required("task", "title", title)?;
        }
        if matches!(patch.due_date, Some(OptionalPatch::Clear)) {
            return Err(ToolboxError::missing("task", "due_date"));
        }
        if let Some((assignee_id, assignee)) = patch.assignee.as_mut() {
            *assignee = required("task", "assignee", assignee)?;
            if assignee_id.is_none() {
                *assignee_id = self.resolve_member(assignee);
            }
        }
        if let Some(category) = patch.category.as_mut()
            && category.trim().is_empty()
        {
            DEFAULT_CATEGORY.clone_into(category);
        }
        Ok(self.tasks.update(id, patch))
    }

    /// Set a task's status directly.
    pub fn move_task(&mut self, id: EntityId, status: TaskStatus) -> bool {
        self.tasks.update(id, TaskPatch::status(status))
    }

    /// Tasks past their deadline and not completed.
    #[must_use]
    pub fn overdue_tasks(&self, today: Date) -> Vec<&Task> {
        self.tasks.query(|task| task.is_overdue(today))
    }

    /// Flag every late task as [`TaskStatus::Overdue`]; returns how many changed.
    pub fn mark_overdue(&mut self, today: Date) -> usize {
        let late: Vec<EntityId> = self
            .tasks
            .iter()
            .filter(|task| task.is_overdue(today) && task.status != TaskStatus::Overdue)
            .map(|task| task.id)
            .collect();
        for id in &late {
            self.tasks.update(*id, TaskPatch::status(TaskStatus::Overdue));
        }
        if !late.is_empty() {
            info!(count = late.len(), %today, "tasks marked overdue");
        }
        late.len()
    }

    /// Schedule a meeting.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] for a blank title or agenda title and
    /// [`ToolboxError::InvalidDuration`] for a zero duration.
    pub fn create_meeting(&mut self, input: CreateMeetingInput) -> ToolboxResult<Meeting> {
        let CreateMeetingInput {
            title,
            date,
            start_time,
            duration_minutes,
            location,
            organizer,
            agendas,
            participants,
        } = input;

        let title = required("meeting", "title", &title)?;
        if duration_minutes == 0 {
            return Err(ToolboxError::InvalidDuration);
        }
        let agendas = agendas
            .into_iter()
            .map(|draft| {
                Ok(AgendaDraft {
                    title: required("agenda", "title", &draft.title)?,
                    ..draft
                })
            })
            .collect::<ToolboxResult<Vec<_>>>()?;
        let organizer = non_blank(organizer).unwrap_or_else(|| self.user.name.clone());
        let participants = participants
            .into_iter()
            .filter(|participant| !participant.name.trim().is_empty())
            .map(|participant| self.participant(participant))
            .collect();

        let draft = MeetingDraft {
            title,
            date,
            start_time,
            duration_minutes,
            location: non_blank(location),
            organizer_id: self.resolve_member(&organizer),
            organizer,
            agendas,
            participants,
        };
        Ok(self.meetings.add(draft))
    }

    /// Edit meeting metadata. Returns `Ok(false)` when the meeting does not exist.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] for a blank title and
    /// [`ToolboxError::InvalidDuration`] for a zero duration.
    pub fn update_meeting(&mut self, id: EntityId, mut patch: MeetingPatch) -> ToolboxResult<bool> {
        if let Some(title) = patch.title.as_mut() {
            *title = required("meeting", "title", title)?;
        }
        if patch.duration_minutes == Some(0) {
            return Err(ToolboxError::InvalidDuration);
        }
        if let Some(participants) = patch.participants.as_mut() {
            for participant in participants.iter_mut().filter(|participant| participant.member_id.is_none()) {
                participant.member_id = self.resolve_member(&participant.name);
            }
        }
        Ok(self.meetings.update(id, patch))
    }

    fn participant(&self, input: ParticipantInput) -> Participant {
        let name = input.name.trim().to_owned();
        Participant {
            member_id: self.resolve_member(&name),
            name,
            role: non_blank(input.role).unwrap_or_else(|| "Peserta".to_owned()),
        }
    }

    fn has_agenda(&self, meeting: EntityId, agenda: EntityId) -> bool {
        self.meetings
            .get(meeting)
            .is_some_and(|meeting| meeting.agendas.iter().any(|item| item.id == agenda))
    }

    /// Append an agenda item after the current last one.
    ///
    /// Returns `Ok(None)` when the meeting does not exist.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] for a blank title.
    pub fn add_agenda(&mut self, meeting: EntityId, draft: AgendaDraft) -> ToolboxResult<Option<EntityId>> {
        let title = required("agenda", "title", &draft.title)?;
        let draft = AgendaDraft {
            title,
            description: non_blank(draft.description),
            ..draft
        };
        let mut added = None;
        self.meetings.update_with(meeting, |meeting| {
            added = Some(meeting.push_agenda(draft));
        });
        Ok(added)
    }

    /// Change the discussion status of an agenda item.
    pub fn set_agenda_status(&mut self, meeting: EntityId, agenda: EntityId, status: AgendaStatus) -> bool {
        if !self.has_agenda(meeting, agenda) {
            debug!(%meeting, %agenda, "agenda status change ignored for unknown agenda");
            return false;
        }
        self.meetings.update_with(meeting, |meeting| {
            if let Some(item) = meeting.agenda_mut(agenda) {
                item.status = status;
            }
        })
    }

    /// Drop an agenda item and renumber the rest.
    pub fn remove_agenda(&mut self, meeting: EntityId, agenda: EntityId) -> bool {
        if !self.has_agenda(meeting, agenda) {
            debug!(%meeting, %agenda, "agenda removal ignored for unknown agenda");
            return false;
        }
        self.meetings.update_with(meeting, |meeting| {
            meeting.remove_agenda(agenda);
        })
    }

    /// Move an agenda item to a 1-based position.
    pub fn reorder_agenda(&mut self, meeting: EntityId, agenda: EntityId, position: usize) -> bool {
        if !self.has_agenda(meeting, agenda) {
            debug!(%meeting, %agenda, "agenda reorder ignored for unknown agenda");
            return false;
        }
        self.meetings.update_with(meeting, |meeting| {
            meeting.move_agenda(agenda, position);
        })
    }

    /// Store minutes and mark the meeting completed.
    ///
    /// Returns `Ok(false)` when the meeting does not exist.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] for blank notes.
    pub fn save_minutes(&mut self, meeting: EntityId, notes: &str) -> ToolboxResult<bool> {
        if notes.trim().is_empty() {
            return Err(ToolboxError::missing("meeting", "notes"));
        }
        let notes = notes.to_owned();
        Ok(self
            .meetings
            .update_with(meeting, |meeting| meeting.record_minutes(notes)))
    }

    /// Copy the carry-over agenda items of `from` to the end of `to` as pending items.
    ///
    /// Returns how many items were copied.
    pub fn carry_over(&mut self, from: EntityId, to: EntityId) -> usize {
        if from == to || !self.meetings.contains(to) {
            return 0;
        }
        let Some(source) = self.meetings.get(from) else {
            return 0;
        };
        let drafts: Vec<AgendaDraft> = source
            .carry_over_items()
            .map(|agenda| AgendaDraft {
                title: agenda.title.clone(),
                description: agenda.description.clone(),
                status: AgendaStatus::Pending,
            })
            .collect();
        if drafts.is_empty() {
            return 0;
        }

        let count = drafts.len();
        self.meetings.update_with(to, |meeting| {
            for draft in drafts {
                meeting.push_agenda(draft);
            }
        });
        info!(%from, %to, count, "agenda items carried over");
        count
    }

    /// Content model for exporting the minutes of `meeting`.
    #[must_use]
    pub fn minutes_document(&self, meeting: EntityId) -> Option<MinutesDocument> {
        self.meetings
            .get(meeting)
            .map(|meeting| MinutesDocument::from_meeting(meeting, &self.export))
    }

    fn ensure_unique_employee_id(&self, employee_id: &str, except: Option<EntityId>) -> ToolboxResult<()> {
        let key = employee_id_key(employee_id);
        let taken = self
            .members
            .iter()
            .any(|member| Some(member.id) != except && employee_id_key(&member.employee_id) == key);
        if taken {
            return Err(ToolboxError::DuplicateEmployeeId(employee_id.trim().to_owned()));
        }
        Ok(())
    }

    /// Register a team member.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] for a blank name, email or employee id and
    /// [`ToolboxError::DuplicateEmployeeId`] when the employee id is already used.
    pub fn create_member(&mut self, input: CreateMemberInput) -> ToolboxResult<TeamMember> {
        let CreateMemberInput {
            name,
            employee_id,
            email,
            phone,
            department,
            position,
            role,
            join_date,
            location,
            status,
        } = input;

        let name = required("member", "name", &name)?;
        let employee_id = required("member", "employee_id", &employee_id)?;
        let email = required("member", "email", &email)?;
        self.ensure_unique_employee_id(&employee_id, None)?;

        let draft = MemberDraft {
            name,
            employee_id,
            email,
            phone: phone.trim().to_owned(),
            department: department.trim().to_owned(),
            position: position.trim().to_owned(),
            role,
            join_date: join_date.unwrap_or_else(|| self.today()),
            location: location.trim().to_owned(),
            status,
        };
        Ok(self.members.add(draft))
    }

    /// Edit a member. Returns `Ok(false)` when the member does not exist.
    ///
    /// # Errors
    /// Returns [`ToolboxError::MissingField`] when a required field is blanked and
    /// [`ToolboxError::DuplicateEmployeeId`] when the new employee id belongs to someone else.
    pub fn update_member(&mut self, id: EntityId, mut patch: MemberPatch) -> ToolboxResult<bool> {
        if !self.members.contains(id) {
            debug!(%id, "member update ignored for unknown id");
            return Ok(false);
        }
        if let Some(name) = patch.name.as_mut() {
            *name = required("member", "name", name)?;
        }
        if let Some(email) = patch.email.as_mut() {
            *email = required("member", "email", email)?;
        }
        if let Some(employee_id) = patch.employee_id.as_mut() {
            *employee_id = required("member", "employee_id", employee_id)?;
            self.ensure_unique_employee_id(employee_id, Some(id))?;
        }
        Ok(self.members.update(id, patch))
    }

    /// Start deleting a task; nothing changes until the token is confirmed.
    #[must_use]
    pub fn request_task_deletion(&self, id: EntityId) -> Option<PendingDeletion> {
        self.tasks.get(id).map(|task| PendingDeletion {
            target: DeletionTarget::Task(id),
            label: task.title.clone(),
        })
    }

    /// Start deleting a meeting; nothing changes until the token is confirmed.
    #[must_use]
    pub fn request_meeting_deletion(&self, id: EntityId) -> Option<PendingDeletion> {
        self.meetings.get(id).map(|meeting| PendingDeletion {
            target: DeletionTarget::Meeting(id),
            label: meeting.title.clone(),
        })
    }

    /// Start deleting a member; nothing changes until the token is confirmed.
    #[must_use]
    pub fn request_member_deletion(&self, id: EntityId) -> Option<PendingDeletion> {
        self.members.get(id).map(|member| PendingDeletion {
            target: DeletionTarget::Member(id),
            label: member.name.clone(),
        })
    }

    /// Carry out a pending deletion. Returns false when the target was already gone.
    pub fn confirm_deletion(&mut self, pending: PendingDeletion) -> bool {
        let removed = match pending.target {
            DeletionTarget::Task(id) => self.tasks.delete(id).is_some(),
            DeletionTarget::Meeting(id) => self.meetings.delete(id).is_some(),
            DeletionTarget::Member(id) => self.members.delete(id).is_some(),
        };
        if removed {
            info!(record = %pending, "record deleted");
        }
        removed
    }

    /// Summary figures for the dashboard as of `today`.
    #[must_use]
    pub fn dashboard(&self, today: Date) -> DashboardSummary {
        let mut tasks_by_status: BTreeMap<TaskStatus, usize> =
            TaskStatus::ALL.into_iter().map(|status| (status, 0)).collect();
        for task in self.tasks.iter() {
            *tasks_by_status.entry(task.status).or_default() += 1;
        }
        let total_tasks = self.tasks.len();
        let completed = tasks_by_status.get(&TaskStatus::Completed).copied().unwrap_or(0);
        let completion_percent = if total_tasks == 0 {
            0
        } else {
            u8::try_from(completed * 100 / total_tasks).unwrap_or(100)
        };

        let mut upcoming: Vec<&Meeting> = self
            .meetings
            .query(|meeting| meeting.date >= today && meeting.status != MeetingStatus::Cancelled);
        upcoming.sort_by_key(|meeting| (meeting.date, meeting.start_time));

        DashboardSummary {
            today,
            total_tasks,
            tasks_by_status,
            overdue_tasks: self.tasks.iter().filter(|task| task.is_overdue(today)).count(),
            completion_percent,
            upcoming_meetings: upcoming
                .into_iter()
                .take(UPCOMING_LIMIT)
                .map(MeetingDigest::from)
                .collect(),
            active_members: self.members.iter().filter(|member| member.is_active()).count(),
            total_members: self.members.len(),
        }
    }
}

/// Input for [`Toolbox::create_task`].
#[derive(Debug, Clone, Default)]
pub struct CreateTaskInput {
    /// Required; surrounding whitespace is trimmed.
    pub title: String,
    /// Blank text is dropped.
    pub description: Option<String>,
    /// Required.
    pub due_date: Option<Date>,
    /// Member name; required.
    pub assignee: String,
    /// Defaults to medium.
    pub priority: Option<Priority>,
    /// Blank falls back to the default category.
    pub category: Option<String>,
    /// Defaults to the board's default status.
    pub status: Option<TaskStatus>,
    /// Percent complete, clamped to 100.
    pub progress: Option<u8>,
}

/// Participant as typed by the user; the directory id is looked up by name.
#[derive(Debug, Clone, Default)]
pub struct ParticipantInput {
    /// Display name; matched against the directory.
    pub name: String,
    /// Meeting role such as notulis or moderator.
    pub role: Option<String>,
}

/// Input for [`Toolbox::create_meeting`].
#[derive(Debug, Clone)]
pub struct CreateMeetingInput {
    /// Required.
    pub title: String,
    /// Calendar day.
    pub date: Date,
    /// Local start time.
    pub start_time: Time,
    /// Must be positive.
    pub duration_minutes: u32,
    /// Room or link.
    pub location: Option<String>,
    /// Defaults to the current user.
    pub organizer: Option<String>,
    /// Numbered in the given order.
    pub agendas: Vec<AgendaDraft>,
    /// Resolved against the directory by name.
    pub participants: Vec<ParticipantInput>,
}

/// Input for [`Toolbox::create_member`].
#[derive(Debug, Clone, Default)]
pub struct CreateMemberInput {
    /// Required.
    pub name: String,
    /// Required and unique, compared case-insensitively.
    pub employee_id: String,
    /// Required.
    pub email: String,
    /// Free-form phone number.
    pub phone: String,
    /// Department name.
    pub department: String,
    /// Job title.
    pub position: String,
    /// Directory role.
    pub role: MemberRole,
    /// Defaults to today.
    pub join_date: Option<Date>,
    /// Office or city.
    pub location: String,
    /// Active unless stated otherwise.
    pub status: MemberStatus,
}

/// Record targeted by a [`PendingDeletion`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeletionTarget {
    /// Task id.
    Task(EntityId),
    /// Meeting id.
    Meeting(EntityId),
    /// Directory member id.
    Member(EntityId),
}

/// Confirmation token for a delete. Dropping it cancels the deletion.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a deletion only happens once the token is confirmed"]
pub struct PendingDeletion {
    target: DeletionTarget,
    label: String,
}

impl PendingDeletion {
    /// Record that will be removed.
    #[must_use]
    pub const fn target(&self) -> DeletionTarget {
        self.target
    }

    /// Title or name of the record, for confirmation prompts.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl fmt::Display for PendingDeletion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (kind, id) = match self.target {
            DeletionTarget::Task(id) => ("tugas", id),
            DeletionTarget::Meeting(id) => ("rapat", id),
            DeletionTarget::Member(id) => ("anggota", id),
        };
        write!(f, "{kind} #{id} \"{}\"", self.label)
    }
}

/// Upcoming meeting line on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDigest {
    /// Meeting id.
    pub id: EntityId,
    /// Meeting title.
    pub title: String,
    /// Serialized as `YYYY-MM-DD`.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Serialized as `HH:MM`.
    #[serde(with = "clock_time")]
    pub start_time: Time,
    /// Room or link, when known.
    pub location: Option<String>,
}

impl From<&Meeting> for MeetingDigest {
    fn from(meeting: &Meeting) -> Self {
        Self {
            id: meeting.id,
            title: meeting.title.clone(),
            date: meeting.date,
            start_time: meeting.start_time,
            location: meeting.location.clone(),
        }
    }
}

/// Figures shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    /// Reference day for the overdue count and upcoming meetings.
    #[serde(with = "iso_date")]
    pub today: Date,
    /// All tasks regardless of status.
    pub total_tasks: usize,
    /// Every status is present, with zero counts included.
    pub tasks_by_status: BTreeMap<TaskStatus, usize>,
    /// Derived from due dates, whether or not the status says so yet.
    pub overdue_tasks: usize,
    /// Completed share of all tasks, 0 when there are none.
    pub completion_percent: u8,
    /// Next non-cancelled meetings from today, soonest first.
    pub upcoming_meetings: Vec<MeetingDigest>,
    /// Members whose status is active.
    pub active_members: usize,
    /// Everyone in the directory.
    pub total_members: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::ManualClock;
    use time::macros::{date, datetime, time};

    fn toolbox() -> Toolbox {
        let clock: Rc<dyn Clock> = Rc::new(ManualClock::new(datetime!(2024-09-01 07:00 UTC)));
        let user = User {
            name: "Budi Santoso".into(),
            email: "budi@example.invalid".into(),
            department: None,
            role: MemberRole::Leader,
        };
        Toolbox::new(&ProjectConfig::default(), user, Seed::sample(), clock)
    }

    fn task_input(title: &str, assignee: &str) -> CreateTaskInput {
        CreateTaskInput {
            title: title.into(),
            due_date: Some(date!(2024 - 09 - 10)),
            assignee: assignee.into(),
            ..CreateTaskInput::default()
        }
    }

    fn meeting_input(title: &str) -> CreateMeetingInput {
        CreateMeetingInput {
            title: title.into(),
            date: date!(2024 - 09 - 12),
            start_time: time!(10:00),
            duration_minutes: 60,
            location: None,
            organizer: None,
            agendas: Vec::new(),
            participants: Vec::new(),
        }
    }

    fn member_input(name: &str, employee_id: &str) -> CreateMemberInput {
        CreateMemberInput {
            name: name.into(),
            employee_id: employee_id.into(),
            email: format!("{}@example.invalid", name.to_lowercase()),
            department: "IT".into(),
            ..CreateMemberInput::default()
        }
    }

    #[test]
    fn create_task_applies_defaults_and_resolves_assignee() {
        let mut toolbox = toolbox();
        let task = toolbox
            .create_task(task_input("  Susun RAB  ", "siti aminah"))
            .unwrap_or_else(|err| panic!("create task: {err}"));
        assert_eq!(task.title, "Susun RAB");
        assert_eq!(task.status, TaskStatus::Pending);
        assert_eq!(task.priority, Priority::Medium);
        assert_eq!(task.category, DEFAULT_CATEGORY);
        assert_eq!(task.progress, 0);
        assert_eq!(task.assignee_id, Some(EntityId(2)));
    }

    #[test]
    fn create_task_requires_title_due_date_and_assignee() {
        let mut toolbox = toolbox();
        let before = toolbox.tasks().len();

        let err = toolbox.create_task(task_input(" ", "Budi")).err();
        assert_eq!(err, Some(ToolboxError::missing("task", "title")));

        let err = toolbox
            .create_task(CreateTaskInput {
                due_date: None,
                ..task_input("Audit", "Budi")
            })
            .err();
        assert_eq!(err, Some(ToolboxError::missing("task", "due_date")));

        let err = toolbox.create_task(task_input("Audit", "")).err();
        assert_eq!(err, Some(ToolboxError::missing("task", "assignee")));
        assert_eq!(toolbox.tasks().len(), before);
    }

    #[test]
    fn unknown_assignee_keeps_name_without_id() {
        let mut toolbox = toolbox();
        let task = toolbox
            .create_task(task_input("Audit", "Tamu Undangan"))
            .unwrap_or_else(|err| panic!("create task: {err}"));
        assert_eq!(task.assignee, "Tamu Undangan");
        assert!(task.assignee_id.is_none());
    }

    #[test]
    fn update_task_validates_and_reassigns() {
        let mut toolbox = toolbox();
        let patch = TaskPatch {
            assignee: Some((None, "Dewi Lestari".into())),
            progress: Some(250),
            category: Some(" ".into()),
            ..TaskPatch::default()
        };
        assert_eq!(toolbox.update_task(EntityId(1), patch), Ok(true));
        let task = toolbox
            .tasks()
            .get(EntityId(1))
            .unwrap_or_else(|| panic!("task 1 must exist"));
        assert_eq!(task.assignee_id, Some(EntityId(3)));
        assert_eq!(task.progress, 100);
        assert_eq!(task.category, DEFAULT_CATEGORY);

        let blank_title = TaskPatch {
            title: Some("   ".into()),
            ..TaskPatch::default()
        };
        assert!(toolbox.update_task(EntityId(1), blank_title).is_err());

        let clear_due = TaskPatch {
            due_date: Some(OptionalPatch::Clear),
            ..TaskPatch::default()
        };
        assert!(toolbox.update_task(EntityId(1), clear_due).is_err());
        assert_eq!(toolbox.update_task(EntityId(99), TaskPatch::status(TaskStatus::Completed)), Ok(false));
    }

    #[test]
    fn mark_overdue_only_touches_late_open_tasks() {
        let mut toolbox = toolbox();
        // Task 1 is due 2024-08-20 and pending; task 5 is already overdue; task 3 is completed.
        assert_eq!(toolbox.mark_overdue(date!(2024 - 09 - 01)), 1);
        assert_eq!(
            toolbox.tasks().get(EntityId(1)).map(|task| task.status),
            Some(TaskStatus::Overdue)
        );
        assert_eq!(toolbox.mark_overdue(date!(2024 - 09 - 01)), 0);
    }

    #[test]
    fn meeting_defaults_organizer_to_current_user() {
        let mut toolbox = toolbox();
        let meeting = toolbox
            .create_meeting(CreateMeetingInput {
                participants: vec![
                    ParticipantInput {
                        name: "Andi Wijaya".into(),
                        role: None,
                    },
                    ParticipantInput {
                        name: "  ".into(),
                        role: None,
                    },
                ],
                ..meeting_input("Rapat Anggaran")
            })
            .unwrap_or_else(|err| panic!("create meeting: {err}"));
        assert_eq!(meeting.organizer, "Budi Santoso");
        assert_eq!(meeting.organizer_id, Some(EntityId(1)));
        assert_eq!(meeting.status, MeetingStatus::Scheduled);
        assert_eq!(meeting.participants.len(), 1);
        assert_eq!(meeting.participants[0].member_id, Some(EntityId(4)));
        assert_eq!(meeting.participants[0].role, "Peserta");
    }

    #[test]
    fn meeting_rejects_zero_duration_and_blank_agendas() {
        let mut toolbox = toolbox();
        let err = toolbox
            .create_meeting(CreateMeetingInput {
                duration_minutes: 0,
                ..meeting_input("Rapat")
            })
            .err();
        assert_eq!(err, Some(ToolboxError::InvalidDuration));

        let err = toolbox
            .create_meeting(CreateMeetingInput {
                agendas: vec![AgendaDraft::default()],
                ..meeting_input("Rapat")
            })
            .err();
        assert_eq!(err, Some(ToolboxError::missing("agenda", "title")));

        let patch = MeetingPatch {
            duration_minutes: Some(0),
            ..MeetingPatch::default()
        };
        assert_eq!(toolbox.update_meeting(EntityId(2), patch), Err(ToolboxError::InvalidDuration));
    }

    #[test]
    fn agenda_edits_keep_orders_contiguous() {
        let mut toolbox = toolbox();
        let added = toolbox
            .add_agenda(
                EntityId(2),
                AgendaDraft {
                    title: "Lain-lain".into(),
                    ..AgendaDraft::default()
                },
            )
            .unwrap_or_else(|err| panic!("add agenda: {err}"))
            .unwrap_or_else(|| panic!("meeting 2 must exist"));

        assert!(toolbox.reorder_agenda(EntityId(2), added, 1));
        assert!(toolbox.remove_agenda(EntityId(2), EntityId(1)));
        assert!(toolbox.set_agenda_status(EntityId(2), added, AgendaStatus::Discussed));

        let meeting = toolbox
            .meetings()
            .get(EntityId(2))
            .unwrap_or_else(|| panic!("meeting 2 must exist"));
        let layout: Vec<_> = meeting
            .agendas
            .iter()
            .map(|agenda| (agenda.title.as_str(), agenda.order))
            .collect();
        assert_eq!(layout, vec![("Lain-lain", 1), ("Jadwal pemeriksaan dokumen", 2)]);
        assert_eq!(meeting.agendas[0].status, AgendaStatus::Discussed);
    }

    #[test]
    fn agenda_misses_do_not_bump_revision() {
        let mut toolbox = toolbox();
        let revision = toolbox.meetings().revision();
        assert!(!toolbox.set_agenda_status(EntityId(2), EntityId(42), AgendaStatus::Completed));
        assert!(!toolbox.remove_agenda(EntityId(42), EntityId(1)));
        assert!(!toolbox.reorder_agenda(EntityId(2), EntityId(42), 1));
        assert_eq!(
            toolbox.add_agenda(
                EntityId(42),
                AgendaDraft {
                    title: "x".into(),
                    ..AgendaDraft::default()
                }
            ),
            Ok(None)
        );
        assert_eq!(toolbox.meetings().revision(), revision);
    }

    #[test]
    fn blank_minutes_leave_meeting_untouched() {
        let mut toolbox = toolbox();
        let before = toolbox.meetings().get(EntityId(2)).cloned();
        assert_eq!(
            toolbox.save_minutes(EntityId(2), " \n "),
            Err(ToolboxError::missing("meeting", "notes"))
        );
        assert_eq!(toolbox.meetings().get(EntityId(2)).cloned(), before);
    }

    #[test]
    fn carry_over_copies_only_marked_items() {
        let mut toolbox = toolbox();
        assert_eq!(toolbox.carry_over(EntityId(1), EntityId(2)), 1);
        let meeting = toolbox
            .meetings()
            .get(EntityId(2))
            .unwrap_or_else(|| panic!("meeting 2 must exist"));
        let last = meeting.agendas.last().unwrap_or_else(|| panic!("agenda expected"));
        assert_eq!(last.title, "Kendala pelaporan keuangan");
        assert_eq!(last.status, AgendaStatus::Pending);
        assert_eq!(last.order, 3);
        assert_eq!(last.meeting_id, EntityId(2));

        assert_eq!(toolbox.carry_over(EntityId(2), EntityId(3)), 0);
        assert_eq!(toolbox.carry_over(EntityId(1), EntityId(1)), 0);
        assert_eq!(toolbox.carry_over(EntityId(1), EntityId(99)), 0);
    }

    #[test]
    fn employee_ids_are_unique_on_create_and_update() {
        let mut toolbox = toolbox();
        let err = toolbox.create_member(member_input("Joko", " emp-001 ")).err();
        assert_eq!(err, Some(ToolboxError::DuplicateEmployeeId("emp-001".into())));

        let joko = toolbox
            .create_member(member_input("Joko", "EMP-010"))
            .unwrap_or_else(|err| panic!("create member: {err}"));
        assert_eq!(joko.join_date, date!(2024 - 09 - 01));

        let steal = MemberPatch {
            employee_id: Some("EMP-002".into()),
            ..MemberPatch::default()
        };
        assert_eq!(
            toolbox.update_member(joko.id, steal),
            Err(ToolboxError::DuplicateEmployeeId("EMP-002".into()))
        );

        let keep_own = MemberPatch {
            employee_id: Some("emp-010".into()),
            ..MemberPatch::default()
        };
        assert_eq!(toolbox.update_member(joko.id, keep_own), Ok(true));
        assert_eq!(toolbox.update_member(EntityId(99), MemberPatch::default()), Ok(false));
    }

    #[test]
    fn deletion_requires_confirmation() {
        let mut toolbox = toolbox();
        let pending = toolbox
            .request_member_deletion(EntityId(5))
            .unwrap_or_else(|| panic!("member 5 must exist"));
        assert_eq!(pending.to_string(), "anggota #5 \"Rina Kurnia\"");
        assert!(toolbox.members().contains(EntityId(5)));

        let duplicate = pending.clone();
        assert!(toolbox.confirm_deletion(pending));
        assert!(!toolbox.members().contains(EntityId(5)));
        assert!(!toolbox.confirm_deletion(duplicate));

        drop(toolbox.request_task_deletion(EntityId(1)));
        assert!(toolbox.tasks().contains(EntityId(1)));
        assert!(toolbox.request_meeting_deletion(EntityId(99)).is_none());
    }

    #[test]
    fn dashboard_summarises_collections() {
        let toolbox = toolbox();
        let summary = toolbox.dashboard(date!(2024 - 09 - 01));
        assert_eq!(summary.total_tasks, 5);
        assert_eq!(summary.tasks_by_status.get(&TaskStatus::Pending), Some(&2));
        assert_eq!(summary.tasks_by_status.get(&TaskStatus::Completed), Some(&1));
        assert_eq!(summary.overdue_tasks, 2);
        assert_eq!(summary.completion_percent, 20);
        let upcoming: Vec<_> = summary.upcoming_meetings.iter().map(|digest| digest.id).collect();
        assert_eq!(upcoming, vec![EntityId(2)]);
        assert_eq!(summary.active_members, 4);
        assert_eq!(summary.total_members, 5);
    }
}
