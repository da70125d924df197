use serde::{Deserialize, Serialize};
use time::{Date, Duration, OffsetDateTime, Time};

use crate::datefmt::{clock_time, iso_date};
use crate::id::{EntityId, next_after};
use crate::patch::OptionalPatch;
use crate::status::{AgendaStatus, MeetingStatus};

/// A scheduled meeting with its agenda and participants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    /// Identifier unique within the meeting collection.
    pub id: EntityId,
    /// Subject line.
    pub title: String,
    /// Calendar day.
    #[serde(with = "iso_date")]
    pub date: Date,
    /// Local start time.
    #[serde(with = "clock_time")]
    pub start_time: Time,
    /// Planned length in minutes.
    pub duration_minutes: u32,
    /// Room or call link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
    /// Directory entry of the organizer, when resolvable.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub organizer_id: Option<EntityId>,
    /// Display name of the organizer.
    pub organizer: String,
    /// Lifecycle state.
    #[serde(default)]
    pub status: MeetingStatus,
    /// Agenda items, kept sorted by [`Agenda::order`].
    #[serde(default)]
    pub agendas: Vec<Agenda>,
    /// Invited people.
    #[serde(default)]
    pub participants: Vec<Participant>,
    /// Minutes (notulensi).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Creation timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Last modification timestamp (UTC).
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    /// Lower bound for the next agenda id, so removed ids stay retired.
    #[serde(default, skip_serializing)]
    next_agenda_id: EntityId,
}

/// One agenda item owned by a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Agenda {
    /// Identifier unique within the owning meeting.
    pub id: EntityId,
    /// Topic.
    pub title: String,
    /// Optional details.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Resolution.
    #[serde(default)]
    pub status: AgendaStatus,
    /// Owning meeting (lookup only).
    pub meeting_id: EntityId,
    /// Display position, starting at 1.
    pub order: u32,
}

/// Someone attending a meeting.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Participant {
    /// Directory entry, when the participant is a known member.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub member_id: Option<EntityId>,
    /// Display name.
    pub name: String,
    /// Role in this meeting (e.g. "Notulis").
    pub role: String,
}

/// Fields supplied when creating an agenda item.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgendaDraft {
    /// Topic.
    pub title: String,
    /// Optional details.
    pub description: Option<String>,
    /// Initial resolution.
    pub status: AgendaStatus,
}

/// Fields supplied when creating a meeting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeetingDraft {
    /// Subject line.
    pub title: String,
    /// Calendar day.
    pub date: Date,
    /// Local start time.
    pub start_time: Time,
    /// Planned length in minutes.
    pub duration_minutes: u32,
    /// Room or call link.
    pub location: Option<String>,
    /// Resolved directory entry of the organizer.
    pub organizer_id: Option<EntityId>,
    /// Display name of the organizer.
    pub organizer: String,
    /// Initial agenda, in display order.
    pub agendas: Vec<AgendaDraft>,
    /// Invited people.
    pub participants: Vec<Participant>,
}

/// Partial update for meeting metadata.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MeetingPatch {
    /// New subject line.
    pub title: Option<String>,
    /// New day.
    pub date: Option<Date>,
    /// New start time.
    pub start_time: Option<Time>,
    /// New length in minutes.
    pub duration_minutes: Option<u32>,
    /// Location edit.
    pub location: Option<OptionalPatch<String>>,
    /// New lifecycle state.
    pub status: Option<MeetingStatus>,
    /// Replacement participant list.
    pub participants: Option<Vec<Participant>>,
}

impl Meeting {
    /// Materialize a draft; agenda items are numbered in the given order.
    #[must_use]
    pub fn from_draft(id: EntityId, draft: MeetingDraft, now: OffsetDateTime) -> Self {
        let MeetingDraft {
            title,
            date,
            start_time,
            duration_minutes,
            location,
            organizer_id,
            organizer,
            agendas,
            participants,
        } = draft;
        let mut meeting = Self {
            id,
            title,
            date,
            start_time,
            duration_minutes,
            location,
            organizer_id,
            organizer,
            status: MeetingStatus::Scheduled,
            agendas: Vec::with_capacity(agendas.len()),
            participants,
            notes: None,
            created_at: now,
            updated_at: now,
            next_agenda_id: EntityId::FIRST,
        };
        for agenda in agendas {
            meeting.push_agenda(agenda);
        }
        meeting
    }

    /// Merge metadata changes. Timestamps are left to the caller.
    pub fn apply_patch(&mut self, patch: MeetingPatch) {
        let MeetingPatch {
            title,
            date,
            start_time,
            duration_minutes,
            location,
            status,
            participants,
        } = patch;

        if let Some(title) = title {
            self.title = title;
        }
        if let Some(date) = date {
            self.date = date;
        }
        if let Some(start_time) = start_time {
            self.start_time = start_time;
        }
        if let Some(duration) = duration_minutes {
            self.duration_minutes = duration;
        }
        if let Some(location) = location {
            location.apply_to(&mut self.location);
        }
        if let Some(status) = status {
            self.status = status;
        }
        if let Some(participants) = participants {
            self.participants = participants;
        }
    }

    /// Wall-clock end of the meeting (wraps past midnight).
    #[must_use]
    pub fn end_time(&self) -> Time {
        self.start_time + Duration::minutes(i64::from(self.duration_minutes))
    }

    /// Append an agenda item after the current last one and return its id.
    pub fn push_agenda(&mut self, draft: AgendaDraft) -> EntityId {
        let id = next_after(self.agendas.iter().map(|agenda| agenda.id)).max(self.next_agenda_id);
        self.next_agenda_id = id.next();
        let order = self
            .agendas
            .iter()
            .map(|agenda| agenda.order)
            .max()
            .unwrap_or(0)
            + 1;
        self.agendas.push(Agenda {
            id,
            title: draft.title,
            description: draft.description,
            status: draft.status,
            meeting_id: self.id,
            order,
        });
        id
    }

    /// Look up an agenda item for in-place edits.
    pub fn agenda_mut(&mut self, agenda: EntityId) -> Option<&mut Agenda> {
        self.agendas.iter_mut().find(|item| item.id == agenda)
    }

    /// Remove an agenda item and close the gap in numbering.
    pub fn remove_agenda(&mut self, agenda: EntityId) -> Option<Agenda> {
        let index = self.agendas.iter().position(|item| item.id == agenda)?;
        let removed = self.agendas.remove(index);
        self.renumber_agendas();
        Some(removed)
    }

    /// Move an agenda item to `position` (1-based, clamped) and renumber.
    ///
    /// Returns false when the agenda does not belong to this meeting.
    pub fn move_agenda(&mut self, agenda: EntityId, position: usize) -> bool {
        let Some(index) = self.agendas.iter().position(|item| item.id == agenda) else {
            return false;
        };
        let item = self.agendas.remove(index);
        let target = position.saturating_sub(1).min(self.agendas.len());
        self.agendas.insert(target, item);
        self.renumber_agendas();
        true
    }

    /// Agenda items marked for the next meeting.
    pub fn carry_over_items(&self) -> impl Iterator<Item = &Agenda> {
        self.agendas
            .iter()
            .filter(|agenda| agenda.status == AgendaStatus::CarryOver)
    }

    /// Store minutes and close the meeting in one step.
    pub fn record_minutes(&mut self, notes: String) {
        self.notes = Some(notes);
        self.status = MeetingStatus::Completed;
    }

    /// Minutes text when present and non-blank.
    #[must_use]
    pub fn minutes(&self) -> Option<&str> {
        self.notes
            .as_deref()
            .map(str::trim)
            .filter(|notes| !notes.is_empty())
    }

    /// Vector position is the display order; `order` mirrors it from 1.
    fn renumber_agendas(&mut self) {
        for (agenda, order) in self.agendas.iter_mut().zip(1..) {
            agenda.order = order;
        }
    }
}
