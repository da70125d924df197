//! Domain types for the toolbox: tasks, meetings, the team directory and the
//! filters applied to them.

/// Calendar parsing and formatting helpers.
pub mod datefmt;
mod error;
/// Filter specifications.
pub mod filter;
/// Identifier types.
pub mod id;
/// Meetings, agenda items and participants.
pub mod meeting;
/// Team directory entries.
pub mod member;
/// Partial-update helpers.
pub mod patch;
/// Status and classification enums.
pub mod status;
/// Kanban tasks.
pub mod task;
/// Free-text matching.
pub mod text_matcher;
/// The operating user.
pub mod user;

pub use error::ParseError;
pub use filter::{MeetingFilter, MemberFilter, RecordFilter, TaskFilter};
pub use id::EntityId;
pub use meeting::{Agenda, AgendaDraft, Meeting, MeetingDraft, MeetingPatch, Participant};
pub use member::{MemberDraft, MemberPatch, TeamMember};
pub use patch::OptionalPatch;
pub use status::{AgendaStatus, MeetingStatus, MemberRole, MemberStatus, Priority, TaskStatus};
pub use task::{Task, TaskDraft, TaskPatch};
pub use text_matcher::{Searchable, TextMatcher};
pub use user::User;
