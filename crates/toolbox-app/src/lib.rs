//! Application layer logic for the toolbox.
//!
//! This crate provides the in-memory stores, views, the kanban interaction
//! model, minutes export, configuration and the service façade shared by the
//! command-line front-end.

pub mod collection;
pub mod config;
mod error;
pub mod export;
pub mod filter_util;
pub mod fixtures;
pub mod kanban;
pub mod service;
pub mod user;
pub mod view;

// Re-exports for convenience
pub use collection::{Clock, Collection, ManualClock, Record, SystemClock};
pub use config::{BoardColumnConfig, BoardConfig, ExportConfig, ProfileConfig, ProjectConfig};
pub use error::{ToolboxError, ToolboxResult};
pub use export::{ExportOutcome, MinutesDocument, PrintSurface, export_minutes};
pub use filter_util::{FilterBuildError, MeetingFilterBuilder, MemberFilterBuilder, TaskFilterBuilder};
pub use fixtures::Seed;
pub use kanban::{Board, BoardColumn, DragMachine, DragState, DropOutcome};
pub use service::{
    CreateMeetingInput, CreateMemberInput, CreateTaskInput, DashboardSummary, DeletionTarget, MeetingDigest,
    ParticipantInput, PendingDeletion, Toolbox,
};
pub use user::resolve_user;
pub use view::{FilteredView, MeetingSort, MemberSort, SortKey, TaskSort};
