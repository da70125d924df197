use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

use crate::ParseError;

fn normalize_token(token: &str) -> String {
    token.trim().to_ascii_lowercase().replace(['-', ' '], "_")
}

/// Kanban status of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    /// Not started yet ("todo").
    #[serde(alias = "todo")]
    Pending,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Completed,
    /// Past its due date without being finished.
    Overdue,
}

impl TaskStatus {
    /// Every status in board order.
    pub const ALL: [Self; 4] = [Self::Pending, Self::InProgress, Self::Completed, Self::Overdue];

    /// Wire representation used in configuration files and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::InProgress => "in_progress",
            Self::Completed => "completed",
            Self::Overdue => "overdue",
        }
    }

    /// Default column heading.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "To Do",
            Self::InProgress => "Sedang Dikerjakan",
            Self::Completed => "Selesai",
            Self::Overdue => "Terlambat",
        }
    }
}

impl FromStr for TaskStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" | "todo" | "to_do" => Ok(Self::Pending),
            "in_progress" | "inprogress" | "doing" => Ok(Self::InProgress),
            "completed" | "complete" | "done" => Ok(Self::Completed),
            "overdue" | "late" => Ok(Self::Overdue),
            _ => Err(ParseError::token("task status", s)),
        }
    }
}

/// Urgency of a task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Priority {
    /// Can wait.
    Low,
    /// Normal work.
    #[default]
    Medium,
    /// Should be picked up soon.
    High,
    /// Drop everything.
    Urgent,
}

impl Priority {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Urgent => "urgent",
        }
    }
}

impl FromStr for Priority {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "low" | "rendah" => Ok(Self::Low),
            "medium" | "normal" | "sedang" => Ok(Self::Medium),
            "high" | "tinggi" => Ok(Self::High),
            "urgent" | "mendesak" => Ok(Self::Urgent),
            _ => Err(ParseError::token("priority", s)),
        }
    }
}

/// Lifecycle of a meeting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MeetingStatus {
    /// Planned, not started.
    #[default]
    Scheduled,
    /// Currently taking place.
    Ongoing,
    /// Held and minuted.
    Completed,
    /// Called off.
    Cancelled,
}

impl MeetingStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Ongoing => "ongoing",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Label printed on exported minutes.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Terjadwal",
            Self::Ongoing => "Berlangsung",
            Self::Completed => "Selesai",
            Self::Cancelled => "Dibatalkan",
        }
    }
}

impl FromStr for MeetingStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "scheduled" | "planned" => Ok(Self::Scheduled),
            "ongoing" | "in_progress" => Ok(Self::Ongoing),
            "completed" | "done" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(ParseError::token("meeting status", s)),
        }
    }
}

/// Resolution of a single agenda item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AgendaStatus {
    /// Not discussed yet.
    #[default]
    Pending,
    /// Discussed, follow-up may remain.
    Discussed,
    /// Resolved.
    Completed,
    /// Unresolved; moves to a later meeting.
    CarryOver,
}

impl AgendaStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Discussed => "discussed",
            Self::Completed => "completed",
            Self::CarryOver => "carry_over",
        }
    }

    /// Label printed on exported minutes.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Belum Dibahas",
            Self::Discussed => "Dibahas",
            Self::Completed => "Selesai",
            Self::CarryOver => "Dilanjutkan",
        }
    }
}

impl FromStr for AgendaStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "pending" => Ok(Self::Pending),
            "discussed" => Ok(Self::Discussed),
            "completed" | "done" => Ok(Self::Completed),
            "carry_over" | "carryover" => Ok(Self::CarryOver),
            _ => Err(ParseError::token("agenda status", s)),
        }
    }
}

/// Role of a member inside their team.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    /// Team lead.
    Leader,
    /// Coordinates a sub-area.
    Coordinator,
    /// Regular member.
    #[default]
    Member,
}

impl MemberRole {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Leader => "leader",
            Self::Coordinator => "coordinator",
            Self::Member => "member",
        }
    }

    /// Display label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Leader => "Ketua",
            Self::Coordinator => "Koordinator",
            Self::Member => "Anggota",
        }
    }
}

impl FromStr for MemberRole {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "leader" | "ketua" => Ok(Self::Leader),
            "coordinator" | "koordinator" => Ok(Self::Coordinator),
            "member" | "anggota" => Ok(Self::Member),
            _ => Err(ParseError::token("member role", s)),
        }
    }
}

/// Employment status of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum MemberStatus {
    /// Currently active.
    #[default]
    Active,
    /// Left or on leave.
    Inactive,
}

impl MemberStatus {
    /// Wire representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive => "inactive",
        }
    }
}

impl FromStr for MemberStatus {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_token(s).as_str() {
            "active" | "aktif" => Ok(Self::Active),
            "inactive" | "nonaktif" => Ok(Self::Inactive),
            _ => Err(ParseError::token("member status", s)),
        }
    }
}

macro_rules! display_as_str {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl fmt::Display for $ty {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(self.as_str())
                }
            }
        )+
    };
}

display_as_str!(TaskStatus, Priority, MeetingStatus, AgendaStatus, MemberRole, MemberStatus);
