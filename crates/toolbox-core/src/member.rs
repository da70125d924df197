use serde::{Deserialize, Serialize};
use time::Date;

use crate::datefmt::iso_date;
use crate::id::EntityId;
use crate::status::{MemberRole, MemberStatus};

/// Entry of the team directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeamMember {
    /// Identifier unique within the directory.
    pub id: EntityId,
    /// Full name.
    pub name: String,
    /// Staff number (NIP), unique within the directory.
    pub employee_id: String,
    /// Work email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Organisational unit.
    pub department: String,
    /// Job title.
    pub position: String,
    /// Team role.
    pub role: MemberRole,
    /// First working day.
    #[serde(with = "iso_date")]
    pub join_date: Date,
    /// Office location.
    pub location: String,
    /// Employment status.
    pub status: MemberStatus,
}

/// Fields supplied when adding someone to the directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MemberDraft {
    /// Full name.
    pub name: String,
    /// Staff number.
    pub employee_id: String,
    /// Work email.
    pub email: String,
    /// Phone number.
    pub phone: String,
    /// Organisational unit.
    pub department: String,
    /// Job title.
    pub position: String,
    /// Team role.
    pub role: MemberRole,
    /// First working day.
    pub join_date: Date,
    /// Office location.
    pub location: String,
    /// Employment status.
    pub status: MemberStatus,
}

/// Partial update for a directory entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MemberPatch {
    /// New name.
    pub name: Option<String>,
    /// New staff number.
    pub employee_id: Option<String>,
    /// New email.
    pub email: Option<String>,
    /// New phone number.
    pub phone: Option<String>,
    /// New unit.
    pub department: Option<String>,
    /// New job title.
    pub position: Option<String>,
    /// New role.
    pub role: Option<MemberRole>,
    /// New location.
    pub location: Option<String>,
    /// New employment status.
    pub status: Option<MemberStatus>,
}

impl TeamMember {
    /// Materialize a draft.
    #[must_use]
    pub fn from_draft(id: EntityId, draft: MemberDraft) -> Self {
        let MemberDraft {
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
        } = draft;
        Self {
            id,
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
        }
    }

    /// Merge `patch` into the entry.
    pub fn apply_patch(&mut self, patch: MemberPatch) {
        let MemberPatch {
            name,
            employee_id,
            email,
            phone,
            department,
            position,
            role,
            location,
            status,
        } = patch;

        let text_fields = [
            (&mut self.name, name),
            (&mut self.employee_id, employee_id),
            (&mut self.email, email),
            (&mut self.phone, phone),
            (&mut self.department, department),
            (&mut self.position, position),
            (&mut self.location, location),
        ];
        for (slot, value) in text_fields {
            if let Some(value) = value {
                *slot = value;
            }
        }
        if let Some(role) = role {
            self.role = role;
        }
        if let Some(status) = status {
            self.status = status;
        }
    }

    /// Whether the member answers to `name` (case-insensitive, trimmed).
    #[must_use]
    pub fn is_named(&self, name: &str) -> bool {
        self.name.trim().eq_ignore_ascii_case(name.trim())
    }

    /// Whether the member is still on staff.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.status == MemberStatus::Active
    }
}

/// Canonical form of a staff number used for uniqueness checks.
#[must_use]
pub fn employee_id_key(raw: &str) -> String {
    raw.trim().to_ascii_uppercase()
}
