use serde::{Deserialize, Serialize};

use crate::status::MemberRole;

/// Person operating the toolbox.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Display name.
    pub name: String,
    /// Contact email.
    pub email: String,
    /// Organisational unit, when known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    /// Team role.
    #[serde(default)]
    pub role: MemberRole,
}
