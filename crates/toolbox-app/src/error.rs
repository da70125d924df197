use thiserror::Error;

/// Validation failures raised by [`Toolbox`](crate::Toolbox) operations.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ToolboxError {
    /// A required input was blank or absent.
    #[error("{entity} {field} is required")]
    MissingField {
        /// Record kind being created or edited.
        entity: &'static str,
        /// Offending field.
        field: &'static str,
    },
    /// Another member already uses this staff number.
    #[error("employee id '{0}' is already registered")]
    DuplicateEmployeeId(String),
    /// Meetings must last at least one minute.
    #[error("meeting duration must be at least one minute")]
    InvalidDuration,
}

impl ToolboxError {
    pub(crate) const fn missing(entity: &'static str, field: &'static str) -> Self {
        Self::MissingField { entity, field }
    }

    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::MissingField { field, .. } => format!("kolom {field} wajib diisi"),
            Self::DuplicateEmployeeId(employee_id) => {
                format!("NIP {employee_id} sudah terdaftar")
            }
            Self::InvalidDuration => "durasi rapat minimal 1 menit".to_owned(),
        }
    }
}

/// Result alias for toolbox operations.
pub type ToolboxResult<T> = Result<T, ToolboxError>;
