use std::str::FromStr;

use thiserror::Error;
use time::Date;
use toolbox_core::datefmt::parse_date;
use toolbox_core::{
    MeetingFilter, MeetingStatus, MemberFilter, MemberRole, MemberStatus, ParseError, Priority, TaskFilter,
    TaskStatus,
};

/// Error type returned while constructing filters from user-facing inputs.
#[derive(Debug, Error)]
pub enum FilterBuildError {
    #[error("invalid {field}: {source}")]
    InvalidToken {
        field: &'static str,
        #[source]
        source: ParseError,
    },
    #[error("date range is inverted: {from} is after {until}")]
    InvertedRange { from: Date, until: Date },
}

/// Result alias for filter construction helpers.
pub type FilterBuildResult<T> = Result<T, FilterBuildError>;

impl FilterBuildError {
    /// Convert the error into a message that is friendly for end-users.
    #[must_use]
    pub fn describe_user_facing(&self) -> String {
        match self {
            Self::InvalidToken {
                field,
                source: ParseError::UnknownToken { token, .. },
            } => format!("nilai {field} tidak dikenal: {token}"),
            Self::InvalidToken {
                field,
                source: ParseError::InvalidFormat { expected, .. },
            } => format!("format {field} tidak valid (gunakan {expected})"),
            Self::InvertedRange { .. } => "tanggal awal harus sebelum tanggal akhir".to_owned(),
        }
    }
}

fn normalize_text(raw: Option<String>) -> Option<String> {
    raw.and_then(|raw| {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| trimmed.to_owned())
    })
}

fn parse_optional<T>(field: &'static str, raw: Option<&str>) -> FilterBuildResult<Option<T>>
where
    T: FromStr<Err = ParseError>,
{
    raw.map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| token.parse().map_err(|source| FilterBuildError::InvalidToken { field, source }))
        .transpose()
}

fn parse_optional_date(field: &'static str, raw: Option<&str>) -> FilterBuildResult<Option<Date>> {
    raw.map(str::trim)
        .filter(|token| !token.is_empty())
        .map(|token| parse_date(token).map_err(|source| FilterBuildError::InvalidToken { field, source }))
        .transpose()
}

/// Builder that accepts user-facing strings and normalizes them into [`TaskFilter`] values.
#[derive(Debug, Clone, Default)]
pub struct TaskFilterBuilder {
    filter: TaskFilter,
}

impl TaskFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the optional search text (whitespace-only inputs become `None`).
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.filter.text = normalize_text(text);
        self
    }

    /// Restrict to one status.
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_status(mut self, status: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.status = parse_optional::<TaskStatus>("status", status)?;
        Ok(self)
    }

    /// Restrict to one priority.
    ///
    /// # Errors
    /// Returns an error if the token is not a known priority.
    pub fn with_priority(mut self, priority: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.priority = parse_optional::<Priority>("priority", priority)?;
        Ok(self)
    }

    /// Restrict to one assignee name.
    #[must_use]
    pub fn with_assignee(mut self, assignee: Option<String>) -> Self {
        self.filter.assignee = normalize_text(assignee);
        self
    }

    /// Restrict to one category.
    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.filter.category = normalize_text(category);
        self
    }

    /// Build the final [`TaskFilter`].
    #[must_use]
    pub fn build(self) -> TaskFilter {
        self.filter
    }
}

/// Builder for [`MemberFilter`].
#[derive(Debug, Clone, Default)]
pub struct MemberFilterBuilder {
    filter: MemberFilter,
}

impl MemberFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the optional search text.
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.filter.text = normalize_text(text);
        self
    }

    /// Restrict to one department.
    #[must_use]
    pub fn with_department(mut self, department: Option<String>) -> Self {
        self.filter.department = normalize_text(department);
        self
    }

    /// Restrict to one role.
    ///
    /// # Errors
    /// Returns an error if the token is not a known role.
    pub fn with_role(mut self, role: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.role = parse_optional::<MemberRole>("role", role)?;
        Ok(self)
    }

    /// Restrict to one employment status.
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_status(mut self, status: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.status = parse_optional::<MemberStatus>("status", status)?;
        Ok(self)
    }

    /// Build the final [`MemberFilter`].
    #[must_use]
    pub fn build(self) -> MemberFilter {
        self.filter
    }
}

/// Builder for [`MeetingFilter`].
#[derive(Debug, Clone, Default)]
pub struct MeetingFilterBuilder {
    filter: MeetingFilter,
}

impl MeetingFilterBuilder {
    /// Create an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the optional search text.
    #[must_use]
    pub fn with_text(mut self, text: Option<String>) -> Self {
        self.filter.text = normalize_text(text);
        self
    }

    /// Restrict to one lifecycle state.
    ///
    /// # Errors
    /// Returns an error if the token is not a known status.
    pub fn with_status(mut self, status: Option<&str>) -> FilterBuildResult<Self> {
        self.filter.status = parse_optional::<MeetingStatus>("status", status)?;
        Ok(self)
    }

    /// Configure the inclusive date bounds using `YYYY-MM-DD` strings.
    ///
    /// # Errors
    /// Returns an error if either date fails to parse or the range is inverted.
    pub fn with_date_range(mut self, from: Option<&str>, until: Option<&str>) -> FilterBuildResult<Self> {
        let from = parse_optional_date("from", from)?;
        let until = parse_optional_date("until", until)?;
        if let (Some(from), Some(until)) = (from, until)
            && from > until
        {
            return Err(FilterBuildError::InvertedRange { from, until });
        }
        self.filter.date_from = from;
        self.filter.date_until = until;
        Ok(self)
    }

    /// Build the final [`MeetingFilter`].
    #[must_use]
    pub fn build(self) -> MeetingFilter {
        self.filter
    }
}
