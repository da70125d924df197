use crate::meeting::Meeting;
use crate::member::TeamMember;
use crate::task::Task;

/// Records exposing the fields free-text search looks at.
pub trait Searchable {
    /// Fields consulted by [`TextMatcher`].
    fn search_fields(&self) -> Vec<&str>;
}

impl Searchable for Task {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str()];
        if let Some(description) = self.description.as_deref() {
            fields.push(description);
        }
        fields
    }
}

impl Searchable for TeamMember {
    fn search_fields(&self) -> Vec<&str> {
        vec![
            self.name.as_str(),
            self.employee_id.as_str(),
            self.email.as_str(),
            self.department.as_str(),
            self.position.as_str(),
        ]
    }
}

impl Searchable for Meeting {
    fn search_fields(&self) -> Vec<&str> {
        let mut fields = vec![self.title.as_str(), self.organizer.as_str()];
        if let Some(location) = self.location.as_deref() {
            fields.push(location);
        }
        fields
    }
}

/// Case-insensitive substring matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextMatcher {
    needle: String,
}

impl TextMatcher {
    /// Normalize a query string into a matcher. Returns `None` for blank inputs.
    #[must_use]
    pub fn new(query: &str) -> Option<Self> {
        let trimmed = query.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self {
            needle: trimmed.to_lowercase(),
        })
    }

    /// Normalized needle.
    #[must_use]
    pub fn needle(&self) -> &str {
        &self.needle
    }

    /// Determine whether any searchable field contains the query.
    #[must_use]
    pub fn matches<T: Searchable + ?Sized>(&self, record: &T) -> bool {
        record
            .search_fields()
            .into_iter()
            .any(|field| self.matches_field(field))
    }

    fn matches_field(&self, value: &str) -> bool {
        value.to_lowercase().contains(&self.needle)
    }
}
