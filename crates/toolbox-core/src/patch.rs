/// Edit applied to an optional field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionalPatch<T> {
    /// Overwrite with a new value.
    Set(T),
    /// Remove the value.
    Clear,
}

impl<T> OptionalPatch<T> {
    /// Write the patch into `slot`.
    pub fn apply_to(self, slot: &mut Option<T>) {
        *slot = match self {
            Self::Set(value) => Some(value),
            Self::Clear => None,
        };
    }
}

impl OptionalPatch<String> {
    /// Interpret free text: blank input clears the field.
    #[must_use]
    pub fn from_text(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            Self::Clear
        } else {
            Self::Set(trimmed.to_owned())
        }
    }
}
