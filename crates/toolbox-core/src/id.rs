use serde::{Deserialize, Serialize};
use std::{fmt, num::ParseIntError, str::FromStr};

/// Identifier of a record inside its collection.
///
/// Identifiers are positive integers handed out by the owning collection; a
/// value is never reused within one process, even after the record is deleted.
#[derive(Clone, Copy, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(pub u64);

impl EntityId {
    /// Smallest identifier a collection hands out.
    pub const FIRST: Self = Self(1);

    /// Identifier following this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::FIRST
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for EntityId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim().trim_start_matches('#');
        Ok(Self(trimmed.parse()?))
    }
}

impl From<u64> for EntityId {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

/// Allocate the identifier following the largest one in `existing`.
#[must_use]
pub fn next_after<I>(existing: I) -> EntityId
where
    I: IntoIterator<Item = EntityId>,
{
    existing
        .into_iter()
        .max()
        .map_or(EntityId::FIRST, EntityId::next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn next_after_empty_starts_at_one() {
        assert_eq!(next_after(Vec::new()), EntityId(1));
    }

    #[test]
    fn next_after_skips_gaps() {
        let ids = vec![EntityId(3), EntityId(9), EntityId(4)];
        assert_eq!(next_after(ids), EntityId(10));
    }

    #[test]
    fn parse_accepts_hash_prefix() {
        let parsed: EntityId = "#42"
            .parse()
            .unwrap_or_else(|err| panic!("must parse id: {err}"));
        assert_eq!(parsed, EntityId(42));
        assert!("abc".parse::<EntityId>().is_err());
    }

    #[test]
    fn serializes_as_plain_number() {
        let json = serde_json::to_string(&EntityId(7))
            .unwrap_or_else(|err| panic!("must serialize: {err}"));
        assert_eq!(json, "7");
    }
}
