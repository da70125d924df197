use thiserror::Error;

/// Error returned when user-facing tokens cannot be mapped onto domain values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The token does not name a known variant.
    #[error("unknown {kind}: {token}")]
    UnknownToken {
        /// What was being parsed.
        kind: &'static str,
        /// Offending input.
        token: String,
    },
    /// The input does not follow the expected layout.
    #[error("invalid {kind} '{input}' (expected {expected})")]
    InvalidFormat {
        /// What was being parsed.
        kind: &'static str,
        /// Offending input.
        input: String,
        /// Human-readable layout hint.
        expected: &'static str,
    },
}

impl ParseError {
    pub(crate) fn token(kind: &'static str, token: &str) -> Self {
        Self::UnknownToken {
            kind,
            token: token.trim().to_owned(),
        }
    }
}
