//! Error types for board domain validation and parsing.

use thiserror::Error;

/// Errors returned while constructing domain board values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum BoardDomainError {
    /// An identifier was empty after trimming.
    #[error("{kind} identifier must not be empty")]
    EmptyIdentifier {
        /// Which identifier kind was rejected.
        kind: &'static str,
    },

    /// The drop target does not name a board column.
    #[error("unknown board column: {0}")]
    InvalidColumn(String),

    /// The monthly due day is not a number in `1..=31`.
    #[error("invalid monthly due day '{0}', expected a day between 1 and 31")]
    InvalidMonthlyDueDay(String),

    /// The task title is empty after trimming.
    #[error("task title must not be empty")]
    EmptyTitle,

    /// A free-text value exceeds its configured limit.
    #[error("{field} exceeds {limit} characters (got {actual})")]
    TextTooLong {
        /// Name of the offending field.
        field: &'static str,
        /// Configured maximum length.
        limit: usize,
        /// Actual length in characters.
        actual: usize,
    },
}

/// Error returned while parsing task statuses from API payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task status: {0}")]
pub struct ParseTaskStatusError(pub String);

/// Error returned while parsing task priorities from API payloads.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("unknown task priority: {0}")]
pub struct ParsePriorityError(pub String);
