//! Error types for terminal result expectations.

use thiserror::Error;

/// Violation of a single-row expectation on a terminal call.
///
/// Only `one()` signals these; every other terminal degrades gracefully
/// (empty sequence, `None`, zero count) when nothing matches.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    /// `one()` found no rows.
    #[error("no row was found for one()")]
    NoRowFound,
    /// `one()` found more than one row.
    #[error("multiple rows were found for one(): got {count}")]
    MultipleRowsFound { count: usize },
}
