//! Core error taxonomy.
//!
//! Lookup misses are not errors: read-only selectors return `Option` or an
//! empty slice. Everything that is an error falls into the variants below.

use thiserror::Error;

use crate::view::ViewKind;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A malformed catalog line. Recovered at ingestion by dropping the
    /// line; only reaches callers through `dropped_records` counts.
    #[error("invalid album record on line {line}: {message}")]
    InvalidRecord { line: usize, message: String },

    /// The catalog contained no valid records at all. The one fatal load
    /// error; surfaced to the top level, halts interaction.
    #[error("album catalog contained no valid records")]
    EmptyCatalog,

    /// An operation that assumes a specific active view was invoked against
    /// another. Caller's responsibility to guard.
    #[error("operation requires the {expected:?} view, but {actual:?} is active")]
    WrongView { expected: ViewKind, actual: ViewKind },
}

pub type Result<T> = std::result::Result<T, CoreError>;
