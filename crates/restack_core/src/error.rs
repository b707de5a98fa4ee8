//! Errors raised by the pure reshaping operations.
//!
//! All of these are data or configuration errors found before any output
//! row is produced. None of them are retryable: the batch is aborted and the
//! message names the row, index or columns at fault.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReshapeError {
    /// A row has a different number of cells than its column list.
    #[error("row {row} has {found} values but {expected} columns")]
    RowLength {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// A row lists its columns in an order that contradicts the union built
    /// from the rows before it (or repeats a column).
    #[error("row {row}: column '{column}' appears after '{conflicts_with}', contradicting earlier rows")]
    ColumnOrderConflict {
        row: usize,
        column: String,
        conflicts_with: String,
    },

    /// The cut parameters cannot describe any region of the table.
    #[error("invalid cut: {0}")]
    InvalidCut(String),

    /// The skip-adjusted cut span does not hold exactly `length * count`
    /// columns.
    #[error("misaligned cut: columns {start}..{end} hold {found} non-skipped columns, expected {expected}")]
    MisalignedCut {
        start: usize,
        end: usize,
        found: usize,
        expected: usize,
    },

    /// No shared label could be derived for a repeated column position.
    #[error("cannot derive a shared name for unit position {position} from '{first}' and '{second}'")]
    AmbiguousMergeName {
        position: usize,
        first: String,
        second: String,
    },
}

pub type Result<T> = std::result::Result<T, ReshapeError>;
