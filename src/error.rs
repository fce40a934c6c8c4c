use thiserror::Error;

/// Errors raised by the grid core.
///
/// None of these are meant to reach the operator: navigation clamps before it
/// could produce an out-of-range coordinate, and the controller turns a stale
/// edit into a discarded transition. Direct lookups with bad indices are caller
/// bugs and fail loudly through these variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    #[error("row index {row} out of range (row count {row_count})")]
    RowOutOfRange { row: usize, row_count: usize },

    #[error("visible column index {col} out of range (visible columns {column_count})")]
    ColumnOutOfRange { col: usize, column_count: usize },

    #[error("unknown column reference '{0}'")]
    UnknownColumn(String),

    #[error("duplicate column id '{0}'")]
    DuplicateColumn(String),
}

pub type GridResult<T> = Result<T, GridError>;
