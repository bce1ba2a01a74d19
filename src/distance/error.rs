use thiserror::Error;

/// Errors from building or reading a [`DistanceMatrix`](super::DistanceMatrix).
#[derive(Debug, Clone, PartialEq, Error)]
pub enum DistanceError {
    /// The same point id was supplied twice.
    #[error("point `{0}` appears more than once in the matrix input")]
    DuplicatePoint(String),
    /// A lookup referenced a point the matrix was not built over.
    #[error("point `{0}` is not in the distance matrix")]
    UnknownPoint(String),
    /// A [`TableSource`](super::TableSource) request failed.
    #[error("distance table request failed: {message}")]
    Table {
        /// Backend-specific failure description.
        message: String,
    },
    /// A table block came back with the wrong shape.
    #[error("distance table block is {rows}x{cols}, expected {expected_rows}x{expected_cols}")]
    MalformedTable {
        /// Requested source count.
        expected_rows: usize,
        /// Requested destination count.
        expected_cols: usize,
        /// Rows received.
        rows: usize,
        /// Columns received in the first short or long row.
        cols: usize,
    },
}
