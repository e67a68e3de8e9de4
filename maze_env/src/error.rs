//! Error types for building mazes.

use thiserror::Error;

/// Errors that can occur while constructing a maze from a layout.
#[derive(Debug, Error)]
pub enum MazeError {
    /// Layout contained no rows
    #[error("Maze layout is empty")]
    EmptyLayout,

    /// A row's width differs from the first row
    #[error("Row {row} has width {found}, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    /// Unrecognized layout character
    #[error("Unknown tile '{ch}' at row {row}, column {col}")]
    UnknownTile { row: usize, col: usize, ch: char },

    /// More than one goal tile in the layout
    #[error("Layout defines more than one goal tile")]
    DuplicateGoal,

    /// Reading a layout file failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl MazeError {
    /// Creates an unknown tile error.
    pub fn unknown_tile(row: usize, col: usize, ch: char) -> Self {
        Self::UnknownTile { row, col, ch }
    }
}
