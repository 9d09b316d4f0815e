use thiserror::Error;

/// Reasons a tile layout cannot be turned into a [`Board`](crate::Board).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must be at least 2x2, got {rows}x{cols}")]
    TooSmall { rows: usize, cols: usize },
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("expected {expected} tiles for the given dimensions, found {found}")]
    TileCount { expected: usize, found: usize },
    #[error("board has no blank (0) tile")]
    NoBlank,
    #[error("board has {count} blank tiles, expected exactly one")]
    MultipleBlanks { count: usize },
    #[error("label {label} is outside 1..={max}")]
    LabelOutOfRange { label: u32, max: u32 },
    #[error("label {label} appears more than once")]
    DuplicateLabel { label: u32 },
    #[error("blank given at ({row}, {col}) does not hold the 0 tile")]
    BlankMismatch { row: usize, col: usize },
}
