use thiserror::Error;

/// Identifies one of the two sequences of a pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Which {
    /// The reference, spanning the columns.
    First,
    /// The query, spanning the rows.
    Second,
}

impl std::fmt::Display for Which {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Which::First => write!(f, "first"),
            Which::Second => write!(f, "second"),
        }
    }
}

/// Everything that can go wrong while setting up or running an alignment.
///
/// Configuration and allocation errors are returned before any column is
/// computed. Contract violations are returned as soon as they are detected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AlignError {
    #[error("invalid band [{lower}, {upper}]: {reason}")]
    InvalidBandConfiguration {
        lower: i32,
        upper: i32,
        reason: &'static str,
    },

    #[error("score {score} does not fit in a {bits}-bit lane")]
    ScoreOverflowsLane { score: i64, bits: u32 },

    #[error("symbol {symbol} cannot be stored as a non-negative {bits}-bit lane value")]
    SymbolOutOfLaneRange { symbol: u8, bits: u32 },

    #[error("batched alignment only supports match/mismatch scoring")]
    UnsupportedSimdScoring,

    #[error("a batch of {pairs} pairs does not fit in {lanes} lanes")]
    BatchTooLarge { pairs: usize, lanes: usize },

    #[error("the {0} sequence is empty")]
    EmptySequence(Which),

    #[error("gap scores must not be positive and must sum to a valid score (open {open}, extension {extension})")]
    InvalidGapScheme { open: i32, extension: i32 },

    #[error("scores along an alignment can reach {bound}, beyond the 32-bit score range")]
    ScoreRangeExceeded { bound: i64 },

    #[error("edit distance supports global and sequence-1-free semi-global alignment, not {0}")]
    UnsupportedEditDistanceMethod(String),

    #[error("invalid scoring matrix: {0}")]
    InvalidScoringMatrix(String),

    #[error("cannot allocate {cells} cells for a {rows}x{cols} matrix")]
    AllocationError {
        rows: usize,
        cols: usize,
        cells: usize,
    },

    #[error("the matrix does not store trace directions")]
    TraceUnavailable,

    #[error("coordinate ({row},{col}) lies outside the {rows}x{cols} matrix")]
    CoordinateOutOfBounds {
        row: usize,
        col: usize,
        rows: usize,
        cols: usize,
    },

    #[error("invalid alignment: {0}")]
    InvalidAlignment(&'static str),
}

pub type Result<T> = std::result::Result<T, AlignError>;
