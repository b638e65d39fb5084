pub mod blosum;
pub mod cigar;
pub mod cost_model;
pub mod error;
pub mod method;
pub mod trace;

// Re-export types for convenience of `use dp_types::*;`.
pub use cigar::*;
pub use cost_model::*;
pub use error::*;
pub use method::*;
pub use trace::*;

use serde::{Deserialize, Serialize};
use std::fmt;

/// Scores are maximized. Matches are typically positive, gaps negative.
pub type Score = i32;

/// A borrowed sequence of raw symbols.
pub type Seq<'a> = &'a [u8];
/// An owned sequence of raw symbols.
pub type Sequence = Vec<u8>;

/// A cell of the DP matrix.
///
/// `row` walks over the query (the second sequence) and `col` over the
/// reference (the first sequence). Row and column 0 are the all-gap prefixes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Coordinate {
    pub row: usize,
    pub col: usize,
}

impl Coordinate {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The diagonal of this cell, `col - row`.
    pub fn diagonal(&self) -> i64 {
        self.col as i64 - self.row as i64
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// Dimensions of a DP matrix for a pair of sequences.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatrixDims {
    /// `|query| + 1`
    pub rows: usize,
    /// `|reference| + 1`
    pub cols: usize,
}

impl MatrixDims {
    pub fn for_pair(reference: Seq, query: Seq) -> Self {
        Self {
            rows: query.len() + 1,
            cols: reference.len() + 1,
        }
    }

    pub fn sink(&self) -> Coordinate {
        Coordinate::new(self.rows - 1, self.cols - 1)
    }

    pub fn contains(&self, pos: Coordinate) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Fails with [`AlignError::CoordinateOutOfBounds`] when `pos` lies outside the matrix.
    pub fn check(&self, pos: Coordinate) -> Result<()> {
        if self.contains(pos) {
            Ok(())
        } else {
            Err(AlignError::CoordinateOutOfBounds {
                row: pos.row,
                col: pos.col,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }
}

/// The three scores of a DP cell.
///
/// `current` is the best score of an alignment ending in the cell. `up` is the
/// score of a vertical gap handed to the cell below, `left` the score of a
/// horizontal gap handed to the cell on the right. `V` is a scalar [`Score`]
/// or a vector of lane scores.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ScoreCell<V> {
    pub current: V,
    pub up: V,
    pub left: V,
}

impl<V: Copy> ScoreCell<V> {
    pub fn splat(v: V) -> Self {
        Self {
            current: v,
            up: v,
            left: v,
        }
    }
}

pub fn seq_to_string(seq: Seq) -> String {
    String::from_utf8_lossy(seq).into_owned()
}
