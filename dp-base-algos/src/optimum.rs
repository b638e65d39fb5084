use crate::score::{LaneScalar, Lanes};
use dp_types::*;

/// The best score seen so far and where it was found.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AlignmentOptimum {
    pub score: Score,
    pub coordinate: Coordinate,
}

/// Which cells may end an alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum EndRegion {
    /// Any cell.
    Anywhere,
    /// The sink, widened to the last row and/or last column by free trailing gaps.
    Sink {
        sink: Coordinate,
        last_row: bool,
        last_col: bool,
    },
}

impl EndRegion {
    fn new(method: &Method, dims: MatrixDims) -> Self {
        match method {
            Method::Local => EndRegion::Anywhere,
            Method::Global(free) => EndRegion::Sink {
                sink: dims.sink(),
                last_row: free.last_row(),
                last_col: free.last_col(),
            },
        }
    }

    #[inline]
    fn contains(&self, row: usize, col: usize) -> bool {
        match *self {
            EndRegion::Anywhere => true,
            EndRegion::Sink {
                sink,
                last_row,
                last_col,
            } => {
                (row == sink.row && (col == sink.col || last_row))
                    || (col == sink.col && last_col && row <= sink.row)
            }
        }
    }
}

/// Running maximum over the cells that may end an alignment.
///
/// Only strictly better scores replace the optimum, so ties keep the first
/// cell in column-major order.
#[derive(Clone, Debug)]
pub struct AlignmentOptimumTracker {
    region: EndRegion,
    best: AlignmentOptimum,
    seen: bool,
}

impl AlignmentOptimumTracker {
    pub fn new(method: &Method, dims: MatrixDims, lowest: Score) -> Self {
        Self {
            region: EndRegion::new(method, dims),
            best: AlignmentOptimum {
                score: lowest,
                coordinate: dims.sink(),
            },
            seen: false,
        }
    }

    #[inline]
    pub fn consider(&mut self, score: Score, row: usize, col: usize) {
        if self.region.contains(row, col) && (score > self.best.score || !self.seen) {
            self.best = AlignmentOptimum {
                score,
                coordinate: Coordinate::new(row, col),
            };
            self.seen = true;
        }
    }

    pub fn optimum(&self) -> AlignmentOptimum {
        self.best
    }
}

/// One tracker per lane, each restricted to its own pair's matrix.
#[derive(Clone, Debug)]
pub struct LaneOptimumTracker<const L: usize> {
    lanes: Vec<(MatrixDims, AlignmentOptimumTracker)>,
}

impl<const L: usize> LaneOptimumTracker<L> {
    /// `dims[i]` are the dimensions of the pair in lane `i`.
    pub fn new(method: &Method, dims: &[MatrixDims], lowest: Score) -> Self {
        debug_assert!(dims.len() <= L);
        Self {
            lanes: dims
                .iter()
                .map(|&d| (d, AlignmentOptimumTracker::new(method, d, lowest)))
                .collect(),
        }
    }

    #[inline]
    pub fn consider<S: LaneScalar>(&mut self, scores: Lanes<S, L>, row: usize, col: usize) {
        for (i, (dims, tracker)) in self.lanes.iter_mut().enumerate() {
            if row < dims.rows && col < dims.cols {
                tracker.consider(scores.lane_score(i), row, col);
            }
        }
    }

    pub fn optima(&self) -> Vec<AlignmentOptimum> {
        self.lanes.iter().map(|(_, t)| t.optimum()).collect()
    }
}
