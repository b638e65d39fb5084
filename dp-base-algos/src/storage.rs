//! Storage strategies for the DP matrix.
//!
//! All variants are filled column by column, top to bottom. They differ in
//! which cells they retain:
//! - [`FullMatrix`] keeps every cell, and optionally every trace.
//! - [`OneColumnRolling`] keeps the current and the previous column.
//! - [`OneColumnBanded`] keeps one band column, and optionally the band of traces.
mod banded;
mod full;
mod rolling;

pub use banded::OneColumnBanded;
pub use full::FullMatrix;
pub use rolling::OneColumnRolling;

use crate::{kernel::CellKernel, pool::MatrixPool, recurrence::TraceMode, score::DpScore};
use dp_types::*;
use dp_vis_types::ColumnView;
use std::ops::Range;

pub trait MatrixStorage<V: DpScore> {
    /// Allocates the buffers for a `dims` matrix, taking them from `pool`.
    fn resize(&mut self, dims: MatrixDims, lowest: V, pool: &mut MatrixPool<V>) -> Result<()>;

    fn dims(&self) -> MatrixDims;

    /// The columns that have to be computed, in order.
    fn columns(&self) -> Range<usize> {
        0..self.dims().cols
    }

    /// Computes column `col` from the previous one.
    fn compute_column<K: CellKernel<V>>(&mut self, col: usize, kernel: &mut K);

    /// The most recently computed column.
    fn column(&self) -> ColumnView<'_, V>;

    /// The cell at `(row, col)`, or `None` when it is not retained.
    fn at(&self, row: usize, col: usize) -> Result<Option<ScoreCell<V>>>;

    /// The trace of `(row, col)`, or `None` when it lies outside the band.
    fn trace_at(&self, row: usize, col: usize) -> Result<Option<TraceCell>> {
        self.dims().check(Coordinate::new(row, col))?;
        Err(AlignError::TraceUnavailable)
    }

    /// Hands the buffers back to `pool`.
    fn release(&mut self, pool: &mut MatrixPool<V>);
}

#[inline]
fn store<V, T: TraceMode>(
    cells: &mut [ScoreCell<V>],
    traces: &mut [TraceCell],
    i: usize,
    (cell, trace): (ScoreCell<V>, TraceCell),
) {
    cells[i] = cell;
    if T::ENABLED {
        traces[i] = trace;
    }
}

/// Fills `next` (column `col`) from `prev` (column `col - 1`, empty for column 0).
///
/// `traces` is only written when `T::ENABLED`.
#[inline]
fn compute_full_column<V: DpScore, T: TraceMode, K: CellKernel<V>>(
    col: usize,
    prev: &[ScoreCell<V>],
    next: &mut [ScoreCell<V>],
    traces: &mut [TraceCell],
    kernel: &mut K,
) {
    if col == 0 {
        store::<V, T>(next, traces, 0, kernel.origin());
        for row in 1..next.len() {
            let out = kernel.first_column(row, next[row - 1].up);
            store::<V, T>(next, traces, row, out);
        }
    } else {
        store::<V, T>(next, traces, 0, kernel.first_row(col, prev[0].left));
        for row in 1..next.len() {
            let out = kernel.inner(row, col, prev[row - 1].current, next[row - 1].up, prev[row].left);
            store::<V, T>(next, traces, row, out);
        }
    }
}
