use super::*;
use crate::pool::cell_count;
use std::marker::PhantomData;

/// Every cell of the matrix, stored column-major.
#[derive(Debug)]
pub struct FullMatrix<V, T> {
    dims: MatrixDims,
    cells: Vec<ScoreCell<V>>,
    /// Empty unless `T::ENABLED`.
    traces: Vec<TraceCell>,
    last_col: Option<usize>,
    _trace: PhantomData<T>,
}

impl<V, T> Default for FullMatrix<V, T> {
    fn default() -> Self {
        Self {
            dims: MatrixDims::default(),
            cells: Vec::new(),
            traces: Vec::new(),
            last_col: None,
            _trace: PhantomData,
        }
    }
}

impl<V: DpScore, T: TraceMode> FullMatrix<V, T> {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    fn column_range(&self, col: usize) -> Range<usize> {
        col * self.dims.rows..(col + 1) * self.dims.rows
    }

    fn computed(&self, col: usize) -> bool {
        self.last_col.map_or(false, |last| col <= last)
    }
}

impl<V: DpScore, T: TraceMode> MatrixStorage<V> for FullMatrix<V, T> {
    fn resize(&mut self, dims: MatrixDims, lowest: V, pool: &mut MatrixPool<V>) -> Result<()> {
        let n = cell_count(dims.rows, dims.cols)?;
        self.release(pool);
        self.dims = dims;
        self.last_col = None;
        self.cells = pool.take_cells(n, ScoreCell::splat(lowest), dims.rows, dims.cols)?;
        if T::ENABLED {
            self.traces = pool.take_traces(n, dims.rows, dims.cols)?;
        }
        Ok(())
    }

    fn dims(&self) -> MatrixDims {
        self.dims
    }

    fn compute_column<K: CellKernel<V>>(&mut self, col: usize, kernel: &mut K) {
        let range = self.column_range(col);
        let (before, rest) = self.cells.split_at_mut(range.start);
        let prev = if col == 0 {
            &before[..0]
        } else {
            &before[range.start - self.dims.rows..]
        };
        let traces: &mut [TraceCell] = if T::ENABLED {
            &mut self.traces[range.clone()]
        } else {
            &mut []
        };
        compute_full_column::<V, T, K>(col, prev, &mut rest[..self.dims.rows], traces, kernel);
        self.last_col = Some(col);
    }

    fn column(&self) -> ColumnView<'_, V> {
        let col = self.last_col.unwrap_or(0);
        let range = if self.last_col.is_some() {
            self.column_range(col)
        } else {
            0..0
        };
        ColumnView {
            col,
            first_row: 0,
            traces: T::ENABLED.then(|| &self.traces[range.clone()]),
            cells: &self.cells[range],
        }
    }

    fn at(&self, row: usize, col: usize) -> Result<Option<ScoreCell<V>>> {
        self.dims.check(Coordinate::new(row, col))?;
        Ok(self
            .computed(col)
            .then(|| self.cells[col * self.dims.rows + row]))
    }

    fn trace_at(&self, row: usize, col: usize) -> Result<Option<TraceCell>> {
        self.dims.check(Coordinate::new(row, col))?;
        if !T::ENABLED {
            return Err(AlignError::TraceUnavailable);
        }
        Ok(self
            .computed(col)
            .then(|| self.traces[col * self.dims.rows + row]))
    }

    fn release(&mut self, pool: &mut MatrixPool<V>) {
        pool.put_cells(std::mem::take(&mut self.cells));
        pool.put_traces(std::mem::take(&mut self.traces));
        self.last_col = None;
    }
}
