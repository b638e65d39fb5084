use super::*;
use crate::{band::BandCoordinateMapper, pool::cell_count};
use std::marker::PhantomData;

/// A single column of `band_size` slots, updated in place, plus a sentinel
/// slot at the bottom that always holds the lowest score.
///
/// Each slot follows one diagonal (see [`BandCoordinateMapper`]): before slot
/// `i` is overwritten it holds the diagonal predecessor, and slot `i + 1`
/// still holds the left predecessor. The sentinel is the left predecessor of
/// the bottom slot, which lies outside the band.
///
/// With traces, the traces of all band cells are kept, `band_size` per column.
#[derive(Debug)]
pub struct OneColumnBanded<V, T> {
    mapper: BandCoordinateMapper,
    column: Vec<ScoreCell<V>>,
    traces: Vec<TraceCell>,
    last_col: Option<usize>,
    _trace: PhantomData<T>,
}

impl<V: DpScore, T: TraceMode> OneColumnBanded<V, T> {
    pub fn new(mapper: BandCoordinateMapper) -> Self {
        Self {
            mapper,
            column: Vec::new(),
            traces: Vec::new(),
            last_col: None,
            _trace: PhantomData,
        }
    }

    pub fn mapper(&self) -> &BandCoordinateMapper {
        &self.mapper
    }
}

impl<V: DpScore, T: TraceMode> MatrixStorage<V> for OneColumnBanded<V, T> {
    fn resize(&mut self, dims: MatrixDims, lowest: V, pool: &mut MatrixPool<V>) -> Result<()> {
        debug_assert_eq!(dims, self.mapper.dims());
        let band_size = self.mapper.band_size();
        let slots = band_size.checked_add(1).ok_or(AlignError::AllocationError {
            rows: dims.rows,
            cols: dims.cols,
            cells: usize::MAX,
        })?;
        self.release(pool);
        self.column = pool.take_cells(slots, ScoreCell::splat(lowest), dims.rows, dims.cols)?;
        if T::ENABLED {
            let n = cell_count(band_size, dims.cols)?;
            self.traces = pool.take_traces(n, dims.rows, dims.cols)?;
        }
        Ok(())
    }

    fn dims(&self) -> MatrixDims {
        self.mapper.dims()
    }

    fn columns(&self) -> Range<usize> {
        self.mapper.column_range()
    }

    fn compute_column<K: CellKernel<V>>(&mut self, col: usize, kernel: &mut K) {
        let slots = self.mapper.slot_range(col);
        let band_size = self.mapper.band_size();
        let traces: &mut [TraceCell] = if T::ENABLED {
            &mut self.traces[col * band_size..(col + 1) * band_size]
        } else {
            &mut []
        };
        let column = &mut self.column;
        for i in slots.clone() {
            let row = self.mapper.row(col, i);
            let out = if row == 0 {
                if col == 0 {
                    kernel.origin()
                } else if self.mapper.contains(0, col - 1) {
                    kernel.first_row(col, column[i + 1].left)
                } else {
                    // The band enters through the free first row.
                    kernel.first_row(col, V::zero())
                }
            } else if col == 0 {
                if i > slots.start {
                    kernel.first_column(row, column[i - 1].up)
                } else {
                    // The band enters through the free first column.
                    kernel.first_column(row, V::zero())
                }
            } else if i == slots.start {
                kernel.band_first(row, col, column[i].current, column[i + 1].left)
            } else {
                kernel.inner(row, col, column[i].current, column[i - 1].up, column[i + 1].left)
            };
            store::<V, T>(column, traces, i, out);
        }
        self.last_col = Some(col);
    }

    fn column(&self) -> ColumnView<'_, V> {
        let Some(col) = self.last_col else {
            return ColumnView {
                col: 0,
                first_row: 0,
                cells: &[],
                traces: None,
            };
        };
        let slots = self.mapper.slot_range(col);
        let base = col * self.mapper.band_size();
        ColumnView {
            col,
            first_row: self.mapper.row(col, slots.start),
            cells: &self.column[slots.clone()],
            traces: T::ENABLED.then(|| &self.traces[base + slots.start..base + slots.end]),
        }
    }

    fn at(&self, row: usize, col: usize) -> Result<Option<ScoreCell<V>>> {
        self.dims().check(Coordinate::new(row, col))?;
        if self.last_col != Some(col) {
            return Ok(None);
        }
        Ok(self.mapper.slot(row, col).map(|i| self.column[i]))
    }

    fn trace_at(&self, row: usize, col: usize) -> Result<Option<TraceCell>> {
        self.dims().check(Coordinate::new(row, col))?;
        if !T::ENABLED {
            return Err(AlignError::TraceUnavailable);
        }
        if self.last_col.map_or(true, |last| col > last) {
            return Ok(None);
        }
        Ok(self
            .mapper
            .slot(row, col)
            .map(|i| self.traces[col * self.mapper.band_size() + i]))
    }

    fn release(&mut self, pool: &mut MatrixPool<V>) {
        pool.put_cells(std::mem::take(&mut self.column));
        pool.put_traces(std::mem::take(&mut self.traces));
        self.last_col = None;
    }
}
