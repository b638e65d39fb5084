use super::*;
use crate::{pool::cell_count, recurrence::NoTrace};

/// Only the current and the previous column. Scores only.
#[derive(Debug)]
pub struct OneColumnRolling<V> {
    dims: MatrixDims,
    current: Vec<ScoreCell<V>>,
    previous: Vec<ScoreCell<V>>,
    last_col: Option<usize>,
}

impl<V> Default for OneColumnRolling<V> {
    fn default() -> Self {
        Self {
            dims: MatrixDims::default(),
            current: Vec::new(),
            previous: Vec::new(),
            last_col: None,
        }
    }
}

impl<V: DpScore> OneColumnRolling<V> {
    pub fn new() -> Self {
        Self::default()
    }
}

impl<V: DpScore> MatrixStorage<V> for OneColumnRolling<V> {
    fn resize(&mut self, dims: MatrixDims, lowest: V, pool: &mut MatrixPool<V>) -> Result<()> {
        cell_count(2, dims.rows)?;
        self.release(pool);
        self.dims = dims;
        let fill = ScoreCell::splat(lowest);
        self.current = pool.take_cells(dims.rows, fill, dims.rows, dims.cols)?;
        self.previous = pool.take_cells(dims.rows, fill, dims.rows, dims.cols)?;
        Ok(())
    }

    fn dims(&self) -> MatrixDims {
        self.dims
    }

    fn compute_column<K: CellKernel<V>>(&mut self, col: usize, kernel: &mut K) {
        if col > 0 {
            std::mem::swap(&mut self.previous, &mut self.current);
        }
        let prev = if col == 0 { &[][..] } else { &self.previous[..] };
        compute_full_column::<V, NoTrace, K>(col, prev, &mut self.current, &mut [], kernel);
        self.last_col = Some(col);
    }

    fn column(&self) -> ColumnView<'_, V> {
        ColumnView {
            col: self.last_col.unwrap_or(0),
            first_row: 0,
            cells: if self.last_col.is_some() {
                &self.current[..]
            } else {
                &[][..]
            },
            traces: None,
        }
    }

    fn at(&self, row: usize, col: usize) -> Result<Option<ScoreCell<V>>> {
        self.dims.check(Coordinate::new(row, col))?;
        Ok(match self.last_col {
            Some(last) if col == last => Some(self.current[row]),
            Some(last) if col + 1 == last => Some(self.previous[row]),
            _ => None,
        })
    }

    fn release(&mut self, pool: &mut MatrixPool<V>) {
        pool.put_cells(std::mem::take(&mut self.current));
        pool.put_cells(std::mem::take(&mut self.previous));
        self.last_col = None;
    }
}
