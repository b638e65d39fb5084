//! Reuse of matrix buffers between alignments.
use dp_types::*;
use log::debug;

/// Buffers kept per kind. Larger pools mostly hold memory nobody asks for.
const MAX_POOLED: usize = 4;

/// Caller-owned recycler for the vectors backing a matrix.
///
/// Each alignment draws its buffers from the pool and hands them back when it
/// is done. A pool is `Send`, but it is meant to be owned by a single worker:
/// parallel batches create one pool per thread.
#[derive(Debug)]
pub struct MatrixPool<V> {
    cells: Vec<Vec<ScoreCell<V>>>,
    traces: Vec<Vec<TraceCell>>,
}

impl<V> Default for MatrixPool<V> {
    fn default() -> Self {
        Self {
            cells: Vec::new(),
            traces: Vec::new(),
        }
    }
}

/// `rows * cols`, or an [`AlignError::AllocationError`] on overflow.
pub fn cell_count(rows: usize, cols: usize) -> Result<usize> {
    rows.checked_mul(cols).ok_or(AlignError::AllocationError {
        rows,
        cols,
        cells: usize::MAX,
    })
}

/// Takes the buffer with the largest capacity and fills it with `len` copies of `fill`.
fn take<T: Clone>(pool: &mut Vec<Vec<T>>, len: usize, fill: T, rows: usize, cols: usize) -> Result<Vec<T>> {
    let largest = pool
        .iter()
        .enumerate()
        .max_by_key(|(_, v)| v.capacity())
        .map(|(i, _)| i);
    let mut v = largest.map(|i| pool.swap_remove(i)).unwrap_or_default();
    v.clear();
    v.try_reserve_exact(len).map_err(|_| AlignError::AllocationError {
        rows,
        cols,
        cells: len,
    })?;
    v.resize(len, fill);
    Ok(v)
}

fn put<T>(pool: &mut Vec<Vec<T>>, v: Vec<T>) {
    if v.capacity() == 0 {
        return;
    }
    if pool.len() >= MAX_POOLED {
        debug!("Discarding a pooled buffer of {} cells", v.capacity());
        return;
    }
    pool.push(v);
}

impl<V: Copy> MatrixPool<V> {
    pub fn new() -> Self {
        Self::default()
    }

    /// A buffer of `len` cells set to `fill`. `rows` and `cols` are only used for errors.
    pub fn take_cells(&mut self, len: usize, fill: ScoreCell<V>, rows: usize, cols: usize) -> Result<Vec<ScoreCell<V>>> {
        take(&mut self.cells, len, fill, rows, cols)
    }

    pub fn take_traces(&mut self, len: usize, rows: usize, cols: usize) -> Result<Vec<TraceCell>> {
        take(&mut self.traces, len, TraceCell::NONE, rows, cols)
    }

    pub fn put_cells(&mut self, v: Vec<ScoreCell<V>>) {
        put(&mut self.cells, v);
    }

    pub fn put_traces(&mut self, v: Vec<TraceCell>) {
        put(&mut self.traces, v);
    }

    /// The number of buffers currently held.
    pub fn len(&self) -> usize {
        self.cells.len() + self.traces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
