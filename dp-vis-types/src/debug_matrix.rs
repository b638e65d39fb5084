//! A [`ColumnObserver`] that records every column into a full matrix.
use crate::{ColumnObserver, ColumnView};
use dp_types::*;
use std::fmt;

/// Scores at or below this value are shown as `-inf`.
const MINUS_INF: Score = Score::MIN / 2;

/// Records the `current` score (and trace, when available) of every cell the
/// engine computes. Cells that were never computed, e.g. outside a band, stay
/// `None`.
#[derive(Clone, Debug, Default)]
pub struct DebugMatrix {
    dims: MatrixDims,
    reference: Sequence,
    query: Sequence,
    /// Column-major.
    scores: Vec<Option<Score>>,
    /// Column-major. Empty when the engine did not store traces.
    traces: Vec<Option<TraceCell>>,
    columns_seen: usize,
}

impl DebugMatrix {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn dims(&self) -> MatrixDims {
        self.dims
    }

    /// The number of columns reported so far.
    pub fn columns_seen(&self) -> usize {
        self.columns_seen
    }

    pub fn has_traces(&self) -> bool {
        !self.traces.is_empty()
    }

    fn index(&self, row: usize, col: usize) -> Result<usize> {
        self.dims.check(Coordinate::new(row, col))?;
        Ok(col * self.dims.rows + row)
    }

    /// The recorded score of a cell. `None` when it was never computed.
    pub fn at(&self, row: usize, col: usize) -> Result<Option<Score>> {
        let i = self.index(row, col)?;
        Ok(self.scores[i])
    }

    pub fn trace_at(&self, row: usize, col: usize) -> Result<Option<TraceCell>> {
        let i = self.index(row, col)?;
        if self.traces.is_empty() {
            return Err(AlignError::TraceUnavailable);
        }
        Ok(self.traces[i])
    }

    /// All recorded scores of one column, top to bottom.
    pub fn column_scores(&self, col: usize) -> Result<&[Option<Score>]> {
        let start = self.index(0, col)?;
        Ok(&self.scores[start..start + self.dims.rows])
    }

    fn write_grid<T>(
        &self,
        f: &mut fmt::Formatter<'_>,
        get: impl Fn(usize, usize) -> Option<T>,
        show: impl Fn(T) -> String,
    ) -> fmt::Result {
        write!(f, "{:>2}{:>6}", "", "")?;
        for &c in &self.reference {
            write!(f, "{:>6}", c as char)?;
        }
        writeln!(f)?;
        for row in 0..self.dims.rows {
            let label = if row == 0 {
                ' '
            } else {
                self.query[row - 1] as char
            };
            write!(f, "{label:>2}")?;
            for col in 0..self.dims.cols {
                match get(row, col) {
                    Some(v) => write!(f, "{:>6}", show(v))?,
                    None => write!(f, "{:>6}", "")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl ColumnObserver for DebugMatrix {
    fn start(&mut self, dims: MatrixDims, reference: Seq, query: Seq) {
        let cells = dims.rows * dims.cols;
        *self = DebugMatrix {
            dims,
            reference: reference.to_vec(),
            query: query.to_vec(),
            scores: vec![None; cells],
            traces: Vec::new(),
            columns_seen: 0,
        };
    }

    fn column(&mut self, view: ColumnView<'_>) {
        let rows = self.dims.rows;
        let offset = view.col * rows + view.first_row;
        for (i, cell) in view.cells.iter().enumerate() {
            self.scores[offset + i] = Some(cell.current);
        }
        if let Some(traces) = view.traces {
            if self.traces.is_empty() {
                self.traces = vec![None; self.scores.len()];
            }
            for (i, &t) in traces.iter().enumerate() {
                self.traces[offset + i] = Some(t);
            }
        }
        self.columns_seen += 1;
    }
}

/// The score matrix, followed by the trace matrix when traces were recorded.
impl fmt::Display for DebugMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let idx = |row: usize, col: usize| col * self.dims.rows + row;
        self.write_grid(
            f,
            |row, col| self.scores[idx(row, col)],
            |s| {
                if s <= MINUS_INF {
                    "-inf".to_string()
                } else {
                    s.to_string()
                }
            },
        )?;
        if self.has_traces() {
            writeln!(f)?;
            self.write_grid(
                f,
                |row, col| self.traces[idx(row, col)],
                |t| t.current.to_string(),
            )?;
        }
        Ok(())
    }
}
