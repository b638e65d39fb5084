//! Maps the cells of a diagonal band onto a single column of `band_size` slots.
//!
//! Slot `i` of column `c` holds row `c - band_col_index + i`, so a diagonal
//! keeps its slot from one column to the next: the diagonal predecessor of
//! slot `i` is slot `i` of the previous column, and the left predecessor is
//! slot `i + 1`.
use dp_types::*;
use std::ops::Range;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BandCoordinateMapper {
    /// The upper diagonal, clipped to the matrix. Can be negative.
    band_col_index: i64,
    band_size: usize,
    lower: i64,
    upper: i64,
    dims: MatrixDims,
}

impl BandCoordinateMapper {
    /// Clips `band` to the matrix and checks that an alignment can pass through it.
    pub fn new(band: Band, dims: MatrixDims, method: &Method) -> Result<Self> {
        band.validate()?;
        let rows = dims.rows as i64;
        let cols = dims.cols as i64;
        let err = |reason| AlignError::InvalidBandConfiguration {
            lower: band.lower_diagonal,
            upper: band.upper_diagonal,
            reason,
        };

        let (lower, upper) = (band.lower_diagonal as i64, band.upper_diagonal as i64);
        if lower > cols - 1 || upper < -(rows - 1) {
            return Err(err("the band lies outside the matrix"));
        }

        if let Method::Global(free) = method {
            if upper < 0 && !free.first_col() {
                return Err(err(
                    "the band starts below the origin, but the first column is not free",
                ));
            }
            if lower > 0 && !free.first_row() {
                return Err(err(
                    "the band starts right of the origin, but the first row is not free",
                ));
            }
            let sink = cols - rows;
            if upper < sink && !free.last_row() {
                return Err(err(
                    "the band ends before the sink, but the last row is not free",
                ));
            }
            if lower > sink && !free.last_col() {
                return Err(err(
                    "the band ends above the sink, but the last column is not free",
                ));
            }
        }

        let upper = upper.min(cols - 1);
        let lower = lower.max(-(rows - 1));
        Ok(Self {
            band_col_index: upper,
            band_size: (upper - lower + 1) as usize,
            lower,
            upper,
            dims,
        })
    }

    /// The number of slots per column, excluding the sentinel.
    pub fn band_size(&self) -> usize {
        self.band_size
    }

    pub fn band_col_index(&self) -> i64 {
        self.band_col_index
    }

    pub fn dims(&self) -> MatrixDims {
        self.dims
    }

    /// The columns that intersect the band.
    pub fn column_range(&self) -> Range<usize> {
        let start = self.lower.max(0) as usize;
        let end = (self.dims.rows as i64 + self.upper).min(self.dims.cols as i64) as usize;
        start..end
    }

    /// The slots of column `col` that lie inside the matrix: `row_begin..row_end`.
    pub fn slot_range(&self, col: usize) -> Range<usize> {
        let c = col as i64;
        let band_size = self.band_size as i64;
        let row_begin = (self.band_col_index - c).max(0);
        let row_end_index = c - self.band_col_index + band_size;
        let row_end = band_size - (row_end_index - self.dims.rows as i64).max(0);
        assert!(
            0 <= row_begin && row_begin < row_end && row_end <= band_size + 1,
            "column {col} does not intersect the band"
        );
        row_begin as usize..row_end as usize
    }

    /// The row held by `slot` in column `col`.
    #[inline]
    pub fn row(&self, col: usize, slot: usize) -> usize {
        (col as i64 - self.band_col_index + slot as i64) as usize
    }

    /// The slot holding `(row, col)`, or `None` when the cell lies outside the band.
    pub fn slot(&self, row: usize, col: usize) -> Option<usize> {
        if !self.contains(row, col) {
            return None;
        }
        Some((row as i64 - col as i64 + self.band_col_index) as usize)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        let d = col as i64 - row as i64;
        row < self.dims.rows && col < self.dims.cols && self.lower <= d && d <= self.upper
    }
}
