//! Recovers an optimal alignment from the stored trace directions.
//!
//! The walk is a small state machine over the three Gotoh states. In the
//! match state the `current` directions decide; a vertical (horizontal) gap
//! is followed through the `up` (`left`) directions of the cells above (to
//! the left) until the cell where the gap was opened. Ties prefer the
//! diagonal over up over left, and opening a gap over extending it.
use crate::storage::MatrixStorage;
use dp_types::*;
use log::trace;
use TraceDirections as D;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Match,
    /// Following `up` scores: the next step consumes a query symbol.
    Vertical,
    /// Following `left` scores: the next step consumes a reference symbol.
    Horizontal,
}

/// An alignment of `reference[begin.col..end.col]` and `query[begin.row..end.row]`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Alignment {
    pub cigar: Cigar,
    pub begin: Coordinate,
    pub end: Coordinate,
}

impl Alignment {
    /// The aligned region of both sequences, with `-` for gaps.
    pub fn aligned_sequences(&self, reference: Seq, query: Seq) -> Result<(Sequence, Sequence)> {
        self.cigar.to_alignment(
            &reference[self.begin.col..self.end.col],
            &query[self.begin.row..self.end.row],
        )
    }

    /// The score of the alignment under the given scheme.
    pub fn score(&self, scoring: &ScoringScheme, gaps: &GapScheme, reference: Seq, query: Seq) -> Result<Score> {
        self.cigar.score(
            scoring,
            gaps,
            &reference[self.begin.col..self.end.col],
            &query[self.begin.row..self.end.row],
        )
    }
}

/// Walks back from `end` until a cell without predecessor.
pub fn traceback<S: MatrixStorage<Score>>(
    storage: &S,
    reference: Seq,
    query: Seq,
    end: Coordinate,
    extended: bool,
) -> Result<Alignment> {
    let left_band = AlignError::InvalidAlignment("traceback left the computed cells");
    let at = |row: usize, col: usize| -> Result<TraceCell> {
        storage.trace_at(row, col)?.ok_or(left_band.clone())
    };
    let step_back = |x: usize| {
        x.checked_sub(1)
            .ok_or(AlignError::InvalidAlignment("traceback ran past the matrix edge"))
    };

    let (mut row, mut col) = (end.row, end.col);
    let mut state = State::Match;
    let mut cigar = Cigar::default();
    loop {
        match state {
            State::Match => {
                let t = at(row, col)?.current;
                if t.contains(D::DIAGONAL) {
                    row = step_back(row)?;
                    col = step_back(col)?;
                    let op = if !extended {
                        CigarOp::Match
                    } else if reference[col] == query[row] {
                        CigarOp::Equal
                    } else {
                        CigarOp::Mismatch
                    };
                    cigar.push_op(op);
                } else if t.contains(D::UP) {
                    state = State::Vertical;
                } else if t.contains(D::LEFT) {
                    state = State::Horizontal;
                } else {
                    break;
                }
            }
            State::Vertical => {
                row = step_back(row)?;
                cigar.push_op(CigarOp::Ins);
                let t = at(row, col)?.up;
                if t.contains(D::UP_OPEN) {
                    state = State::Match;
                } else if !t.contains(D::UP) {
                    break;
                }
            }
            State::Horizontal => {
                col = step_back(col)?;
                cigar.push_op(CigarOp::Del);
                let t = at(row, col)?.left;
                if t.contains(D::LEFT_OPEN) {
                    state = State::Match;
                } else if !t.contains(D::LEFT) {
                    break;
                }
            }
        }
    }
    cigar.reverse();
    let begin = Coordinate::new(row, col);
    trace!("Traceback from {end} to {begin}: {cigar}");
    Ok(Alignment { cigar, begin, end })
}
