//! Gotoh's affine gap recurrence, collapsed into one cell of `current`/`up`/`left` scores.
//!
//! With `go = open + extension` and `ge = extension`:
//! ```text
//! current  = max(diag + s, up_in, left_in)     (local: max(current, 0))
//! up       = max(current + go, up_in + ge)
//! left     = max(current + go, left_in + ge)
//! ```
//! Cells on the first row and column only have a horizontal, resp. vertical,
//! predecessor. Along a free leading edge the gap is carried without cost.
use crate::score::DpScore;
use dp_types::*;

/// Whether trace directions are computed and stored.
pub trait TraceMode: Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    const ENABLED: bool;
}

#[derive(Clone, Copy, Default, Debug)]
pub struct WithTrace;
#[derive(Clone, Copy, Default, Debug)]
pub struct NoTrace;

impl TraceMode for WithTrace {
    const ENABLED: bool = true;
}
impl TraceMode for NoTrace {
    const ENABLED: bool = false;
}

#[derive(Clone, Copy, Debug)]
pub struct AffineRecurrence<V> {
    gap_open: V,
    gap_extend: V,
    lowest: V,
    local: bool,
    free: FreeEndGaps,
}

impl<V: DpScore> AffineRecurrence<V> {
    pub fn new(method: &Method, gaps: &GapScheme) -> Self {
        Self {
            gap_open: V::splat(gaps.gap_open()),
            gap_extend: V::splat(gaps.gap_extend()),
            lowest: V::lowest_viable(gaps.gap_open(), gaps.gap_extend()),
            local: method.is_local(),
            free: method.free_ends(),
        }
    }

    /// The score of unreachable states.
    #[inline]
    pub fn lowest(&self) -> V {
        self.lowest
    }

    #[inline]
    fn clamp(&self, v: V) -> V {
        if self.local {
            v.vmax(V::zero())
        } else {
            v
        }
    }

    #[inline]
    pub fn origin(&self) -> ScoreCell<V> {
        let open = |free: bool| if free { V::zero() } else { self.gap_open };
        ScoreCell {
            current: V::zero(),
            up: open(self.free.first_col()),
            left: open(self.free.first_row()),
        }
    }

    /// A cell in column 0 below the origin.
    #[inline]
    pub fn first_column(&self, up_in: V) -> ScoreCell<V> {
        let current = self.clamp(up_in);
        ScoreCell {
            current,
            up: if self.free.first_col() {
                up_in
            } else {
                current
                    .sat_add(self.gap_open)
                    .vmax(up_in.sat_add(self.gap_extend))
            },
            left: current.sat_add(self.gap_open),
        }
    }

    /// A cell in row 0 right of the origin.
    #[inline]
    pub fn first_row(&self, left_in: V) -> ScoreCell<V> {
        let current = self.clamp(left_in);
        ScoreCell {
            current,
            up: current.sat_add(self.gap_open),
            left: if self.free.first_row() {
                left_in
            } else {
                current
                    .sat_add(self.gap_open)
                    .vmax(left_in.sat_add(self.gap_extend))
            },
        }
    }

    /// `diag` already includes the substitution score.
    #[inline]
    pub fn inner(&self, diag: V, up_in: V, left_in: V) -> ScoreCell<V> {
        let current = self.clamp(diag.vmax(up_in).vmax(left_in));
        let open = current.sat_add(self.gap_open);
        ScoreCell {
            current,
            up: open.vmax(up_in.sat_add(self.gap_extend)),
            left: open.vmax(left_in.sat_add(self.gap_extend)),
        }
    }
}

/// The directions among `candidates` that reach `best`.
#[inline]
fn directions<const N: usize>(best: Score, candidates: [(Score, TraceDirections); N]) -> TraceDirections {
    candidates
        .iter()
        .filter(|(s, _)| *s == best)
        .fold(TraceDirections::NONE, |acc, (_, d)| acc | *d)
}

/// The same recurrence, additionally returning which predecessors reach each score.
impl AffineRecurrence<Score> {
    /// Local cells that restart at 0 have no predecessor.
    #[inline]
    fn current_trace(&self, current: Score, candidates: &[(Score, TraceDirections)]) -> TraceDirections {
        let best = candidates.iter().map(|c| c.0).max().unwrap_or(Score::MIN);
        if self.local && best <= 0 {
            return TraceDirections::NONE;
        }
        candidates
            .iter()
            .filter(|(s, _)| *s == current)
            .fold(TraceDirections::NONE, |acc, (_, d)| acc | *d)
    }

    pub fn origin_traced(&self) -> (ScoreCell<Score>, TraceCell) {
        let flag = |free: bool, carry, open| if free { carry } else { open };
        (
            self.origin(),
            TraceCell {
                current: TraceDirections::NONE,
                up: flag(
                    self.free.first_col(),
                    TraceDirections::CARRY_UP_OPEN,
                    TraceDirections::UP_OPEN,
                ),
                left: flag(
                    self.free.first_row(),
                    TraceDirections::CARRY_LEFT_OPEN,
                    TraceDirections::LEFT_OPEN,
                ),
            },
        )
    }

    pub fn first_column_traced(&self, up_in: Score) -> (ScoreCell<Score>, TraceCell) {
        let cell = self.first_column(up_in);
        let free = self.free.first_col();
        let trace = TraceCell {
            current: if free {
                TraceDirections::NONE
            } else {
                self.current_trace(cell.current, &[(up_in, TraceDirections::UP)])
            },
            up: if free {
                TraceDirections::CARRY_UP_OPEN
            } else {
                directions(
                    cell.up,
                    [
                        (cell.current.sat_add(self.gap_open), TraceDirections::UP_OPEN),
                        (up_in.sat_add(self.gap_extend), TraceDirections::UP),
                    ],
                )
            },
            left: TraceDirections::LEFT_OPEN,
        };
        (cell, trace)
    }

    pub fn first_row_traced(&self, left_in: Score) -> (ScoreCell<Score>, TraceCell) {
        let cell = self.first_row(left_in);
        let free = self.free.first_row();
        let trace = TraceCell {
            current: if free {
                TraceDirections::NONE
            } else {
                self.current_trace(cell.current, &[(left_in, TraceDirections::LEFT)])
            },
            up: TraceDirections::UP_OPEN,
            left: if free {
                TraceDirections::CARRY_LEFT_OPEN
            } else {
                directions(
                    cell.left,
                    [
                        (cell.current.sat_add(self.gap_open), TraceDirections::LEFT_OPEN),
                        (left_in.sat_add(self.gap_extend), TraceDirections::LEFT),
                    ],
                )
            },
        };
        (cell, trace)
    }

    pub fn inner_traced(&self, diag: Score, up_in: Score, left_in: Score) -> (ScoreCell<Score>, TraceCell) {
        let cell = self.inner(diag, up_in, left_in);
        let open = cell.current.sat_add(self.gap_open);
        let trace = TraceCell {
            current: self.current_trace(
                cell.current,
                &[
                    (diag, TraceDirections::DIAGONAL),
                    (up_in, TraceDirections::UP),
                    (left_in, TraceDirections::LEFT),
                ],
            ),
            up: directions(
                cell.up,
                [
                    (open, TraceDirections::UP_OPEN),
                    (up_in.sat_add(self.gap_extend), TraceDirections::UP),
                ],
            ),
            left: directions(
                cell.left,
                [
                    (open, TraceDirections::LEFT_OPEN),
                    (left_in.sat_add(self.gap_extend), TraceDirections::LEFT),
                ],
            ),
        };
        (cell, trace)
    }
}
