//! A textbook three-matrix Gotoh implementation in `i64`, used as the oracle for all tests.
use dp_types::*;

const NEG_INF: i64 = i64::MIN / 4;

/// The score and end cell of an optimal alignment, and the full matrix of best scores.
#[derive(Clone, Debug)]
pub struct ReferenceAlignment {
    pub score: Score,
    pub end: Coordinate,
    /// `h[row][col]`; `None` outside the band.
    pub h: Vec<Vec<Option<i64>>>,
}

impl ReferenceAlignment {
    pub fn at(&self, row: usize, col: usize) -> Option<i64> {
        self.h[row][col]
    }
}

fn end_cell(method: &Method, dims: MatrixDims, row: usize, col: usize) -> bool {
    let sink = dims.sink();
    match method {
        Method::Local => true,
        Method::Global(free) => {
            (row == sink.row && (col == sink.col || free.last_row()))
                || (col == sink.col && free.last_col())
        }
    }
}

/// Aligns `reference` (columns) against `query` (rows).
///
/// Ties between end cells keep the first one in column-major order.
pub fn align(
    reference: Seq,
    query: Seq,
    method: &Method,
    scoring: &ScoringScheme,
    gaps: &GapScheme,
    band: Option<Band>,
) -> ReferenceAlignment {
    let dims = MatrixDims::for_pair(reference, query);
    let (rows, cols) = (dims.rows, dims.cols);
    let local = method.is_local();
    let free = method.free_ends();
    // A gap of length k scores `open + k * ext`.
    let open = gaps.open as i64;
    let ext = gaps.extension as i64;
    let in_band = |r: usize, c: usize| band.map_or(true, |b| b.contains(r, c));
    let clamp = |x: i64| if local { x.max(0) } else { x };

    // Best overall, best ending in a horizontal gap, best ending in a vertical gap.
    let mut h = vec![vec![NEG_INF; cols]; rows];
    let mut e = vec![vec![NEG_INF; cols]; rows];
    let mut f = vec![vec![NEG_INF; cols]; rows];
    for c in 0..cols {
        for r in 0..rows {
            if !in_band(r, c) {
                continue;
            }
            h[r][c] = match (r, c) {
                (0, 0) => 0,
                (0, c) => {
                    if local || free.first_row() {
                        0
                    } else {
                        open + ext * c as i64
                    }
                }
                (r, 0) => {
                    if local || free.first_col() {
                        0
                    } else {
                        open + ext * r as i64
                    }
                }
                (r, c) => {
                    e[r][c] = (h[r][c - 1] + open + ext).max(e[r][c - 1] + ext);
                    f[r][c] = (h[r - 1][c] + open + ext).max(f[r - 1][c] + ext);
                    let s = scoring.score(reference[c - 1], query[r - 1]) as i64;
                    clamp((h[r - 1][c - 1] + s).max(e[r][c]).max(f[r][c]))
                }
            };
        }
    }

    let mut best: Option<(i64, Coordinate)> = None;
    for c in 0..cols {
        for r in 0..rows {
            if !in_band(r, c) || !end_cell(method, dims, r, c) {
                continue;
            }
            if best.map_or(true, |(s, _)| h[r][c] > s) {
                best = Some((h[r][c], Coordinate::new(r, c)));
            }
        }
    }
    let (score, end) = best.unwrap_or((NEG_INF, dims.sink()));
    ReferenceAlignment {
        score: score as Score,
        end,
        h: (0..rows)
            .map(|r| {
                (0..cols)
                    .map(|c| in_band(r, c).then_some(h[r][c]))
                    .collect()
            })
            .collect(),
    }
}

/// The score `bio` computes for the same problem, for the methods it supports.
pub fn bio_score(reference: Seq, query: Seq, method: &Method, scoring: &ScoringScheme, gaps: &GapScheme) -> Option<Score> {
    let ScoringScheme::Simple {
        match_score,
        mismatch_score,
    } = *scoring
    else {
        return None;
    };
    let score = move |a: u8, b: u8| if a == b { match_score } else { mismatch_score };
    let mut aligner = bio::alignment::pairwise::Aligner::with_capacity(
        reference.len(),
        query.len(),
        gaps.open,
        gaps.extension,
        score,
    );
    match method {
        Method::Local => Some(aligner.local(reference, query).score),
        Method::Global(free) if *free == FreeEndGaps::none() => Some(aligner.global(reference, query).score),
        Method::Global(_) => None,
    }
}
