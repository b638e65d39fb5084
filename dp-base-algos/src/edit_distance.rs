//! Unit-cost edit distance with Myers' bit-parallel algorithm.
//!
//! The query is packed into blocks of 64 rows and the matrix is swept one
//! reference symbol (column) at a time. Only vertical differences are stored:
//! bit `i` of `pv` (`mv`) is set when row `i + 1` of a block scores one more
//! (less) than row `i`. With a maximum number of errors only the blocks that
//! can still contain a cell within the limit are computed (Ukkonen's cut-off,
//! as in Edlib).
//!
//! The score is minus the edit distance. Semi-global alignment aligns the
//! whole query somewhere inside the reference; of equally good ends the
//! rightmost one wins. The traceback prefers a vertical gap over a horizontal
//! gap over the diagonal.
use crate::{config::OutputConfig, executor::AlignmentResult, traceback::Alignment};
use dp_types::*;
use log::{debug, trace};
use serde::{Deserialize, Serialize};

/// The type used for all bitvectors.
type B = u64;
/// The number of rows in a block.
const W: usize = B::BITS as usize;
/// The type used for scores and differences.
type D = i64;

/// One step of Myers '99 on a block of `W` rows, as in Edlib.
///
/// `pv`/`mv` hold the vertical differences of the previous column and are
/// replaced by those of the current one. `h0` is the horizontal difference of
/// the cell above the block and `eq` marks the rows whose query symbol equals
/// the current reference symbol.
///
/// Returns the `+1` and `-1` indicators of the horizontal differences of
/// all rows of the block: bit `i` belongs to row `i + 1`.
#[inline(always)]
fn compute_block(pv: &mut B, mv: &mut B, h0: D, eq: B) -> (B, B) {
    // 00..01 if h0 == -1.
    let mh0 = (h0 < 0) as B;
    // 00..01 if h0 == 1.
    let ph0 = (h0 > 0) as B;
    let xv = eq | *mv;
    let eq = eq | mh0;
    // The carry of the addition propagates matches down the block.
    let xh = (((eq & *pv).wrapping_add(*pv)) ^ *pv) | eq;
    let ph = *mv | !(xh | *pv);
    let mh = *pv & xh;

    let ph_in = (ph << 1) | ph0;
    let mh_in = (mh << 1) | mh0;
    *pv = mh_in | !(xv | ph_in);
    *mv = ph_in & xv;
    (ph, mh)
}

/// For every symbol, the rows of each block holding it.
struct Profile {
    blocks: usize,
    masks: Vec<B>,
}

impl Profile {
    fn new(query: Seq) -> Self {
        let blocks = query.len().div_ceil(W);
        let mut masks = vec![0; 256 * blocks];
        for (i, &c) in query.iter().enumerate() {
            masks[c as usize * blocks + i / W] |= 1 << (i % W);
        }
        Self { blocks, masks }
    }

    #[inline(always)]
    fn eq(&self, c: u8, block: usize) -> B {
        self.masks[c as usize * self.blocks + block]
    }
}

/// The vertical differences of every computed column, for the traceback.
struct History {
    blocks: usize,
    rows: usize,
    semi_global: bool,
    pv: Vec<B>,
    mv: Vec<B>,
    /// The last computed block of each column.
    last: Vec<usize>,
}

impl History {
    fn push(&mut self, pv: &[B], mv: &[B], last: usize) {
        self.pv.extend_from_slice(pv);
        self.mv.extend_from_slice(mv);
        self.last.push(last);
    }

    /// The scores of column `col`, `None` below the computed blocks.
    fn column(&self, col: usize) -> Vec<Option<D>> {
        let mut scores = Vec::with_capacity(self.rows + 1);
        let mut s = if self.semi_global { 0 } else { col as D };
        scores.push(Some(s));
        let computed = ((self.last[col] + 1) * W).min(self.rows);
        let words = col * self.blocks;
        for i in 0..computed {
            let (pv, mv) = (self.pv[words + i / W], self.mv[words + i / W]);
            s += ((pv >> (i % W)) & 1) as D - ((mv >> (i % W)) & 1) as D;
            scores.push(Some(s));
        }
        scores.resize(self.rows + 1, None);
        scores
    }
}

/// What to compute, and under which limit.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditDistanceConfig {
    /// Global, or semi-global with free ends in the first sequence only.
    #[serde(default)]
    pub method: Method,
    /// Report no alignment when the distance exceeds this.
    #[serde(default)]
    pub max_errors: Option<u32>,
    #[serde(default)]
    pub output: OutputConfig,
}

impl EditDistanceConfig {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn with_max_errors(mut self, max_errors: u32) -> Self {
        self.max_errors = Some(max_errors);
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }
}

/// Computes edit distances with Myers' bit-parallel algorithm.
///
/// Reports the same scores as a [`crate::PairwiseAligner`] with
/// [`ScoringScheme::hamming`] and `GapScheme::linear(-1)`.
#[derive(Clone, Debug)]
pub struct MyersAligner {
    config: EditDistanceConfig,
    semi_global: bool,
}

impl MyersAligner {
    pub fn new(config: EditDistanceConfig) -> Result<Self> {
        let semi_global = match config.method {
            Method::Global(free) if free == FreeEndGaps::none() => false,
            Method::Global(free) if free == FreeEndGaps::sequence1_ends() => true,
            method => return Err(AlignError::UnsupportedEditDistanceMethod(format!("{method:?}"))),
        };
        Ok(Self { config, semi_global })
    }

    pub fn config(&self) -> &EditDistanceConfig {
        &self.config
    }

    /// Aligns `query` (rows) against `reference` (columns).
    ///
    /// Returns `None` when the distance exceeds `max_errors`. Empty sequences
    /// are allowed.
    pub fn align(&self, reference: Seq, query: Seq) -> Result<Option<AlignmentResult>> {
        let (n, m) = (reference.len(), query.len());
        let k = self.config.max_errors.map_or(D::MAX / 4, D::from);
        if !self.semi_global && (n as D - m as D).abs() > k {
            debug!("Length difference of {n} and {m} exceeds {k} errors");
            return Ok(None);
        }
        if m == 0 {
            return self.empty_query(n).map(Some);
        }

        let profile = Profile::new(query);
        let blocks = profile.blocks;
        let rows_in = |b: usize| if b + 1 == blocks { m - b * W } else { W };
        let mut pv: Vec<B> = vec![!0; blocks];
        let mut mv: Vec<B> = vec![0; blocks];
        // The score of the bottom row of each block.
        let mut bottom: Vec<D> = (0..blocks).map(|b| (b * W + rows_in(b)) as D).collect();
        let mut last = ((k / W as D) as usize).min(blocks - 1);
        let mut history = self.config.output.needs_traceback().then(|| History {
            blocks,
            rows: m,
            semi_global: self.semi_global,
            pv: Vec::new(),
            mv: Vec::new(),
            last: Vec::new(),
        });
        debug!("Edit distance of {n}x{m} in {blocks} blocks, at most {k} errors");

        // Of equally good ends, the later column wins.
        let mut best: Option<(D, usize)> = None;
        for col in 0..=n {
            if col > 0 {
                let c = reference[col - 1];
                let mut h: D = if self.semi_global { 0 } else { 1 };
                for b in 0..=last {
                    h = step(&mut pv[b], &mut mv[b], &mut bottom[b], h, profile.eq(c, b), rows_in(b));
                }
                // A cell below the last block can only be within the limit
                // when the bottom of the last block is, now or one column ago.
                while last + 1 < blocks && (bottom[last] <= k || bottom[last] - h <= k) {
                    let above = bottom[last] - h;
                    last += 1;
                    pv[last] = !0;
                    mv[last] = 0;
                    bottom[last] = above + rows_in(last) as D;
                    h = step(&mut pv[last], &mut mv[last], &mut bottom[last], h, profile.eq(c, last), rows_in(last));
                }
                // Every cell of the block exceeds the limit.
                while last > 0 && bottom[last] >= k + rows_in(last) as D {
                    last -= 1;
                }
                trace!("column {col}: {} active blocks", last + 1);
            }
            if let Some(history) = &mut history {
                history.push(&pv, &mv, last);
            }
            if (self.semi_global || col == n) && last + 1 == blocks {
                let s = bottom[last];
                if s <= k && best.map_or(true, |(b, _)| s <= b) {
                    best = Some((s, col));
                }
            }
        }

        let Some((distance, col)) = best else {
            debug!("No alignment within {k} errors");
            return Ok(None);
        };
        let end = Coordinate::new(m, col);
        let alignment = match &history {
            Some(history) => Some(self.traceback(history, reference, query, end)?),
            None => None,
        };
        Ok(Some(AlignmentResult {
            score: to_score(distance)?,
            end,
            begin: alignment.as_ref().map(|a| a.begin),
            alignment: alignment.filter(|_| self.config.output.alignment),
        }))
    }

    /// Aligning nothing: the reference is either deleted or skipped.
    fn empty_query(&self, n: usize) -> Result<AlignmentResult> {
        let (distance, begin) = if self.semi_global { (0, n) } else { (n, 0) };
        let mut cigar = Cigar::default();
        for _ in 0..distance {
            cigar.push_op(CigarOp::Del);
        }
        let end = Coordinate::new(0, n);
        let alignment = Alignment {
            cigar,
            begin: Coordinate::new(0, begin),
            end,
        };
        let output = self.config.output;
        Ok(AlignmentResult {
            score: to_score(distance as D)?,
            end,
            begin: output.needs_traceback().then_some(alignment.begin),
            alignment: output.alignment.then_some(alignment),
        })
    }

    /// Walks back from `end` over the recomputed scores.
    fn traceback(&self, history: &History, reference: Seq, query: Seq, end: Coordinate) -> Result<Alignment> {
        let extended = self.config.output.extended_cigar;
        let (mut row, mut col) = (end.row, end.col);
        let left_of = |col: usize| if col > 0 { history.column(col - 1) } else { Vec::new() };
        let mut current = history.column(col);
        let mut left = left_of(col);
        let mut cigar = Cigar::default();
        while row > 0 || (!self.semi_global && col > 0) {
            let s = current[row].ok_or(AlignError::InvalidAlignment("traceback left the computed cells"))?;
            if row > 0 && current[row - 1] == Some(s - 1) {
                cigar.push_op(CigarOp::Ins);
                row -= 1;
                continue;
            }
            let op = if col > 0 && left[row] == Some(s - 1) {
                CigarOp::Del
            } else if row > 0 && col > 0 && left[row - 1] == Some(s - (reference[col - 1] != query[row - 1]) as D) {
                row -= 1;
                match (extended, reference[col - 1] == query[row]) {
                    (false, _) => CigarOp::Match,
                    (true, true) => CigarOp::Equal,
                    (true, false) => CigarOp::Mismatch,
                }
            } else {
                return Err(AlignError::InvalidAlignment("traceback found no predecessor"));
            };
            cigar.push_op(op);
            col -= 1;
            current = std::mem::take(&mut left);
            left = left_of(col);
        }
        cigar.reverse();
        Ok(Alignment {
            cigar,
            begin: Coordinate::new(row, col),
            end,
        })
    }
}

/// Advances one block by a column and returns the horizontal difference of its bottom row.
#[inline(always)]
fn step(pv: &mut B, mv: &mut B, bottom: &mut D, h0: D, eq: B, rows: usize) -> D {
    let (ph, mh) = compute_block(pv, mv, h0, eq);
    let hw = ((ph >> (rows - 1)) & 1) as D - ((mh >> (rows - 1)) & 1) as D;
    *bottom += hw;
    hw
}

fn to_score(distance: D) -> Result<Score> {
    Score::try_from(-distance).map_err(|_| AlignError::ScoreRangeExceeded { bound: distance })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AlignConfig, PairwiseAligner};
    use proptest::prelude::*;

    fn aligner(method: Method, max_errors: Option<u32>) -> MyersAligner {
        let config = EditDistanceConfig {
            method,
            max_errors,
            output: OutputConfig::with_alignment(),
        };
        MyersAligner::new(config).unwrap()
    }

    fn semi() -> Method {
        Method::semi_global(FreeEndGaps::sequence1_ends())
    }

    /// Checks score, both ends and the aligned sequences.
    fn check(
        aligner: &MyersAligner,
        (a, b): (&[u8], &[u8]),
        score: Score,
        (end, begin): ((usize, usize), (usize, usize)),
        (x, y): (&[u8], &[u8]),
    ) {
        let r = aligner.align(a, b).unwrap().unwrap();
        assert_eq!(r.score, score);
        assert_eq!(r.end, Coordinate::new(end.0, end.1));
        assert_eq!(r.begin, Some(Coordinate::new(begin.0, begin.1)));
        let alignment = r.alignment.unwrap();
        let (ax, ay) = alignment.aligned_sequences(a, b).unwrap();
        assert_eq!(
            (String::from_utf8_lossy(&ax), String::from_utf8_lossy(&ay)),
            (String::from_utf8_lossy(x), String::from_utf8_lossy(y))
        );
        assert_eq!(
            alignment.score(&ScoringScheme::hamming(), &GapScheme::linear(-1), a, b),
            Ok(score)
        );
    }

    #[test]
    fn compute_block_matches_columns() {
        // Query AC against reference A: column 0 is [0, 1, 2], column 1 is [1, 0, 1].
        let (mut pv, mut mv) = (!0, 0);
        let (ph, mh) = compute_block(&mut pv, &mut mv, 1, 0b01);
        assert_eq!((ph & 0b11, mh & 0b11), (0b00, 0b11));
        assert_eq!((pv & 0b11, mv & 0b11), (0b10, 0b01));
    }

    #[test]
    fn global_fixtures() {
        let ed = aligner(Method::global(), None);
        check(
            &ed,
            (b"AACCGGTTAACCGGTT", b"ACGTACGTA"),
            -8,
            ((9, 16), (0, 0)),
            (b"AACCGGTTAACCGGTT", b"A-C-G-T-A-C-G-TA"),
        );
        check(
            &ed,
            (b"ACGTACGTA", b"AACCGGTTAACCGGTT"),
            -8,
            ((16, 9), (0, 0)),
            (b"A-C-G-T-A-C-G-TA", b"AACCGGTTAACCGGTT"),
        );
        check(
            &ed,
            (b"AACCGGTAAACCGGTT", b"ACGTACGTA"),
            -8,
            ((9, 16), (0, 0)),
            (b"AACCGGTAAACCGGTT", b"A-C-G-TA--C-G-TA"),
        );
        check(
            &ed,
            (b"AACCGGTAAACCGG", b"ACGTACGTA"),
            -8,
            ((9, 14), (0, 0)),
            (b"AACCGGTAAACCGG-", b"A-C-G-TA--C-GTA"),
        );
        check(
            &ed,
            (b"AACCGGTAAACCGG", b"AC"),
            -12,
            ((2, 14), (0, 0)),
            (b"AACCGGTAAACCGG", b"A-C-----------"),
        );
        check(
            &ed,
            (b"UUWWRRIIUUWWRRII", b"UWRIUWRIU"),
            -8,
            ((9, 16), (0, 0)),
            (b"UUWWRRIIUUWWRRII", b"U-W-R-I-U-W-R-IU"),
        );
        let r = ed.align(b"UWRIUWRIU", b"UUWWRRIIUUWWRRII").unwrap().unwrap();
        assert_eq!((r.score, r.end), (-8, Coordinate::new(16, 9)));
    }

    #[test]
    fn global_empty_sequences() {
        let ed = aligner(Method::global(), None);
        check(&ed, (b"AACCGGTAAACCGG", b""), -14, ((0, 14), (0, 0)), (b"AACCGGTAAACCGG", b"--------------"));
        check(&ed, (b"", b"AACCGGTAAACCGG"), -14, ((14, 0), (0, 0)), (b"--------------", b"AACCGGTAAACCGG"));
        check(&ed, (b"", b""), 0, ((0, 0), (0, 0)), (b"", b""));
    }

    #[test]
    fn global_max_errors() {
        let (a, b) = (b"AACCGGTTAACCGGTT", b"ACGTACGTA");
        assert_eq!(aligner(Method::global(), Some(8)).align(a, b).unwrap().unwrap().score, -8);
        assert_eq!(aligner(Method::global(), Some(7)).align(a, b).unwrap(), None);
        assert_eq!(aligner(Method::global(), Some(6)).align(a, b).unwrap(), None);
        // The lengths alone differ by 7.
        assert_eq!(aligner(Method::global(), Some(6)).align(b"", b"ACGTACG").unwrap(), None);
    }

    #[test]
    fn semi_global_fixtures() {
        let ed = aligner(semi(), None);
        check(
            &ed,
            (b"AACCGGTTAACCGGTT", b"ACGTACGTA"),
            -5,
            ((9, 16), (0, 9)),
            (b"AC---CGGTT", b"ACGTACG-TA"),
        );
        let r = ed.align(b"ACGTACGTA", b"AACCGGTTAACCGGTT").unwrap().unwrap();
        assert_eq!((r.score, r.end, r.begin), (-8, Coordinate::new(16, 9), Some(Coordinate::new(0, 0))));
        check(
            &ed,
            (b"AACCGGTAAACCGGTT", b"ACGTACGTA"),
            -4,
            ((9, 8), (0, 1)),
            (b"AC---CGGTA", b"ACGTACG-TA"),
        );
        check(
            &ed,
            (b"UUWWRRIIUUWWRRII", b"UWRIUWRIU"),
            -5,
            ((9, 16), (0, 9)),
            (b"UW---WRRII", b"UWRIUWR-IU"),
        );
        let r = ed.align(b"UWRIUWRIU", b"UUWWRRIIUUWWRRII").unwrap().unwrap();
        assert_eq!((r.score, r.end), (-8, Coordinate::new(16, 9)));
    }

    #[test]
    fn semi_global_max_errors() {
        let (a, b) = (b"AACCGGTTAACCGGTT", b"ACGTACGTA");
        assert_eq!(aligner(semi(), Some(5)).align(a, b).unwrap().unwrap().score, -5);
        assert_eq!(aligner(semi(), Some(2)).align(a, b).unwrap(), None);

        let (a, b) = (b"AACCGGTAAACCGG", b"ACGTACGTA");
        for k in [255, 4] {
            check(
                &aligner(semi(), Some(k)),
                (a, b),
                -4,
                ((9, 8), (0, 1)),
                (b"AC---CGGTA", b"ACGTACG-TA"),
            );
        }
        assert_eq!(aligner(semi(), Some(3)).align(a, b).unwrap(), None);

        check(&aligner(semi(), Some(0)), (a, b"AC"), 0, ((2, 11), (0, 9)), (b"AC", b"AC"));
        check(&aligner(semi(), Some(0)), (a, b""), 0, ((0, 14), (0, 14)), (b"", b""));

        let b = b"AACCGGTTAACCGGTT";
        check(&aligner(semi(), Some(255)), (b"", b), -16, ((16, 0), (0, 0)), (b"----------------", b));
        assert_eq!(aligner(semi(), Some(5)).align(b"", b).unwrap(), None);
        check(&aligner(semi(), Some(0)), (b"", b""), 0, ((0, 0), (0, 0)), (b"", b""));
    }

    #[test]
    fn long_queries_span_blocks() {
        let reference: Vec<u8> = b"ACGT".iter().copied().cycle().take(300).collect();
        let mut query = reference[40..240].to_vec();
        query[10] = b'T';
        query.remove(150);
        query.insert(70, b'G');
        let ed = aligner(semi(), Some(3));
        let r = ed.align(&reference, &query).unwrap().unwrap();
        assert!(r.score >= -3);
        let alignment = r.alignment.unwrap();
        assert_eq!(
            alignment.score(&ScoringScheme::hamming(), &GapScheme::linear(-1), &reference, &query),
            Ok(r.score)
        );
        assert_eq!(aligner(semi(), Some(0)).align(&reference, &query).unwrap(), None);
    }

    #[test]
    fn unsupported_methods() {
        for method in [
            Method::local(),
            Method::semi_global(FreeEndGaps::sequence2_ends()),
            Method::semi_global(FreeEndGaps::all()),
        ] {
            assert!(matches!(
                MyersAligner::new(EditDistanceConfig::new(method)),
                Err(AlignError::UnsupportedEditDistanceMethod(_))
            ));
        }
    }

    #[test]
    fn score_only() {
        let ed = MyersAligner::new(EditDistanceConfig::new(Method::global())).unwrap();
        let r = ed.align(b"AACCGGTTAACCGGTT", b"ACGTACGTA").unwrap().unwrap();
        assert_eq!((r.score, r.begin, r.alignment), (-8, None, None));
        let r = ed.align(b"ACGT", b"").unwrap().unwrap();
        assert_eq!((r.score, r.begin, r.alignment), (-4, None, None));
    }

    fn seq(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
        prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 1..max_len)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn matches_unit_cost_engine(a in seq(150), b in seq(150), semi_global in any::<bool>(), k in 0..40u32) {
            let method = if semi_global { semi() } else { Method::global() };
            let engine = PairwiseAligner::new(AlignConfig::new(method, ScoringScheme::hamming(), GapScheme::linear(-1)))
                .unwrap()
                .align(&a, &b)
                .unwrap();

            let unlimited = aligner(method, None).align(&a, &b).unwrap().unwrap();
            prop_assert_eq!(unlimited.score, engine.score);
            if !semi_global {
                prop_assert_eq!(unlimited.end, engine.end);
            }
            let alignment = unlimited.alignment.as_ref().unwrap();
            prop_assert_eq!(alignment.end, unlimited.end);
            prop_assert_eq!(
                alignment.score(&ScoringScheme::hamming(), &GapScheme::linear(-1), &a, &b),
                Ok(unlimited.score)
            );

            let limited = aligner(method, Some(k)).align(&a, &b).unwrap();
            if -engine.score <= k as Score {
                prop_assert_eq!(limited, Some(unlimited));
            } else {
                prop_assert_eq!(limited, None);
            }
        }
    }
}
