use crate::{
    kernel::{CellKernel, ScalarKernel},
    recurrence::WithTrace,
    storage::{FullMatrix, MatrixStorage},
    *,
};
use dp_test::{reference, Outcome, Problem};
use dp_types::*;
use dp_vis_types::DebugMatrix;
use proptest::prelude::*;

fn init_log() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn outcome(r: AlignmentResult) -> Outcome {
    Outcome {
        score: r.score,
        end: r.end,
        begin: r.begin,
        cigar: r.alignment.map(|a| a.cigar),
    }
}

fn config(problem: &Problem, a: Seq, b: Seq, storage: StorageChoice, traced: bool) -> AlignConfig {
    let mut config = AlignConfig::new(problem.method, problem.scoring.clone(), problem.gaps).with_storage(storage);
    if let Some(band) = problem.band(a, b) {
        config = config.with_band(band);
    }
    if traced {
        config = config.with_output(OutputConfig::with_alignment());
    }
    config
}

/// Aligns every test pair with a scalar aligner and compares against the reference.
fn test_scalar(problem: Problem, storage: StorageChoice, traced: bool) {
    init_log();
    dp_test::test_aligner_up_to(
        &problem,
        |a, b| {
            let aligner = PairwiseAligner::new(config(&problem, a, b, storage, traced)).unwrap();
            outcome(aligner.align(a, b).unwrap())
        },
        usize::MAX,
    );
}

macro_rules! test_functions_macro {
    () => {
        #[test]
        fn unit_cost() {
            // match 0, mismatch -1, indel -1
            test(Problem::new(Method::global(), ScoringScheme::hamming(), GapScheme::linear(-1)));
        }

        #[test]
        fn affine_cost() {
            // match 1, mismatch -1, open -10, extend -1
            test(Problem::new(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1)));
        }

        #[test]
        fn dna_affine_cost() {
            test(Problem::new(Method::global(), ScoringScheme::simple(2, -3), GapScheme::affine(-5, -2)));
        }

        #[test]
        fn free_gap_open() {
            test(Problem::new(Method::global(), ScoringScheme::simple(1, -2), GapScheme::affine(0, -1)));
        }

        #[test]
        fn local() {
            test(Problem::new(Method::local(), ScoringScheme::simple(4, -5), GapScheme::affine(-10, -1)));
        }

        #[test]
        fn local_linear() {
            test(Problem::new(Method::local(), ScoringScheme::simple(2, -1), GapScheme::linear(-2)));
        }

        #[test]
        fn semi_global_sequence1_ends() {
            test(Problem::new(
                Method::semi_global(FreeEndGaps::sequence1_ends()),
                ScoringScheme::simple(4, -5),
                GapScheme::affine(-10, -1),
            ));
        }

        #[test]
        fn semi_global_sequence2_ends() {
            test(Problem::new(
                Method::semi_global(FreeEndGaps::sequence2_ends()),
                ScoringScheme::simple(2, -3),
                GapScheme::affine(-5, -1),
            ));
        }

        #[test]
        fn semi_global_all_ends() {
            test(Problem::new(
                Method::semi_global(FreeEndGaps::all()),
                ScoringScheme::simple(1, -1),
                GapScheme::affine(-3, -1),
            ));
        }

        #[test]
        fn semi_global_leading_only() {
            test(Problem::new(
                Method::semi_global(FreeEndGaps {
                    sequence1_leading: true,
                    sequence2_trailing: true,
                    ..FreeEndGaps::none()
                }),
                ScoringScheme::simple(1, -1),
                GapScheme::affine(-3, -1),
            ));
        }

        #[test]
        fn blosum62() {
            test(Problem::new(Method::global(), ScoringScheme::Blosum62, GapScheme::affine(-11, -1)));
        }
    };
}

mod full_score_only {
    use super::*;

    fn test(problem: Problem) {
        test_scalar(problem, StorageChoice::FullMatrix, false);
    }

    test_functions_macro!();
}

mod full_traced {
    use super::*;

    fn test(problem: Problem) {
        test_scalar(problem, StorageChoice::FullMatrix, true);
    }

    test_functions_macro!();
}

mod rolling {
    use super::*;

    fn test(problem: Problem) {
        test_scalar(problem, StorageChoice::OneColumnRolling, false);
    }

    test_functions_macro!();
}

mod banded {
    use super::*;

    fn test(problem: Problem) {
        test_scalar(problem.with_band_width(2), StorageChoice::Auto, false);
    }

    test_functions_macro!();
}

mod banded_traced {
    use super::*;

    fn test(problem: Problem) {
        test_scalar(problem.with_band_width(4), StorageChoice::Auto, true);
    }

    test_functions_macro!();
}

mod banded_tight {
    use super::*;

    fn test(problem: Problem) {
        test_scalar(problem.with_band_width(0), StorageChoice::Auto, true);
    }

    test_functions_macro!();
}

mod simd {
    use super::*;

    fn test(problem: Problem) {
        init_log();
        let config = AlignConfig::new(problem.method, problem.scoring.clone(), problem.gaps);
        let aligner = match SimdBatchAligner::<i16, 8>::new(config) {
            Ok(aligner) => aligner,
            Err(AlignError::UnsupportedSimdScoring) => return,
            Err(e) => panic!("{e}"),
        };
        let mut pool = MatrixPool::new();
        dp_test::test_aligner_up_to(
            &problem,
            |a, b| {
                // Pad every pair with a longer and a shorter neighbour.
                let batch = [(a, b), (b"ACGTTGCAACGTTGCAACGTTGCA".as_slice(), b"A".as_slice()), (b"A".as_slice(), b"AC".as_slice())];
                outcome(aligner.align_batch(&batch, &mut pool).unwrap().swap_remove(0))
            },
            usize::MAX,
        );
    }

    test_functions_macro!();
}

#[test]
fn unit_cost_is_edit_distance() {
    let aligner = PairwiseAligner::new(AlignConfig::new(
        Method::global(),
        ScoringScheme::hamming(),
        GapScheme::linear(-1),
    ))
    .unwrap();
    dp_test::test_unit_cost(|a, b| outcome(aligner.align(a, b).unwrap()));
}

fn traced(method: Method, scoring: ScoringScheme, gaps: GapScheme) -> PairwiseAligner {
    PairwiseAligner::new(AlignConfig::new(method, scoring, gaps).with_output(OutputConfig::with_alignment())).unwrap()
}

#[test]
fn local_fixture() {
    let (a, b) = (b"AACCGGTTTAACCGGTT".as_slice(), b"ACGTCTACGTA".as_slice());
    let aligner = traced(Method::local(), ScoringScheme::simple(4, -5), GapScheme::affine(-10, -1));
    let r = aligner.align(a, b).unwrap();
    assert_eq!(r.score, 11);
    assert_eq!(r.end, Coordinate::new(7, 10));
    assert_eq!(r.begin, Some(Coordinate::new(2, 5)));
    let alignment = r.alignment.unwrap();
    assert_eq!(alignment.cigar.to_string(), "5M");
    let (x, y) = alignment.aligned_sequences(a, b).unwrap();
    assert_eq!((x.as_slice(), y.as_slice()), (b"GTTTA".as_slice(), b"GTCTA".as_slice()));
}

#[test]
fn semi_global_fixture() {
    let (a, b) = (b"TTTTTACGTATGTCCCCC".as_slice(), b"ACGTAAAACGT".as_slice());
    let method = Method::semi_global(FreeEndGaps::sequence1_ends());
    let aligner = traced(method, ScoringScheme::simple(4, -5), GapScheme::affine(-10, -1));

    let r = aligner.align(a, b).unwrap();
    assert_eq!((r.score, r.end), (10, Coordinate::new(11, 13)));
    let alignment = r.alignment.unwrap();
    assert_eq!(alignment.score(&ScoringScheme::simple(4, -5), &GapScheme::affine(-10, -1), a, b), Ok(10));

    // Skipping the ends of the query costs gaps.
    let r = aligner.align(b, a).unwrap();
    assert_eq!((r.score, r.end), (-13, Coordinate::new(18, 5)));
}

#[test]
fn global_total() {
    let aligner = traced(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1));
    let (a, b) = (b"ACGTACGT".as_slice(), b"AACACGTTAACCGGTT".as_slice());
    let r = aligner.align(a, b).unwrap();
    assert_eq!((r.score, r.end), (-22, Coordinate::new(16, 8)));
    assert_eq!(r.begin, Some(Coordinate::new(0, 0)));
    let r = aligner.align(b, a).unwrap();
    assert_eq!((r.score, r.end), (-22, Coordinate::new(8, 16)));

    let r = aligner.align(b"ACGTACGT", b"ACGTACGT").unwrap();
    assert_eq!(r.score, 8);
    assert_eq!(r.alignment.unwrap().cigar.to_string(), "8M");

    let r = aligner.align(b"ACGTTACGT", b"ACGTACGT").unwrap();
    assert_eq!((r.score, r.end), (-3, Coordinate::new(8, 9)));
    assert_eq!(r.alignment.unwrap().cigar.reference_len(), 9);
}

#[test]
fn extended_cigar() {
    let config = AlignConfig::new(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1))
        .with_output(OutputConfig {
            begin_position: true,
            alignment: true,
            extended_cigar: true,
        });
    let r = PairwiseAligner::new(config).unwrap().align(b"ACGTACGT", b"ACCTACGT").unwrap();
    assert_eq!(r.score, 6);
    assert_eq!(r.alignment.unwrap().cigar.to_string(), "2=1X5=");
}

#[test]
fn begin_without_alignment() {
    let config = AlignConfig::new(Method::local(), ScoringScheme::simple(4, -5), GapScheme::affine(-10, -1))
        .with_output(OutputConfig {
            begin_position: true,
            ..OutputConfig::score_only()
        });
    let r = PairwiseAligner::new(config)
        .unwrap()
        .align(b"AACCGGTTTAACCGGTT", b"ACGTCTACGTA")
        .unwrap();
    assert_eq!(r.begin, Some(Coordinate::new(2, 5)));
    assert_eq!(r.alignment, None);
}

#[test]
fn single_diagonal_band() {
    let config = AlignConfig::new(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1))
        .with_band(Band::new(0, 0).unwrap())
        .with_output(OutputConfig::with_alignment());
    let r = PairwiseAligner::new(config).unwrap().align(b"ACGT", b"AGGT").unwrap();
    assert_eq!((r.score, r.end), (2, Coordinate::new(4, 4)));
    assert_eq!(r.alignment.unwrap().cigar.to_string(), "4M");

    // Off the main diagonal the first row must be free.
    let method = Method::semi_global(FreeEndGaps::sequence1_ends());
    let config = AlignConfig::new(method, ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1))
        .with_band(Band::new(1, 1).unwrap())
        .with_output(OutputConfig::with_alignment());
    let r = PairwiseAligner::new(config).unwrap().align(b"TACGT", b"ACGT").unwrap();
    assert_eq!((r.score, r.end), (4, Coordinate::new(4, 5)));
    assert_eq!(r.begin, Some(Coordinate::new(0, 1)));

    let config = AlignConfig::new(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1))
        .with_band(Band::new(1, 1).unwrap());
    assert!(matches!(
        PairwiseAligner::new(config).unwrap().align(b"TACGT", b"ACGT"),
        Err(AlignError::InvalidBandConfiguration { .. })
    ));
}

#[test]
fn align_all_keeps_order() {
    init_log();
    let aligner = traced(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1));
    let pairs: Vec<(Sequence, Sequence)> = dp_test::gen_seqs().map(|(pair, _)| pair).take(40).collect();
    let mut pairs = pairs;
    pairs.insert(3, (b"ACGT".to_vec(), Vec::new()));
    let results = aligner.align_all(&pairs);
    assert_eq!(results.len(), pairs.len());
    for (i, ((a, b), r)) in pairs.iter().zip(&results).enumerate() {
        if i == 3 {
            assert_eq!(r, &Err(AlignError::EmptySequence(Which::Second)));
        } else {
            assert_eq!(r, &aligner.align(a, b), "pair {i}");
        }
    }
}

#[test]
fn simd_align_all_matches_scalar() {
    init_log();
    let config = AlignConfig::new(Method::local(), ScoringScheme::simple(2, -3), GapScheme::affine(-5, -1));
    let scalar = PairwiseAligner::new(config.clone()).unwrap();
    let simd = SimdBatchAligner::<i16, 8>::new(config).unwrap();
    let pairs: Vec<(Sequence, Sequence)> = dp_test::gen_seqs().map(|(pair, _)| pair).take(50).collect();
    let results = simd.align_all(&pairs).unwrap();
    assert_eq!(results.len(), pairs.len());
    for ((a, b), r) in pairs.iter().zip(results) {
        assert_eq!(Ok(r), scalar.align(a, b));
    }
}

/// Runs all storages on one pair and records every column.
fn debug_matrices(config: &AlignConfig, a: Seq, b: Seq) -> Vec<DebugMatrix> {
    [StorageChoice::FullMatrix, StorageChoice::OneColumnRolling]
        .into_iter()
        .map(|storage| config.clone().with_storage(storage))
        .chain([config.clone().with_band(Band::new(-(b.len() as i32), a.len() as i32).unwrap())])
        .map(|config| {
            let mut matrix = DebugMatrix::new();
            PairwiseAligner::new(config)
                .unwrap()
                .align_with(a, b, &mut MatrixPool::new(), &mut matrix)
                .unwrap();
            matrix
        })
        .collect()
}

#[test]
fn debug_matrix_display() {
    let config = AlignConfig::new(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-2, -1))
        .with_band(Band::new(-1, 1).unwrap())
        .with_output(OutputConfig::with_alignment());
    let mut matrix = DebugMatrix::new();
    PairwiseAligner::new(config)
        .unwrap()
        .align_with(b"ACG", b"AG", &mut MatrixPool::new(), &mut matrix)
        .unwrap();
    assert_eq!(matrix.columns_seen(), 4);
    assert!(matrix.has_traces());
    assert_eq!(matrix.at(2, 0), Ok(None));
    assert_eq!(matrix.at(1, 1), Ok(Some(1)));
    assert!(matches!(matrix.at(3, 0), Err(AlignError::CoordinateOutOfBounds { .. })));
    let shown = matrix.to_string();
    assert!(shown.contains('A') && shown.contains('G'));
}

/// Recomputes `current` of every cell from the stored neighbours.
fn check_recurrence(method: Method, scoring: &ScoringScheme, gaps: &GapScheme, a: Seq, b: Seq) {
    let dims = MatrixDims::for_pair(a, b);
    let mut pool = MatrixPool::new();
    let mut storage = FullMatrix::<Score, WithTrace>::new();
    let mut kernel = ScalarKernel::<WithTrace>::new(&method, scoring, gaps, a, b);
    storage.resize(dims, kernel.lowest(), &mut pool).unwrap();
    for col in storage.columns() {
        storage.compute_column(col, &mut kernel);
    }
    let cell = |r: usize, c: usize| storage.at(r, c).unwrap().unwrap();
    for c in 1..dims.cols {
        for r in 1..dims.rows {
            let best = (cell(r - 1, c - 1).current + scoring.score(a[c - 1], b[r - 1]))
                .max(cell(r - 1, c).up)
                .max(cell(r, c - 1).left);
            let best = if method.is_local() { best.max(0) } else { best };
            assert_eq!(cell(r, c).current, best, "cell ({r},{c})");
        }
    }
}

#[test]
fn recurrence_on_fixed_inputs() {
    for (a, b) in dp_test::test_sequences() {
        for method in [
            Method::global(),
            Method::local(),
            Method::semi_global(FreeEndGaps::all()),
        ] {
            check_recurrence(method, &ScoringScheme::simple(2, -3), &GapScheme::affine(-5, -1), a, b);
        }
    }
}

fn dna(max_len: usize) -> impl Strategy<Value = Vec<u8>> {
    prop::collection::vec(prop::sample::select(b"ACGT".to_vec()), 1..max_len)
}

fn methods() -> impl Strategy<Value = Method> {
    prop_oneof![
        Just(Method::global()),
        Just(Method::local()),
        Just(Method::semi_global(FreeEndGaps::sequence1_ends())),
        Just(Method::semi_global(FreeEndGaps::sequence2_ends())),
        Just(Method::semi_global(FreeEndGaps::all())),
    ]
}

fn simple_scoring() -> impl Strategy<Value = (ScoringScheme, GapScheme)> {
    (0..6i32, -6..=0i32, -8..=0i32, -3..=0i32)
        .prop_map(|(m, x, o, e)| (ScoringScheme::simple(m, x), GapScheme::affine(o, e)))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn storages_agree(a in dna(24), b in dna(24), method in methods(), (scoring, gaps) in simple_scoring()) {
        let config = AlignConfig::new(method, scoring.clone(), gaps);
        let matrices = debug_matrices(&config, &a, &b);
        let expected = reference::align(&a, &b, &method, &scoring, &gaps, None);
        let dims = MatrixDims::for_pair(&a, &b);
        for m in &matrices {
            prop_assert_eq!(m.columns_seen(), dims.cols);
            for r in 0..dims.rows {
                for c in 0..dims.cols {
                    prop_assert_eq!(m.at(r, c).unwrap().map(|s| s as i64), expected.at(r, c));
                }
            }
        }
    }

    #[test]
    fn recurrence_holds(a in dna(20), b in dna(20), method in methods(), (scoring, gaps) in simple_scoring()) {
        check_recurrence(method, &scoring, &gaps, &a, &b);
    }

    #[test]
    fn band_around_optimal_path(a in dna(40), b in dna(40), method in methods(), (scoring, gaps) in simple_scoring()) {
        let config = AlignConfig::new(method, scoring, gaps).with_output(OutputConfig::with_alignment());
        let unbanded = PairwiseAligner::new(config.clone()).unwrap().align(&a, &b).unwrap();
        let alignment = unbanded.alignment.unwrap();

        let sink = MatrixDims::for_pair(&a, &b).sink().diagonal();
        let mut d = alignment.begin.diagonal();
        let (mut lower, mut upper) = (d, d);
        for elem in &alignment.cigar {
            match elem.op {
                CigarOp::Ins => d -= elem.cnt as i64,
                CigarOp::Del => d += elem.cnt as i64,
                _ => {}
            }
            lower = lower.min(d);
            upper = upper.max(d);
        }
        if !method.is_local() {
            lower = lower.min(0).min(sink);
            upper = upper.max(0).max(sink);
        }
        let band = Band::new(lower as i32, upper as i32).unwrap();
        let banded = PairwiseAligner::new(config.with_band(band)).unwrap().align(&a, &b).unwrap();
        prop_assert_eq!(banded.score, unbanded.score);
    }

    #[test]
    fn traceback_rescores(a in dna(40), b in dna(40), method in methods(), (scoring, gaps) in simple_scoring()) {
        let aligner = traced(method, scoring.clone(), gaps);
        let r = aligner.align(&a, &b).unwrap();
        let alignment = r.alignment.unwrap();
        prop_assert_eq!(alignment.end, r.end);
        prop_assert_eq!(alignment.score(&scoring, &gaps, &a, &b), Ok(r.score));
    }

    #[test]
    fn local_scores_are_non_negative(a in dna(30), b in dna(30), (scoring, gaps) in simple_scoring()) {
        let config = AlignConfig::new(Method::local(), scoring, gaps);
        let mut matrix = DebugMatrix::new();
        let r = PairwiseAligner::new(config).unwrap().align_with(&a, &b, &mut MatrixPool::new(), &mut matrix).unwrap();
        prop_assert!(r.score >= 0);
        let dims = matrix.dims();
        for c in 0..dims.cols {
            for s in matrix.column_scores(c).unwrap() {
                prop_assert!(s.unwrap() >= 0);
            }
        }
    }

    #[test]
    fn lanes_match_scalar(
        pairs in prop::collection::vec((dna(30), dna(30)), 1..=8),
        method in methods(),
        (scoring, gaps) in simple_scoring(),
    ) {
        let config = AlignConfig::new(method, scoring, gaps);
        let scalar = PairwiseAligner::new(config.clone()).unwrap();
        let lanes = SimdBatchAligner::<i16, 8>::new(config).unwrap();
        let batch: Vec<(Seq, Seq)> = pairs.iter().map(|(a, b)| (a.as_slice(), b.as_slice())).collect();
        let results = lanes.align_batch(&batch, &mut MatrixPool::new()).unwrap();
        for ((a, b), r) in batch.iter().zip(results) {
            prop_assert_eq!(Ok(r), scalar.align(a, b));
        }
    }
}

#[test]
fn observer_sees_no_columns_on_setup_errors() {
    let config = AlignConfig::new(Method::global(), ScoringScheme::simple(1, -1), GapScheme::affine(-10, -1))
        .with_band(Band::new(2, 5).unwrap());
    let mut matrix = DebugMatrix::new();
    let r = PairwiseAligner::new(config)
        .unwrap()
        .align_with(b"ACGT", b"ACGT", &mut MatrixPool::new(), &mut matrix);
    assert!(matches!(r, Err(AlignError::InvalidBandConfiguration { .. })));
    assert_eq!(matrix.columns_seen(), 0);
}

#[test]
fn huge_scores_are_rejected() {
    let aligner = PairwiseAligner::new(AlignConfig::new(
        Method::global(),
        ScoringScheme::simple(2_000_000_000, -1),
        GapScheme::linear(-1),
    ))
    .unwrap();
    assert!(matches!(
        aligner.align(b"AAAA", b"AAAA"),
        Err(AlignError::ScoreRangeExceeded { .. })
    ));

    let gaps = GapScheme::affine(Score::MIN / 2 - 1, Score::MIN / 2);
    assert!(matches!(
        PairwiseAligner::new(AlignConfig::new(Method::global(), ScoringScheme::default(), gaps)),
        Err(AlignError::InvalidGapScheme { .. })
    ));
}

/// Band [-4, 8], match 4, mismatch -5, gaps -10/-1.
fn fixture_band(free: FreeEndGaps) -> AlignConfig {
    AlignConfig::new(Method::semi_global(free), ScoringScheme::simple(4, -5), GapScheme::affine(-10, -1))
        .with_band(Band::new(-4, 8).unwrap())
        .with_output(OutputConfig::with_alignment())
}

const X: Score = Score::MIN;

/// Best scores of `TTTTTACGTATGTCCCCC` (columns) against `ACGTAAAACGT` (rows)
/// under [`fixture_band`] with free ends in the first sequence. `X` is outside the band.
#[rustfmt::skip]
const BANDED_SCORES: [[Score; 19]; 12] = [
    [  0,   0,   0,   0,   0,   0,   0,   0,   0,   X,   X,   X,   X,   X,   X,   X,   X,   X,   X],
    [-11,  -5,  -5,  -5,  -5,  -5,   4,  -5,  -5,  -5,   X,   X,   X,   X,   X,   X,   X,   X,   X],
    [-12, -12, -10, -10, -10, -10,  -7,   8,  -3,  -4,  -5,   X,   X,   X,   X,   X,   X,   X,   X],
    [-13, -13, -13, -13, -13, -13,  -8,  -3,  12,   1,   0,  -1,   X,   X,   X,   X,   X,   X,   X],
    [-14,  -9,  -9,  -9,  -9,  -9,  -9,  -4,   1,  16,   5,   4,   3,   X,   X,   X,   X,   X,   X],
    [  X, -15, -14, -14, -14, -14,  -5,  -5,   0,   5,  20,   9,   8,   7,   X,   X,   X,   X,   X],
    [  X,   X, -16, -16, -16, -16, -10,  -6,  -1,   4,   9,  15,   4,   3,   2,   X,   X,   X,   X],
    [  X,   X,   X, -17, -17, -17, -12,  -7,  -2,   3,   8,   4,  10,  -1,  -2,  -3,   X,   X,   X],
    [  X,   X,   X,   X, -18, -18, -13,  -8,  -3,   2,   7,   3,  -1,   5,  -6,  -7,  -8,   X,   X],
    [  X,   X,   X,   X,   X, -19, -14,  -9,  -4,   1,   6,   2,  -2,  -6,   9,  -2,  -3,  -4,   X],
    [  X,   X,   X,   X,   X,   X, -15, -10,  -5,   0,   5,   1,   6,  -5,  -2,   4,  -7,  -8,  -9],
    [  X,   X,   X,   X,   X,   X,   X, -11,  -6,  -1,   4,   9,  -2,  10,  -1,  -2,  -1,  -4,  -5],
];

/// Checks score, both ends and the aligned sequences, then every cell against the reference.
fn check_banded(
    config: &AlignConfig,
    (a, b): (Seq, Seq),
    (score, end, begin): (Score, Coordinate, Coordinate),
    cigar: &str,
    (x, y): (&[u8], &[u8]),
) -> DebugMatrix {
    let mut matrix = DebugMatrix::new();
    let r = PairwiseAligner::new(config.clone())
        .unwrap()
        .align_with(a, b, &mut MatrixPool::new(), &mut matrix)
        .unwrap();
    assert_eq!((r.score, r.end, r.begin), (score, end, Some(begin)));
    let alignment = r.alignment.unwrap();
    assert_eq!(alignment.cigar.to_string(), cigar);
    let (ax, ay) = alignment.aligned_sequences(a, b).unwrap();
    assert_eq!((ax.as_slice(), ay.as_slice()), (x, y));

    let expected = reference::align(a, b, &config.method, &config.scoring, &config.gaps, config.band);
    assert_eq!(expected.score, score);
    let dims = MatrixDims::for_pair(a, b);
    for row in 0..dims.rows {
        for col in 0..dims.cols {
            assert_eq!(matrix.at(row, col).unwrap().map(|s| s as i64), expected.at(row, col), "cell ({row},{col})");
        }
    }
    matrix
}

#[test]
fn semi_global_banded_fixture() {
    init_log();
    let (long, short) = (b"TTTTTACGTATGTCCCCC".as_slice(), b"ACGTAAAACGT".as_slice());

    let matrix = check_banded(
        &fixture_band(FreeEndGaps::sequence1_ends()),
        (long, short),
        (10, Coordinate::new(11, 13), Coordinate::new(0, 5)),
        "4M3I4M",
        (b"ACGT---ATGT", b"ACGTAAAACGT"),
    );
    for (row, scores) in BANDED_SCORES.iter().enumerate() {
        for (col, &s) in scores.iter().enumerate() {
            assert_eq!(matrix.at(row, col), Ok((s != X).then_some(s)), "cell ({row},{col})");
        }
    }

    check_banded(
        &fixture_band(FreeEndGaps::sequence2_ends()),
        (long, short),
        (-19, Coordinate::new(11, 18), Coordinate::new(2, 0)),
        "9M9D",
        (b"TTTTTACGTATGTCCCCC", b"GTAAAACGT---------"),
    );

    // The sink lies below the band: the alignment leaves through the free last column.
    let matrix = check_banded(
        &fixture_band(FreeEndGaps::sequence2_ends()),
        (short, long),
        (-5, Coordinate::new(9, 11), Coordinate::new(4, 0)),
        "6D5M",
        (b"ACGTAAAACGT", b"------TACGT"),
    );
    for row in 16..=18 {
        assert_eq!(matrix.column_scores(11).unwrap()[row], None);
        assert_eq!(matrix.at(row, 0), Ok(None));
    }
}

#[test]
fn bands_without_the_origin() {
    let scoring = ScoringScheme::simple(4, -5);
    let gaps = GapScheme::affine(-10, -1);
    let config = |method: Method, lower, upper| {
        AlignConfig::new(method, scoring.clone(), gaps)
            .with_band(Band::new(lower, upper).unwrap())
            .with_output(OutputConfig::with_alignment())
    };

    // Entered through the free first column, left through the free last column.
    check_banded(
        &config(Method::semi_global(FreeEndGaps::sequence2_ends()), -4, -2),
        (b"ACGT", b"TTTACGTTT"),
        (16, Coordinate::new(7, 4), Coordinate::new(3, 0)),
        "4M",
        (b"ACGT", b"ACGT"),
    );

    // Entered through the free first row, left through the free last row.
    for upper in [4, 5] {
        check_banded(
            &config(Method::semi_global(FreeEndGaps::sequence1_ends()), 3, upper),
            (b"GGGGACGTCC", b"ACGT"),
            (16, Coordinate::new(4, 8), Coordinate::new(0, 4)),
            "4M",
            (b"ACGT", b"ACGT"),
        );
    }

    check_banded(
        &config(Method::local(), 3, 5),
        (b"TTTTACGT", b"ACGTA"),
        (16, Coordinate::new(4, 8), Coordinate::new(0, 4)),
        "4M",
        (b"ACGT", b"ACGT"),
    );

    // Without a free first row there is no way into the band.
    let r = PairwiseAligner::new(config(Method::semi_global(FreeEndGaps::sequence2_ends()), 3, 5))
        .unwrap()
        .align(b"GGGGACGTCC", b"ACGT");
    assert!(matches!(r, Err(AlignError::InvalidBandConfiguration { .. })));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(128))]

    #[test]
    fn random_bands_match_reference(
        a in dna(14),
        b in dna(14),
        method in methods(),
        (scoring, gaps) in simple_scoring(),
        lower in -14..=14i32,
        width in 0..=10i32,
    ) {
        let band = Band::new(lower, lower + width).unwrap();
        let config = AlignConfig::new(method, scoring.clone(), gaps)
            .with_band(band)
            .with_output(OutputConfig::with_alignment());
        let mut matrix = DebugMatrix::new();
        let r = match PairwiseAligner::new(config).unwrap().align_with(&a, &b, &mut MatrixPool::new(), &mut matrix) {
            Err(AlignError::InvalidBandConfiguration { .. }) => return Ok(()),
            r => r.unwrap(),
        };
        let expected = reference::align(&a, &b, &method, &scoring, &gaps, Some(band));
        prop_assert_eq!(r.score, expected.score);
        let dims = MatrixDims::for_pair(&a, &b);
        for row in 0..dims.rows {
            for col in 0..dims.cols {
                prop_assert_eq!(matrix.at(row, col).unwrap().map(|s| s as i64), expected.at(row, col));
            }
        }
        let alignment = r.alignment.unwrap();
        prop_assert_eq!(alignment.score(&scoring, &gaps, &a, &b), Ok(r.score));
    }
}
