pub mod generate;
pub mod reference;

use itertools::Itertools;

pub use generate::ErrorModel;
use dp_types::*;

pub fn test_sequences() -> Vec<(Seq<'static>, Seq<'static>)> {
    vec![
        (&b"TTGGGTCAATCAGCCAGTTTTTA"[..], &b"TTTGAGTGGGTCATCACCGATTTTAT"[..]),
        (&b"ACTGACCAGT"[..], &b"CCGACAGGA"[..]),
        (&b"AGTTTTAT"[..], &b"ACCGATTTTTA"[..]),
        (&b"CTCTCTTCTCTCTCTA"[..], &b"CCTCTCTCTCTCCTCTC"[..]),
        (&b"AGTGGGTTGCCTTCATTCCG"[..], &b"AGTGGTGTCTTCAGGCCTTCATTCCG"[..]),
        (&b"GCACGTCGCCCCCCGCCCGCG"[..], &b"GCCCGCCCGCCCGCCCCCGCCCCC"[..]),
        (&b"AACCGGTTTAACCGGTT"[..], &b"ACGTCTACGTA"[..]),
        (&b"TTTTTACGTATGTCCCCC"[..], &b"ACGTAAAACGT"[..]),
        (&b"ACGTACGT"[..], &b"AACACGTTAACCGGTT"[..]),
        (&b"A"[..], &b"T"[..]),
        (&b"A"[..], &b"AAAAAAAA"[..]),
    ]
}

/// Generated pairs with their parameters `(n, e, model, seed)`.
///
/// Seeds are fixed so that failures reproduce.
pub fn gen_seqs() -> impl Iterator<Item = ((Sequence, Sequence), (usize, f32, ErrorModel, u64))> {
    let ns = [1usize, 2, 3, 5, 8, 13, 20, 31, 50, 77, 120];
    let es = [0.0f32, 0.05, 0.2, 0.5, 1.0];
    let models = [
        ErrorModel::Uniform,
        ErrorModel::NoisyInsert,
        ErrorModel::NoisyDelete,
    ];
    let seeds = [31415u64];
    ns.into_iter()
        .cartesian_product(es)
        .cartesian_product(models)
        .cartesian_product(seeds)
        .map(|(((n, e), model), seed)| {
            let (a, b) = generate::generate_model(n, e, model, seed ^ n as u64);
            ((a, b), (n, e, model, seed))
        })
}

/// What an aligner reported for one pair.
#[derive(Clone, Debug, Default)]
pub struct Outcome {
    pub score: Score,
    pub end: Coordinate,
    pub begin: Option<Coordinate>,
    pub cigar: Option<Cigar>,
}

/// The problem every pair is aligned under.
#[derive(Clone, Debug, Default)]
pub struct Problem {
    pub method: Method,
    pub scoring: ScoringScheme,
    pub gaps: GapScheme,
    /// Restrict each pair to the diagonals between 0 and its sink, widened by this much.
    pub band_width: Option<u32>,
}

impl Problem {
    pub fn new(method: Method, scoring: ScoringScheme, gaps: GapScheme) -> Self {
        Self {
            method,
            scoring,
            gaps,
            band_width: None,
        }
    }

    pub fn with_band_width(mut self, width: u32) -> Self {
        self.band_width = Some(width);
        self
    }

    /// The band for reference `a` and query `b`. It always contains the origin and the sink.
    pub fn band(&self, a: Seq, b: Seq) -> Option<Band> {
        let w = self.band_width? as i32;
        let d = a.len() as i32 - b.len() as i32;
        Some(Band {
            lower_diagonal: d.min(0) - w,
            upper_diagonal: d.max(0) + w,
        })
    }
}

/// Checks one pair against [`reference::align`]:
/// - the score and the end cell must match,
/// - a returned CIGAR must span `begin..end` and rescore to the score.
pub fn test_aligner_on_input(
    a: Seq,
    b: Seq,
    problem: &Problem,
    aligner: &mut impl FnMut(Seq, Seq) -> Outcome,
    params: &str,
) {
    // Set to true for local debugging.
    const D: bool = false;

    // useful in case of panics inside the alignment code.
    eprintln!("{params}");
    if D {
        eprintln!("a {}\nb {}", seq_to_string(a), seq_to_string(b));
    }
    let expected = reference::align(
        a,
        b,
        &problem.method,
        &problem.scoring,
        &problem.gaps,
        problem.band(a, b),
    );
    let outcome = aligner(a, b);
    assert_eq!(
        (expected.score, expected.end),
        (outcome.score, outcome.end),
        "\n{params}\nlet a = \"{}\".as_bytes();\nlet b = \"{}\".as_bytes();\n{problem:?}",
        seq_to_string(a),
        seq_to_string(b),
    );
    let (Some(begin), Some(cigar)) = (outcome.begin, outcome.cigar) else {
        // Cigar not returned so not checked.
        return;
    };
    let end = outcome.end;
    assert_eq!(cigar.reference_len(), end.col - begin.col, "{params} cigar {cigar}");
    assert_eq!(cigar.query_len(), end.row - begin.row, "{params} cigar {cigar}");
    let rescored = cigar
        .score(
            &problem.scoring,
            &problem.gaps,
            &a[begin.col..end.col],
            &b[begin.row..end.row],
        )
        .unwrap();
    assert_eq!(rescored, outcome.score, "{params} cigar {cigar}");
    if let Method::Global(free) = problem.method {
        assert!(begin.row == 0 || free.first_col(), "{params} begin {begin}");
        assert!(begin.col == 0 || free.first_row(), "{params} begin {begin}");
    }
}

/// Runs the aligner on [`test_sequences`] and [`gen_seqs`], up to length `max_n`.
pub fn test_aligner_up_to(problem: &Problem, mut aligner: impl FnMut(Seq, Seq) -> Outcome, max_n: usize) {
    for (a, b) in test_sequences() {
        test_aligner_on_input(
            a,
            b,
            problem,
            &mut aligner,
            &format!(
                "hardcoded test_sequences: a {:?} b {:?}",
                seq_to_string(a),
                seq_to_string(b)
            ),
        );
    }
    for ((a, b), (n, e, model, seed)) in gen_seqs() {
        if n > max_n {
            continue;
        }
        test_aligner_on_input(
            &a,
            &b,
            problem,
            &mut aligner,
            &format!("seed {seed:>10} n {n:>5} e {e:>.2} error_model {model:?}"),
        );
    }
}

/// Checks the edit distance of unit scoring against `triple_accel`.
pub fn test_unit_cost(mut aligner: impl FnMut(Seq, Seq) -> Outcome) {
    for ((a, b), (n, e, model, seed)) in gen_seqs() {
        let distance = triple_accel::levenshtein_exp(&a, &b) as Score;
        assert_eq!(
            -distance,
            aligner(&a, &b).score,
            "seed {seed} n {n} e {e:.2} error_model {model:?}"
        );
    }
}
