//! This module contains the substitution scores (`ScoringScheme`) and the
//! affine gap scores (`GapScheme`).
//!
//! All scores are maximized: matches are usually positive, mismatches and gaps
//! negative.

use crate::blosum::{AA27, AA27_RANKS, AA27_WILDCARD, BLOSUM62};
use crate::{AlignError, Result, Score};
use serde::{Deserialize, Serialize};
use std::cmp::{max, min};

/// Affine gap scores.
///
/// A gap of length `k` scores `open + k * extension`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GapScheme {
    pub open: Score,
    pub extension: Score,
}

impl Default for GapScheme {
    fn default() -> Self {
        Self {
            open: -10,
            extension: -1,
        }
    }
}

impl GapScheme {
    pub fn affine(open: Score, extension: Score) -> Self {
        Self { open, extension }
    }

    /// Every gap character costs `extension`; opening is free.
    pub fn linear(extension: Score) -> Self {
        Self {
            open: 0,
            extension,
        }
    }

    /// Both scores must be non-positive and `open + extension` must be a valid score.
    pub fn validate(&self) -> Result<()> {
        if self.open > 0 || self.extension > 0 || self.open.checked_add(self.extension).is_none() {
            return Err(AlignError::InvalidGapScheme {
                open: self.open,
                extension: self.extension,
            });
        }
        Ok(())
    }

    /// The score for entering a gap from a match state: `open + extension`.
    #[inline]
    pub fn gap_open(&self) -> Score {
        self.open.saturating_add(self.extension)
    }

    /// The score for every further gap character.
    #[inline]
    pub fn gap_extend(&self) -> Score {
        self.extension
    }

    /// The score of a single gap of length `len`.
    #[inline]
    pub fn gap_score(&self, len: usize) -> Score {
        if len == 0 {
            0
        } else {
            let len = Score::try_from(len).unwrap_or(Score::MAX);
            self.open.saturating_add(len.saturating_mul(self.extension))
        }
    }
}

/// Substitution scores for pairs of symbols.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScoringScheme {
    /// Identical symbols score `match_score`, all others `mismatch_score`.
    Simple {
        match_score: Score,
        mismatch_score: Score,
    },
    /// BLOSUM62 over [`AA27`], case-insensitive, with unknown symbols scored as `X`.
    Blosum62,
    /// An explicit square matrix over a custom alphabet.
    Matrix(MatrixScoring),
}

impl Default for ScoringScheme {
    fn default() -> Self {
        Self::hamming()
    }
}

impl ScoringScheme {
    pub fn simple(match_score: Score, mismatch_score: Score) -> Self {
        Self::Simple {
            match_score,
            mismatch_score,
        }
    }

    /// 0 for a match, -1 for a mismatch.
    pub fn hamming() -> Self {
        Self::simple(0, -1)
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> Score {
        match self {
            ScoringScheme::Simple {
                match_score,
                mismatch_score,
            } => {
                if a == b {
                    *match_score
                } else {
                    *mismatch_score
                }
            }
            ScoringScheme::Blosum62 => {
                BLOSUM62[AA27_RANKS[a as usize] as usize][AA27_RANKS[b as usize] as usize] as Score
            }
            ScoringScheme::Matrix(m) => m.score(a, b),
        }
    }

    /// The smallest and largest score this scheme can return.
    pub fn score_range(&self) -> (Score, Score) {
        match self {
            ScoringScheme::Simple {
                match_score,
                mismatch_score,
            } => (
                min(*match_score, *mismatch_score),
                max(*match_score, *mismatch_score),
            ),
            ScoringScheme::Blosum62 => BLOSUM62.iter().flatten().fold(
                (Score::MAX, Score::MIN),
                |(lo, hi), &s| (min(lo, s as Score), max(hi, s as Score)),
            ),
            ScoringScheme::Matrix(m) => m.score_range(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        match self {
            ScoringScheme::Matrix(m) => m.validate(),
            _ => Ok(()),
        }
    }
}

/// A square substitution matrix over an explicit alphabet.
///
/// Lookups are case-insensitive. Symbols outside the alphabet are scored as the
/// `wildcard` symbol when one is given, and with the minimum matrix entry
/// otherwise.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawMatrix", into = "RawMatrix")]
pub struct MatrixScoring {
    alphabet: Vec<u8>,
    wildcard: Option<u8>,
    /// `alphabet.len()^2` scores in row-major order.
    scores: Vec<Score>,
    /// Rank of each byte, or `UNKNOWN`.
    ranks: Vec<u8>,
    min_score: Score,
}

const UNKNOWN: u8 = u8::MAX;

/// The serialized form of a [`MatrixScoring`].
#[derive(Clone, Debug, Serialize, Deserialize)]
struct RawMatrix {
    alphabet: String,
    #[serde(default)]
    wildcard: Option<char>,
    scores: Vec<Vec<Score>>,
}

impl TryFrom<RawMatrix> for MatrixScoring {
    type Error = AlignError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        let wildcard = match raw.wildcard {
            Some(c) if c.is_ascii() => Some(c as u8),
            Some(_) => {
                return Err(AlignError::InvalidScoringMatrix(
                    "wildcard must be an ASCII symbol".into(),
                ))
            }
            None => None,
        };
        MatrixScoring::new(raw.alphabet.as_bytes(), &raw.scores, wildcard)
    }
}

impl From<MatrixScoring> for RawMatrix {
    fn from(m: MatrixScoring) -> Self {
        let k = m.alphabet.len();
        RawMatrix {
            alphabet: String::from_utf8_lossy(&m.alphabet).into_owned(),
            wildcard: m.wildcard.map(char::from),
            scores: m.scores.chunks(k).map(|row| row.to_vec()).collect(),
        }
    }
}

impl MatrixScoring {
    pub fn new(alphabet: &[u8], scores: &[Vec<Score>], wildcard: Option<u8>) -> Result<Self> {
        let k = alphabet.len();
        if k == 0 || k >= UNKNOWN as usize {
            return Err(AlignError::InvalidScoringMatrix(format!(
                "alphabet size {k} must be in 1..{UNKNOWN}"
            )));
        }
        if scores.len() != k || scores.iter().any(|row| row.len() != k) {
            return Err(AlignError::InvalidScoringMatrix(format!(
                "expected a {k}x{k} matrix"
            )));
        }
        let mut ranks = vec![UNKNOWN; 256];
        for (r, &c) in alphabet.iter().enumerate() {
            let c = c.to_ascii_uppercase();
            if ranks[c as usize] != UNKNOWN {
                return Err(AlignError::InvalidScoringMatrix(format!(
                    "duplicate symbol {:?}",
                    c as char
                )));
            }
            ranks[c as usize] = r as u8;
        }
        if let Some(w) = wildcard {
            if ranks[w.to_ascii_uppercase() as usize] == UNKNOWN {
                return Err(AlignError::InvalidScoringMatrix(format!(
                    "wildcard {:?} is not in the alphabet",
                    w as char
                )));
            }
        }
        let scores: Vec<Score> = scores.iter().flatten().copied().collect();
        let min_score = scores.iter().copied().min().unwrap_or(0);
        Ok(Self {
            alphabet: alphabet.iter().map(u8::to_ascii_uppercase).collect(),
            wildcard: wildcard.map(|w| w.to_ascii_uppercase()),
            scores,
            ranks,
            min_score,
        })
    }

    /// The BLOSUM62 matrix as an explicit [`MatrixScoring`].
    pub fn blosum62() -> Self {
        let scores: Vec<Vec<Score>> = BLOSUM62
            .iter()
            .map(|row| row.iter().map(|&s| s as Score).collect())
            .collect();
        // The static table is square over a duplicate-free alphabet.
        match Self::new(AA27, &scores, Some(AA27_WILDCARD)) {
            Ok(m) => m,
            Err(e) => unreachable!("BLOSUM62 is well formed: {e}"),
        }
    }

    pub fn alphabet(&self) -> &[u8] {
        &self.alphabet
    }

    #[inline]
    fn rank(&self, c: u8) -> Option<usize> {
        match self.ranks[c.to_ascii_uppercase() as usize] {
            UNKNOWN => self
                .wildcard
                .map(|w| self.ranks[w as usize] as usize),
            r => Some(r as usize),
        }
    }

    #[inline]
    pub fn score(&self, a: u8, b: u8) -> Score {
        match (self.rank(a), self.rank(b)) {
            (Some(i), Some(j)) => self.scores[i * self.alphabet.len() + j],
            _ => self.min_score,
        }
    }

    fn score_range(&self) -> (Score, Score) {
        let hi = self.scores.iter().copied().max().unwrap_or(0);
        (self.min_score, hi)
    }

    fn validate(&self) -> Result<()> {
        if self.scores.len() != self.alphabet.len() * self.alphabet.len() {
            return Err(AlignError::InvalidScoringMatrix(
                "score table does not match the alphabet".into(),
            ));
        }
        Ok(())
    }
}
