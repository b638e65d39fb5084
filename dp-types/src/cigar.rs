use crate::{AlignError, GapScheme, Result, Score, ScoringScheme, Seq};
use itertools::Itertools;
use std::{fmt, slice, str::FromStr};

/// The gap symbol used in gapped (aligned) sequences.
pub const GAP: u8 = b'-';

/// A SAM CIGAR operation.
#[derive(PartialEq, Eq, Clone, Copy, Debug, Hash)]
pub enum CigarOp {
    /// `M`: match or mismatch.
    Match,
    /// `=`: match, only in extended CIGARs.
    Equal,
    /// `X`: mismatch, only in extended CIGARs.
    Mismatch,
    /// `I`: query symbols against a gap in the reference.
    Ins,
    /// `D`: reference symbols against a gap in the query.
    Del,
    /// `P`: a gap in both sequences.
    Padding,
    /// `S`: soft clipped query symbols.
    SoftClip,
    /// `H`: hard clipped query symbols.
    HardClip,
}

impl CigarOp {
    pub fn to_char(&self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Equal => '=',
            CigarOp::Mismatch => 'X',
            CigarOp::Ins => 'I',
            CigarOp::Del => 'D',
            CigarOp::Padding => 'P',
            CigarOp::SoftClip => 'S',
            CigarOp::HardClip => 'H',
        }
    }

    pub fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'M' => CigarOp::Match,
            '=' => CigarOp::Equal,
            'X' => CigarOp::Mismatch,
            'I' => CigarOp::Ins,
            'D' => CigarOp::Del,
            'P' => CigarOp::Padding,
            'S' => CigarOp::SoftClip,
            'H' => CigarOp::HardClip,
            _ => return None,
        })
    }

    /// Whether the operation advances in the reference (the columns).
    pub fn consumes_reference(&self) -> bool {
        matches!(
            self,
            CigarOp::Match | CigarOp::Equal | CigarOp::Mismatch | CigarOp::Del
        )
    }

    /// Whether the operation advances in the aligned part of the query (the rows).
    pub fn consumes_query(&self) -> bool {
        matches!(
            self,
            CigarOp::Match | CigarOp::Equal | CigarOp::Mismatch | CigarOp::Ins
        )
    }

    /// The operation for one column of a pairwise alignment.
    fn for_column(reference: u8, query: u8, extended: bool) -> Self {
        match (reference == GAP, query == GAP) {
            (false, false) if extended => {
                if reference == query {
                    CigarOp::Equal
                } else {
                    CigarOp::Mismatch
                }
            }
            (false, false) => CigarOp::Match,
            (false, true) => CigarOp::Del,
            (true, false) => CigarOp::Ins,
            (true, true) => CigarOp::Padding,
        }
    }
}

#[derive(Debug, Eq, PartialEq, Clone, Copy)]
pub struct CigarElem {
    pub op: CigarOp,
    pub cnt: usize,
}

/// The number of query symbols clipped before and after the aligned region.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ClippedBases {
    pub hard_front: usize,
    pub hard_back: usize,
    pub soft_front: usize,
    pub soft_back: usize,
}

/// A run-length encoded alignment.
#[derive(Default, Debug, PartialEq, Eq, Clone)]
pub struct Cigar {
    pub ops: Vec<CigarElem>,
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for elem in &self.ops {
            write!(f, "{}{}", elem.cnt, elem.op.to_char())?;
        }
        Ok(())
    }
}

impl FromStr for Cigar {
    type Err = AlignError;

    fn from_str(s: &str) -> Result<Self> {
        let mut cigar = Cigar::default();
        let mut cnt = 0usize;
        let mut has_digits = false;
        for c in s.chars() {
            if let Some(d) = c.to_digit(10) {
                cnt = cnt
                    .checked_mul(10)
                    .and_then(|x| x.checked_add(d as usize))
                    .ok_or(AlignError::InvalidAlignment("CIGAR count overflows"))?;
                has_digits = true;
            } else {
                let op = CigarOp::from_char(c)
                    .ok_or(AlignError::InvalidAlignment("unknown CIGAR operation"))?;
                if !has_digits || cnt == 0 {
                    return Err(AlignError::InvalidAlignment("CIGAR operation without count"));
                }
                cigar.push_elem(CigarElem { op, cnt });
                cnt = 0;
                has_digits = false;
            }
        }
        if has_digits {
            return Err(AlignError::InvalidAlignment("CIGAR ends with a count"));
        }
        Ok(cigar)
    }
}

impl Cigar {
    pub fn push_op(&mut self, op: CigarOp) {
        self.push_elem(CigarElem { op, cnt: 1 });
    }

    pub fn push_elem(&mut self, elem: CigarElem) {
        if elem.cnt == 0 {
            return;
        }
        if let Some(s) = self.ops.last_mut() {
            if s.op == elem.op {
                s.cnt += elem.cnt;
                return;
            }
        }
        self.ops.push(elem);
    }

    /// Reverse the cigar string.
    pub fn reverse(&mut self) {
        self.ops.reverse()
    }

    /// Append another cigar to this one.
    pub fn append(&mut self, other: &mut Self) {
        let Some(first) = other.ops.first_mut() else {
            return;
        };
        if let Some(s) = self.ops.last() {
            if s.op == first.op {
                first.cnt += s.cnt;
                self.ops.pop();
            }
        }
        self.ops.append(&mut other.ops);
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// `(count, operation)` pairs, e.g. `[(4, 'M'), (2, 'I')]`.
    pub fn to_pairs(&self) -> Vec<(usize, char)> {
        self.ops.iter().map(|e| (e.cnt, e.op.to_char())).collect()
    }

    /// The number of reference symbols covered.
    pub fn reference_len(&self) -> usize {
        self.ops
            .iter()
            .filter(|e| e.op.consumes_reference())
            .map(|e| e.cnt)
            .sum()
    }

    /// The number of aligned (unclipped) query symbols covered.
    pub fn query_len(&self) -> usize {
        self.ops
            .iter()
            .filter(|e| e.op.consumes_query())
            .map(|e| e.cnt)
            .sum()
    }

    /// Builds a CIGAR from two gapped sequences of equal length, using `-` as
    /// gap symbol. A gap in the reference gives `I`, a gap in the query gives
    /// `D`, anything else `M`, or `=`/`X` when `extended` is set.
    pub fn from_alignment(
        reference: Seq,
        query: Seq,
        clipped: ClippedBases,
        extended: bool,
    ) -> Result<Cigar> {
        if reference.len() != query.len() {
            return Err(AlignError::InvalidAlignment(
                "the aligned sequences (including gaps) must have the same length",
            ));
        }
        if reference.is_empty() {
            return Err(AlignError::InvalidAlignment(
                "the aligned sequences may not be empty",
            ));
        }

        let mut cigar = Cigar::default();
        cigar.push_elem(CigarElem {
            op: CigarOp::HardClip,
            cnt: clipped.hard_front,
        });
        cigar.push_elem(CigarElem {
            op: CigarOp::SoftClip,
            cnt: clipped.soft_front,
        });
        for (op, group) in &reference
            .iter()
            .zip(query)
            .map(|(&r, &q)| CigarOp::for_column(r, q, extended))
            .group_by(|&op| op)
        {
            cigar.ops.push(CigarElem {
                op,
                cnt: group.count(),
            });
        }
        cigar.push_elem(CigarElem {
            op: CigarOp::SoftClip,
            cnt: clipped.soft_back,
        });
        cigar.push_elem(CigarElem {
            op: CigarOp::HardClip,
            cnt: clipped.hard_back,
        });
        Ok(cigar)
    }

    /// Renders the aligned region as two gapped sequences.
    ///
    /// `reference` and `query` must start at the first aligned symbol.
    pub fn to_alignment(&self, reference: Seq, query: Seq) -> Result<(Vec<u8>, Vec<u8>)> {
        let (mut i, mut j) = (0, 0);
        let mut r = Vec::new();
        let mut q = Vec::new();
        let too_short = AlignError::InvalidAlignment("CIGAR is longer than the sequences");
        for &CigarElem { op, cnt } in self {
            for _ in 0..cnt {
                match op {
                    CigarOp::Match | CigarOp::Equal | CigarOp::Mismatch => {
                        r.push(*reference.get(i).ok_or(too_short.clone())?);
                        q.push(*query.get(j).ok_or(too_short.clone())?);
                        i += 1;
                        j += 1;
                    }
                    CigarOp::Ins => {
                        r.push(GAP);
                        q.push(*query.get(j).ok_or(too_short.clone())?);
                        j += 1;
                    }
                    CigarOp::Del => {
                        r.push(*reference.get(i).ok_or(too_short.clone())?);
                        q.push(GAP);
                        i += 1;
                    }
                    CigarOp::Padding => {
                        r.push(GAP);
                        q.push(GAP);
                    }
                    CigarOp::SoftClip | CigarOp::HardClip => break,
                }
            }
        }
        Ok((r, q))
    }

    /// Re-scores the alignment described by this CIGAR.
    ///
    /// `reference` and `query` must start at the first aligned symbol. `=` and
    /// `X` are checked against the sequences.
    pub fn score(
        &self,
        scoring: &ScoringScheme,
        gaps: &GapScheme,
        reference: Seq,
        query: Seq,
    ) -> Result<Score> {
        let (mut i, mut j) = (0, 0);
        let mut score: Score = 0;
        let add = |score: Score, s: Score| {
            score
                .checked_add(s)
                .ok_or(AlignError::InvalidAlignment("alignment score overflows"))
        };
        for &CigarElem { op, cnt } in self {
            match op {
                CigarOp::Match | CigarOp::Equal | CigarOp::Mismatch => {
                    if i + cnt > reference.len() || j + cnt > query.len() {
                        return Err(AlignError::InvalidAlignment(
                            "CIGAR is longer than the sequences",
                        ));
                    }
                    for (&a, &b) in reference[i..i + cnt].iter().zip(&query[j..j + cnt]) {
                        match op {
                            CigarOp::Equal if a != b => {
                                return Err(AlignError::InvalidAlignment("'=' on a mismatch"))
                            }
                            CigarOp::Mismatch if a == b => {
                                return Err(AlignError::InvalidAlignment("'X' on a match"))
                            }
                            _ => {}
                        }
                        score = add(score, scoring.score(a, b))?;
                    }
                    i += cnt;
                    j += cnt;
                }
                CigarOp::Ins => {
                    j += cnt;
                    score = add(score, gaps.gap_score(cnt))?;
                }
                CigarOp::Del => {
                    i += cnt;
                    score = add(score, gaps.gap_score(cnt))?;
                }
                CigarOp::Padding | CigarOp::SoftClip | CigarOp::HardClip => {}
            }
        }
        if i > reference.len() || j > query.len() {
            return Err(AlignError::InvalidAlignment(
                "CIGAR is longer than the sequences",
            ));
        }
        Ok(score)
    }
}

impl<'a> IntoIterator for &'a Cigar {
    type Item = &'a CigarElem;

    type IntoIter = slice::Iter<'a, CigarElem>;

    fn into_iter(self) -> Self::IntoIter {
        self.ops.iter()
    }
}
