use dp_types::*;
use serde::{Deserialize, Serialize};

/// Which matrix storage to use for an unbanded alignment.
///
/// A band always selects [`crate::storage::OneColumnBanded`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageChoice {
    /// The full matrix when a traceback is needed, the rolling column otherwise.
    #[default]
    Auto,
    FullMatrix,
    OneColumnRolling,
}

/// What to compute besides the score and the end coordinate.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Report where the alignment starts.
    #[serde(default)]
    pub begin_position: bool,
    /// Report the alignment as a CIGAR.
    #[serde(default)]
    pub alignment: bool,
    /// Use `=`/`X` instead of `M` in the CIGAR.
    #[serde(default)]
    pub extended_cigar: bool,
}

impl OutputConfig {
    pub fn score_only() -> Self {
        Self::default()
    }

    pub fn with_alignment() -> Self {
        Self {
            begin_position: true,
            alignment: true,
            extended_cigar: false,
        }
    }

    pub fn needs_traceback(&self) -> bool {
        self.begin_position || self.alignment
    }
}

/// Everything that determines how a pair is aligned.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct AlignConfig {
    #[serde(default)]
    pub method: Method,
    #[serde(default)]
    pub scoring: ScoringScheme,
    #[serde(default)]
    pub gaps: GapScheme,
    /// Restrict the computation to a diagonal band.
    #[serde(default)]
    pub band: Option<Band>,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub storage: StorageChoice,
}

impl AlignConfig {
    pub fn new(method: Method, scoring: ScoringScheme, gaps: GapScheme) -> Self {
        Self {
            method,
            scoring,
            gaps,
            ..Self::default()
        }
    }

    pub fn with_band(mut self, band: Band) -> Self {
        self.band = Some(band);
        self
    }

    pub fn with_output(mut self, output: OutputConfig) -> Self {
        self.output = output;
        self
    }

    pub fn with_storage(mut self, storage: StorageChoice) -> Self {
        self.storage = storage;
        self
    }

    /// Checks everything that does not depend on the sequences.
    pub fn validate(&self) -> Result<()> {
        self.gaps.validate()?;
        self.scoring.validate()?;
        if let Some(band) = &self.band {
            band.validate()?;
        }
        Ok(())
    }

    /// Fails when a score along some path of a `dims` matrix could leave the range of [`Score`].
    ///
    /// Every step of a path changes the score by at most one substitution or
    /// one gap opening. Half the range stays free for the unreachable sentinel.
    pub fn check_score_range(&self, dims: MatrixDims) -> Result<()> {
        let (lo, hi) = self.scoring.score_range();
        let open = self.gaps.open as i64 + self.gaps.extension as i64;
        let step = [lo as i64, hi as i64, open].into_iter().map(i64::abs).max().unwrap_or(0);
        let steps = (dims.rows + dims.cols - 1) as i64;
        let bound = steps.saturating_mul(step);
        if bound > Score::MAX as i64 / 2 {
            return Err(AlignError::ScoreRangeExceeded { bound });
        }
        Ok(())
    }
}
