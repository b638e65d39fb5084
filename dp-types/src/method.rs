use crate::{AlignError, Result};
use serde::{Deserialize, Serialize};

/// Which matrix edges may be entered or left without paying for the gap.
///
/// Sequence 1 (the reference) spans the columns and sequence 2 (the query)
/// the rows, so skipping a prefix of sequence 1 walks along the first row.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FreeEndGaps {
    /// A prefix of sequence 1 may be skipped: the first row is free.
    #[serde(default)]
    pub sequence1_leading: bool,
    /// A suffix of sequence 1 may be skipped: the last row is an end.
    #[serde(default)]
    pub sequence1_trailing: bool,
    /// A prefix of sequence 2 may be skipped: the first column is free.
    #[serde(default)]
    pub sequence2_leading: bool,
    /// A suffix of sequence 2 may be skipped: the last column is an end.
    #[serde(default)]
    pub sequence2_trailing: bool,
}

impl FreeEndGaps {
    pub fn none() -> Self {
        Self::default()
    }

    /// Sequence 2 is aligned completely somewhere inside sequence 1.
    pub fn sequence1_ends() -> Self {
        Self {
            sequence1_leading: true,
            sequence1_trailing: true,
            ..Self::default()
        }
    }

    /// Sequence 1 is aligned completely somewhere inside sequence 2.
    pub fn sequence2_ends() -> Self {
        Self {
            sequence2_leading: true,
            sequence2_trailing: true,
            ..Self::default()
        }
    }

    pub fn all() -> Self {
        Self {
            sequence1_leading: true,
            sequence1_trailing: true,
            sequence2_leading: true,
            sequence2_trailing: true,
        }
    }

    pub fn first_row(&self) -> bool {
        self.sequence1_leading
    }
    pub fn last_row(&self) -> bool {
        self.sequence1_trailing
    }
    pub fn first_col(&self) -> bool {
        self.sequence2_leading
    }
    pub fn last_col(&self) -> bool {
        self.sequence2_trailing
    }
}

/// The alignment method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Method {
    /// End-to-end alignment. Free end gaps turn it into a semi-global alignment.
    Global(FreeEndGaps),
    /// The best scoring pair of substrings. Scores never drop below 0.
    Local,
}

impl Default for Method {
    fn default() -> Self {
        Method::Global(FreeEndGaps::none())
    }
}

impl Method {
    pub fn global() -> Self {
        Method::Global(FreeEndGaps::none())
    }

    pub fn semi_global(free: FreeEndGaps) -> Self {
        Method::Global(free)
    }

    pub fn local() -> Self {
        Method::Local
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Method::Local)
    }

    /// The free end gaps. Local alignment reports none: it has no fixed edges.
    pub fn free_ends(&self) -> FreeEndGaps {
        match self {
            Method::Global(free) => *free,
            Method::Local => FreeEndGaps::none(),
        }
    }
}

/// A diagonal band of the DP matrix.
///
/// A cell `(row, col)` lies inside the band when
/// `lower_diagonal <= col - row <= upper_diagonal`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Band {
    pub lower_diagonal: i32,
    pub upper_diagonal: i32,
}

impl Band {
    pub fn new(lower_diagonal: i32, upper_diagonal: i32) -> Result<Self> {
        let band = Self {
            lower_diagonal,
            upper_diagonal,
        };
        band.validate()?;
        Ok(band)
    }

    /// The band `[-width, width]` around the main diagonal.
    pub fn symmetric(width: u32) -> Self {
        let w = width.min(i32::MAX as u32) as i32;
        Self {
            lower_diagonal: -w,
            upper_diagonal: w,
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.lower_diagonal > self.upper_diagonal {
            return Err(AlignError::InvalidBandConfiguration {
                lower: self.lower_diagonal,
                upper: self.upper_diagonal,
                reason: "lower diagonal exceeds upper diagonal",
            });
        }
        Ok(())
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        let d = col as i64 - row as i64;
        self.lower_diagonal as i64 <= d && d <= self.upper_diagonal as i64
    }
}
