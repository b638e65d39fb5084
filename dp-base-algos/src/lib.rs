//! A column-wise dynamic programming engine for pairwise alignment with affine gaps.
//!
//! The matrix is swept one column at a time: column `j` covers prefix `j` of
//! the reference, row `i` prefix `i` of the query. [`PairwiseAligner`] runs a
//! single pair on scalar scores, with a full matrix, a rolling column, or a
//! diagonal band. [`SimdBatchAligner`] computes scores only, for many pairs at
//! once, one pair per lane. [`MyersAligner`] computes unit-cost edit
//! distances bit-parallel, optionally bounded by a maximum number of errors.

pub mod band;
pub mod batch;
pub mod config;
pub mod edit_distance;
pub mod executor;
pub mod kernel;
pub mod optimum;
pub mod pool;
pub mod recurrence;
pub mod score;
pub mod simd;
pub mod storage;
pub mod traceback;

#[cfg(test)]
mod tests;

pub use band::BandCoordinateMapper;
pub use batch::SimdBatchAligner;
pub use config::{AlignConfig, OutputConfig, StorageChoice};
pub use edit_distance::{EditDistanceConfig, MyersAligner};
pub use executor::{AlignmentResult, ExecutorState, PairwiseAligner};
pub use optimum::AlignmentOptimum;
pub use pool::MatrixPool;
pub use score::{DpScore, LaneScalar, Lanes};
pub use traceback::Alignment;
