//! Score-only alignment of up to `L` pairs at once.
use crate::{
    config::AlignConfig,
    executor::AlignmentResult,
    kernel::CellKernel,
    pool::MatrixPool,
    score::{LaneScalar, Lanes},
    simd::{check_fits, PackedBatch, SimdKernel, SimdScoring},
    storage::{MatrixStorage, OneColumnRolling},
};
use dp_types::*;
use log::debug;
use rayon::prelude::*;

/// Aligns batches of pairs in the lanes of `Lanes<S, L>`.
///
/// Only the score and the end coordinate are computed. Narrow lanes hold more
/// pairs, but every reachable score of every pair in a batch must fit in `S`;
/// this is checked before any column is computed.
#[derive(Clone, Debug)]
pub struct SimdBatchAligner<S, const L: usize> {
    config: AlignConfig,
    scoring: SimdScoring<S, L>,
}

impl<S: LaneScalar, const L: usize> SimdBatchAligner<S, L> {
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        if let Some(band) = config.band {
            return Err(AlignError::InvalidBandConfiguration {
                lower: band.lower_diagonal,
                upper: band.upper_diagonal,
                reason: "banded batches are not supported",
            });
        }
        if config.output.needs_traceback() {
            return Err(AlignError::TraceUnavailable);
        }
        let scoring = SimdScoring::new(&config.scoring, &config.gaps, &config.method)?;
        Ok(Self { config, scoring })
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    /// Fails when a score along some path of the padded matrix could leave the lane range.
    fn check_bound(&self, dims: MatrixDims) -> Result<()> {
        let steps = (dims.rows - 1 + dims.cols - 1) as i64;
        let bound = steps.saturating_mul(self.scoring.max_step(&self.config.gaps));
        let headroom = (self.config.gaps.gap_open() as i64).abs() + (self.config.gaps.gap_extend() as i64).abs();
        check_fits::<S>(bound.saturating_add(headroom)).map_err(|_| AlignError::ScoreOverflowsLane {
            score: bound,
            bits: S::BITS,
        })
    }

    /// Aligns at most `L` pairs. Result `i` belongs to `pairs[i]`.
    pub fn align_batch(
        &self,
        pairs: &[(Seq, Seq)],
        pool: &mut MatrixPool<Lanes<S, L>>,
    ) -> Result<Vec<AlignmentResult>> {
        if pairs.is_empty() {
            return Ok(Vec::new());
        }
        let batch = PackedBatch::<S, L>::new(pairs)?;
        let dims = batch.dims();
        self.check_bound(dims)?;
        debug!(
            "Aligning a batch of {} pairs in {} lanes of {} bits, padded to {}x{}",
            pairs.len(),
            L,
            S::BITS,
            dims.rows,
            dims.cols
        );

        let mut kernel = SimdKernel::new(&self.config.method, &self.config.gaps, &self.scoring, &batch);
        let mut storage = OneColumnRolling::<Lanes<S, L>>::new();
        storage.resize(dims, kernel.lowest(), pool)?;
        for col in storage.columns() {
            storage.compute_column(col, &mut kernel);
        }
        storage.release(pool);

        Ok(kernel
            .tracker()
            .optima()
            .into_iter()
            .map(|optimum| AlignmentResult {
                score: optimum.score,
                end: optimum.coordinate,
                begin: None,
                alignment: None,
            })
            .collect())
    }

    /// Aligns all pairs in batches of `L`, in parallel.
    ///
    /// Result `i` belongs to `pairs[i]`. The first failing batch fails the call.
    pub fn align_all(&self, pairs: &[(Sequence, Sequence)]) -> Result<Vec<AlignmentResult>> {
        let batches = pairs
            .par_chunks(L)
            .map_init(MatrixPool::new, |pool, chunk| {
                let chunk: Vec<(Seq, Seq)> = chunk
                    .iter()
                    .map(|(reference, query)| (reference.as_slice(), query.as_slice()))
                    .collect();
                self.align_batch(&chunk, pool)
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(batches.into_iter().flatten().collect())
    }
}
