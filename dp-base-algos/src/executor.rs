//! Drives a single scalar alignment: allocation, the column sweep, the optimum, and the traceback.
use crate::{
    band::BandCoordinateMapper,
    config::{AlignConfig, StorageChoice},
    kernel::{CellKernel, ScalarKernel},
    pool::MatrixPool,
    recurrence::{NoTrace, TraceMode, WithTrace},
    storage::{FullMatrix, MatrixStorage, OneColumnBanded, OneColumnRolling},
    traceback::{traceback, Alignment},
};
use dp_types::*;
use dp_vis_types::{ColumnObserver, NoDebug};
use log::{debug, trace};
use rayon::prelude::*;

/// The lifecycle of one alignment.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExecutorState {
    Uninitialized,
    MatrixAllocated,
    ColumnsProcessing,
    OptimumFound,
    TracebackDone,
    Finished,
}

impl ExecutorState {
    fn can_advance_to(self, next: ExecutorState) -> bool {
        use ExecutorState::*;
        matches!(
            (self, next),
            (Uninitialized, MatrixAllocated)
                | (MatrixAllocated, ColumnsProcessing)
                | (ColumnsProcessing, OptimumFound)
                | (OptimumFound, TracebackDone)
                | (OptimumFound, Finished)
                | (TracebackDone, Finished)
        )
    }
}

/// The outcome of aligning one pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AlignmentResult {
    pub score: Score,
    /// The cell where the optimal alignment ends.
    pub end: Coordinate,
    /// Where the alignment starts, when a traceback was requested.
    pub begin: Option<Coordinate>,
    pub alignment: Option<Alignment>,
}

/// The storage actually used for one pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum StorageKind {
    Full,
    Rolling,
    Banded,
}

/// Aligns pairs of sequences under a fixed, validated configuration.
///
/// The first sequence (the reference) runs along the columns, the second (the
/// query) along the rows.
#[derive(Clone, Debug)]
pub struct PairwiseAligner {
    config: AlignConfig,
}

impl PairwiseAligner {
    pub fn new(config: AlignConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &AlignConfig {
        &self.config
    }

    pub fn align(&self, reference: Seq, query: Seq) -> Result<AlignmentResult> {
        self.align_with(reference, query, &mut MatrixPool::new(), &mut NoDebug)
    }

    /// Aligns one pair, drawing buffers from `pool` and reporting every column to `observer`.
    pub fn align_with<O: ColumnObserver>(
        &self,
        reference: Seq,
        query: Seq,
        pool: &mut MatrixPool<Score>,
        observer: &mut O,
    ) -> Result<AlignmentResult> {
        if reference.is_empty() {
            return Err(AlignError::EmptySequence(Which::First));
        }
        if query.is_empty() {
            return Err(AlignError::EmptySequence(Which::Second));
        }
        let dims = MatrixDims::for_pair(reference, query);
        self.config.check_score_range(dims)?;
        let traced = self.config.output.needs_traceback();
        let kind = match (self.config.band, self.config.storage) {
            (Some(_), _) => StorageKind::Banded,
            (None, StorageChoice::FullMatrix) => StorageKind::Full,
            (None, StorageChoice::OneColumnRolling) => StorageKind::Rolling,
            (None, StorageChoice::Auto) if traced => StorageKind::Full,
            (None, StorageChoice::Auto) => StorageKind::Rolling,
        };
        if traced && kind == StorageKind::Rolling {
            return Err(AlignError::TraceUnavailable);
        }
        debug!(
            "Aligning {}x{} ({:?}) with {:?} storage, band {:?}, traceback {}",
            dims.rows, dims.cols, self.config.method, kind, self.config.band, traced
        );

        let run = Execution {
            config: &self.config,
            reference,
            query,
            dims,
            state: ExecutorState::Uninitialized,
        };
        match (kind, traced) {
            (StorageKind::Banded, _) => {
                let band = self
                    .config
                    .band
                    .ok_or(AlignError::InvalidAlignment("banded storage without a band"))?;
                let mapper = BandCoordinateMapper::new(band, dims, &self.config.method)?;
                if traced {
                    run.run::<WithTrace, _, _>(OneColumnBanded::<Score, WithTrace>::new(mapper), pool, observer)
                } else {
                    run.run::<NoTrace, _, _>(OneColumnBanded::<Score, NoTrace>::new(mapper), pool, observer)
                }
            }
            (StorageKind::Full, true) => {
                run.run::<WithTrace, _, _>(FullMatrix::<Score, WithTrace>::new(), pool, observer)
            }
            (StorageKind::Full, false) => {
                run.run::<NoTrace, _, _>(FullMatrix::<Score, NoTrace>::new(), pool, observer)
            }
            (StorageKind::Rolling, _) => {
                run.run::<NoTrace, _, _>(OneColumnRolling::<Score>::new(), pool, observer)
            }
        }
    }

    /// Aligns all pairs in parallel, with one [`MatrixPool`] per worker.
    ///
    /// Result `i` belongs to `pairs[i]`.
    pub fn align_all(&self, pairs: &[(Sequence, Sequence)]) -> Vec<Result<AlignmentResult>> {
        let mut results: Vec<(usize, Result<AlignmentResult>)> = pairs
            .par_iter()
            .enumerate()
            .map_init(MatrixPool::new, |pool, (i, (reference, query))| {
                (i, self.align_with(reference, query, pool, &mut NoDebug))
            })
            .collect();
        results.sort_by_key(|(i, _)| *i);
        results.into_iter().map(|(_, r)| r).collect()
    }
}

struct Execution<'a> {
    config: &'a AlignConfig,
    reference: Seq<'a>,
    query: Seq<'a>,
    dims: MatrixDims,
    state: ExecutorState,
}

impl<'a> Execution<'a> {
    fn advance(&mut self, next: ExecutorState) {
        debug_assert!(
            self.state.can_advance_to(next),
            "invalid transition {:?} -> {:?}",
            self.state,
            next
        );
        trace!("{:?} -> {:?}", self.state, next);
        self.state = next;
    }

    fn run<T: TraceMode, S: MatrixStorage<Score>, O: ColumnObserver>(
        mut self,
        mut storage: S,
        pool: &mut MatrixPool<Score>,
        observer: &mut O,
    ) -> Result<AlignmentResult> {
        let config = self.config;
        let mut kernel = ScalarKernel::<T>::new(
            &config.method,
            &config.scoring,
            &config.gaps,
            self.reference,
            self.query,
        );
        storage.resize(self.dims, kernel.lowest(), pool)?;
        self.advance(ExecutorState::MatrixAllocated);
        observer.start(self.dims, self.reference, self.query);

        self.advance(ExecutorState::ColumnsProcessing);
        for col in storage.columns() {
            storage.compute_column(col, &mut kernel);
            observer.column(storage.column());
        }
        let optimum = kernel.tracker().optimum();
        self.advance(ExecutorState::OptimumFound);

        let alignment = if config.output.needs_traceback() {
            let alignment = traceback(
                &storage,
                self.reference,
                self.query,
                optimum.coordinate,
                config.output.extended_cigar,
            );
            let alignment = match alignment {
                Ok(alignment) => alignment,
                Err(e) => {
                    storage.release(pool);
                    return Err(e);
                }
            };
            self.advance(ExecutorState::TracebackDone);
            Some(alignment)
        } else {
            None
        };
        observer.finish(
            optimum.score,
            optimum.coordinate,
            alignment.as_ref().map(|a| &a.cigar),
        );
        storage.release(pool);
        self.advance(ExecutorState::Finished);

        Ok(AlignmentResult {
            score: optimum.score,
            end: optimum.coordinate,
            begin: alignment.as_ref().map(|a| a.begin),
            alignment: alignment.filter(|_| config.output.alignment),
        })
    }
}
