use anyhow::Context;
use clap::Parser;
use dp_base_algos::{AlignmentResult, MyersAligner, PairwiseAligner, SimdBatchAligner};
use dp_bin::Cli;
use dp_types::*;
use log::{info, warn};
use std::{
    fs::File,
    io::{BufWriter, Write},
    time::Instant,
};

/// Batched alignment; `None` when the configuration or the pairs do not fit in lanes.
fn align_simd(config: &dp_base_algos::AlignConfig, pairs: &[(Sequence, Sequence)]) -> Option<Vec<Result<AlignmentResult>>> {
    let aligner = match SimdBatchAligner::<i16, 16>::new(config.clone()) {
        Ok(aligner) => aligner,
        Err(e) => {
            warn!("Falling back to scalar alignment: {e}");
            return None;
        }
    };
    match aligner.align_all(pairs) {
        Ok(results) => Some(results.into_iter().map(Ok).collect()),
        Err(e) => {
            warn!("Falling back to scalar alignment: {e}");
            None
        }
    }
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Cli::parse();
    let config = args.align_config()?;
    let pairs = args.input_pairs()?;

    let start = Instant::now();
    let results: Vec<Result<Option<AlignmentResult>>> = if let Some(ed) = args.edit_distance_config()? {
        let aligner = MyersAligner::new(ed)?;
        pairs.iter().map(|(a, b)| aligner.align(a, b)).collect()
    } else {
        let results = match args.simd.then(|| align_simd(&config, &pairs)).flatten() {
            Some(results) => results,
            None => PairwiseAligner::new(config)?.align_all(&pairs),
        };
        results.into_iter().map(|r| r.map(Some)).collect()
    };
    info!("Aligned {} pairs in {:?}", pairs.len(), start.elapsed());

    let mut out: Box<dyn Write> = match &args.output {
        Some(path) => Box::new(BufWriter::new(
            File::create(path).with_context(|| format!("creating {}", path.display()))?,
        )),
        None => Box::new(BufWriter::new(std::io::stdout().lock())),
    };
    for (i, r) in results.into_iter().enumerate() {
        match r {
            Ok(None) => info!("Pair {i}: more than {} errors", args.max_errors.unwrap_or_default()),
            Ok(Some(r)) => {
                let cigar = r
                    .alignment
                    .map_or_else(|| "*".to_string(), |a| a.cigar.to_string());
                writeln!(out, "{i}\t{}\t{}\t{cigar}", r.score, r.end)?;
            }
            Err(e) => warn!("Pair {i}: {e}"),
        }
    }
    out.flush()?;
    Ok(())
}
