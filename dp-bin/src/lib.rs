use anyhow::{bail, Context};
use bio::io::fasta;
use clap::{value_parser, Parser};
use dp_base_algos::{AlignConfig, EditDistanceConfig, OutputConfig};
use dp_test::{generate::generate_pair, ErrorModel};
use dp_types::*;
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use std::{
    fs::File,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
};

#[derive(clap::ValueEnum, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub enum GeneratedErrors {
    #[default]
    Uniform,
    NoisyInsert,
    NoisyDelete,
}

impl From<GeneratedErrors> for ErrorModel {
    fn from(e: GeneratedErrors) -> Self {
        match e {
            GeneratedErrors::Uniform => ErrorModel::Uniform,
            GeneratedErrors::NoisyInsert => ErrorModel::NoisyInsert,
            GeneratedErrors::NoisyDelete => ErrorModel::NoisyDelete,
        }
    }
}

/// Parses `LOWER,UPPER` into a band.
fn parse_band(s: &str) -> std::result::Result<Band, String> {
    let (lower, upper) = s
        .split_once(',')
        .ok_or_else(|| format!("expected LOWER,UPPER, got {s:?}"))?;
    let parse = |x: &str| x.trim().parse::<i32>().map_err(|e| format!("{x:?}: {e}"));
    Band::new(parse(lower)?, parse(upper)?).map_err(|e| e.to_string())
}

/// Align pairs of sequences with affine gap scores.
#[derive(Parser, Debug)]
#[clap(author, about, disable_version_flag(true))]
pub struct Cli {
    /// A .seq, .txt, or Fasta file with sequence pairs to align.
    ///
    /// Consecutive records form a pair: the first is the reference, the second the query.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub input: Option<PathBuf>,

    /// Write `{index}\t{score}\t{end}\t{cigar}` lines to this file instead of stdout.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub output: Option<PathBuf>,

    /// A JSON alignment configuration. The flags below override it.
    #[clap(short, long, value_parser = value_parser!(PathBuf))]
    pub config: Option<PathBuf>,

    /// Local instead of global alignment.
    #[clap(long)]
    pub local: bool,

    /// Only compute the diagonals `LOWER <= col - row <= UPPER`.
    #[clap(long, value_parser = parse_band, allow_hyphen_values = true)]
    pub band: Option<Band>,

    /// Output a CIGAR for every pair.
    #[clap(long)]
    pub alignment: bool,

    /// Use `=`/`X` instead of `M` in CIGARs.
    #[clap(long, requires = "alignment")]
    pub extended: bool,

    /// Align batches of pairs in 16-bit lanes. Falls back to scalar alignment when the pairs do not fit.
    #[clap(long, conflicts_with = "alignment")]
    pub simd: bool,

    /// Unit-cost edit distance with bit-parallel columns.
    #[clap(long, conflicts_with_all = ["simd", "band", "local"])]
    pub edit_distance: bool,

    /// Report pairs with more edits as unaligned.
    #[clap(long, requires = "edit_distance")]
    pub max_errors: Option<u32>,

    /// Length of generated sequences.
    #[clap(short = 'n', long, default_value_t = 1000, help_heading = "Generated input")]
    pub length: usize,

    /// Relative number of edits in generated pairs.
    #[clap(short, long, default_value_t = 0.05, help_heading = "Generated input")]
    pub error_rate: f32,

    #[clap(long, value_enum, default_value_t, help_heading = "Generated input")]
    pub error_model: GeneratedErrors,

    /// Number of generated pairs.
    #[clap(short = 'x', long, default_value_t = 1, help_heading = "Generated input")]
    pub count: usize,

    /// Seed for generated pairs. Random when not given.
    #[clap(short, long, help_heading = "Generated input")]
    pub seed: Option<u64>,
}

impl Cli {
    /// The configuration file, with the command line flags applied.
    pub fn align_config(&self) -> anyhow::Result<AlignConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
                serde_json::from_reader(BufReader::new(file))
                    .with_context(|| format!("parsing {}", path.display()))?
            }
            None => AlignConfig::default(),
        };
        if self.local {
            config.method = Method::Local;
        }
        if self.band.is_some() {
            config.band = self.band;
        }
        if self.alignment {
            config.output = OutputConfig {
                extended_cigar: self.extended,
                ..OutputConfig::with_alignment()
            };
        }
        config.validate()?;
        Ok(config)
    }

    /// The edit distance configuration, when `--edit-distance` is given.
    ///
    /// Method and output are taken from [`Cli::align_config`]; scores and gaps are unit cost.
    pub fn edit_distance_config(&self) -> anyhow::Result<Option<EditDistanceConfig>> {
        if !self.edit_distance {
            return Ok(None);
        }
        let config = self.align_config()?;
        Ok(Some(EditDistanceConfig {
            method: config.method,
            max_errors: self.max_errors,
            output: config.output,
        }))
    }

    /// The pairs to align: read from `--input`, or generated.
    pub fn input_pairs(&self) -> anyhow::Result<Vec<(Sequence, Sequence)>> {
        match &self.input {
            Some(input) => {
                let files = if input.is_file() {
                    vec![input.clone()]
                } else {
                    input
                        .read_dir()
                        .with_context(|| format!("{} is not a file or directory", input.display()))?
                        .map(|x| x.map(|x| x.path()))
                        .collect::<std::io::Result<Vec<_>>>()?
                };
                let mut pairs = vec![];
                for f in files {
                    pairs.extend(read_pairs(&f)?);
                }
                Ok(pairs)
            }
            None => {
                let seed = self.seed.unwrap_or_else(|| {
                    let seed = ChaCha8Rng::from_entropy().gen_range(0..1_000);
                    eprintln!("Seed: {seed}");
                    seed
                });
                let rng = &mut ChaCha8Rng::seed_from_u64(seed);
                Ok((0..self.count)
                    .map(|_| generate_pair(self.length, self.error_rate, self.error_model.into(), rng))
                    .collect())
            }
        }
    }
}

fn read_pairs(f: &Path) -> anyhow::Result<Vec<(Sequence, Sequence)>> {
    let Some(ext) = f.extension().and_then(|e| e.to_str()) else {
        bail!("{} has no file extension", f.display());
    };
    let reader = BufReader::new(File::open(f).with_context(|| format!("opening {}", f.display()))?);
    match ext {
        "seq" | "txt" => {
            let mut pairs = vec![];
            for (a, b) in reader.lines().tuples() {
                let (mut a, mut b) = (a?.into_bytes(), b?.into_bytes());
                if ext == "seq" {
                    if a.first() != Some(&b'>') || b.first() != Some(&b'<') {
                        bail!("{}: .seq pairs must start with '>' and '<'", f.display());
                    }
                    a.remove(0);
                    b.remove(0);
                }
                pairs.push((a, b));
            }
            Ok(pairs)
        }
        "fna" | "fa" | "fasta" => {
            let mut pairs = vec![];
            for (a, b) in fasta::Reader::new(reader).records().tuples() {
                pairs.push((a?.seq().to_vec(), b?.seq().to_vec()));
            }
            Ok(pairs)
        }
        ext => bail!("Unknown file extension {ext:?}. Must be in {{seq,txt,fna,fa,fasta}}."),
    }
}
