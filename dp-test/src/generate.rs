//! Random sequence pairs with a controlled error rate.
use dp_types::Sequence;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

pub const DNA: &[u8] = b"ACGT";

/// Where the differences between the two sequences come from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ErrorModel {
    /// Substitutions, insertions and deletions in equal proportion.
    Uniform,
    /// Insertions in `b` are random repeats of the preceding symbol.
    NoisyInsert,
    /// Mostly deletions from `a`.
    NoisyDelete,
}

pub fn random_sequence(n: usize, rng: &mut impl Rng) -> Sequence {
    (0..n).map(|_| DNA[rng.gen_range(0..DNA.len())]).collect()
}

/// Mutates `a` with roughly `e * |a|` edits.
pub fn mutate(a: &[u8], e: f32, model: ErrorModel, rng: &mut impl Rng) -> Sequence {
    let edits = (a.len() as f32 * e).round() as usize;
    let mut b = a.to_vec();
    for _ in 0..edits {
        let kind = match model {
            ErrorModel::Uniform => rng.gen_range(0..3),
            ErrorModel::NoisyInsert => {
                if rng.gen_bool(0.8) {
                    1
                } else {
                    rng.gen_range(0..3)
                }
            }
            ErrorModel::NoisyDelete => {
                if rng.gen_bool(0.8) {
                    2
                } else {
                    rng.gen_range(0..3)
                }
            }
        };
        match kind {
            0 if !b.is_empty() => {
                let i = rng.gen_range(0..b.len());
                b[i] = DNA[rng.gen_range(0..DNA.len())];
            }
            1 => {
                let i = rng.gen_range(0..=b.len());
                let c = match model {
                    ErrorModel::NoisyInsert if i > 0 => b[i - 1],
                    _ => DNA[rng.gen_range(0..DNA.len())],
                };
                b.insert(i, c);
            }
            2 if !b.is_empty() => {
                let i = rng.gen_range(0..b.len());
                b.remove(i);
            }
            _ => {}
        }
    }
    b
}

/// A random sequence of length `n` and a mutated copy, drawn from `rng`.
///
/// Both sequences are non-empty.
pub fn generate_pair(n: usize, e: f32, model: ErrorModel, rng: &mut impl Rng) -> (Sequence, Sequence) {
    let a = random_sequence(n.max(1), rng);
    let mut b = mutate(&a, e, model, rng);
    if b.is_empty() {
        b.push(DNA[rng.gen_range(0..DNA.len())]);
    }
    (a, b)
}

/// As [`generate_pair`], with a fresh ChaCha8 generator seeded by `seed`.
pub fn generate_model(n: usize, e: f32, model: ErrorModel, seed: u64) -> (Sequence, Sequence) {
    generate_pair(n, e, model, &mut ChaCha8Rng::seed_from_u64(seed))
}
