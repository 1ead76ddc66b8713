// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Shuffles samples with a FIXED seed and splits them into two
// sets:
//   - Training set:   used to update the weights
//   - Validation set: used to measure accuracy on unseen data
//
// The shuffle has to be reproducible: the same samples, seed and
// fraction must give the same partitions on every run. We use
// ChaCha8 from rand_chacha, whose output stream is fixed for a
// given seed, and rand's Fisher-Yates `shuffle` over an index
// permutation. The permutation is computed once and then applied,
// so several parallel sequences can be reordered identically.
//
// Cut point: floor(len * fraction). Positions [0, cut) go to the
// first set, [cut, len) to the second, in permuted order.
//
// Reference: rand / rand_chacha crate documentation

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::domain::error::{CoreError, Result};

/// Seed used when the caller does not pick one.
pub const DEFAULT_SPLIT_SEED: u64 = 0;

/// A permutation of `0..len`, determined entirely by `(len, seed)`.
pub fn shuffled_indices(len: usize, seed: u64) -> Vec<usize> {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    let mut order: Vec<usize> = (0..len).collect();
    order.shuffle(&mut rng);
    order
}

/// Number of samples that land in the first partition.
///
/// `fraction` must lie strictly inside (0, 1).
pub fn cut_index(len: usize, fraction: f64) -> Result<usize> {
    if !(fraction > 0.0 && fraction < 1.0) {
        return Err(CoreError::InvalidSplitFraction(fraction));
    }
    Ok(((len as f64) * fraction).floor() as usize)
}

/// Reorder `samples` by `order` (a permutation of its positions).
pub fn apply_permutation<T>(samples: Vec<T>, order: &[usize]) -> Vec<T> {
    debug_assert_eq!(samples.len(), order.len());
    let mut slots: Vec<Option<T>> = samples.into_iter().map(Some).collect();
    order.iter().filter_map(|&i| slots[i].take()).collect()
}

/// Shuffle `samples` with `seed` and split into (first, second).
///
/// # Example
/// ```
/// use question_classifier::data::splitter::split_train_val;
///
/// let (train, val) = split_train_val((0..10).collect::<Vec<_>>(), 0.8, 0).unwrap();
/// assert_eq!((train.len(), val.len()), (8, 2));
/// ```
pub fn split_train_val<T>(
    samples:  Vec<T>,
    fraction: f64,
    seed:     u64,
) -> Result<(Vec<T>, Vec<T>)> {
    let total    = samples.len();
    let split_at = cut_index(total, fraction)?;

    let order     = shuffled_indices(total, seed);
    let mut first = apply_permutation(samples, &order);
    let second    = first.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} / {} (fraction {}, seed {})",
        first.len(),
        second.len(),
        fraction,
        seed,
    );

    Ok((first, second))
}
