// ============================================================
// Layer 4 — Train/Validation Splitter
// ============================================================
// Randomly shuffles row indices and splits them into two sets:
//   - Training set:   used to update model weights
//   - Validation set: used to measure loss on unseen frames
//
// The recordings are sequential laps, so neighbouring rows are
// near-identical frames. Shuffling before the split spreads
// every part of the track across both sets.
//
// Sizing follows the usual test-size rule:
//   n_val   = ceil(n * validation_fraction)
//   n_train = n - n_val
// with n_val clamped so a non-empty dataset always keeps at
// least one training index.
//
// The RNG is seeded from the OS on every call, so two runs
// produce different partitions.
//
// Uses Fisher-Yates shuffle via rand::seq::SliceRandom.

use rand::seq::SliceRandom;

/// Number of validation items for `total` items.
pub fn validation_len(total: usize, validation_fraction: f64) -> usize {
    if total == 0 {
        return 0;
    }
    // The epsilon keeps exact products such as 5 * 0.2 from rounding up to 2
    let wanted = ((total as f64) * validation_fraction.clamp(0.0, 1.0) - 1e-9).ceil() as usize;
    wanted.min(total - 1)
}

/// Randomly shuffle `samples` and split into (train, validation).
pub fn split_train_val<T>(mut samples: Vec<T>, validation_fraction: f64) -> (Vec<T>, Vec<T>) {
    let mut rng = rand::thread_rng();
    samples.shuffle(&mut rng);

    let total    = samples.len();
    let split_at = total - validation_len(total, validation_fraction);

    // After this: samples = [0..split_at], val = [split_at..total]
    let val = samples.split_off(split_at);

    tracing::debug!(
        "Dataset split: {} training, {} validation ({}% / {}%)",
        samples.len(),
        val.len(),
        (samples.len() * 100) / total.max(1),
        (val.len()     * 100) / total.max(1),
    );

    (samples, val)
}

/// Partition the row indices `0..n_records` into (train, validation).
pub fn split_indices(n_records: usize, validation_fraction: f64) -> (Vec<usize>, Vec<usize>) {
    split_train_val((0..n_records).collect(), validation_fraction)
}
