//! Double-hashing probe sequences.

use crate::hash::{PRIME_1, PRIME_2, hash};

/// Returns the slot examined on the `attempt`-th probe for `key` in a table of `size` slots.
///
/// `(h1 + attempt * (h2 + 1)) mod size`, where `h1` and `h2` are the [`PRIME_1`] and [`PRIME_2`]
/// hashes modulo `size`. When `h2 + 1` equals `size` the step would be zero modulo `size`, so
/// that key steps by 1 instead. The step is therefore in `[1, size - 1]`, and for a prime `size`
/// the indices for attempts `0..size` are a permutation of `0..size`.
///
/// # Panics
///
/// Panics if `size` is zero.
#[must_use]
pub fn probe_index(key: &[u8], size: usize, attempt: usize) -> usize {
    ProbeSequence::new(key, size).index_at(attempt)
}

/// The probe sequence of a single key, yielding each slot index of the table exactly once.
#[derive(Debug, Clone)]
pub struct ProbeSequence {
    /// Index of attempt zero
    start: usize,
    /// Distance between consecutive attempts, never zero modulo `size`
    step: usize,
    /// Number of slots in the table
    size: usize,
    /// Next attempt to yield
    attempt: usize,
}

impl ProbeSequence {
    /// Hashes `key` once and prepares its probe sequence for a table of `size` slots.
    ///
    /// # Panics
    ///
    /// Panics if `size` is zero.
    #[must_use]
    pub fn new(key: &[u8], size: usize) -> Self {
        let start = hash(key, PRIME_1, size);
        let step = match hash(key, PRIME_2, size).checked_add(1) {
            Some(step) if step < size => step,
            _ => 1,
        };
        Self { start, step, size, attempt: 0 }
    }

    /// Slot index of the given attempt.
    #[must_use]
    #[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
    pub fn index_at(&self, attempt: usize) -> usize {
        let size = self.size as u128;
        let offset = (attempt as u128 % size) * self.step as u128;
        ((self.start as u128 + offset) % size) as usize
    }
}

impl Iterator for ProbeSequence {
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.attempt >= self.size {
            return None;
        }
        let index = self.index_at(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Some(index)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.size.saturating_sub(self.attempt);
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for ProbeSequence {}
