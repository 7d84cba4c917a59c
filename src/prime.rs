//! Primality helpers used to size the backing storage.
//!
//! Slot arrays always have a prime length: together with a non-zero probe step this makes every
//! probe sequence a permutation of the whole table.

/// Returns `true` if `n` is prime.
///
/// Plain trial division by odd numbers up to `⌊√n⌋`, which is plenty for table sizes.
#[must_use]
pub fn is_prime(n: usize) -> bool {
    if n <= 1 {
        return false;
    }
    if n % 2 == 0 {
        return n == 2;
    }

    let mut divisor: usize = 3;
    // `divisor <= n / divisor` is `divisor * divisor <= n` without the overflow.
    while divisor <= n / divisor {
        if n % divisor == 0 {
            return false;
        }
        divisor = divisor.saturating_add(2);
    }
    true
}

/// Returns the smallest prime that is greater than or equal to `n`.
///
/// Returns `None` when no such prime fits in a `usize`.
#[must_use]
pub fn next_prime(n: usize) -> Option<usize> {
    let mut candidate = n;
    loop {
        if is_prime(candidate) {
            return Some(candidate);
        }
        candidate = candidate.checked_add(1)?;
    }
}
