//! Polynomial string hashing.

/// Base of the hash that picks the first slot of a probe sequence.
pub const PRIME_1: u64 = 151;

/// Base of the hash that picks the probe step.
pub const PRIME_2: u64 = 163;

/// Computes `Σ a^(len-1-i) * s[i] mod m` over the bytes of `s`.
///
/// Evaluated in Horner form and reduced after every byte, so the accumulator never grows past
/// `m * a + 255` no matter how long the key is. The result lies in `[0, m)`.
///
/// # Panics
///
/// Panics if `m` is zero.
#[must_use]
#[allow(clippy::arithmetic_side_effects, clippy::cast_possible_truncation)]
pub fn hash(s: &[u8], a: u64, m: usize) -> usize {
    assert_ne!(m, 0, "hash modulus must be non-zero");

    let a = u128::from(a);
    let m = m as u128;
    let hash = s.iter().fold(0_u128, |acc, &byte| (acc * a + u128::from(byte)) % m);

    // `hash < m` and `m` came from a `usize`.
    hash as usize
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_matches_polynomial_definition() {
        // "cat" = [99, 97, 116]: 99 * 151^2 + 97 * 151 + 116
        let expected = (99 * 151 * 151 + 97 * 151 + 116) % 53;
        assert_eq!(hash(b"cat", PRIME_1, 53), expected);

        let expected = (99 * 163 * 163 + 97 * 163 + 116) % 1_000_003;
        assert_eq!(hash(b"cat", PRIME_2, 1_000_003), expected);
    }

    #[test]
    fn test_hash_empty_key() {
        assert_eq!(hash(b"", PRIME_1, 11), 0);
    }

    #[test]
    fn test_hash_in_range() {
        for m in [1_usize, 2, 11, 53, 97] {
            for key in ["", "a", "cat", "a much longer key than the others"] {
                assert!(hash(key.as_bytes(), PRIME_1, m) < m);
                assert!(hash(key.as_bytes(), PRIME_2, m) < m);
            }
        }
    }

    #[test]
    fn test_hash_long_key_does_not_overflow() {
        let key = vec![0xff_u8; 100_000];
        let m = usize::MAX;
        assert!(hash(&key, PRIME_2, m) < m);
    }

    #[test]
    fn test_bases_differ() {
        assert_ne!(hash(b"dog", PRIME_1, 1_000_003), hash(b"dog", PRIME_2, 1_000_003));
    }

    #[test]
    #[should_panic(expected = "non-zero")]
    fn test_hash_zero_modulus_panics() {
        let _ = hash(b"cat", PRIME_1, 0);
    }
}
