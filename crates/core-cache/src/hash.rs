//! 64-bit hash combination.

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

/// `floor(2^63 * (sqrt(5) - 1) / 2)`, the golden-ratio mixing constant.
const HASH_CONSTANT: u64 = 0x4f1b_bcdc_bfa5_3e0a;

/// Combine two hashes, order-sensitive.
pub fn hash_combine(left: u64, right: u64) -> u64 {
    left ^ right
        .wrapping_add(HASH_CONSTANT)
        .wrapping_add(left << 62)
        .wrapping_add(left >> 2)
}

/// Fold a hash sequence right-to-left: `combine(h0, combine(h1, ...))`.
pub fn hash_combine_all(hashes: &[u64]) -> u64 {
    let mut iter = hashes.iter().rev();
    let mut combined = iter.next().copied().unwrap_or(0);
    for hash in iter {
        combined = hash_combine(*hash, combined);
    }
    combined
}

/// Combine two hashes so that argument order does not matter.
pub fn symmetric_hash_combine(left: u64, right: u64) -> u64 {
    if right < left {
        hash_combine(right, left)
    } else {
        hash_combine(left, right)
    }
}

/// Hash a single value with the process-deterministic default hasher.
pub fn hash_value<T: Hash + ?Sized>(value: &T) -> u64 {
    let mut hasher = DefaultHasher::new();
    value.hash(&mut hasher);
    hasher.finish()
}

/// Order-sensitive hash of a pair of values.
pub fn hash_pair<A: Hash + ?Sized, B: Hash + ?Sized>(left: &A, right: &B) -> u64 {
    hash_combine(hash_value(left), hash_value(right))
}

/// Order-insensitive hash of a pair of values of the same type.
pub fn symmetric_hash_pair<T: Hash + ?Sized>(left: &T, right: &T) -> u64 {
    symmetric_hash_combine(hash_value(left), hash_value(right))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_pair_hash_ignores_order() {
        assert_eq!(
            symmetric_hash_pair("what a long day", "what a long say"),
            symmetric_hash_pair("what a long say", "what a long day")
        );
    }

    #[test]
    fn ordered_pair_hash_respects_order() {
        assert_ne!(hash_pair("left", "right"), hash_pair("right", "left"));
    }

    #[test]
    fn combine_all_folds_right_to_left() {
        let hashes = [hash_value("a"), hash_value("b"), hash_value("c")];
        assert_eq!(
            hash_combine_all(&hashes),
            hash_combine(hashes[0], hash_combine(hashes[1], hashes[2]))
        );
        assert_eq!(hash_combine_all(&hashes[..1]), hashes[0]);
    }
}
