//! Memoization adaptors for binary functions.
//!
//! Two key flavors (ordered and symmetric, where `(x, y)` and `(y, x)` hit
//! the same entry) times two synchronization flavors (plain `&mut self`
//! caches and `RwLock`-backed caches that are shared-on-read and
//! exclusive-on-write with a double-checked re-probe). The clusterer wraps
//! its distance functions in the synchronized symmetric flavor so the edge
//! predicate is safe to call from concurrent BFS tasks.

mod adaptors;
mod hash;

pub use adaptors::{
    OrderedCache, SymmetricCache, SymmetricPair, SyncOrderedCache, SyncSymmetricCache,
};
pub use hash::{
    hash_combine, hash_combine_all, hash_pair, hash_value, symmetric_hash_combine,
    symmetric_hash_pair,
};
