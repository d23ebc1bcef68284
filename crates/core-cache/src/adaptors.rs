//! Cache adaptors around binary functions.
//!
//! Each adaptor presents the signature of the wrapped function and memoizes
//! results keyed by the argument pair. The synchronized variants take a
//! shared lock for lookups and an exclusive lock (with a re-probe) for
//! inserts; the wrapped function runs under the exclusive lock and must not
//! re-enter the same cache.

use crate::hash::symmetric_hash_pair;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::RwLock;

/// Unordered pair: `(x, y)` and `(y, x)` are equal and hash identically.
#[derive(Debug, Clone)]
pub struct SymmetricPair<T> {
    first: T,
    second: T,
}

impl<T> SymmetricPair<T> {
    pub fn new(first: T, second: T) -> Self {
        SymmetricPair { first, second }
    }

    pub fn first(&self) -> &T {
        &self.first
    }

    pub fn second(&self) -> &T {
        &self.second
    }
}

impl<T: PartialEq> PartialEq for SymmetricPair<T> {
    fn eq(&self, other: &Self) -> bool {
        (self.first == other.first && self.second == other.second)
            || (self.first == other.second && self.second == other.first)
    }
}

impl<T: Eq> Eq for SymmetricPair<T> {}

impl<T: Hash> Hash for SymmetricPair<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(symmetric_hash_pair(&self.first, &self.second));
    }
}

/// Single-threaded cache keyed by the argument pair in declared order.
pub struct OrderedCache<A, B, V, F> {
    bound: F,
    results: HashMap<(A, B), V>,
}

impl<A, B, V, F> OrderedCache<A, B, V, F>
where
    A: Hash + Eq,
    B: Hash + Eq,
    V: Clone,
    F: FnMut(&A, &B) -> V,
{
    pub fn new(bound: F) -> Self {
        OrderedCache {
            bound,
            results: HashMap::new(),
        }
    }

    pub fn call(&mut self, left: A, right: B) -> V {
        let key = (left, right);
        if let Some(value) = self.results.get(&key) {
            return value.clone();
        }
        let value = (self.bound)(&key.0, &key.1);
        self.results.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Single-threaded cache where argument order does not matter.
pub struct SymmetricCache<T, V, F> {
    bound: F,
    results: HashMap<SymmetricPair<T>, V>,
}

impl<T, V, F> SymmetricCache<T, V, F>
where
    T: Hash + Eq,
    V: Clone,
    F: FnMut(&T, &T) -> V,
{
    pub fn new(bound: F) -> Self {
        SymmetricCache {
            bound,
            results: HashMap::new(),
        }
    }

    pub fn call(&mut self, left: T, right: T) -> V {
        let key = SymmetricPair::new(left, right);
        if let Some(value) = self.results.get(&key) {
            return value.clone();
        }
        let value = (self.bound)(key.first(), key.second());
        self.results.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// Thread-safe ordered cache.
pub struct SyncOrderedCache<A, B, V, F> {
    bound: F,
    results: RwLock<HashMap<(A, B), V>>,
}

impl<A, B, V, F> SyncOrderedCache<A, B, V, F>
where
    A: Hash + Eq,
    B: Hash + Eq,
    V: Clone,
    F: Fn(&A, &B) -> V,
{
    pub fn new(bound: F) -> Self {
        SyncOrderedCache {
            bound,
            results: RwLock::new(HashMap::new()),
        }
    }

    pub fn call(&self, left: A, right: B) -> V {
        let key = (left, right);
        {
            let results = self.results.read().unwrap_or_else(|e| e.into_inner());
            if let Some(value) = results.get(&key) {
                return value.clone();
            }
        }
        let mut results = self.results.write().unwrap_or_else(|e| e.into_inner());
        if let Some(value) = results.get(&key) {
            return value.clone();
        }
        let value = (self.bound)(&key.0, &key.1);
        results.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.results
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Thread-safe symmetric cache.
pub struct SyncSymmetricCache<T, V, F> {
    bound: F,
    results: RwLock<HashMap<SymmetricPair<T>, V>>,
}

impl<T, V, F> SyncSymmetricCache<T, V, F>
where
    T: Hash + Eq,
    V: Clone,
    F: Fn(&T, &T) -> V,
{
    pub fn new(bound: F) -> Self {
        SyncSymmetricCache {
            bound,
            results: RwLock::new(HashMap::new()),
        }
    }

    pub fn call(&self, left: T, right: T) -> V {
        let key = SymmetricPair::new(left, right);
        {
            let results = self.results.read().unwrap_or_else(|e| e.into_inner());
            if let Some(value) = results.get(&key) {
                return value.clone();
            }
        }
        let mut results = self.results.write().unwrap_or_else(|e| e.into_inner());
        if let Some(value) = results.get(&key) {
            return value.clone();
        }
        let value = (self.bound)(key.first(), key.second());
        results.insert(key, value.clone());
        value
    }

    pub fn len(&self) -> usize {
        self.results
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
