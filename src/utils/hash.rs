//! Content hashing using FxHash.
//!
//! Fast, deterministic hashing for change detection (config hot-reload).
//! `rustc_hash` is already used for FxHashSet/FxHashMap, so this adds no
//! dependency.

use rustc_hash::FxHasher;
use std::hash::Hasher;

/// Compute 64-bit hash from byte data.
#[inline]
pub fn compute<T: AsRef<[u8]> + ?Sized>(data: &T) -> u64 {
    let mut hasher = FxHasher::default();
    hasher.write(data.as_ref());
    hasher.finish()
}
