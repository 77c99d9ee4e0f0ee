//! Canonical serialization for deterministic hashing.
//!
//! Hashed values must be built from ordered data: sort identities and edge
//! pairs before hashing, and use BTreeMap rather than HashMap for maps.

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes for hashing.
///
/// # Panics
///
/// Panics if `value` cannot be serialized. Derived `Serialize` on plain
/// structs with string keys never fails.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).expect("Canonical serialization failed")
}

/// Compute canonical hash of a serializable value.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    let bytes = to_canonical_bytes(value);
    xxh64(&bytes, 0)
}

/// Compute canonical hash and return as hex string.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}
