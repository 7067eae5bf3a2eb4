//! Canonical serialization for run fingerprints.
//!
//! Two runs over the same graph, hits and policy must produce the same
//! fingerprints, so everything hashed here is built from ordered
//! collections.
//!
//! ## Determinism Guarantees
//!
//! - Struct fields serialize in declaration order
//! - Vectors serialize in index order
//! - Maps in hashed data are `BTreeMap`
//! - Timestamps are never part of a fingerprinted value

use serde::Serialize;
use xxhash_rust::xxh64::xxh64;

/// Serialize a value to canonical JSON bytes.
///
/// Values that cannot be represented as JSON (non-string map keys) hash
/// as the empty byte string.
pub fn to_canonical_bytes<T: Serialize>(value: &T) -> Vec<u8> {
    serde_json::to_vec(value).unwrap_or_default()
}

/// xxh64 of the canonical bytes.
pub fn canonical_hash<T: Serialize>(value: &T) -> u64 {
    xxh64(&to_canonical_bytes(value), 0)
}

/// [`canonical_hash`] as 16 lowercase hex digits.
pub fn canonical_hash_hex<T: Serialize>(value: &T) -> String {
    format!("{:016x}", canonical_hash(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{ContigId, PathStep, Terminus};

    #[test]
    fn test_determinism() {
        let steps = vec![
            PathStep::new(ContigId::new(2), Terminus::Head),
            PathStep::new(ContigId::new(3), Terminus::Head),
        ];
        assert_eq!(canonical_hash(&steps), canonical_hash(&steps.clone()));
        assert_eq!(canonical_hash_hex(&steps).len(), 16);
    }

    #[test]
    fn test_order_sensitive() {
        let a = vec![ContigId::new(1), ContigId::new(2)];
        let b = vec![ContigId::new(2), ContigId::new(1)];
        assert_ne!(canonical_hash(&a), canonical_hash(&b));
    }
}
