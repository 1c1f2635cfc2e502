//! Document fingerprints
//!
//! A fingerprint is the SHA-256 of a module list's canonical JSON: object
//! keys sorted, no whitespace. Module order is significant, key order is not,
//! and fields kept on unknown modules count like any other.

use serde::Serialize;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Serialize with every object's keys in sorted order.
pub fn canonical_json<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let value = serde_json::to_value(value)?;
    serde_json::to_string(&sorted(value))
}

fn sorted(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<_> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sorted(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sorted).collect()),
        other => other,
    }
}

/// Lowercase hex SHA-256 of the canonical form of `value`.
pub fn compute_fingerprint<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    let canonical = canonical_json(value)?;
    Ok(hex::encode(Sha256::digest(canonical.as_bytes())))
}
