//! Canonical JSON serialization (JSON Canonicalization Scheme).
//!
//! Object keys are sorted by code point, no insignificant whitespace is
//! emitted, and numbers take their shortest round-trip form. Identical
//! logical values always produce byte-identical output; every hash in the
//! protocol is computed over this form.

use crate::foundation::error::SidetreeError;
use serde::Serialize;
use serde_json::Value;

/// Serialize a value to its canonical JSON byte form.
pub fn canonicalize<T: Serialize>(value: &T) -> Result<Vec<u8>, SidetreeError> {
    // Round-tripping through `Value` sorts object keys; `serde_json`'s map is
    // ordered by key, and compact output carries no whitespace.
    let value = serde_json::to_value(value)?;
    Ok(serde_json::to_vec(&value)?)
}

/// Re-canonicalize raw JSON bytes.
pub fn canonicalize_bytes(bytes: &[u8]) -> Result<Vec<u8>, SidetreeError> {
    let value: Value = serde_json::from_slice(bytes)?;
    Ok(serde_json::to_vec(&value)?)
}
