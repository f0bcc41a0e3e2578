//! Commitment/reveal hashing.
//!
//! A commitment is the encoded multihash of the canonical form of a public
//! key JWK. The chain of commitments lives in the operation store's history;
//! resolution-time consumers call `verify_reveal` when applying an operation
//! against the previous one. This engine never traverses history itself.

use crate::domain::canonical;
use crate::domain::jws::PublicJwk;
use crate::domain::multihash;
use crate::foundation::error::SidetreeError;

/// Commitment to a key: encoded multihash of its canonical JWK form.
pub fn compute_commitment(code: u64, jwk: &PublicJwk) -> Result<String, SidetreeError> {
    multihash::compute_encoded_multihash(code, &canonical::canonicalize(jwk)?)
}

/// Check that `reveal` is the preimage of `previous_commitment`.
///
/// The hash algorithm is the one embedded in the commitment itself.
pub fn verify_reveal(previous_commitment: &str, reveal: &PublicJwk) -> Result<(), SidetreeError> {
    let code = multihash::multihash_code_from_encoded(previous_commitment)?;
    let computed = compute_commitment(code, reveal)?;
    if computed != previous_commitment {
        return Err(SidetreeError::CommitmentRevealMismatch);
    }
    Ok(())
}
