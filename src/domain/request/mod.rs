//! Request builders: one operation per request type, all producing the
//! canonical, signed, wire-ready bytes of a request.
//!
//! For fixed inputs the output is byte-identical across runs: payloads are
//! canonical-serialized and both shipped signature schemes are deterministic.
//! The eventual unique suffix of an identifier derives from these bytes.

mod create;
mod deactivate;
mod recover;
mod update;

pub use create::{new_create_request, CreateRequestInfo};
pub use deactivate::{new_deactivate_request, DeactivateRequestInfo};
pub use recover::{new_recover_request, RecoverRequestInfo};
pub use update::{new_update_request, UpdateRequestInfo};

use crate::domain::canonical;
use crate::domain::multihash;
use crate::domain::operation::models::Delta;
use crate::domain::patch::Patch;
use crate::domain::signer::Signer;
use crate::foundation::error::SidetreeError;

/// Signers for update/recover/deactivate must carry an algorithm and a
/// non-empty kid in the protected headers.
pub(crate) fn validate_signer(signer: &dyn Signer) -> Result<(), SidetreeError> {
    let header = signer.headers();
    if header.alg.is_empty() {
        return Err(SidetreeError::schema("algorithm must be present in the protected header".to_string()));
    }
    if header.kid.as_deref().unwrap_or("").is_empty() {
        return Err(SidetreeError::MissingKid);
    }
    Ok(())
}

/// Canonical bytes of the delta built from a single patch.
pub(crate) fn delta_bytes(update_commitment: &str, patch: Patch) -> Result<Vec<u8>, SidetreeError> {
    let delta = Delta { update_commitment: update_commitment.to_string(), patches: vec![patch] };
    canonical::canonicalize(&delta)
}

pub(crate) fn encoded_multihash(code: u64, bytes: &[u8]) -> Result<String, SidetreeError> {
    multihash::compute_encoded_multihash(code, bytes)
}
