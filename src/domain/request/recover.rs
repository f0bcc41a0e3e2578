use crate::domain::canonical;
use crate::domain::jws::{sign_model, PublicJwk};
use crate::domain::operation::models::{OperationType, RecoverRequest, RecoverSignedData};
use crate::domain::patch::Patch;
use crate::domain::request::{delta_bytes, encoded_multihash, validate_signer};
use crate::domain::signer::Signer;
use crate::foundation::error::SidetreeError;
use crate::foundation::util::encoding;

/// The information required to create a recover request.
pub struct RecoverRequestInfo<'a> {
    /// Suffix of the identifier to be recovered.
    pub did_suffix: String,
    /// The patch replacing the document.
    pub patch: Option<Patch>,
    /// Commitment to the reveal of the next update.
    pub update_commitment: String,
    /// Commitment to the reveal of the next recovery or deactivation.
    pub recovery_commitment: String,
    /// Key proving knowledge of the reveal for the current recovery.
    pub recovery_key: Option<PublicJwk>,
    /// Multihash code for the delta hash.
    pub multihash_code: u64,
    /// Signs the request-specific subset of data.
    pub signer: &'a dyn Signer,
}

/// Build the canonical payload for a 'recover' request.
pub fn new_recover_request(info: &RecoverRequestInfo<'_>) -> Result<Vec<u8>, SidetreeError> {
    if info.did_suffix.is_empty() {
        return Err(SidetreeError::MissingField("did unique suffix"));
    }
    let patch = info.patch.clone().ok_or(SidetreeError::MissingField("recovery information"))?;
    let recovery_key = info.recovery_key.clone().ok_or(SidetreeError::MissingField("recovery key"))?;
    if info.recovery_commitment.is_empty() {
        return Err(SidetreeError::MissingField("recovery commitment"));
    }
    validate_signer(info.signer)?;

    let delta = delta_bytes(&info.update_commitment, patch)?;
    let delta_hash = encoded_multihash(info.multihash_code, &delta)?;

    let signed_data =
        RecoverSignedData { delta_hash, recovery_key, recovery_commitment: info.recovery_commitment.clone() };
    let jws = sign_model(&signed_data, info.signer)?;

    let request = RecoverRequest {
        operation: OperationType::Recover,
        did_suffix: info.did_suffix.clone(),
        signed_data: jws,
        delta: encoding::encode(delta),
    };
    canonical::canonicalize(&request)
}
