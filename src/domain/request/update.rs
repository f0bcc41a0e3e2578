use crate::domain::canonical;
use crate::domain::jws::{sign_model, PublicJwk};
use crate::domain::operation::models::{OperationType, UpdateRequest, UpdateSignedData};
use crate::domain::patch::Patch;
use crate::domain::request::{delta_bytes, encoded_multihash, validate_signer};
use crate::domain::signer::Signer;
use crate::foundation::error::SidetreeError;
use crate::foundation::util::encoding;

/// The information required to create an update request.
pub struct UpdateRequestInfo<'a> {
    /// Suffix of the identifier to be updated.
    pub did_suffix: String,
    /// The patch applied by this update.
    pub patch: Option<Patch>,
    /// Commitment to the reveal of the next update.
    pub update_commitment: String,
    /// Key proving knowledge of the reveal for the current update.
    pub update_key: Option<PublicJwk>,
    /// Multihash code for the delta hash.
    pub multihash_code: u64,
    /// Signs the request-specific subset of data.
    pub signer: &'a dyn Signer,
}

/// Build the canonical payload for an 'update' request.
pub fn new_update_request(info: &UpdateRequestInfo<'_>) -> Result<Vec<u8>, SidetreeError> {
    if info.did_suffix.is_empty() {
        return Err(SidetreeError::MissingField("did unique suffix"));
    }
    let patch = info.patch.clone().ok_or(SidetreeError::MissingField("update information"))?;
    let update_key = info.update_key.clone().ok_or(SidetreeError::MissingField("update key"))?;
    validate_signer(info.signer)?;

    let delta = delta_bytes(&info.update_commitment, patch)?;
    let delta_hash = encoded_multihash(info.multihash_code, &delta)?;

    let signed_data = UpdateSignedData { update_key, delta_hash };
    let jws = sign_model(&signed_data, info.signer)?;

    let request = UpdateRequest {
        operation: OperationType::Update,
        did_suffix: info.did_suffix.clone(),
        signed_data: jws,
        delta: encoding::encode(delta),
    };
    canonical::canonicalize(&request)
}
