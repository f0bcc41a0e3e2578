use crate::domain::canonical;
use crate::domain::operation::models::{CreateRequest, OperationType, SuffixData};
use crate::domain::patch::Patch;
use crate::domain::request::{delta_bytes, encoded_multihash};
use crate::foundation::error::SidetreeError;
use crate::foundation::util::encoding;

/// The information required to create a create request.
///
/// Creates carry no signature; the identifier is self-certifying through the
/// suffix-data hash.
pub struct CreateRequestInfo {
    /// The initial document patch.
    pub patch: Option<Patch>,
    /// Commitment to the reveal of the first update.
    pub update_commitment: String,
    /// Commitment to the reveal of the first recovery or deactivation.
    pub recovery_commitment: String,
    /// Multihash code for the delta hash and suffix derivation.
    pub multihash_code: u64,
}

/// Build the canonical payload for a 'create' request.
pub fn new_create_request(info: &CreateRequestInfo) -> Result<Vec<u8>, SidetreeError> {
    let patch = info.patch.clone().ok_or(SidetreeError::MissingField("create information"))?;
    if info.recovery_commitment.is_empty() {
        return Err(SidetreeError::MissingField("recovery commitment"));
    }

    let delta = delta_bytes(&info.update_commitment, patch)?;
    let delta_hash = encoded_multihash(info.multihash_code, &delta)?;

    let suffix_data = SuffixData { delta_hash, recovery_commitment: info.recovery_commitment.clone() };
    let suffix_bytes = canonical::canonicalize(&suffix_data)?;

    let request = CreateRequest {
        operation: OperationType::Create,
        suffix_data: encoding::encode(suffix_bytes),
        delta: encoding::encode(delta),
    };
    canonical::canonicalize(&request)
}
