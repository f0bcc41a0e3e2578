use crate::domain::canonical;
use crate::domain::jws::{sign_model, PublicJwk};
use crate::domain::operation::models::{DeactivateRequest, DeactivateSignedData, OperationType};
use crate::domain::request::validate_signer;
use crate::domain::signer::Signer;
use crate::foundation::error::SidetreeError;

/// The information required to create a deactivate request.
pub struct DeactivateRequestInfo<'a> {
    /// Suffix of the identifier to be deactivated.
    pub did_suffix: String,
    /// Key proving knowledge of the reveal for the current recovery.
    pub recovery_key: Option<PublicJwk>,
    /// Signs the request-specific subset of data.
    pub signer: &'a dyn Signer,
}

/// Build the canonical payload for a 'deactivate' request. Deactivations
/// carry no delta.
pub fn new_deactivate_request(info: &DeactivateRequestInfo<'_>) -> Result<Vec<u8>, SidetreeError> {
    if info.did_suffix.is_empty() {
        return Err(SidetreeError::MissingField("did unique suffix"));
    }
    let recovery_key = info.recovery_key.clone().ok_or(SidetreeError::MissingField("recovery key"))?;
    validate_signer(info.signer)?;

    let signed_data = DeactivateSignedData { did_suffix: info.did_suffix.clone(), recovery_key };
    let jws = sign_model(&signed_data, info.signer)?;

    let request =
        DeactivateRequest { operation: OperationType::Deactivate, did_suffix: info.did_suffix.clone(), signed_data: jws };
    canonical::canonicalize(&request)
}
