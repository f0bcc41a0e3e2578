//! On-wire request decoding and validation.
//!
//! Peeks the `type` discriminator, dispatches to the per-type decoder, and
//! enforces the cross-field hash and signature checks. Unknown fields are
//! tolerated; missing required fields are rejected. Reveal-value checks
//! against stored commitments are a resolution-time concern; see
//! `domain::commitment::verify_reveal`.

use crate::domain::canonical;
use crate::domain::jws::CompactJws;
use crate::domain::multihash;
use crate::domain::operation::models::{
    CreateRequest, DeactivateRequest, DeactivateSignedData, Delta, OperationKind, ParsedOperation, RecoverRequest,
    RecoverSignedData, SuffixData, UpdateRequest, UpdateSignedData,
};
use crate::domain::protocol::ProtocolParameters;
use crate::foundation::error::SidetreeError;
use crate::foundation::types::{Namespace, UniqueSuffix};
use crate::foundation::util::encoding;
use serde::de::DeserializeOwned;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
struct TypePeek {
    #[serde(rename = "type")]
    operation: Option<String>,
}

pub struct OperationParser {
    params: ProtocolParameters,
}

impl OperationParser {
    pub fn new(params: ProtocolParameters) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ProtocolParameters {
        &self.params
    }

    /// Decode a wire request into a validated operation.
    pub fn parse(&self, namespace: &Namespace, request: &[u8]) -> Result<ParsedOperation, SidetreeError> {
        let peek: TypePeek = decode_schema(request, "operation request")?;
        let operation_type = peek.operation.ok_or(SidetreeError::MissingField("operation type"))?;
        let (unique_suffix, kind) = match operation_type.as_str() {
            "create" => self.parse_create(request)?,
            "update" => self.parse_update(request)?,
            "recover" => self.parse_recover(request)?,
            "deactivate" => self.parse_deactivate(request)?,
            other => return Err(SidetreeError::UnknownOperationType(other.to_string())),
        };
        Ok(ParsedOperation {
            namespace: namespace.clone(),
            id: namespace.did(&unique_suffix),
            unique_suffix,
            operation_buffer: request.to_vec(),
            kind,
        })
    }

    fn parse_create(&self, request: &[u8]) -> Result<(UniqueSuffix, OperationKind), SidetreeError> {
        let request: CreateRequest = decode_schema(request, "create request")?;
        let suffix_bytes = encoding::decode(&request.suffix_data)?;
        let suffix_data: SuffixData = decode_schema(&suffix_bytes, "suffix data")?;
        if suffix_data.delta_hash.is_empty() {
            return Err(SidetreeError::MissingField("delta hash"));
        }
        if suffix_data.recovery_commitment.is_empty() {
            return Err(SidetreeError::MissingField("recovery commitment"));
        }
        let (delta, encoded_delta) = self.verify_delta(&request.delta, &suffix_data.delta_hash)?;
        let unique_suffix = self.derive_unique_suffix(&suffix_bytes)?;
        Ok((
            unique_suffix,
            OperationKind::Create { suffix_data, encoded_suffix_data: request.suffix_data, delta, encoded_delta },
        ))
    }

    fn parse_update(&self, request: &[u8]) -> Result<(UniqueSuffix, OperationKind), SidetreeError> {
        let request: UpdateRequest = decode_schema(request, "update request")?;
        if request.did_suffix.is_empty() {
            return Err(SidetreeError::MissingField("did unique suffix"));
        }
        let jws = CompactJws::parse(&request.signed_data)?;
        let signed: UpdateSignedData = decode_schema(&jws.payload()?, "update signed data")?;
        let (delta, encoded_delta) = self.verify_delta(&request.delta, &signed.delta_hash)?;
        jws.verify(&signed.update_key, &self.params.allowed_algorithms)?;
        Ok((
            UniqueSuffix::from(request.did_suffix),
            OperationKind::Update { signed_data: request.signed_data, signed, delta, encoded_delta },
        ))
    }

    fn parse_recover(&self, request: &[u8]) -> Result<(UniqueSuffix, OperationKind), SidetreeError> {
        let request: RecoverRequest = decode_schema(request, "recover request")?;
        if request.did_suffix.is_empty() {
            return Err(SidetreeError::MissingField("did unique suffix"));
        }
        let jws = CompactJws::parse(&request.signed_data)?;
        let signed: RecoverSignedData = decode_schema(&jws.payload()?, "recover signed data")?;
        if signed.recovery_commitment.is_empty() {
            return Err(SidetreeError::MissingField("recovery commitment"));
        }
        let (delta, encoded_delta) = self.verify_delta(&request.delta, &signed.delta_hash)?;
        jws.verify(&signed.recovery_key, &self.params.allowed_algorithms)?;
        Ok((
            UniqueSuffix::from(request.did_suffix),
            OperationKind::Recover { signed_data: request.signed_data, signed, delta, encoded_delta },
        ))
    }

    fn parse_deactivate(&self, request: &[u8]) -> Result<(UniqueSuffix, OperationKind), SidetreeError> {
        let request: DeactivateRequest = decode_schema(request, "deactivate request")?;
        if request.did_suffix.is_empty() {
            return Err(SidetreeError::MissingField("did unique suffix"));
        }
        let jws = CompactJws::parse(&request.signed_data)?;
        let signed: DeactivateSignedData = decode_schema(&jws.payload()?, "deactivate signed data")?;
        if signed.did_suffix != request.did_suffix {
            return Err(SidetreeError::schema(format!(
                "deactivate signed did_suffix '{}' doesn't match request did_suffix '{}'",
                signed.did_suffix, request.did_suffix
            )));
        }
        jws.verify(&signed.recovery_key, &self.params.allowed_algorithms)?;
        Ok((
            UniqueSuffix::from(request.did_suffix),
            OperationKind::Deactivate { signed_data: request.signed_data, signed },
        ))
    }

    /// Decode an encoded delta and prove that the multihash of its canonical
    /// form equals the hash carried by the accompanying signed data.
    fn verify_delta(&self, encoded_delta: &str, expected_hash: &str) -> Result<(Delta, String), SidetreeError> {
        let bytes = encoding::decode(encoded_delta)?;
        let delta: Delta = decode_schema(&bytes, "delta")?;
        if delta.update_commitment.is_empty() {
            return Err(SidetreeError::MissingField("update commitment"));
        }
        if delta.patches.is_empty() {
            return Err(SidetreeError::MissingField("update information"));
        }
        let code = multihash::multihash_code_from_encoded(expected_hash)?;
        if !self.params.supports_multihash_code(code) {
            return Err(SidetreeError::UnsupportedAlgorithm(format!("multihash code {code} is not permitted")));
        }
        let canonical = canonical::canonicalize_bytes(&bytes)?;
        let computed = multihash::compute_encoded_multihash(code, &canonical)?;
        if computed != expected_hash {
            return Err(SidetreeError::HashMismatch);
        }
        Ok((delta, encoded_delta.to_string()))
    }

    /// The unique suffix is the encoded multihash of the canonical suffix data.
    fn derive_unique_suffix(&self, suffix_bytes: &[u8]) -> Result<UniqueSuffix, SidetreeError> {
        let canonical = canonical::canonicalize_bytes(suffix_bytes)?;
        Ok(UniqueSuffix::from(multihash::compute_encoded_multihash(self.params.multihash_code, &canonical)?))
    }
}

fn decode_schema<T: DeserializeOwned>(bytes: &[u8], what: &str) -> Result<T, SidetreeError> {
    serde_json::from_slice(bytes).map_err(|err| SidetreeError::schema(format!("invalid {what}: {err}")))
}
