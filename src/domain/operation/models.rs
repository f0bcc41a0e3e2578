//! Operation models: wire requests, signed-data payloads, and the internal
//! tagged representation with anchoring metadata factored out.

use crate::domain::jws::PublicJwk;
use crate::domain::patch::Patch;
use crate::foundation::types::{Namespace, UniqueSuffix};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Create,
    Update,
    Recover,
    Deactivate,
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationType::Create => write!(f, "create"),
            OperationType::Update => write!(f, "update"),
            OperationType::Recover => write!(f, "recover"),
            OperationType::Deactivate => write!(f, "deactivate"),
        }
    }
}

/// Suffix data of a create operation. The unique suffix of the identifier is
/// the encoded multihash of this structure's canonical form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct SuffixData {
    pub delta_hash: String,
    pub recovery_commitment: String,
}

/// Patch data applied by a single operation, with the commitment to the
/// reveal of the next update.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Delta {
    pub update_commitment: String,
    pub patches: Vec<Patch>,
}

/// Signed payload of an update: proves knowledge of the reveal matching the
/// prior update commitment.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct UpdateSignedData {
    pub update_key: PublicJwk,
    pub delta_hash: String,
}

/// Signed payload of a recovery; binds the commitment for the next recovery.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct RecoverSignedData {
    pub delta_hash: String,
    pub recovery_key: PublicJwk,
    pub recovery_commitment: String,
}

/// Signed payload of a deactivation.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct DeactivateSignedData {
    pub did_suffix: String,
    pub recovery_key: PublicJwk,
}

// Wire requests. Canonical serialization orders the keys; the field names
// here define the wire format.

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateRequest {
    #[serde(rename = "type")]
    pub operation: OperationType,
    pub suffix_data: String,
    pub delta: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UpdateRequest {
    #[serde(rename = "type")]
    pub operation: OperationType,
    pub did_suffix: String,
    pub signed_data: String,
    pub delta: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RecoverRequest {
    #[serde(rename = "type")]
    pub operation: OperationType,
    pub did_suffix: String,
    pub signed_data: String,
    pub delta: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DeactivateRequest {
    #[serde(rename = "type")]
    pub operation: OperationType,
    pub did_suffix: String,
    pub signed_data: String,
}

/// Per-type contents of a validated operation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum OperationKind {
    Create { suffix_data: SuffixData, encoded_suffix_data: String, delta: Delta, encoded_delta: String },
    Update { signed_data: String, signed: UpdateSignedData, delta: Delta, encoded_delta: String },
    Recover { signed_data: String, signed: RecoverSignedData, delta: Delta, encoded_delta: String },
    Deactivate { signed_data: String, signed: DeactivateSignedData },
}

impl OperationKind {
    pub fn operation_type(&self) -> OperationType {
        match self {
            OperationKind::Create { .. } => OperationType::Create,
            OperationKind::Update { .. } => OperationType::Update,
            OperationKind::Recover { .. } => OperationType::Recover,
            OperationKind::Deactivate { .. } => OperationType::Deactivate,
        }
    }
}

/// A fully validated operation together with its anchoring identity.
/// `operation_buffer` preserves the byte-exact original request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedOperation {
    pub namespace: Namespace,
    pub id: String,
    pub unique_suffix: UniqueSuffix,
    pub operation_buffer: Vec<u8>,
    pub kind: OperationKind,
}

impl ParsedOperation {
    /// The reduced form persisted in the operation store, stamped with the
    /// ledger position of the containing transaction.
    pub fn to_anchored(&self, transaction_time: u64, transaction_number: u64, operation_index: u32) -> AnchoredOperation {
        let (signed_data, encoded_delta, encoded_suffix_data) = match &self.kind {
            OperationKind::Create { encoded_suffix_data, encoded_delta, .. } => {
                (None, Some(encoded_delta.clone()), Some(encoded_suffix_data.clone()))
            }
            OperationKind::Update { signed_data, encoded_delta, .. } => {
                (Some(signed_data.clone()), Some(encoded_delta.clone()), None)
            }
            OperationKind::Recover { signed_data, encoded_delta, .. } => {
                (Some(signed_data.clone()), Some(encoded_delta.clone()), None)
            }
            OperationKind::Deactivate { signed_data, .. } => (Some(signed_data.clone()), None, None),
        };
        AnchoredOperation {
            operation_type: self.kind.operation_type(),
            unique_suffix: self.unique_suffix.clone(),
            signed_data,
            encoded_delta,
            encoded_suffix_data,
            transaction_time,
            transaction_number,
            operation_index,
        }
    }
}

/// An operation stamped with its ledger position; the persisted form.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AnchoredOperation {
    #[serde(rename = "type")]
    pub operation_type: OperationType,
    pub unique_suffix: UniqueSuffix,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_data: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_delta: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub encoded_suffix_data: Option<String>,
    pub transaction_time: u64,
    pub transaction_number: u64,
    pub operation_index: u32,
}

impl AnchoredOperation {
    /// Canonical ordering position within a namespace.
    pub fn position(&self) -> (u64, u64, u32) {
        (self.transaction_time, self.transaction_number, self.operation_index)
    }
}
