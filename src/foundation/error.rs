use std::io;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    MissingField,
    SchemaError,
    UnsupportedAlgorithm,
    MalformedBase64,
    MissingKid,
    HashMismatch,
    SignatureInvalid,
    CommitmentRevealMismatch,
    CasNotFound,
    CasTransport,
    StorePut,
    LedgerClosed,
    UnknownOperationType,
    BatchSizeExceeded,
    AnchorData,
    InvalidStateTransition,
    Compression,
    Serialization,
    Signing,
    ConfigError,
    Cancelled,
    Message,
}

#[derive(Debug, Clone)]
pub struct ErrorContext {
    pub code: ErrorCode,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum SidetreeError {
    #[error("missing {0}")]
    MissingField(&'static str),

    #[error("schema error: {0}")]
    SchemaError(String),

    #[error("algorithm not supported, {0}")]
    UnsupportedAlgorithm(String),

    #[error("base64 decode error: {0}")]
    MalformedBase64(String),

    #[error("kid must be present in the protected header")]
    MissingKid,

    #[error("supplied hash doesn't match original content")]
    HashMismatch,

    #[error("signature verification failed: {0}")]
    SignatureInvalid(String),

    #[error("reveal value doesn't match the previously committed hash")]
    CommitmentRevealMismatch,

    #[error("content not found in CAS: {address}")]
    CasNotFound { address: String },

    #[error("CAS transport error during {operation}: {details}")]
    CasTransport { operation: String, details: String },

    #[error("operation store put failed for namespace {namespace}: {details}")]
    StorePut { namespace: String, details: String },

    #[error("ledger notification channel closed")]
    LedgerClosed,

    #[error("operation type [{0}] not supported")]
    UnknownOperationType(String),

    #[error("batch size {declared} exceeds protocol maximum {max}")]
    BatchSizeExceeded { declared: usize, max: usize },

    #[error("invalid anchor data: {0}")]
    AnchorData(String),

    #[error("invalid transaction state transition: {from} -> {to}")]
    InvalidStateTransition { from: String, to: String },

    #[error("compression error during {operation}: {details}")]
    Compression { operation: String, details: String },

    #[error("{format} serialization error: {details}")]
    Serialization { format: String, details: String },

    #[error("signing error: {0}")]
    Signing(String),

    #[error("configuration error: {0}")]
    ConfigError(String),

    #[error("cancelled during {0}")]
    Cancelled(&'static str),

    #[error("{0}")]
    Message(String),
}

pub type Result<T> = std::result::Result<T, SidetreeError>;

impl SidetreeError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SidetreeError::MissingField(_) => ErrorCode::MissingField,
            SidetreeError::SchemaError(_) => ErrorCode::SchemaError,
            SidetreeError::UnsupportedAlgorithm(_) => ErrorCode::UnsupportedAlgorithm,
            SidetreeError::MalformedBase64(_) => ErrorCode::MalformedBase64,
            SidetreeError::MissingKid => ErrorCode::MissingKid,
            SidetreeError::HashMismatch => ErrorCode::HashMismatch,
            SidetreeError::SignatureInvalid(_) => ErrorCode::SignatureInvalid,
            SidetreeError::CommitmentRevealMismatch => ErrorCode::CommitmentRevealMismatch,
            SidetreeError::CasNotFound { .. } => ErrorCode::CasNotFound,
            SidetreeError::CasTransport { .. } => ErrorCode::CasTransport,
            SidetreeError::StorePut { .. } => ErrorCode::StorePut,
            SidetreeError::LedgerClosed => ErrorCode::LedgerClosed,
            SidetreeError::UnknownOperationType(_) => ErrorCode::UnknownOperationType,
            SidetreeError::BatchSizeExceeded { .. } => ErrorCode::BatchSizeExceeded,
            SidetreeError::AnchorData(_) => ErrorCode::AnchorData,
            SidetreeError::InvalidStateTransition { .. } => ErrorCode::InvalidStateTransition,
            SidetreeError::Compression { .. } => ErrorCode::Compression,
            SidetreeError::Serialization { .. } => ErrorCode::Serialization,
            SidetreeError::Signing(_) => ErrorCode::Signing,
            SidetreeError::ConfigError(_) => ErrorCode::ConfigError,
            SidetreeError::Cancelled(_) => ErrorCode::Cancelled,
            SidetreeError::Message(_) => ErrorCode::Message,
        }
    }

    pub fn context(&self) -> ErrorContext {
        ErrorContext { code: self.code(), message: self.to_string() }
    }

    pub fn cas_transport(operation: impl Into<String>, details: impl Into<String>) -> Self {
        SidetreeError::CasTransport { operation: operation.into(), details: details.into() }
    }

    pub fn store_put(namespace: impl Into<String>, details: impl Into<String>) -> Self {
        SidetreeError::StorePut { namespace: namespace.into(), details: details.into() }
    }

    pub fn schema(details: impl Into<String>) -> Self {
        SidetreeError::SchemaError(details.into())
    }
}

impl From<serde_json::Error> for SidetreeError {
    fn from(err: serde_json::Error) -> Self {
        SidetreeError::Serialization { format: "json".to_string(), details: err.to_string() }
    }
}

impl From<base64::DecodeError> for SidetreeError {
    fn from(err: base64::DecodeError) -> Self {
        SidetreeError::MalformedBase64(err.to_string())
    }
}

impl From<io::Error> for SidetreeError {
    fn from(err: io::Error) -> Self {
        SidetreeError::Compression { operation: "io".to_string(), details: err.to_string() }
    }
}

// NOTE: Avoid adding generic "stringly" error conversions here.
// Use structured `SidetreeError` variants at the call site to preserve context.
