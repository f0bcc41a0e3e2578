//! Protocol parameters.
//!
//! Parameter selection per protocol version is an injected capability (see
//! `infrastructure::config::ProtocolVersionProvider`); the values themselves
//! are domain data consumed by the parser and the provider.

use crate::foundation::constants::{DEFAULT_MAX_FILE_BYTES, DEFAULT_MAX_OPERATIONS_PER_BATCH, SHA2_256_CODE};
use crate::domain::jws::{ALG_ED25519, ALG_SECP256K1};
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct ProtocolParameters {
    /// Ledger time at which this protocol version becomes effective.
    #[serde(default)]
    pub genesis_time: u64,
    /// Multihash code used when producing hashes (suffix derivation included).
    pub multihash_code: u64,
    /// Codes accepted when verifying hashes.
    pub supported_multihash_codes: Vec<u64>,
    /// JWS algorithms permitted for signed data.
    pub allowed_algorithms: Vec<String>,
    /// Upper bound on the declared operation count of one anchored batch.
    pub max_operations_per_batch: usize,
    /// Upper bound on the decompressed size of one batch file.
    pub max_file_bytes: usize,
    /// Whether a deactivated identifier is permanently terminal.
    /// Adjudicated at resolution time; the engine only carries the flag.
    pub deactivate_is_terminal: bool,
}

impl Default for ProtocolParameters {
    fn default() -> Self {
        Self {
            genesis_time: 0,
            multihash_code: SHA2_256_CODE,
            supported_multihash_codes: vec![SHA2_256_CODE],
            allowed_algorithms: vec![ALG_ED25519.to_string(), ALG_SECP256K1.to_string()],
            max_operations_per_batch: DEFAULT_MAX_OPERATIONS_PER_BATCH,
            max_file_bytes: DEFAULT_MAX_FILE_BYTES,
            deactivate_is_terminal: true,
        }
    }
}

impl ProtocolParameters {
    pub fn supports_multihash_code(&self, code: u64) -> bool {
        self.supported_multihash_codes.contains(&code)
    }
}
