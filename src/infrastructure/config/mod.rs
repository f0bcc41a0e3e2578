//! Engine configuration and protocol-version selection.

mod loader;

pub use loader::{load_config, load_config_from_file, validate_config};

use crate::domain::protocol::ProtocolParameters;
use crate::foundation::constants::{DEFAULT_CAS_READ_TIMEOUT_MS, DEFAULT_CHANNEL_CAPACITY};
use crate::foundation::error::SidetreeError;
use serde::{Deserialize, Serialize};

/// Base configuration for the engine.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Capacity of the bounded ledger notification channel.
    #[serde(default = "default_channel_capacity")]
    pub channel_capacity: usize,
    /// Per-read timeout applied to CAS fetches, in milliseconds.
    #[serde(default = "default_cas_read_timeout_ms")]
    pub cas_read_timeout_ms: u64,
    /// Optional directory for log files. Console-only when unset.
    #[serde(default)]
    pub log_dir: Option<String>,
    /// Log filter expression, e.g. `"info"` or `"sidetree_core=debug"`.
    #[serde(default = "default_log_filters")]
    pub log_filters: String,
    /// Protocol versions, ordered by genesis time.
    #[serde(default = "default_protocol_versions")]
    pub protocol_versions: Vec<ProtocolParameters>,
}

fn default_channel_capacity() -> usize {
    DEFAULT_CHANNEL_CAPACITY
}

fn default_cas_read_timeout_ms() -> u64 {
    DEFAULT_CAS_READ_TIMEOUT_MS
}

fn default_log_filters() -> String {
    "info".to_string()
}

fn default_protocol_versions() -> Vec<ProtocolParameters> {
    vec![ProtocolParameters::default()]
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            channel_capacity: default_channel_capacity(),
            cas_read_timeout_ms: default_cas_read_timeout_ms(),
            log_dir: None,
            log_filters: default_log_filters(),
            protocol_versions: default_protocol_versions(),
        }
    }
}

/// Selects the protocol parameters in effect at a given ledger time.
pub trait ProtocolVersionProvider: Send + Sync {
    fn protocol_at(&self, genesis_time: u64) -> Result<ProtocolParameters, SidetreeError>;
}

/// Version provider over a fixed, genesis-time-ordered list.
pub struct FixedProtocolProvider {
    versions: Vec<ProtocolParameters>,
}

impl FixedProtocolProvider {
    pub fn new(mut versions: Vec<ProtocolParameters>) -> Self {
        versions.sort_by_key(|version| version.genesis_time);
        Self { versions }
    }

    pub fn single(version: ProtocolParameters) -> Self {
        Self { versions: vec![version] }
    }
}

impl ProtocolVersionProvider for FixedProtocolProvider {
    fn protocol_at(&self, genesis_time: u64) -> Result<ProtocolParameters, SidetreeError> {
        self.versions
            .iter()
            .rev()
            .find(|version| version.genesis_time <= genesis_time)
            .cloned()
            .ok_or_else(|| SidetreeError::ConfigError(format!("no protocol version effective at time {genesis_time}")))
    }
}
