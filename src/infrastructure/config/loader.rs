//! Configuration loader using Figment for layered config management.
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. TOML config file
//! 3. Environment variables (SIDETREE_* prefix)

use crate::domain::multihash;
use crate::foundation::error::SidetreeError;
use crate::infrastructure::config::EngineConfig;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use log::info;
use std::path::Path;

/// Environment variable prefix for config overrides.
///
/// Example: `SIDETREE_CAS_READ_TIMEOUT_MS` -> `cas_read_timeout_ms`
const ENV_PREFIX: &str = "SIDETREE_";

/// Load configuration from defaults and the environment only.
pub fn load_config() -> Result<EngineConfig, SidetreeError> {
    extract(Figment::from(Serialized::defaults(EngineConfig::default())))
}

/// Load configuration from a specific TOML file path.
pub fn load_config_from_file(path: &Path) -> Result<EngineConfig, SidetreeError> {
    info!("loading configuration path={}", path.display());
    extract(Figment::from(Serialized::defaults(EngineConfig::default())).merge(Toml::file(path)))
}

fn extract(figment: Figment) -> Result<EngineConfig, SidetreeError> {
    let config: EngineConfig = figment
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .map_err(|err| SidetreeError::ConfigError(format!("config extraction failed: {err}")))?;
    validate_config(&config)?;
    Ok(config)
}

pub fn validate_config(config: &EngineConfig) -> Result<(), SidetreeError> {
    if config.channel_capacity == 0 {
        return Err(SidetreeError::ConfigError("channel_capacity must be greater than zero".to_string()));
    }
    if config.cas_read_timeout_ms == 0 {
        return Err(SidetreeError::ConfigError("cas_read_timeout_ms must be greater than zero".to_string()));
    }
    if config.protocol_versions.is_empty() {
        return Err(SidetreeError::ConfigError("at least one protocol version is required".to_string()));
    }
    for version in &config.protocol_versions {
        if !version.supports_multihash_code(version.multihash_code) {
            return Err(SidetreeError::ConfigError(format!(
                "multihash code {} is not in the supported set of the version at genesis time {}",
                version.multihash_code, version.genesis_time
            )));
        }
        if !multihash::is_supported_code(version.multihash_code) {
            return Err(SidetreeError::ConfigError(format!(
                "multihash code {} has no digest implementation",
                version.multihash_code
            )));
        }
        if version.allowed_algorithms.is_empty() {
            return Err(SidetreeError::ConfigError(format!(
                "allowed_algorithms must not be empty for the version at genesis time {}",
                version.genesis_time
            )));
        }
        if version.max_operations_per_batch == 0 {
            return Err(SidetreeError::ConfigError("max_operations_per_batch must be greater than zero".to_string()));
        }
        if version.max_file_bytes == 0 {
            return Err(SidetreeError::ConfigError("max_file_bytes must be greater than zero".to_string()));
        }
    }
    Ok(())
}
