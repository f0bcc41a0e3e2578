//! Content-addressed store capability.
//!
//! Addresses are encoded multihashes of the stored content; `MemoryCas`
//! enforces that discipline and backs the tests. Real deployments inject
//! their own client.

use crate::domain::multihash;
use crate::foundation::constants::SHA2_256_CODE;
use crate::foundation::error::SidetreeError;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

#[async_trait]
pub trait CasClient: Send + Sync {
    /// Fetch content by address. Distinguishes missing content
    /// (`CasNotFound`) from transport failures (`CasTransport`).
    async fn read(&self, address: &str) -> Result<Vec<u8>, SidetreeError>;

    /// Store content, returning its address.
    async fn write(&self, content: &[u8]) -> Result<String, SidetreeError>;
}

pub struct MemoryCas {
    inner: Mutex<HashMap<String, Vec<u8>>>,
    multihash_code: u64,
}

impl MemoryCas {
    pub fn new() -> Self {
        Self { inner: Mutex::new(HashMap::new()), multihash_code: SHA2_256_CODE }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, HashMap<String, Vec<u8>>>, SidetreeError> {
        self.inner.lock().map_err(|_| SidetreeError::cas_transport("lock", "memory CAS lock poisoned"))
    }
}

impl Default for MemoryCas {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CasClient for MemoryCas {
    async fn read(&self, address: &str) -> Result<Vec<u8>, SidetreeError> {
        self.lock_inner()?
            .get(address)
            .cloned()
            .ok_or_else(|| SidetreeError::CasNotFound { address: address.to_string() })
    }

    async fn write(&self, content: &[u8]) -> Result<String, SidetreeError> {
        let address = multihash::compute_encoded_multihash(self.multihash_code, content)?;
        self.lock_inner()?.insert(address.clone(), content.to_vec());
        Ok(address)
    }
}

/// Wraps a CAS client so every read honors an injected timeout.
pub struct TimedCas {
    inner: Arc<dyn CasClient>,
    read_timeout: Duration,
}

impl TimedCas {
    pub fn new(inner: Arc<dyn CasClient>, read_timeout: Duration) -> Self {
        Self { inner, read_timeout }
    }
}

#[async_trait]
impl CasClient for TimedCas {
    async fn read(&self, address: &str) -> Result<Vec<u8>, SidetreeError> {
        match tokio::time::timeout(self.read_timeout, self.inner.read(address)).await {
            Ok(result) => result,
            Err(_) => Err(SidetreeError::cas_transport(
                "read",
                format!("read of {address} timed out after {}ms", self.read_timeout.as_millis()),
            )),
        }
    }

    async fn write(&self, content: &[u8]) -> Result<String, SidetreeError> {
        self.inner.write(content).await
    }
}
