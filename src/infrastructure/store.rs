//! Per-namespace operation store capability.
//!
//! The store owns persisted operations; within a namespace every suffix log
//! is kept sorted by `(transaction_time, transaction_number, operation_index)`
//! and writes are idempotent so ledger replays do not duplicate entries.

use crate::domain::operation::models::AnchoredOperation;
use crate::foundation::error::SidetreeError;
use crate::foundation::types::{Namespace, UniqueSuffix};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

#[async_trait]
pub trait OperationStore: Send + Sync {
    async fn put(&self, ops: Vec<AnchoredOperation>) -> Result<(), SidetreeError>;
    async fn get(&self, suffix: &UniqueSuffix) -> Result<Vec<AnchoredOperation>, SidetreeError>;
}

pub trait OperationStoreProvider: Send + Sync {
    fn for_namespace(&self, namespace: &Namespace) -> Result<Arc<dyn OperationStore>, SidetreeError>;
}

pub struct MemoryOperationStore {
    namespace: Namespace,
    inner: Mutex<HashMap<UniqueSuffix, Vec<AnchoredOperation>>>,
}

impl MemoryOperationStore {
    pub fn new(namespace: Namespace) -> Self {
        Self { namespace, inner: Mutex::new(HashMap::new()) }
    }

    fn lock_inner(&self) -> Result<MutexGuard<'_, HashMap<UniqueSuffix, Vec<AnchoredOperation>>>, SidetreeError> {
        self.inner
            .lock()
            .map_err(|_| SidetreeError::store_put(self.namespace.as_str(), "memory store lock poisoned"))
    }
}

#[async_trait]
impl OperationStore for MemoryOperationStore {
    async fn put(&self, ops: Vec<AnchoredOperation>) -> Result<(), SidetreeError> {
        let mut inner = self.lock_inner()?;
        for op in ops {
            let log = inner.entry(op.unique_suffix.clone()).or_default();
            // Replays land on the same position triple and are dropped.
            if log.iter().any(|existing| existing.position() == op.position()) {
                continue;
            }
            let at = log.partition_point(|existing| existing.position() <= op.position());
            log.insert(at, op);
        }
        Ok(())
    }

    async fn get(&self, suffix: &UniqueSuffix) -> Result<Vec<AnchoredOperation>, SidetreeError> {
        Ok(self.lock_inner()?.get(suffix).cloned().unwrap_or_default())
    }
}

/// Provider handing out one in-memory store per namespace.
pub struct MemoryOperationStoreProvider {
    stores: Mutex<HashMap<Namespace, Arc<MemoryOperationStore>>>,
}

impl MemoryOperationStoreProvider {
    pub fn new() -> Self {
        Self { stores: Mutex::new(HashMap::new()) }
    }
}

impl Default for MemoryOperationStoreProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl OperationStoreProvider for MemoryOperationStoreProvider {
    fn for_namespace(&self, namespace: &Namespace) -> Result<Arc<dyn OperationStore>, SidetreeError> {
        let mut stores = self
            .stores
            .lock()
            .map_err(|_| SidetreeError::store_put(namespace.as_str(), "store provider lock poisoned"))?;
        let store = stores
            .entry(namespace.clone())
            .or_insert_with(|| Arc::new(MemoryOperationStore::new(namespace.clone())))
            .clone();
        Ok(store)
    }
}
