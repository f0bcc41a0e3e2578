//! Observer: subscribes to the ledger and drives anchored transactions
//! through fetch, validation and storage.
//!
//! A single consumer task owns the subscription and processes transactions
//! sequentially, preserving per-namespace order. Failures never crash the
//! host: a failed transaction is logged and skipped, and may reappear via
//! ledger replay.

use crate::domain::operation::models::{AnchoredOperation, ParsedOperation};
use crate::domain::operation::parser::OperationParser;
use crate::domain::txn::{self, SidetreeTxn, TxnProgress, TxnState};
use crate::foundation::error::SidetreeError;
use crate::foundation::types::{Namespace, UniqueSuffix};
use crate::application::provider::OperationsProvider;
use crate::infrastructure::config::ProtocolVersionProvider;
use crate::infrastructure::ledger::Ledger;
use crate::infrastructure::store::OperationStoreProvider;
use log::{debug, info, warn};
use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Collaborators injected at construction.
pub struct Providers {
    pub ledger: Arc<dyn Ledger>,
    pub operations: Arc<dyn OperationsProvider>,
    pub op_store: Arc<dyn OperationStoreProvider>,
    pub protocol: Arc<dyn ProtocolVersionProvider>,
}

pub struct Observer {
    providers: Arc<Providers>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl Observer {
    pub fn new(providers: Providers) -> Self {
        Self { providers: Arc::new(providers), cancel: CancellationToken::new(), handle: None }
    }

    /// Subscribe to the ledger and spawn the consumer task.
    pub fn start(&mut self) -> Result<(), SidetreeError> {
        if self.handle.is_some() {
            return Err(SidetreeError::Message("observer already started".to_string()));
        }
        let receiver = self.providers.ledger.register_for_sidetree_txn()?;
        let processor = TxnProcessor::new(self.providers.clone());
        let cancel = self.cancel.clone();
        self.handle = Some(tokio::spawn(consume(receiver, processor, cancel)));
        info!("observer started");
        Ok(())
    }

    /// Request termination and wait for the consumer to drain.
    /// Safe to call after the ledger channel has closed; later calls no-op.
    pub async fn stop(&mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
            info!("observer stopped");
        }
    }
}

async fn consume(mut receiver: mpsc::Receiver<Vec<SidetreeTxn>>, processor: TxnProcessor, cancel: CancellationToken) {
    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                info!("observer consumer stopping on cancellation");
                return;
            }
            batch = receiver.recv() => {
                let Some(batch) = batch else {
                    info!("ledger channel closed, observer consumer terminating");
                    return;
                };
                debug!("received transaction batch size={}", batch.len());
                for transaction in batch {
                    // A cancelled transaction is failed, never silently partial:
                    // dropping the in-flight future aborts its CAS fetches.
                    tokio::select! {
                        _ = cancel.cancelled() => {
                            warn!(
                                "transaction processing cancelled namespace={} anchor_string={}",
                                transaction.namespace, transaction.anchor_string
                            );
                            return;
                        }
                        result = processor.process(&transaction) => {
                            if let Err(err) = result {
                                warn!(
                                    "transaction failed, skipping namespace={} transaction_time={} transaction_number={} anchor_string={} error={}",
                                    transaction.namespace,
                                    transaction.transaction_time,
                                    transaction.transaction_number,
                                    transaction.anchor_string,
                                    err
                                );
                            }
                        }
                    }
                }
            }
        }
    }
}

/// Drives one anchored transaction through
/// `Received → Fetched → Validated → Stored`.
pub struct TxnProcessor {
    providers: Arc<Providers>,
}

impl TxnProcessor {
    pub fn new(providers: Arc<Providers>) -> Self {
        Self { providers }
    }

    pub async fn process(&self, transaction: &SidetreeTxn) -> Result<usize, SidetreeError> {
        let mut progress = TxnProgress::new();
        let result = self.process_states(transaction, &mut progress).await;
        if result.is_err() && !txn::is_terminal(progress.state()) {
            let _ = progress.advance(TxnState::Failed);
        }
        result
    }

    async fn process_states(&self, transaction: &SidetreeTxn, progress: &mut TxnProgress) -> Result<usize, SidetreeError> {
        debug!(
            "processing transaction namespace={} transaction_time={} transaction_number={} anchor_string={}",
            transaction.namespace, transaction.transaction_time, transaction.transaction_number, transaction.anchor_string
        );
        let buffers = self.providers.operations.txn_operations(transaction).await?;
        progress.advance(TxnState::Fetched)?;

        let params = self.providers.protocol.protocol_at(transaction.protocol_genesis_time)?;
        let parser = OperationParser::new(params);
        let mut parsed: Vec<(u32, ParsedOperation)> = Vec::with_capacity(buffers.len());
        for (index, buffer) in buffers.iter().enumerate() {
            match parser.parse(&transaction.namespace, buffer) {
                Ok(operation) => parsed.push((index as u32, operation)),
                Err(err) => warn!(
                    "discarding invalid operation namespace={} operation_index={} error={}",
                    transaction.namespace, index, err
                ),
            }
        }
        if parsed.is_empty() && !buffers.is_empty() {
            return Err(SidetreeError::Message(format!(
                "all {} operations in transaction are invalid",
                buffers.len()
            )));
        }
        progress.advance(TxnState::Validated)?;

        let stored = self.store_txn_operations(transaction, parsed).await?;
        progress.advance(TxnState::Stored)?;
        info!(
            "transaction stored namespace={} transaction_time={} transaction_number={} operation_count={}",
            transaction.namespace, transaction.transaction_time, transaction.transaction_number, stored
        );
        Ok(stored)
    }

    async fn store_txn_operations(
        &self,
        transaction: &SidetreeTxn,
        operations: Vec<(u32, ParsedOperation)>,
    ) -> Result<usize, SidetreeError> {
        // At most one operation per suffix is persisted per transaction;
        // the first occurrence wins.
        let mut seen: HashSet<UniqueSuffix> = HashSet::new();
        let mut groups: BTreeMap<Namespace, Vec<AnchoredOperation>> = BTreeMap::new();
        for (index, operation) in operations {
            if !seen.insert(operation.unique_suffix.clone()) {
                debug!(
                    "discarding duplicate suffix in batch unique_suffix={} operation_index={}",
                    operation.unique_suffix, index
                );
                continue;
            }
            groups.entry(operation.namespace.clone()).or_default().push(operation.to_anchored(
                transaction.transaction_time,
                transaction.transaction_number,
                index,
            ));
        }

        let mut stored = 0;
        for (namespace, ops) in groups {
            let store = self.providers.op_store.for_namespace(&namespace)?;
            let count = ops.len();
            store
                .put(ops)
                .await
                .map_err(|err| SidetreeError::store_put(namespace.as_str(), err.to_string()))?;
            debug!("stored operations namespace={} count={}", namespace, count);
            stored += count;
        }
        Ok(stored)
    }
}
