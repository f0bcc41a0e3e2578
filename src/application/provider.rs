//! Transaction-operation provider.
//!
//! Materializes the operations of an anchored transaction from CAS: parses
//! the anchor string, walks the file hierarchy (anchor file → map file →
//! chunk files), and reassembles the per-operation wire buffers in document
//! order. Any failure rejects the whole transaction; the processor may see
//! the transaction again if the ledger replays it.

use crate::domain::canonical;
use crate::domain::operation::models::{CreateRequest, DeactivateRequest, OperationType, RecoverRequest, UpdateRequest};
use crate::domain::protocol::ProtocolParameters;
use crate::domain::txn::{AnchorData, SidetreeTxn};
use crate::foundation::error::SidetreeError;
use crate::infrastructure::cas::CasClient;
use crate::infrastructure::compression;
use crate::infrastructure::config::ProtocolVersionProvider;
use async_trait::async_trait;
use futures_util::future::try_join_all;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::sync::Arc;

/// Yields the wire-format operation buffers of an anchored transaction, in
/// document order.
#[async_trait]
pub trait OperationsProvider: Send + Sync {
    async fn txn_operations(&self, txn: &SidetreeTxn) -> Result<Vec<Vec<u8>>, SidetreeError>;
}

/// Anchor (core index) file: references the map file and carries the
/// operation entries that are committed at anchor level.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnchorFile {
    pub map_file_uri: String,
    #[serde(default)]
    pub operations: AnchorFileOperations,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AnchorFileOperations {
    #[serde(default)]
    pub create: Vec<CreateEntry>,
    #[serde(default)]
    pub recover: Vec<SignedEntry>,
    #[serde(default)]
    pub deactivate: Vec<SignedEntry>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CreateEntry {
    pub suffix_data: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SignedEntry {
    pub did_suffix: String,
    pub signed_data: String,
}

/// Map (provisional index) file: references chunk files and carries updates.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MapFile {
    #[serde(default)]
    pub chunks: Vec<ChunkEntry>,
    #[serde(default)]
    pub operations: MapFileOperations,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ChunkEntry {
    pub chunk_file_uri: String,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct MapFileOperations {
    #[serde(default)]
    pub update: Vec<SignedEntry>,
}

/// Chunk file: the ordered encoded deltas for create, recover and update
/// operations (in that order).
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct ChunkFile {
    pub deltas: Vec<String>,
}

pub struct CasOperationsProvider {
    cas: Arc<dyn CasClient>,
    protocol: Arc<dyn ProtocolVersionProvider>,
}

impl CasOperationsProvider {
    pub fn new(cas: Arc<dyn CasClient>, protocol: Arc<dyn ProtocolVersionProvider>) -> Self {
        Self { cas, protocol }
    }

    async fn fetch_file<T: DeserializeOwned>(&self, address: &str, params: &ProtocolParameters) -> Result<T, SidetreeError> {
        let raw = self.cas.read(address).await?;
        let bytes = compression::decompress(&raw, params.max_file_bytes)?;
        serde_json::from_slice(&bytes).map_err(|err| SidetreeError::schema(format!("invalid batch file {address}: {err}")))
    }
}

#[async_trait]
impl OperationsProvider for CasOperationsProvider {
    async fn txn_operations(&self, txn: &SidetreeTxn) -> Result<Vec<Vec<u8>>, SidetreeError> {
        let anchor = AnchorData::parse(&txn.anchor_string)?;
        let params = self.protocol.protocol_at(txn.protocol_genesis_time)?;
        if anchor.num_operations > params.max_operations_per_batch {
            return Err(SidetreeError::BatchSizeExceeded {
                declared: anchor.num_operations,
                max: params.max_operations_per_batch,
            });
        }

        let anchor_file: AnchorFile = self.fetch_file(&anchor.anchor_file_address, &params).await?;
        let map_file: MapFile = self.fetch_file(&anchor_file.map_file_uri, &params).await?;
        // Chunk fetches fan out; the join below completes before any
        // operation is assembled.
        let chunk_files: Vec<ChunkFile> =
            try_join_all(map_file.chunks.iter().map(|chunk| self.fetch_file(&chunk.chunk_file_uri, &params))).await?;
        debug!(
            "fetched batch files anchor_string={} chunk_count={} create={} recover={} deactivate={} update={}",
            txn.anchor_string,
            chunk_files.len(),
            anchor_file.operations.create.len(),
            anchor_file.operations.recover.len(),
            anchor_file.operations.deactivate.len(),
            map_file.operations.update.len()
        );

        let mut deltas: VecDeque<String> = chunk_files.into_iter().flat_map(|file| file.deltas).collect();
        let delta_consumers = anchor_file.operations.create.len()
            + anchor_file.operations.recover.len()
            + map_file.operations.update.len();
        if deltas.len() != delta_consumers {
            return Err(SidetreeError::AnchorData(format!(
                "chunk files carry {} deltas but operations require {}",
                deltas.len(),
                delta_consumers
            )));
        }

        let mut buffers = Vec::with_capacity(anchor.num_operations);
        for entry in anchor_file.operations.create {
            let request = CreateRequest {
                operation: OperationType::Create,
                suffix_data: entry.suffix_data,
                delta: next_delta(&mut deltas)?,
            };
            buffers.push(canonical::canonicalize(&request)?);
        }
        for entry in anchor_file.operations.recover {
            let request = RecoverRequest {
                operation: OperationType::Recover,
                did_suffix: entry.did_suffix,
                signed_data: entry.signed_data,
                delta: next_delta(&mut deltas)?,
            };
            buffers.push(canonical::canonicalize(&request)?);
        }
        for entry in anchor_file.operations.deactivate {
            let request = DeactivateRequest {
                operation: OperationType::Deactivate,
                did_suffix: entry.did_suffix,
                signed_data: entry.signed_data,
            };
            buffers.push(canonical::canonicalize(&request)?);
        }
        for entry in map_file.operations.update {
            let request = UpdateRequest {
                operation: OperationType::Update,
                did_suffix: entry.did_suffix,
                signed_data: entry.signed_data,
                delta: next_delta(&mut deltas)?,
            };
            buffers.push(canonical::canonicalize(&request)?);
        }

        if buffers.len() != anchor.num_operations {
            return Err(SidetreeError::AnchorData(format!(
                "anchor string declares {} operations, batch files produced {}",
                anchor.num_operations,
                buffers.len()
            )));
        }
        Ok(buffers)
    }
}

fn next_delta(deltas: &mut VecDeque<String>) -> Result<String, SidetreeError> {
    deltas.pop_front().ok_or_else(|| SidetreeError::AnchorData("chunk files ran out of deltas".to_string()))
}
