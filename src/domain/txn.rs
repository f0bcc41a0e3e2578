//! Anchored transactions: the ledger-side view of a batch, anchor-string
//! parsing, and the per-transaction processing state machine.

use crate::foundation::error::SidetreeError;
use crate::foundation::types::Namespace;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A Sidetree transaction as observed on the anchoring ledger.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SidetreeTxn {
    pub namespace: Namespace,
    pub transaction_time: u64,
    pub transaction_number: u64,
    pub anchor_string: String,
    #[serde(default)]
    pub protocol_genesis_time: u64,
}

/// Parsed anchor string: `<uint-decimal-operation-count>.<cas-address>`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnchorData {
    pub num_operations: usize,
    pub anchor_file_address: String,
}

impl AnchorData {
    pub fn parse(anchor_string: &str) -> Result<Self, SidetreeError> {
        let (count, address) = anchor_string
            .split_once('.')
            .ok_or_else(|| SidetreeError::AnchorData(format!("anchor string '{anchor_string}' must be <count>.<address>")))?;
        let num_operations: usize = count
            .parse()
            .map_err(|_| SidetreeError::AnchorData(format!("invalid operation count '{count}' in anchor string")))?;
        if num_operations == 0 {
            return Err(SidetreeError::AnchorData("anchor string declares zero operations".to_string()));
        }
        if address.is_empty() {
            return Err(SidetreeError::AnchorData("anchor string is missing the anchor file address".to_string()));
        }
        Ok(Self { num_operations, anchor_file_address: address.to_string() })
    }
}

impl fmt::Display for AnchorData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.num_operations, self.anchor_file_address)
    }
}

/// Processing state of a single observed transaction.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum TxnState {
    Received,
    Fetched,
    Validated,
    Stored,
    Failed,
}

const VALID_TRANSITIONS: &[(TxnState, TxnState)] = &[
    (TxnState::Received, TxnState::Fetched),
    (TxnState::Fetched, TxnState::Validated),
    (TxnState::Validated, TxnState::Stored),
    (TxnState::Received, TxnState::Failed),
    (TxnState::Fetched, TxnState::Failed),
    (TxnState::Validated, TxnState::Failed),
];

pub fn is_terminal(state: TxnState) -> bool {
    matches!(state, TxnState::Stored | TxnState::Failed)
}

pub fn ensure_valid_transition(from: TxnState, to: TxnState) -> Result<(), SidetreeError> {
    if VALID_TRANSITIONS.contains(&(from, to)) {
        Ok(())
    } else {
        Err(SidetreeError::InvalidStateTransition { from: format!("{from:?}"), to: format!("{to:?}") })
    }
}

/// Tracks a transaction through its processing states, rejecting skips.
#[derive(Debug)]
pub struct TxnProgress {
    state: TxnState,
}

impl TxnProgress {
    pub fn new() -> Self {
        Self { state: TxnState::Received }
    }

    pub fn state(&self) -> TxnState {
        self.state
    }

    pub fn advance(&mut self, to: TxnState) -> Result<(), SidetreeError> {
        ensure_valid_transition(self.state, to)?;
        self.state = to;
        Ok(())
    }
}

impl Default for TxnProgress {
    fn default() -> Self {
        Self::new()
    }
}
