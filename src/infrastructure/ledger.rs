//! Ledger subscription capability.
//!
//! The ledger pushes batches of anchored transactions over a bounded channel.
//! `ChannelLedger` is the in-memory realization used by tests and embedders
//! that drive the observer directly.

use crate::domain::txn::SidetreeTxn;
use crate::foundation::error::SidetreeError;
use std::sync::Mutex;
use tokio::sync::mpsc;

pub trait Ledger: Send + Sync {
    /// Hand out the receive side of the anchored-transaction stream.
    /// A ledger has a single consumer; a second registration fails.
    fn register_for_sidetree_txn(&self) -> Result<mpsc::Receiver<Vec<SidetreeTxn>>, SidetreeError>;
}

pub struct ChannelLedger {
    receiver: Mutex<Option<mpsc::Receiver<Vec<SidetreeTxn>>>>,
}

impl ChannelLedger {
    /// Create a ledger with a bounded channel, returning the send side for
    /// the driver.
    pub fn new(capacity: usize) -> (Self, mpsc::Sender<Vec<SidetreeTxn>>) {
        let (sender, receiver) = mpsc::channel(capacity);
        (Self { receiver: Mutex::new(Some(receiver)) }, sender)
    }
}

impl Ledger for ChannelLedger {
    fn register_for_sidetree_txn(&self) -> Result<mpsc::Receiver<Vec<SidetreeTxn>>, SidetreeError> {
        self.receiver
            .lock()
            .map_err(|_| SidetreeError::LedgerClosed)?
            .take()
            .ok_or(SidetreeError::LedgerClosed)
    }
}
