use crate::fixtures;
use async_trait::async_trait;
use sidetree_core::application::observer::{Observer, Providers};
use sidetree_core::application::provider::{CasOperationsProvider, OperationsProvider};
use sidetree_core::domain::operation::AnchoredOperation;
use sidetree_core::domain::protocol::ProtocolParameters;
use sidetree_core::domain::txn::SidetreeTxn;
use sidetree_core::foundation::types::{Namespace, UniqueSuffix};
use sidetree_core::foundation::SidetreeError;
use sidetree_core::infrastructure::cas::CasClient;
use sidetree_core::infrastructure::config::FixedProtocolProvider;
use sidetree_core::infrastructure::ledger::{ChannelLedger, Ledger};
use sidetree_core::infrastructure::store::{OperationStore, OperationStoreProvider};
use std::sync::{Arc, Mutex};
use std::time::Duration;

struct RecordingStore {
    puts: Arc<Mutex<Vec<Vec<AnchoredOperation>>>>,
}

#[async_trait]
impl OperationStore for RecordingStore {
    async fn put(&self, ops: Vec<AnchoredOperation>) -> Result<(), SidetreeError> {
        self.puts.lock().expect("lock").push(ops);
        Ok(())
    }

    async fn get(&self, _suffix: &UniqueSuffix) -> Result<Vec<AnchoredOperation>, SidetreeError> {
        Ok(Vec::new())
    }
}

struct RecordingStoreProvider {
    puts: Arc<Mutex<Vec<Vec<AnchoredOperation>>>>,
}

impl RecordingStoreProvider {
    fn new() -> (Self, Arc<Mutex<Vec<Vec<AnchoredOperation>>>>) {
        let puts = Arc::new(Mutex::new(Vec::new()));
        (Self { puts: puts.clone() }, puts)
    }
}

impl OperationStoreProvider for RecordingStoreProvider {
    fn for_namespace(&self, _namespace: &Namespace) -> Result<Arc<dyn OperationStore>, SidetreeError> {
        Ok(Arc::new(RecordingStore { puts: self.puts.clone() }))
    }
}

/// Provider returning fixed operation buffers, or an injected error.
struct StubOperationsProvider {
    buffers: Vec<Vec<u8>>,
    error: Option<String>,
}

#[async_trait]
impl OperationsProvider for StubOperationsProvider {
    async fn txn_operations(&self, _txn: &SidetreeTxn) -> Result<Vec<Vec<u8>>, SidetreeError> {
        match &self.error {
            Some(message) => Err(SidetreeError::cas_transport("read", message.clone())),
            None => Ok(self.buffers.clone()),
        }
    }
}

/// CAS whose reads always fail with a transport error.
struct FailingCas;

#[async_trait]
impl CasClient for FailingCas {
    async fn read(&self, _address: &str) -> Result<Vec<u8>, SidetreeError> {
        Err(SidetreeError::cas_transport("read", "read error"))
    }

    async fn write(&self, _content: &[u8]) -> Result<String, SidetreeError> {
        Err(SidetreeError::cas_transport("write", "not implemented"))
    }
}

fn txn(time: u64, number: u64, anchor_string: &str) -> SidetreeTxn {
    SidetreeTxn {
        namespace: Namespace::from("did:sidetree"),
        transaction_time: time,
        transaction_number: number,
        anchor_string: anchor_string.to_string(),
        protocol_genesis_time: 0,
    }
}

fn observer_with(
    operations: Arc<dyn OperationsProvider>,
) -> (Observer, tokio::sync::mpsc::Sender<Vec<SidetreeTxn>>, Arc<Mutex<Vec<Vec<AnchoredOperation>>>>) {
    let (ledger, sender) = ChannelLedger::new(100);
    let (store_provider, puts) = RecordingStoreProvider::new();
    let providers = Providers {
        ledger: Arc::new(ledger),
        operations,
        op_store: Arc::new(store_provider),
        protocol: Arc::new(FixedProtocolProvider::single(ProtocolParameters::default())),
    };
    (Observer::new(providers), sender, puts)
}

async fn wait_for_put_count(puts: &Arc<Mutex<Vec<Vec<AnchoredOperation>>>>, count: usize) -> bool {
    let puts = puts.clone();
    fixtures::wait_for(move || {
        let puts = puts.clone();
        async move { puts.lock().expect("lock").len() >= count }
    }, Duration::from_secs(2))
    .await
}

#[tokio::test]
async fn observed_operations_reach_the_store_with_ledger_position() {
    let stub = StubOperationsProvider { buffers: vec![fixtures::build_update_request("abc")], error: None };
    let (mut observer, sender, puts) = observer_with(Arc::new(stub));
    observer.start().expect("start");

    sender.send(vec![txn(20, 2, "1.address")]).await.expect("send");
    assert!(wait_for_put_count(&puts, 1).await, "store put was not invoked");

    let recorded = puts.lock().expect("lock");
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].len(), 1);
    let op = &recorded[0][0];
    assert_eq!(op.unique_suffix.as_str(), "abc");
    assert_eq!(op.position(), (20, 2, 0));

    drop(recorded);
    observer.stop().await;
}

#[tokio::test]
async fn duplicate_suffix_in_batch_keeps_first_occurrence() {
    let buffer = fixtures::build_update_request("abc");
    let stub = StubOperationsProvider { buffers: vec![buffer.clone(), buffer], error: None };
    let (mut observer, sender, puts) = observer_with(Arc::new(stub));
    observer.start().expect("start");

    sender.send(vec![txn(20, 2, "2.address")]).await.expect("send");
    assert!(wait_for_put_count(&puts, 1).await, "store put was not invoked");

    let recorded = puts.lock().expect("lock");
    assert_eq!(recorded[0].len(), 1, "only the first occurrence may be persisted");
    assert_eq!(recorded[0][0].operation_index, 0);

    drop(recorded);
    observer.stop().await;
}

#[tokio::test]
async fn failed_fetch_skips_the_transaction_and_keeps_the_observer_running() {
    let cas = Arc::new(FailingCas);
    let protocol = Arc::new(FixedProtocolProvider::single(ProtocolParameters::default()));
    let failing_provider = Arc::new(CasOperationsProvider::new(cas, protocol));

    let (ledger, sender) = ChannelLedger::new(100);
    let (store_provider, puts) = RecordingStoreProvider::new();
    // First transaction fails at CAS; the stub used afterwards proves the
    // consumer is still alive.
    struct SwitchingProvider {
        failing: Arc<CasOperationsProvider>,
        healthy_buffer: Vec<u8>,
    }
    #[async_trait]
    impl OperationsProvider for SwitchingProvider {
        async fn txn_operations(&self, txn: &SidetreeTxn) -> Result<Vec<Vec<u8>>, SidetreeError> {
            if txn.anchor_string.starts_with("1.fail") {
                self.failing.txn_operations(txn).await
            } else {
                Ok(vec![self.healthy_buffer.clone()])
            }
        }
    }
    let providers = Providers {
        ledger: Arc::new(ledger),
        operations: Arc::new(SwitchingProvider {
            failing: failing_provider,
            healthy_buffer: fixtures::build_update_request("abc"),
        }),
        op_store: Arc::new(store_provider),
        protocol: Arc::new(FixedProtocolProvider::single(ProtocolParameters::default())),
    };
    let mut observer = Observer::new(providers);
    observer.start().expect("start");

    sender.send(vec![txn(20, 2, "1.fail-address")]).await.expect("send failing");
    sender.send(vec![txn(21, 3, "1.ok-address")]).await.expect("send healthy");

    assert!(wait_for_put_count(&puts, 1).await, "observer must keep processing after a failure");
    let recorded = puts.lock().expect("lock");
    assert_eq!(recorded.len(), 1, "the failed transaction must not reach the store");
    assert_eq!(recorded[0][0].position(), (21, 3, 0));

    drop(recorded);
    observer.stop().await;
}

#[tokio::test]
async fn closing_the_ledger_channel_terminates_the_consumer() {
    let stub = StubOperationsProvider { buffers: Vec::new(), error: None };
    let (mut observer, sender, _puts) = observer_with(Arc::new(stub));
    observer.start().expect("start");

    drop(sender);
    // stop() must remain safe after the channel closed on its own.
    observer.stop().await;
    observer.stop().await;
}

#[tokio::test]
async fn invalid_operations_are_discarded_without_failing_valid_ones() {
    let stub = StubOperationsProvider {
        buffers: vec![b"not json at all".to_vec(), fixtures::build_update_request("abc")],
        error: None,
    };
    let (mut observer, sender, puts) = observer_with(Arc::new(stub));
    observer.start().expect("start");

    sender.send(vec![txn(20, 2, "2.address")]).await.expect("send");
    assert!(wait_for_put_count(&puts, 1).await, "valid operation must be stored");

    let recorded = puts.lock().expect("lock");
    assert_eq!(recorded[0].len(), 1);
    assert_eq!(recorded[0][0].unique_suffix.as_str(), "abc");
    // The invalid operation occupied document index 0.
    assert_eq!(recorded[0][0].operation_index, 1);

    drop(recorded);
    observer.stop().await;
}

#[tokio::test]
async fn second_registration_fails_but_first_observer_runs() {
    let (ledger, _sender) = ChannelLedger::new(4);
    let ledger: Arc<dyn Ledger> = Arc::new(ledger);
    ledger.register_for_sidetree_txn().expect("first registration");
    assert!(ledger.register_for_sidetree_txn().is_err());
}
