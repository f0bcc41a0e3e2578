pub mod cas;
pub mod compression;
pub mod config;
pub mod ledger;
pub mod logging;
pub mod store;

pub use cas::{CasClient, MemoryCas, TimedCas};
pub use config::{load_config, validate_config, EngineConfig, FixedProtocolProvider, ProtocolVersionProvider};
pub use ledger::{ChannelLedger, Ledger};
pub use store::{MemoryOperationStoreProvider, OperationStore, OperationStoreProvider};
