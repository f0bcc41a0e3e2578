pub mod canonical;
pub mod commitment;
pub mod jws;
pub mod multihash;
pub mod operation;
pub mod patch;
pub mod protocol;
pub mod request;
pub mod signer;
pub mod txn;

pub use jws::{CompactJws, JwsHeader, PublicJwk};
pub use operation::{AnchoredOperation, Delta, OperationKind, OperationType, ParsedOperation, SuffixData};
pub use patch::Patch;
pub use protocol::ProtocolParameters;
pub use signer::Signer;
pub use txn::{AnchorData, SidetreeTxn, TxnState};
