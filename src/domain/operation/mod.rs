pub mod models;
pub mod parser;

pub use models::{
    AnchoredOperation, CreateRequest, DeactivateRequest, DeactivateSignedData, Delta, OperationKind, OperationType,
    ParsedOperation, RecoverRequest, RecoverSignedData, SuffixData, UpdateRequest, UpdateSignedData,
};
pub use parser::OperationParser;
