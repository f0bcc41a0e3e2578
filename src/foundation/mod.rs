pub mod constants;
pub mod error;
pub mod types;
pub mod util;

pub use constants::*;
pub use error::{ErrorCode, Result, SidetreeError};
pub use types::{Namespace, UniqueSuffix};
