/// Multihash code for SHA-256 per the multicodec table.
pub const SHA2_256_CODE: u64 = 18;

/// Separator between the namespace and the unique suffix in a full identifier.
pub const NAMESPACE_DELIMITER: &str = ":";

/// Default capacity of the bounded ledger notification channel.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Default per-read timeout for CAS fetches, in milliseconds.
pub const DEFAULT_CAS_READ_TIMEOUT_MS: u64 = 5_000;

/// Default cap on the declared operation count of a single anchored batch.
pub const DEFAULT_MAX_OPERATIONS_PER_BATCH: usize = 10_000;

/// Default cap on the decompressed size of a single CAS file.
/// Batch files are attacker-supplied; decompression must be bounded.
pub const DEFAULT_MAX_FILE_BYTES: usize = 16 * 1024 * 1024;
