//! Gzip compression for batch files stored in CAS.
//!
//! Decompression is bounded: batch files are attacker-supplied and a small
//! compressed payload must not expand without limit.

use crate::foundation::error::SidetreeError;
use flate2::read::GzDecoder;
use flate2::write::GzEncoder;
use flate2::Compression;
use std::io::{Read, Write};

pub fn compress(bytes: &[u8]) -> Result<Vec<u8>, SidetreeError> {
    let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(bytes)
        .map_err(|err| SidetreeError::Compression { operation: "compress".to_string(), details: err.to_string() })?;
    encoder
        .finish()
        .map_err(|err| SidetreeError::Compression { operation: "compress".to_string(), details: err.to_string() })
}

pub fn decompress(bytes: &[u8], max_bytes: usize) -> Result<Vec<u8>, SidetreeError> {
    let mut out = Vec::new();
    let mut decoder = GzDecoder::new(bytes).take(max_bytes as u64 + 1);
    decoder
        .read_to_end(&mut out)
        .map_err(|err| SidetreeError::Compression { operation: "decompress".to_string(), details: err.to_string() })?;
    if out.len() > max_bytes {
        return Err(SidetreeError::Compression {
            operation: "decompress".to_string(),
            details: format!("decompressed content exceeds {max_bytes} bytes"),
        });
    }
    Ok(out)
}
