//! Multihash computation and verification.
//!
//! A multihash is the self-describing form `<varint code><varint length><digest>`.
//! SHA-256 (code 18) is mandatory; additional codes are opt-in through the
//! protocol parameters.

use crate::foundation::constants::SHA2_256_CODE;
use crate::foundation::error::SidetreeError;
use crate::foundation::util::encoding;
use sha2::{Digest, Sha256};

/// A decoded multihash: the algorithm code and the raw digest.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DecodedMultihash {
    pub code: u64,
    pub digest: Vec<u8>,
}

/// Compute the multihash of `bytes` using the supplied algorithm code.
pub fn compute_multihash(code: u64, bytes: &[u8]) -> Result<Vec<u8>, SidetreeError> {
    let digest = digest_for_code(code, bytes)?;
    let mut out = Vec::with_capacity(digest.len() + 4);
    encode_varint(code, &mut out);
    encode_varint(digest.len() as u64, &mut out);
    out.extend_from_slice(&digest);
    Ok(out)
}

/// Compute the multihash of `bytes` and return it in encoded (base64url) form.
pub fn compute_encoded_multihash(code: u64, bytes: &[u8]) -> Result<String, SidetreeError> {
    Ok(encoding::encode(compute_multihash(code, bytes)?))
}

fn digest_for_code(code: u64, bytes: &[u8]) -> Result<Vec<u8>, SidetreeError> {
    match code {
        SHA2_256_CODE => Ok(Sha256::digest(bytes).to_vec()),
        _ => Err(SidetreeError::UnsupportedAlgorithm("unable to compute hash".to_string())),
    }
}

/// Whether this engine can compute digests for the given code.
pub fn is_supported_code(code: u64) -> bool {
    code == SHA2_256_CODE
}

/// Decode a raw multihash into its code and digest.
pub fn decode_multihash(bytes: &[u8]) -> Result<DecodedMultihash, SidetreeError> {
    let (code, read) = decode_varint(bytes)?;
    let (length, read_len) = decode_varint(&bytes[read..])?;
    let digest = &bytes[read + read_len..];
    if digest.len() as u64 != length {
        return Err(SidetreeError::schema(format!(
            "multihash digest length mismatch: declared {} actual {}",
            length,
            digest.len()
        )));
    }
    Ok(DecodedMultihash { code, digest: digest.to_vec() })
}

/// Extract the algorithm code from an encoded multihash.
pub fn multihash_code_from_encoded(encoded_multihash: &str) -> Result<u64, SidetreeError> {
    let bytes = encoding::decode(encoded_multihash)?;
    Ok(decode_multihash(&bytes)?.code)
}

/// Whether the encoded string is a well-formed multihash with a supported code.
pub fn is_supported_multihash(encoded_multihash: &str) -> bool {
    match multihash_code_from_encoded(encoded_multihash) {
        Ok(code) => is_supported_code(code),
        Err(_) => false,
    }
}

/// Whether the encoded multihash was computed with the given algorithm code.
pub fn is_computed_using_algorithm(encoded_multihash: &str, code: u64) -> bool {
    matches!(multihash_code_from_encoded(encoded_multihash), Ok(found) if found == code)
}

/// Compare encoded content against an encoded multihash.
///
/// Recomputes the hash of the decoded content with the code embedded in the
/// multihash and compares the encoded forms.
pub fn is_valid_hash(encoded_content: &str, encoded_multihash: &str) -> Result<(), SidetreeError> {
    let content = encoding::decode(encoded_content)?;
    let code = multihash_code_from_encoded(encoded_multihash)?;
    let computed = compute_encoded_multihash(code, &content)?;
    if computed != encoded_multihash {
        return Err(SidetreeError::HashMismatch);
    }
    Ok(())
}

pub(crate) fn encode_varint(mut value: u64, out: &mut Vec<u8>) {
    loop {
        let byte = (value & 0x7f) as u8;
        value >>= 7;
        if value == 0 {
            out.push(byte);
            return;
        }
        out.push(byte | 0x80);
    }
}

/// Decode an unsigned varint, returning the value and the number of bytes read.
pub(crate) fn decode_varint(bytes: &[u8]) -> Result<(u64, usize), SidetreeError> {
    let mut value: u64 = 0;
    for (index, byte) in bytes.iter().enumerate() {
        if index >= 9 {
            return Err(SidetreeError::schema("varint too long".to_string()));
        }
        value |= u64::from(byte & 0x7f) << (7 * index);
        if byte & 0x80 == 0 {
            return Ok((value, index + 1));
        }
    }
    Err(SidetreeError::schema("varint missing terminal byte".to_string()))
}
