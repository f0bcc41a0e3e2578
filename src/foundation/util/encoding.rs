use crate::foundation::error::SidetreeError;
use base64::prelude::{Engine, BASE64_URL_SAFE_NO_PAD};

/// Encode bytes as URL-safe base64 without padding.
/// All "encoded" fields of the wire format use this form.
pub fn encode(bytes: impl AsRef<[u8]>) -> String {
    BASE64_URL_SAFE_NO_PAD.encode(bytes.as_ref())
}

/// Decode a URL-safe unpadded base64 string.
pub fn decode(value: &str) -> Result<Vec<u8>, SidetreeError> {
    Ok(BASE64_URL_SAFE_NO_PAD.decode(value)?)
}
