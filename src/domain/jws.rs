//! Compact JWS assembly, parsing and verification.
//!
//! The engine carries its own minimal JWK model: signed-data payloads embed
//! the public key that authorizes the operation, and commitments are hashes
//! of the canonical form of that key.

use crate::domain::canonical;
use crate::domain::signer::Signer;
use crate::foundation::error::SidetreeError;
use crate::foundation::util::encoding;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub const ALG_ED25519: &str = "EdDSA";
pub const ALG_SECP256K1: &str = "ES256K";

/// Public key in JWK form as carried inside signed-data payloads.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PublicJwk {
    pub kty: String,
    pub crv: String,
    pub x: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
}

/// Protected header of a compact JWS.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct JwsHeader {
    #[serde(default)]
    pub alg: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
}

impl JwsHeader {
    pub fn new(alg: impl Into<String>, kid: impl Into<String>) -> Self {
        Self { alg: alg.into(), kid: Some(kid.into()) }
    }
}

/// A compact JWS split into its three base64url segments.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompactJws {
    pub protected_b64: String,
    pub payload_b64: String,
    pub signature_b64: String,
}

impl CompactJws {
    pub fn parse(compact: &str) -> Result<Self, SidetreeError> {
        let mut parts = compact.split('.');
        match (parts.next(), parts.next(), parts.next(), parts.next()) {
            (Some(protected), Some(payload), Some(signature), None) => Ok(Self {
                protected_b64: protected.to_string(),
                payload_b64: payload.to_string(),
                signature_b64: signature.to_string(),
            }),
            _ => Err(SidetreeError::schema("compact JWS must have three segments".to_string())),
        }
    }

    pub fn header(&self) -> Result<JwsHeader, SidetreeError> {
        let bytes = encoding::decode(&self.protected_b64)?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub fn payload(&self) -> Result<Vec<u8>, SidetreeError> {
        encoding::decode(&self.payload_b64)
    }

    pub fn signature(&self) -> Result<Vec<u8>, SidetreeError> {
        encoding::decode(&self.signature_b64)
    }

    /// The bytes the signature covers: `<protected>.<payload>`.
    pub fn signing_input(&self) -> String {
        format!("{}.{}", self.protected_b64, self.payload_b64)
    }

    pub fn compact(&self) -> String {
        format!("{}.{}.{}", self.protected_b64, self.payload_b64, self.signature_b64)
    }

    /// Verify the signature against `jwk`, restricted to the permitted algorithms.
    pub fn verify(&self, jwk: &PublicJwk, allowed_algorithms: &[String]) -> Result<(), SidetreeError> {
        let header = self.header()?;
        if !allowed_algorithms.iter().any(|alg| alg == &header.alg) {
            return Err(SidetreeError::UnsupportedAlgorithm(format!("alg '{}' is not permitted", header.alg)));
        }
        let signature = self.signature()?;
        let input = self.signing_input();
        match header.alg.as_str() {
            ALG_ED25519 => verify_ed25519(jwk, input.as_bytes(), &signature),
            ALG_SECP256K1 => verify_secp256k1(jwk, input.as_bytes(), &signature),
            other => Err(SidetreeError::UnsupportedAlgorithm(format!("alg '{other}' is not implemented"))),
        }
    }
}

/// Canonical-serialize `model`, sign it with `signer` and return the compact JWS.
pub fn sign_model<T: Serialize>(model: &T, signer: &dyn Signer) -> Result<String, SidetreeError> {
    let header = signer.headers();
    let protected_b64 = encoding::encode(canonical::canonicalize(&header)?);
    let payload_b64 = encoding::encode(canonical::canonicalize(model)?);
    let signing_input = format!("{protected_b64}.{payload_b64}");
    let signature = signer.sign(signing_input.as_bytes())?;
    Ok(format!("{protected_b64}.{payload_b64}.{}", encoding::encode(signature)))
}

fn verify_ed25519(jwk: &PublicJwk, message: &[u8], signature: &[u8]) -> Result<(), SidetreeError> {
    if jwk.kty != "OKP" || jwk.crv != "Ed25519" {
        return Err(SidetreeError::schema(format!("JWK kty '{}' crv '{}' cannot verify EdDSA", jwk.kty, jwk.crv)));
    }
    let x = encoding::decode(&jwk.x)?;
    let key_bytes: [u8; 32] =
        x.as_slice().try_into().map_err(|_| SidetreeError::schema(format!("Ed25519 x must be 32 bytes, got {}", x.len())))?;
    let key = ed25519_dalek::VerifyingKey::from_bytes(&key_bytes)
        .map_err(|err| SidetreeError::SignatureInvalid(format!("invalid Ed25519 key: {err}")))?;
    let signature = ed25519_dalek::Signature::from_slice(signature)
        .map_err(|err| SidetreeError::SignatureInvalid(format!("invalid Ed25519 signature: {err}")))?;
    key.verify_strict(message, &signature)
        .map_err(|err| SidetreeError::SignatureInvalid(format!("Ed25519 verification failed: {err}")))
}

fn verify_secp256k1(jwk: &PublicJwk, message: &[u8], signature: &[u8]) -> Result<(), SidetreeError> {
    if jwk.kty != "EC" || jwk.crv != "secp256k1" {
        return Err(SidetreeError::schema(format!("JWK kty '{}' crv '{}' cannot verify ES256K", jwk.kty, jwk.crv)));
    }
    let x = encoding::decode(&jwk.x)?;
    let y = encoding::decode(jwk.y.as_deref().ok_or(SidetreeError::MissingField("y coordinate in JWK"))?)?;
    if x.len() != 32 || y.len() != 32 {
        return Err(SidetreeError::schema(format!("secp256k1 coordinates must be 32 bytes, got {}/{}", x.len(), y.len())));
    }
    let mut point = Vec::with_capacity(65);
    point.push(0x04);
    point.extend_from_slice(&x);
    point.extend_from_slice(&y);
    let key = secp256k1::PublicKey::from_slice(&point)
        .map_err(|err| SidetreeError::SignatureInvalid(format!("invalid secp256k1 key: {err}")))?;
    let signature = secp256k1::ecdsa::Signature::from_compact(signature)
        .map_err(|err| SidetreeError::SignatureInvalid(format!("invalid secp256k1 signature: {err}")))?;
    let digest: [u8; 32] = Sha256::digest(message).into();
    let message = secp256k1::Message::from_digest(digest);
    secp256k1::Secp256k1::verification_only()
        .verify_ecdsa(&message, &signature, &key)
        .map_err(|err| SidetreeError::SignatureInvalid(format!("secp256k1 verification failed: {err}")))
}
