//! Signer capability and the signers shipped with the engine.
//!
//! The builder never owns key material; it is handed a `Signer` for the
//! duration of a single call. The implementations here sign with
//! caller-supplied raw key bytes and exist mainly for clients and tests.

use crate::domain::jws::{JwsHeader, PublicJwk, ALG_ED25519, ALG_SECP256K1};
use crate::foundation::error::SidetreeError;
use crate::foundation::util::encoding;
use sha2::{Digest, Sha256};

pub trait Signer: Send + Sync {
    /// Protected headers the signature will be bound to.
    fn headers(&self) -> JwsHeader;

    /// Sign the payload, returning the raw signature bytes.
    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SidetreeError>;
}

/// EdDSA signer over a caller-supplied Ed25519 secret key.
pub struct Ed25519Signer {
    key: ed25519_dalek::SigningKey,
    header: JwsHeader,
}

impl Ed25519Signer {
    pub fn new(secret: &[u8; 32], kid: impl Into<String>) -> Self {
        Self { key: ed25519_dalek::SigningKey::from_bytes(secret), header: JwsHeader::new(ALG_ED25519, kid) }
    }

    /// The verification key in the JWK form used by signed-data payloads.
    pub fn public_jwk(&self) -> PublicJwk {
        PublicJwk {
            kty: "OKP".to_string(),
            crv: "Ed25519".to_string(),
            x: encoding::encode(self.key.verifying_key().as_bytes()),
            y: None,
        }
    }
}

impl Signer for Ed25519Signer {
    fn headers(&self) -> JwsHeader {
        self.header.clone()
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SidetreeError> {
        use ed25519_dalek::Signer as _;
        Ok(self.key.sign(data).to_bytes().to_vec())
    }
}

/// ES256K signer over a caller-supplied secp256k1 secret key.
pub struct Secp256k1Signer {
    secret: secp256k1::SecretKey,
    header: JwsHeader,
}

impl Secp256k1Signer {
    pub fn new(secret: &[u8; 32], kid: impl Into<String>) -> Result<Self, SidetreeError> {
        let secret = secp256k1::SecretKey::from_slice(secret)
            .map_err(|err| SidetreeError::Signing(format!("invalid secp256k1 secret key: {err}")))?;
        Ok(Self { secret, header: JwsHeader::new(ALG_SECP256K1, kid) })
    }

    pub fn public_jwk(&self) -> PublicJwk {
        let public = self.secret.public_key(&secp256k1::Secp256k1::new());
        let uncompressed = public.serialize_uncompressed();
        PublicJwk {
            kty: "EC".to_string(),
            crv: "secp256k1".to_string(),
            x: encoding::encode(&uncompressed[1..33]),
            y: Some(encoding::encode(&uncompressed[33..65])),
        }
    }
}

impl Signer for Secp256k1Signer {
    fn headers(&self) -> JwsHeader {
        self.header.clone()
    }

    fn sign(&self, data: &[u8]) -> Result<Vec<u8>, SidetreeError> {
        let digest: [u8; 32] = Sha256::digest(data).into();
        let message = secp256k1::Message::from_digest(digest);
        let signature = secp256k1::Secp256k1::signing_only().sign_ecdsa(&message, &self.secret);
        Ok(signature.serialize_compact().to_vec())
    }
}
