use crate::fixtures;
use serde_json::Value;
use sidetree_core::domain::jws::{CompactJws, JwsHeader};
use sidetree_core::domain::multihash::{compute_encoded_multihash, multihash_code_from_encoded};
use sidetree_core::domain::request::{
    new_create_request, new_deactivate_request, new_recover_request, new_update_request, CreateRequestInfo,
    DeactivateRequestInfo, RecoverRequestInfo, UpdateRequestInfo,
};
use sidetree_core::domain::signer::{Ed25519Signer, Signer};
use sidetree_core::domain::canonical::canonicalize_bytes;
use sidetree_core::foundation::constants::SHA2_256_CODE;
use sidetree_core::foundation::util::encoding;
use sidetree_core::foundation::{ErrorCode, SidetreeError};

const DID_SUFFIX: &str = "whatever";

struct FailingSigner;

impl Signer for FailingSigner {
    fn headers(&self) -> JwsHeader {
        JwsHeader::new("EdDSA", "key-1")
    }

    fn sign(&self, _data: &[u8]) -> Result<Vec<u8>, SidetreeError> {
        Err(SidetreeError::Signing("injected signer error".to_string()))
    }
}

struct KidlessSigner;

impl Signer for KidlessSigner {
    fn headers(&self) -> JwsHeader {
        JwsHeader { alg: "EdDSA".to_string(), kid: None }
    }

    fn sign(&self, _data: &[u8]) -> Result<Vec<u8>, SidetreeError> {
        Ok(vec![0u8; 64])
    }
}

fn update_info<'a>(signer: &'a Ed25519Signer) -> UpdateRequestInfo<'a> {
    UpdateRequestInfo {
        did_suffix: DID_SUFFIX.to_string(),
        patch: Some(fixtures::test_patch()),
        update_commitment: fixtures::test_commitment(signer),
        update_key: Some(signer.public_jwk()),
        multihash_code: SHA2_256_CODE,
        signer,
    }
}

#[test]
fn missing_unique_suffix_is_rejected() {
    let signer = fixtures::ed25519_signer();
    let info = UpdateRequestInfo { did_suffix: String::new(), ..update_info(&signer) };
    let err = new_update_request(&info).expect_err("must fail");
    assert!(err.to_string().contains("missing did unique suffix"));
}

#[test]
fn missing_patch_is_rejected() {
    let signer = fixtures::ed25519_signer();
    let info = UpdateRequestInfo { patch: None, ..update_info(&signer) };
    let err = new_update_request(&info).expect_err("must fail");
    assert!(err.to_string().contains("missing update information"));
}

#[test]
fn unsupported_multihash_code_is_rejected() {
    let signer = fixtures::ed25519_signer();
    for code in [0u64, 100] {
        let info = UpdateRequestInfo { multihash_code: code, ..update_info(&signer) };
        let err = new_update_request(&info).expect_err("must fail");
        assert!(err.to_string().contains("algorithm not supported"));
    }
}

#[test]
fn kidless_signer_is_rejected() {
    let signer = fixtures::ed25519_signer();
    let kidless = KidlessSigner;
    let info = UpdateRequestInfo { signer: &kidless, ..update_info(&signer) };
    let err = new_update_request(&info).expect_err("must fail");
    assert_eq!(err.to_string(), "kid must be present in the protected header");
    assert_eq!(err.code(), ErrorCode::MissingKid);
}

#[test]
fn signer_errors_propagate_verbatim() {
    let signer = fixtures::ed25519_signer();
    let failing = FailingSigner;
    let info = UpdateRequestInfo { signer: &failing, ..update_info(&signer) };
    let err = new_update_request(&info).expect_err("must fail");
    assert!(err.to_string().contains("injected signer error"));
}

#[test]
fn update_request_happy_path() {
    let signer = fixtures::ed25519_signer();
    let request = new_update_request(&update_info(&signer)).expect("update request");

    let value: Value = serde_json::from_slice(&request).expect("request json");
    let keys: Vec<&String> = value.as_object().expect("object").keys().collect();
    assert_eq!(keys, ["delta", "did_suffix", "signed_data", "type"]);
    assert_eq!(value["type"], "update");
    assert_eq!(value["did_suffix"], DID_SUFFIX);

    // Decoding the delta and re-hashing yields the hash inside signed data.
    let jws = CompactJws::parse(value["signed_data"].as_str().expect("jws")).expect("parse jws");
    let signed: Value = serde_json::from_slice(&jws.payload().expect("payload")).expect("signed data");
    let delta_hash = signed["delta_hash"].as_str().expect("delta hash");

    let delta_bytes = encoding::decode(value["delta"].as_str().expect("delta")).expect("decode delta");
    let canonical = canonicalize_bytes(&delta_bytes).expect("canonicalize delta");
    let code = multihash_code_from_encoded(delta_hash).expect("code");
    assert_eq!(compute_encoded_multihash(code, &canonical).expect("hash"), delta_hash);
}

#[test]
fn builders_are_deterministic() {
    let signer = fixtures::ed25519_signer();
    assert_eq!(new_update_request(&update_info(&signer)).expect("first"), new_update_request(&update_info(&signer)).expect("second"));
    assert_eq!(fixtures::build_create_request(), fixtures::build_create_request());
}

#[test]
fn create_request_happy_path() {
    let request = fixtures::build_create_request();
    let value: Value = serde_json::from_slice(&request).expect("request json");
    let keys: Vec<&String> = value.as_object().expect("object").keys().collect();
    assert_eq!(keys, ["delta", "suffix_data", "type"]);
    assert_eq!(value["type"], "create");

    // suffix data binds the delta hash
    let suffix_bytes = encoding::decode(value["suffix_data"].as_str().expect("suffix data")).expect("decode");
    let suffix: Value = serde_json::from_slice(&suffix_bytes).expect("suffix json");
    let delta_bytes = encoding::decode(value["delta"].as_str().expect("delta")).expect("decode delta");
    let expected = compute_encoded_multihash(SHA2_256_CODE, &canonicalize_bytes(&delta_bytes).expect("canonical")).expect("hash");
    assert_eq!(suffix["delta_hash"].as_str().expect("delta hash"), expected);
}

#[test]
fn create_without_patch_is_rejected() {
    let info = CreateRequestInfo {
        patch: None,
        update_commitment: "commitment".to_string(),
        recovery_commitment: "commitment".to_string(),
        multihash_code: SHA2_256_CODE,
    };
    let err = new_create_request(&info).expect_err("must fail");
    assert!(err.to_string().contains("missing create information"));
}

#[test]
fn recover_request_binds_next_recovery_commitment() {
    let signer = fixtures::ed25519_signer();
    let next_commitment = fixtures::test_commitment(&fixtures::second_signer());
    let info = RecoverRequestInfo {
        did_suffix: DID_SUFFIX.to_string(),
        patch: Some(fixtures::test_patch()),
        update_commitment: fixtures::test_commitment(&signer),
        recovery_commitment: next_commitment.clone(),
        recovery_key: Some(signer.public_jwk()),
        multihash_code: SHA2_256_CODE,
        signer: &signer,
    };
    let request = new_recover_request(&info).expect("recover request");
    let value: Value = serde_json::from_slice(&request).expect("request json");
    assert_eq!(value["type"], "recover");

    let jws = CompactJws::parse(value["signed_data"].as_str().expect("jws")).expect("parse jws");
    let signed: Value = serde_json::from_slice(&jws.payload().expect("payload")).expect("signed data");
    assert_eq!(signed["recovery_commitment"].as_str().expect("commitment"), next_commitment);
}

#[test]
fn deactivate_request_has_no_delta() {
    let signer = fixtures::ed25519_signer();
    let info = DeactivateRequestInfo {
        did_suffix: DID_SUFFIX.to_string(),
        recovery_key: Some(signer.public_jwk()),
        signer: &signer,
    };
    let request = new_deactivate_request(&info).expect("deactivate request");
    let value: Value = serde_json::from_slice(&request).expect("request json");
    let keys: Vec<&String> = value.as_object().expect("object").keys().collect();
    assert_eq!(keys, ["did_suffix", "signed_data", "type"]);

    let jws = CompactJws::parse(value["signed_data"].as_str().expect("jws")).expect("parse jws");
    let signed: Value = serde_json::from_slice(&jws.payload().expect("payload")).expect("signed data");
    assert_eq!(signed["did_suffix"], DID_SUFFIX);
}
