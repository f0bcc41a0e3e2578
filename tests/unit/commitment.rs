use crate::fixtures;
use sidetree_core::domain::commitment::{compute_commitment, verify_reveal};
use sidetree_core::foundation::constants::SHA2_256_CODE;
use sidetree_core::foundation::ErrorCode;

#[test]
fn reveal_matching_commitment_verifies() {
    let signer = fixtures::ed25519_signer();
    let jwk = signer.public_jwk();
    let commitment = compute_commitment(SHA2_256_CODE, &jwk).expect("commitment");
    verify_reveal(&commitment, &jwk).expect("reveal must match");
}

#[test]
fn wrong_reveal_key_is_rejected() {
    let commitment = compute_commitment(SHA2_256_CODE, &fixtures::ed25519_signer().public_jwk()).expect("commitment");
    let err = verify_reveal(&commitment, &fixtures::second_signer().public_jwk()).expect_err("wrong key");
    assert_eq!(err.code(), ErrorCode::CommitmentRevealMismatch);
}

#[test]
fn commitment_embeds_the_hash_algorithm() {
    let jwk = fixtures::ed25519_signer().public_jwk();
    let commitment = compute_commitment(SHA2_256_CODE, &jwk).expect("commitment");
    assert!(sidetree_core::domain::multihash::is_computed_using_algorithm(&commitment, SHA2_256_CODE));
}

#[test]
fn malformed_commitment_is_rejected() {
    let jwk = fixtures::ed25519_signer().public_jwk();
    assert!(verify_reveal("not-a-multihash", &jwk).is_err());
}
