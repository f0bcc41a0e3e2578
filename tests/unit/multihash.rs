use sidetree_core::domain::multihash::{
    compute_encoded_multihash, compute_multihash, decode_multihash, is_computed_using_algorithm, is_supported_multihash,
    is_valid_hash, multihash_code_from_encoded,
};
use sidetree_core::foundation::constants::SHA2_256_CODE;
use sidetree_core::foundation::util::encoding;
use sidetree_core::foundation::ErrorCode;

const SAMPLE: &[u8] = b"test";

#[test]
fn compute_rejects_unsupported_codes() {
    for code in [0u64, 100] {
        let err = compute_multihash(code, SAMPLE).expect_err("unsupported code must fail");
        assert_eq!(err.code(), ErrorCode::UnsupportedAlgorithm);
        assert!(err.to_string().contains("algorithm not supported"));
    }
    assert!(compute_multihash(SHA2_256_CODE, SAMPLE).is_ok());
}

#[test]
fn valid_hash_round_trip() {
    let multihash = compute_multihash(SHA2_256_CODE, SAMPLE).expect("multihash");
    let encoded_multihash = encoding::encode(&multihash);

    is_valid_hash(&encoding::encode(SAMPLE), &encoded_multihash).expect("hash must match");

    let err = is_valid_hash(&encoding::encode(b"content"), &encoded_multihash).expect_err("altered content");
    assert_eq!(err.to_string(), "supplied hash doesn't match original content");
    assert_eq!(err.code(), ErrorCode::HashMismatch);
}

#[test]
fn valid_hash_rejects_malformed_encodings() {
    let encoded_multihash = compute_encoded_multihash(SHA2_256_CODE, SAMPLE).expect("multihash");

    let err = is_valid_hash("not base64!!", &encoded_multihash).expect_err("bad content encoding");
    assert_eq!(err.code(), ErrorCode::MalformedBase64);

    let err = is_valid_hash(&encoding::encode(SAMPLE), "not base64!!").expect_err("bad multihash encoding");
    assert_eq!(err.code(), ErrorCode::MalformedBase64);
}

#[test]
fn supported_multihash_detection() {
    // not a multihash at all
    assert!(!is_supported_multihash(&encoding::encode(SAMPLE)));
    // corrupted base64
    assert!(!is_supported_multihash("XXXXXaGVsbG8="));
    // valid encoded multihash
    let encoded = compute_encoded_multihash(SHA2_256_CODE, SAMPLE).expect("multihash");
    assert!(is_supported_multihash(&encoded));
}

#[test]
fn algorithm_detection_by_embedded_code() {
    let encoded = compute_encoded_multihash(SHA2_256_CODE, SAMPLE).expect("multihash");
    assert!(is_computed_using_algorithm(&encoded, SHA2_256_CODE));
    assert!(!is_computed_using_algorithm(&encoded, 55));
    assert!(!is_computed_using_algorithm("invalid", SHA2_256_CODE));
    assert_eq!(multihash_code_from_encoded(&encoded).expect("code"), SHA2_256_CODE);
}

#[test]
fn decode_rejects_truncated_digests() {
    let mut multihash = compute_multihash(SHA2_256_CODE, SAMPLE).expect("multihash");
    multihash.pop();
    assert!(decode_multihash(&multihash).is_err());
}
