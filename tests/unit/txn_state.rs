use sidetree_core::domain::txn::{ensure_valid_transition, is_terminal, AnchorData, TxnProgress, TxnState};
use sidetree_core::foundation::ErrorCode;

#[test]
fn anchor_string_parses_count_and_address() {
    let data = AnchorData::parse("14.QmAnchorFileAddress").expect("parse");
    assert_eq!(data.num_operations, 14);
    assert_eq!(data.anchor_file_address, "QmAnchorFileAddress");
}

#[test]
fn anchor_string_errors_are_anchor_data_kind() {
    for input in ["no-dot-here", ".address", "-1.address", "1.", "1e2.address"] {
        let err = AnchorData::parse(input).expect_err("must fail");
        assert_eq!(err.code(), ErrorCode::AnchorData, "input: {input}");
    }
}

#[test]
fn address_may_itself_contain_dots() {
    let data = AnchorData::parse("3.addr.with.dots").expect("parse");
    assert_eq!(data.num_operations, 3);
    assert_eq!(data.anchor_file_address, "addr.with.dots");
}

#[test]
fn progress_walks_the_success_path() {
    let mut progress = TxnProgress::new();
    assert_eq!(progress.state(), TxnState::Received);
    for state in [TxnState::Fetched, TxnState::Validated, TxnState::Stored] {
        progress.advance(state).expect("transition");
    }
    assert!(is_terminal(progress.state()));
}

#[test]
fn every_non_terminal_state_may_fail() {
    for state in [TxnState::Received, TxnState::Fetched, TxnState::Validated] {
        ensure_valid_transition(state, TxnState::Failed).expect("failure transition");
    }
    assert!(ensure_valid_transition(TxnState::Stored, TxnState::Failed).is_err());
    assert!(ensure_valid_transition(TxnState::Failed, TxnState::Fetched).is_err());
}
