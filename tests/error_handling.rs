//! Error handling and edge case tests.

use social_graph::{
    Address, DecodeError, DuplicatePolicy, GraphConfig, GraphError, GraphIndex, GraphState,
    ListOp, ListRecord, LogReplayer, OperationEntry, OwnershipEntry, TokenId,
};

fn addr(byte: u8) -> Address {
    Address([byte; 20])
}

fn add(slot: usize, target: u8) -> OperationEntry {
    OperationEntry::new(slot, ListOp::Add(ListRecord::address(addr(target))).encode())
}

fn owners() -> Vec<OwnershipEntry> {
    vec![OwnershipEntry::new(1u64, addr(1))]
}

// --- Decode errors ---

#[test]
fn test_short_add_aborts_replay() {
    let index = GraphIndex::default();
    let mut short = add(0, 20);
    short.bytes.truncate(23);
    let ops = vec![add(0, 10), short, add(0, 30)];

    let err = index.replay(&owners(), &ops).unwrap_err();
    assert!(matches!(
        err.root_cause(),
        GraphError::Decode(DecodeError::InvalidLength { actual: 23, .. })
    ));
    assert!(matches!(err, GraphError::ReplayAborted { position: 1, .. }));

    // the operation before the bad one was applied, the one after was not
    let records = index.get_list_records(&TokenId::from(1));
    assert_eq!(records, vec![ListRecord::address(addr(10))]);
}

#[test]
fn test_empty_operation_bytes() {
    let ops = vec![OperationEntry::new(0, Vec::new())];
    let err = LogReplayer::new(&owners(), &ops)
        .validate(GraphConfig::default())
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        GraphError::Decode(DecodeError::Truncated(0))
    ));
}

#[test]
fn test_decode_error_converts_via_apply() {
    let index = GraphIndex::default();
    let mut bytes = ListOp::Tag(ListRecord::address(addr(2)), "x".to_string()).encode();
    bytes.truncate(24);
    assert!(matches!(
        index.apply(&TokenId::from(1), &bytes),
        Err(GraphError::Decode(DecodeError::EmptyTag))
    ));
}

// --- Reference errors ---

#[test]
fn test_untag_never_added_record() {
    let ops = vec![OperationEntry::new(
        0,
        ListOp::Untag(ListRecord::address(addr(5)), "block".to_string()).encode(),
    )];
    let mut state = GraphState::default();
    let err = LogReplayer::new(&owners(), &ops)
        .replay_into(&mut state)
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        GraphError::ReferenceNotFound { .. }
    ));
}

#[test]
fn test_tag_after_remove_fails() {
    let mut state = GraphState::default();
    let list = TokenId::from(1);
    let record = ListRecord::address(addr(5));

    state.add_record(&list, record.clone()).unwrap();
    state.tag_record(&list, &record, "top8").unwrap();
    state.remove_record(&list, &record).unwrap();

    assert!(matches!(
        state.tag_record(&list, &record, "top8"),
        Err(GraphError::ReferenceNotFound { .. })
    ));
    assert!(matches!(
        state.get_list_record_tags(&list, &record),
        Err(GraphError::ReferenceNotFound { .. })
    ));
    assert!(matches!(
        state.remove_record(&list, &record),
        Err(GraphError::ReferenceNotFound { .. })
    ));
}

#[test]
fn test_unknown_list_reads_are_empty() {
    let index = GraphIndex::default();
    let missing = TokenId::from(404);

    assert!(index.get_list_records(&missing).is_empty());
    assert!(index.get_list_records_with_tags(&missing).is_empty());
    assert!(index.get_following(&addr(1)).is_empty());
    assert!(index.get_followers(&addr(1)).is_empty());
    assert!(index.get_leaderboard_followers(10).is_empty());
    assert!(matches!(
        index.get_list_record_tags(&missing, &ListRecord::address(addr(1))),
        Err(GraphError::UnknownList(_))
    ));
}

// --- Duplicate records ---

#[test]
fn test_duplicate_add_rejected_by_default() {
    let index = GraphIndex::default();
    let err = index
        .replay(&owners(), &[add(0, 9), add(0, 9)])
        .unwrap_err();
    assert!(matches!(
        err.root_cause(),
        GraphError::DuplicateRecord { .. }
    ));
}

#[test]
fn test_duplicate_add_ignored_when_configured() {
    let index = GraphIndex::new(GraphConfig {
        duplicate_records: DuplicatePolicy::Ignore,
        ..GraphConfig::default()
    });
    let tag = OperationEntry::new(
        0,
        ListOp::Tag(ListRecord::address(addr(9)), "top8".to_string()).encode(),
    );
    let summary = index
        .replay(&owners(), &[add(0, 9), tag, add(0, 9)])
        .unwrap();

    assert_eq!(summary.adds, 2);
    let following = index.get_following(&addr(1));
    assert_eq!(following.len(), 1);
    assert_eq!(following[0].tags, vec!["top8"]);
}

// --- Validation ---

#[test]
fn test_validate_leaves_index_untouched() {
    let index = GraphIndex::default();
    index.replay(&owners(), &[add(0, 10)]).unwrap();

    let candidate = vec![add(0, 11), add(0, 11)];
    let err = LogReplayer::new(&owners(), &candidate)
        .validate(index.config())
        .unwrap_err();
    assert!(matches!(err, GraphError::ReplayAborted { position: 1, .. }));

    assert_eq!(index.get_following(&addr(1)).len(), 1);
}

#[test]
fn test_error_messages() {
    let err = GraphError::Decode(DecodeError::UnknownOpcode(9));
    assert_eq!(err.to_string(), "Protocol decode error: Unknown opcode: 9");

    let err = GraphError::UnknownList(TokenId::from(12));
    assert_eq!(err.to_string(), "Unknown list: 12");
}
