use crate::core::ailog::{AiLogEntry, aggregate};

use super::{legacy_record, turn_record, with_fallback, with_version};

#[test]
fn aggregate_is_deterministic_for_identical_input() {
    let records = vec![
        turn_record("g1", 4, "p1", "2024-03-01T10:00:05Z"),
        turn_record("g2", 1, "p2", "2024-03-01T10:00:06Z"),
        legacy_record("old-1", "2024-03-01T10:00:07Z"),
        turn_record("g1", 4, "p1", "2024-03-01T10:00:08Z"),
        turn_record("g2", 1, "p2", "2024-03-01T10:00:09Z"),
    ];

    let first = aggregate(records.clone());
    let second = aggregate(records);
    assert_eq!(first, second);
}

#[test]
fn mixed_page_collapses_turns_and_passes_legacy_through() {
    let records = vec![
        turn_record("g1", 4, "p1", "2024-03-01T10:00:05Z"),
        legacy_record("old-1", "2024-03-01T10:00:07Z"),
        turn_record("g1", 4, "p1", "2024-03-01T10:00:06Z"),
        with_fallback(
            turn_record("g1", 4, "p1", "2024-03-01T10:00:08Z"),
            Some("invalid index"),
        ),
        legacy_record("old-2", "2024-03-01T10:00:04Z"),
    ];

    let entries = aggregate(records);
    assert_eq!(entries.len(), 3, "got {:?}", entries);

    match &entries[0] {
        AiLogEntry::Single(record) => assert_eq!(record.id, "old-1"),
        other => panic!("expected the newest legacy record first, got {:?}", other),
    }
    match &entries[1] {
        AiLogEntry::Turn(group) => {
            assert_eq!(group.game_id, "g1");
            assert_eq!(group.turn_number, 4);
            assert_eq!(group.actor_id, "p1");
            assert_eq!(group.records.len(), 3);
            assert!(group.has_fallback);
            assert_eq!(group.fallback_reason.as_deref(), Some("invalid index"));
        }
        other => panic!("expected the turn group second, got {:?}", other),
    }
    match &entries[2] {
        AiLogEntry::Single(record) => assert_eq!(record.id, "old-2"),
        other => panic!("expected the oldest legacy record last, got {:?}", other),
    }
}

#[test]
fn group_members_keep_arrival_order() {
    let records = vec![
        turn_record("g1", 2, "p1", "2024-03-01T09:00:01Z"),
        turn_record("g1", 2, "p2", "2024-03-01T09:00:02Z"),
        turn_record("g1", 2, "p1", "2024-03-01T09:00:03Z"),
        turn_record("g1", 2, "p2", "2024-03-01T09:00:04Z"),
        turn_record("g1", 2, "p1", "2024-03-01T09:00:05Z"),
    ];

    let entries = aggregate(records);
    let p1_group = entries
        .iter()
        .find_map(|entry| match entry {
            AiLogEntry::Turn(group) if group.actor_id == "p1" => Some(group),
            _ => None,
        })
        .expect("p1 group");
    let timestamps: Vec<&str> = p1_group
        .records
        .iter()
        .map(|record| record.created_at.as_str())
        .collect();
    assert_eq!(
        timestamps,
        [
            "2024-03-01T09:00:01Z",
            "2024-03-01T09:00:03Z",
            "2024-03-01T09:00:05Z"
        ]
    );
}

#[test]
fn same_turn_across_log_versions_shares_a_group() {
    let records = vec![
        with_version(turn_record("g1", 3, "p1", "2024-03-01T09:10:00Z"), "v2"),
        with_version(turn_record("g1", 3, "p1", "2024-03-01T09:10:01Z"), "v3"),
    ];

    let entries = aggregate(records);
    assert_eq!(entries.len(), 1);
    match &entries[0] {
        AiLogEntry::Turn(group) => assert_eq!(group.records.len(), 2),
        other => panic!("expected one group, got {:?}", other),
    }
}

#[test]
fn records_missing_identity_fields_stay_single() {
    let mut no_actor = turn_record("g1", 1, "p1", "2024-03-01T09:20:00Z");
    no_actor.actor_id = None;
    let unknown_version = with_version(turn_record("g1", 1, "p1", "2024-03-01T09:20:01Z"), "v1");
    let mut no_plan = turn_record("g1", 1, "p1", "2024-03-01T09:20:02Z");
    no_plan.plan = None;

    let entries = aggregate(vec![no_actor, unknown_version, no_plan]);
    assert_eq!(entries.len(), 3);
    assert!(
        entries
            .iter()
            .all(|entry| matches!(entry, AiLogEntry::Single(_))),
        "got {:?}",
        entries
    );
}

#[test]
fn descending_sort_is_stable_for_equal_timestamps() {
    let records = vec![
        legacy_record("old-a", "2024-03-01T12:00:00Z"),
        legacy_record("old-b", "2024-03-01T12:00:00Z"),
        turn_record("g9", 1, "p1", "2024-03-01T12:00:00Z"),
    ];

    let entries = aggregate(records);
    assert!(matches!(&entries[0], AiLogEntry::Turn(_)));
    match (&entries[1], &entries[2]) {
        (AiLogEntry::Single(a), AiLogEntry::Single(b)) => {
            assert_eq!(a.id, "old-a");
            assert_eq!(b.id, "old-b");
        }
        other => panic!("expected two singles in input order, got {:?}", other),
    }
}
