use rtimetracker::core::del::DeleteLogic;
use rtimetracker::core::manual::{
    CancelRequest, DEFAULT_CANCEL_DESCRIPTION, ManualLogic, ManualRequest, resolve_manual,
};
use rtimetracker::db::queries::{load_entries_by_date, load_entry, set_entry_tags};
use rtimetracker::errors::AppError;

mod common;
use common::{at, create_tag, date, memory_pool};

#[test]
fn test_manual_with_explicit_end() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 480);

    let entry = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T09:00".into(),
            end: Some("2025-03-03T11:15".into()),
            hours: 5,
            minutes: 0,
            description: None,
            tag_ids: vec![tag.id],
        },
    )
    .unwrap();

    // explicit end wins over the duration fields
    let stored = load_entry(&pool.conn, entry.id).unwrap().unwrap();
    assert!(stored.manual);
    assert_eq!(stored.end, Some(at(2025, 3, 3, 11, 15)));
    assert_eq!(
        (stored.end.unwrap() - stored.start.unwrap()).num_seconds(),
        stored.duration
    );
    assert_eq!(stored.tag_ids, vec![tag.id]);
}

#[test]
fn test_manual_with_duration_only() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 480);

    let entry = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T09:00".into(),
            end: None,
            hours: 1,
            minutes: 45,
            description: Some("meeting".into()),
            tag_ids: vec![tag.id],
        },
    )
    .unwrap();

    assert_eq!(entry.duration, 105 * 60);
    assert_eq!(entry.end, Some(at(2025, 3, 3, 10, 45)));
}

#[test]
fn test_end_before_start_without_duration() {
    let err = resolve_manual(
        at(2025, 3, 3, 9, 0),
        Some(at(2025, 3, 3, 8, 0)),
        true,
        0,
        0,
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m.contains("after the start")));
}

#[test]
fn test_end_before_start_falls_back_to_duration() {
    let r = resolve_manual(
        at(2025, 3, 3, 9, 0),
        Some(at(2025, 3, 3, 8, 0)),
        true,
        0,
        30,
    )
    .unwrap();

    assert_eq!(r.duration, 1800);
    assert_eq!(r.end, at(2025, 3, 3, 9, 30));
}

#[test]
fn test_manual_rejects_missing_and_bad_start() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 480);

    let missing = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            hours: 1,
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(missing, AppError::Validation(_)));

    let bad = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "yesterday".into(),
            hours: 1,
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap_err();
    assert!(matches!(bad, AppError::Validation(ref m) if m.contains("Invalid start")));
}

#[test]
fn test_manual_requires_a_tag() {
    let mut pool = memory_pool();

    let err = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T09:00".into(),
            hours: 1,
            ..Default::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(load_entries_by_date(&pool.conn, date(2025, 3, 3)).unwrap().is_empty());
}

#[test]
fn test_cancellation_is_negative_without_interval() {
    let mut pool = memory_pool();

    let entry = ManualLogic::add_cancellation(
        &mut pool,
        &CancelRequest {
            date: "2025-03-04".into(),
            hours: 2,
            minutes: 30,
            description: None,
            tag_ids: vec![],
        },
    )
    .unwrap();

    let stored = load_entry(&pool.conn, entry.id).unwrap().unwrap();
    assert_eq!(stored.duration, -(2 * 3600 + 30 * 60));
    assert!(stored.start.is_none());
    assert!(stored.end.is_none());
    assert!(stored.manual);
    assert!(stored.is_cancellation());
    assert_eq!(stored.date, date(2025, 3, 4));
    assert_eq!(stored.description.as_deref(), Some(DEFAULT_CANCEL_DESCRIPTION));
}

#[test]
fn test_cancellation_rejects_zero_duration() {
    let mut pool = memory_pool();

    let err = ManualLogic::add_cancellation(
        &mut pool,
        &CancelRequest {
            date: "2025-03-04".into(),
            ..Default::default()
        },
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
}

#[test]
fn test_delete_entry_removes_tag_links() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 480);

    let entry = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T09:00".into(),
            hours: 1,
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap();

    DeleteLogic::apply(&mut pool, entry.id).unwrap();

    assert!(load_entry(&pool.conn, entry.id).unwrap().is_none());
    let links: i64 = pool
        .conn
        .query_row("SELECT COUNT(*) FROM entry_tags", [], |r| r.get(0))
        .unwrap();
    assert_eq!(links, 0);

    let again = DeleteLogic::apply(&mut pool, entry.id).unwrap_err();
    assert!(matches!(again, AppError::NotFound(_)));
}

#[test]
fn test_set_entry_tags_replaces_links() {
    let mut pool = memory_pool();
    let work = create_tag(&pool, "Work", 480);
    let study = create_tag(&pool, "Study", 60);

    let entry = ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T09:00".into(),
            hours: 1,
            tag_ids: vec![work.id],
            ..Default::default()
        },
    )
    .unwrap();

    set_entry_tags(&mut pool, entry.id, &[study.id]).unwrap();

    let stored = load_entry(&pool.conn, entry.id).unwrap().unwrap();
    assert_eq!(stored.tag_ids, vec![study.id]);
}

#[test]
fn test_duration_overflow_is_a_validation_error() {
    let start = at(2025, 3, 3, 9, 0);

    for (hours, minutes) in [(10_000_000_000, 0), (i64::MAX, 0), (0, i64::MAX)] {
        let err = resolve_manual(start, None, false, hours, minutes).unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{}h {}m", hours, minutes);
    }
}
