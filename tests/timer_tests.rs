use rtimetracker::core::timer::{StartRequest, TimerLogic};
use rtimetracker::db::queries::{load_active_entry, load_entries_by_date};
use rtimetracker::errors::AppError;

mod common;
use common::{at, create_tag, date, memory_pool, open_pool};

#[test]
fn test_start_then_stop_records_duration() {
    let mut pool = open_pool("timer_start_stop");
    let tag = create_tag(&pool, "Work", 480);

    let started = TimerLogic::start(
        &mut pool,
        at(2025, 3, 3, 9, 0),
        &StartRequest {
            description: Some("coding".into()),
            tag_ids: vec![tag.id],
        },
    )
    .expect("start");

    assert!(started.is_running());
    assert_eq!(started.date, date(2025, 3, 3));

    let active = load_active_entry(&pool.conn).unwrap().expect("running entry");
    assert_eq!(active.id, started.id);
    assert_eq!(active.tag_ids, vec![tag.id]);

    let stopped = TimerLogic::stop(&mut pool, at(2025, 3, 3, 10, 30)).expect("stop");
    assert_eq!(stopped.duration, 90 * 60);
    assert!(load_active_entry(&pool.conn).unwrap().is_none());

    let entries = load_entries_by_date(&pool.conn, date(2025, 3, 3)).unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].end, Some(at(2025, 3, 3, 10, 30)));
    assert_eq!(entries[0].description.as_deref(), Some("coding"));
}

#[test]
fn test_start_while_running_is_rejected() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 480);
    let req = StartRequest {
        description: None,
        tag_ids: vec![tag.id],
    };

    let first = TimerLogic::start(&mut pool, at(2025, 3, 3, 9, 0), &req).unwrap();
    let err = TimerLogic::start(&mut pool, at(2025, 3, 3, 9, 5), &req).unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m.contains("already running")));

    let active = load_active_entry(&pool.conn).unwrap().unwrap();
    assert_eq!(active.id, first.id);
    assert_eq!(active.start, Some(at(2025, 3, 3, 9, 0)));
    assert_eq!(load_entries_by_date(&pool.conn, date(2025, 3, 3)).unwrap().len(), 1);
}

#[test]
fn test_stop_while_idle_is_rejected() {
    let mut pool = memory_pool();

    let err = TimerLogic::stop(&mut pool, at(2025, 3, 3, 9, 0)).unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m == "No timer is running."));
    assert!(load_entries_by_date(&pool.conn, date(2025, 3, 3)).unwrap().is_empty());
}

#[test]
fn test_start_requires_a_tag() {
    let mut pool = memory_pool();

    let err = TimerLogic::start(&mut pool, at(2025, 3, 3, 9, 0), &StartRequest::default())
        .unwrap_err();

    assert!(matches!(err, AppError::Validation(_)));
    assert!(load_active_entry(&pool.conn).unwrap().is_none());
}

#[test]
fn test_start_with_unknown_tag_is_rejected() {
    let mut pool = memory_pool();

    let err = TimerLogic::start(
        &mut pool,
        at(2025, 3, 3, 9, 0),
        &StartRequest {
            description: None,
            tag_ids: vec![42],
        },
    )
    .unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m.contains("#42")));
    assert!(load_active_entry(&pool.conn).unwrap().is_none());
}

#[test]
fn test_second_running_row_violates_unique_index() {
    let pool = memory_pool();

    pool.conn
        .execute(
            "INSERT INTO entries (date, start_ts, duration, manual) VALUES ('2025-03-03', '2025-03-03T09:00:00', 0, 0)",
            [],
        )
        .unwrap();
    let second = pool.conn.execute(
        "INSERT INTO entries (date, start_ts, duration, manual) VALUES ('2025-03-03', '2025-03-03T10:00:00', 0, 0)",
        [],
    );

    assert!(second.is_err());
}
