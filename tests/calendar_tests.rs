use rtimetracker::core::calculator::segments::{build_segments, split_interval};
use rtimetracker::core::manual::{CancelRequest, ManualLogic, ManualRequest};
use rtimetracker::core::report::week_calendar;
use rtimetracker::db::queries::insert_entry;
use rtimetracker::models::entry::Entry;
use std::collections::HashMap;

mod common;
use common::{at, create_tag, date, memory_pool};

#[test]
fn test_entry_across_midnight_gives_two_segments() {
    // Monday 23:00 -> Tuesday 02:00
    let monday = date(2025, 3, 3);
    let mut e = Entry::manual(at(2025, 3, 3, 23, 0), at(2025, 3, 4, 2, 0), 3 * 3600, None, vec![1]);
    e.id = 1;
    let colors = HashMap::from([(1, "#e6194b".to_string())]);

    let segs = build_segments(&[e], monday, at(2025, 3, 9, 12, 0), &colors, "#9e9e9e");

    assert_eq!(segs.len(), 2);
    assert_eq!(segs[0].day, 0);
    assert_eq!(segs[0].start, 23.0 * 60.0);
    assert_eq!(segs[0].duration, 60.0);
    assert_eq!(segs[1].day, 1);
    assert_eq!(segs[1].start, 0.0);
    assert_eq!(segs[1].duration, 120.0);
    assert_eq!(segs[0].seconds + segs[1].seconds, 3 * 3600);
    assert!(segs.iter().all(|s| s.color == "#e6194b"));
}

#[test]
fn test_pieces_outside_the_week_are_skipped() {
    // Sunday 22:00 of the previous week -> Monday 01:00
    let monday = date(2025, 3, 3);
    let pieces = split_interval(at(2025, 3, 2, 22, 0), at(2025, 3, 3, 1, 0), monday);

    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].0, 0);
    assert_eq!(pieces[0].1, at(2025, 3, 3, 0, 0));

    // Sunday 23:00 -> next Monday 01:00: only the Sunday piece
    let pieces = split_interval(at(2025, 3, 9, 23, 0), at(2025, 3, 10, 1, 0), monday);
    assert_eq!(pieces.len(), 1);
    assert_eq!(pieces[0].0, 6);
}

#[test]
fn test_running_entry_ends_at_now() {
    let monday = date(2025, 3, 3);
    let mut e = Entry::timer(at(2025, 3, 5, 8, 0), None, vec![]);
    e.id = 3;

    let segs = build_segments(&[e], monday, at(2025, 3, 5, 9, 30), &HashMap::new(), "#9e9e9e");

    assert_eq!(segs.len(), 1);
    assert_eq!(segs[0].day, 2);
    assert_eq!(segs[0].duration, 90.0);
    assert_eq!(segs[0].color, "#9e9e9e");
}

#[test]
fn test_week_calendar_skips_cancellations() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 60);

    ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T23:00".into(),
            end: Some("2025-03-04T02:00".into()),
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap();
    ManualLogic::add_cancellation(
        &mut pool,
        &CancelRequest {
            date: "2025-03-04".into(),
            hours: 1,
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap();

    // any day of the week selects the same Monday
    let cal = week_calendar(&pool.conn, date(2025, 3, 6), at(2025, 3, 9, 20, 0)).unwrap();

    assert_eq!(cal.week_start, date(2025, 3, 3));
    assert_eq!(cal.days.len(), 7);
    assert_eq!(cal.segments.len(), 2);
    // day headers aggregate by entry date
    assert_eq!(cal.days[0].total_seconds, 3 * 3600);
    assert_eq!(cal.days[1].total_seconds, -3600);
    // 7 days of 60 min quota, 2 h worked net
    assert_eq!(cal.difference, 2 * 3600 - 7 * 3600);
}

#[test]
fn test_entries_started_before_the_week_keep_their_overlap() {
    let mut pool = memory_pool();
    let tag = create_tag(&pool, "Work", 60);

    // 2025-02-28 09:00 + 300 h = 2025-03-12 21:00
    ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-02-28T09:00".into(),
            hours: 300,
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap();
    // ended before the week: no segment
    ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-01T09:00".into(),
            end: Some("2025-03-02T10:00".into()),
            tag_ids: vec![tag.id],
            ..Default::default()
        },
    )
    .unwrap();
    // timer left running since February
    insert_entry(&pool.conn, &Entry::timer(at(2025, 2, 20, 8, 0), None, vec![tag.id])).unwrap();

    let cal = week_calendar(&pool.conn, date(2025, 3, 10), at(2025, 3, 11, 12, 0)).unwrap();

    let mut days: Vec<(usize, f64, f64)> = cal.segments.iter().map(|s| (s.day, s.start, s.duration)).collect();
    days.sort_by(|a, b| a.partial_cmp(b).unwrap());
    assert_eq!(
        days,
        vec![
            (0, 0.0, 1440.0),
            (0, 0.0, 1440.0),
            (1, 0.0, 720.0),
            (1, 0.0, 1440.0),
            (2, 0.0, 21.0 * 60.0),
        ]
    );
    // neither entry is dated in this week
    assert!(cal.days.iter().all(|d| d.total_seconds == 0));
}
