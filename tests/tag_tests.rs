use rtimetracker::core::manual::{ManualLogic, ManualRequest};
use rtimetracker::core::settings::{SettingsLogic, SettingsRequest};
use rtimetracker::core::tags::{TagLogic, TagRequest};
use rtimetracker::db::queries::{count_untagged_entries, load_entry};
use rtimetracker::db::settings::get_daily_max_minutes;
use rtimetracker::db::tags::{load_tag, load_tags};
use rtimetracker::errors::AppError;
use rtimetracker::models::tag::{TAG_PALETTE, WeekQuota};

mod common;
use common::{create_tag, memory_pool};

fn request(name: &str) -> TagRequest {
    TagRequest {
        name: name.to_string(),
        quota: WeekQuota([60, 60, 60, 60, 30, 0, 0]),
        color: None,
    }
}

#[test]
fn test_tag_round_trip() {
    let pool = memory_pool();

    let created = TagLogic::create(&pool.conn, &request("  Project X ")).unwrap();
    let fetched = load_tag(&pool.conn, created.id).unwrap().unwrap();

    assert_eq!(fetched, created);
    assert_eq!(fetched.name, "Project X");
    assert_eq!(fetched.quota.0, [60, 60, 60, 60, 30, 0, 0]);
    assert!(TAG_PALETTE.contains(&fetched.color.as_str()));
}

#[test]
fn test_duplicate_name_is_a_validation_error() {
    let pool = memory_pool();
    TagLogic::create(&pool.conn, &request("Work")).unwrap();

    let err = TagLogic::create(&pool.conn, &request("Work")).unwrap_err();

    assert!(matches!(err, AppError::Validation(ref m) if m.contains("already exists")));
    assert_eq!(load_tags(&pool.conn).unwrap().len(), 1);
}

#[test]
fn test_invalid_input_is_rejected() {
    let pool = memory_pool();

    let empty = TagLogic::create(&pool.conn, &request("   ")).unwrap_err();
    assert!(matches!(empty, AppError::Validation(_)));

    let mut bad_quota = request("Work");
    bad_quota.quota.set(2, 2000);
    assert!(matches!(
        TagLogic::create(&pool.conn, &bad_quota).unwrap_err(),
        AppError::Validation(_)
    ));

    let mut bad_color = request("Work");
    bad_color.color = Some("red".into());
    assert!(matches!(
        TagLogic::create(&pool.conn, &bad_color).unwrap_err(),
        AppError::Validation(_)
    ));

    assert!(load_tags(&pool.conn).unwrap().is_empty());
}

#[test]
fn test_update_changes_name_quota_and_color() {
    let pool = memory_pool();
    let tag = create_tag(&pool, "Work", 60);

    let updated = TagLogic::update(
        &pool.conn,
        tag.id,
        &TagRequest {
            name: "Deep work".into(),
            quota: WeekQuota::uniform(120),
            color: Some("#123abc".into()),
        },
    )
    .unwrap();

    assert_eq!(updated.name, "Deep work");
    assert_eq!(updated.quota, WeekQuota::uniform(120));
    assert_eq!(updated.color, "#123abc");

    let missing = TagLogic::update(&pool.conn, 999, &request("Ghost")).unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));
}

#[test]
fn test_referenced_tag_cannot_be_deleted() {
    let mut pool = memory_pool();
    let used = create_tag(&pool, "Used", 60);
    let unused = create_tag(&pool, "Unused", 60);

    ManualLogic::add_manual(
        &mut pool,
        &ManualRequest {
            start: "2025-03-03T09:00".into(),
            hours: 1,
            tag_ids: vec![used.id],
            ..Default::default()
        },
    )
    .unwrap();

    let err = TagLogic::delete(&pool.conn, used.id).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
    assert!(load_tag(&pool.conn, used.id).unwrap().is_some());

    let deleted = TagLogic::delete(&pool.conn, unused.id).unwrap();
    assert_eq!(deleted.name, "Unused");
    assert!(load_tag(&pool.conn, unused.id).unwrap().is_none());

    let missing = TagLogic::delete(&pool.conn, unused.id).unwrap_err();
    assert!(matches!(missing, AppError::NotFound(_)));
}

#[test]
fn test_recolor_picks_another_palette_color() {
    let pool = memory_pool();
    let tag = create_tag(&pool, "Work", 60);

    let recolored = TagLogic::recolor(&pool.conn, tag.id).unwrap();

    assert_ne!(recolored.color.to_lowercase(), tag.color.to_lowercase());
    assert!(TAG_PALETTE.contains(&recolored.color.as_str()));
    assert_eq!(
        load_tag(&pool.conn, tag.id).unwrap().unwrap().color,
        recolored.color
    );
}

#[test]
fn test_settings_daily_max() {
    let pool = memory_pool();
    assert_eq!(get_daily_max_minutes(&pool.conn).unwrap(), 450);

    SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::DailyMax {
            hours: 8,
            minutes: 15,
        },
    )
    .unwrap();
    assert_eq!(get_daily_max_minutes(&pool.conn).unwrap(), 495);

    let err = SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::DailyMax {
            hours: 0,
            minutes: 0,
        },
    )
    .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));

    for (hours, minutes) in [(i64::MAX / 30, 0), (25, 0), (0, i64::MAX)] {
        let err = SettingsLogic::apply(&pool.conn, &SettingsRequest::DailyMax { hours, minutes })
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)), "{}h {}m", hours, minutes);
    }
    assert_eq!(get_daily_max_minutes(&pool.conn).unwrap(), 495);
}

#[test]
fn test_settings_bulk_actions() {
    let mut pool = memory_pool();
    let work = create_tag(&pool, "Work", 0);
    let other = create_tag(&pool, "Other", 0);

    // an untagged cancellation is allowed
    let cancel = ManualLogic::add_cancellation(
        &mut pool,
        &rtimetracker::core::manual::CancelRequest {
            date: "2025-03-03".into(),
            hours: 1,
            ..Default::default()
        },
    )
    .unwrap();
    assert_eq!(count_untagged_entries(&pool.conn).unwrap(), 1);

    SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::AssignUntagged {
            tag_id: Some(work.id),
        },
    )
    .unwrap();
    assert_eq!(count_untagged_entries(&pool.conn).unwrap(), 0);
    assert_eq!(
        load_entry(&pool.conn, cancel.id).unwrap().unwrap().tag_ids,
        vec![work.id]
    );

    SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::SeedQuotas {
            weekdays: vec![0, 4],
            hours: 2,
            minutes: 0,
        },
    )
    .unwrap();
    for id in [work.id, other.id] {
        let tag = load_tag(&pool.conn, id).unwrap().unwrap();
        assert_eq!(tag.quota.0, [120, 0, 0, 0, 120, 0, 0]);
    }

    let none = SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::SeedQuotas {
            weekdays: vec![],
            hours: 2,
            minutes: 0,
        },
    )
    .unwrap_err();
    assert!(matches!(none, AppError::Validation(_)));
}

#[test]
fn test_failed_audit_write_rolls_back_tag_and_settings_changes() {
    let pool = memory_pool();
    let tag = create_tag(&pool, "Work", 60);
    pool.conn.execute("DROP TABLE log", []).unwrap();

    let err = TagLogic::update(
        &pool.conn,
        tag.id,
        &TagRequest {
            name: "Renamed".into(),
            quota: WeekQuota::uniform(5),
            color: Some("#000000".into()),
        },
    );
    assert!(err.is_err());

    let err = SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::SeedQuotas {
            weekdays: vec![0, 2, 6],
            hours: 2,
            minutes: 0,
        },
    );
    assert!(err.is_err());

    let kept = load_tag(&pool.conn, tag.id).unwrap().unwrap();
    assert_eq!(kept.name, "Work");
    assert_eq!(kept.color, tag.color);
    assert_eq!(kept.quota, WeekQuota::uniform(60));
}

#[test]
fn test_seed_quotas_sets_only_the_chosen_weekdays() {
    let pool = memory_pool();
    let work = create_tag(&pool, "Work", 60);
    let other = create_tag(&pool, "Other", 0);

    SettingsLogic::apply(
        &pool.conn,
        &SettingsRequest::SeedQuotas {
            weekdays: vec![0, 2, 6],
            hours: 1,
            minutes: 30,
        },
    )
    .unwrap();

    assert_eq!(load_tag(&pool.conn, work.id).unwrap().unwrap().quota.0, [90, 60, 90, 60, 60, 60, 90]);
    assert_eq!(load_tag(&pool.conn, other.id).unwrap().unwrap().quota.0, [90, 0, 90, 0, 0, 0, 90]);
}
