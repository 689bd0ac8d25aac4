//! Per-day and per-period quota accounting.
//!
//! An entry counts once for each tag it carries; it counts toward the "no tag"
//! group only when it carries none. Tag groups are compared with the tag's
//! quota for the weekday, the "no tag" group with the global daily maximum.

use crate::models::day_summary::{DaySummary, GroupKey, GroupTotal, PeriodTotal};
use crate::models::entry::Entry;
use crate::models::tag::Tag;
use chrono::{NaiveDate, NaiveDateTime};
use std::collections::BTreeMap;

pub const UNTAGGED_NAME: &str = "No tag";
pub const UNTAGGED_COLOR: &str = "#9e9e9e";

/// Summary of `date`. `entries` may contain other dates; they are ignored.
/// Every tag gets a group; "no tag" only when the day has untagged entries.
pub fn summarize_day(
    date: NaiveDate,
    entries: &[Entry],
    tags: &[Tag],
    daily_max_minutes: i64,
    now: NaiveDateTime,
) -> DaySummary {
    let day: Vec<&Entry> = entries.iter().filter(|e| e.date == date).collect();

    let mut groups: Vec<GroupTotal> = tags
        .iter()
        .map(|tag| {
            let tagged = day.iter().filter(|e| e.has_tag(tag.id));
            let seconds: i64 = tagged.clone().map(|e| e.effective_seconds(now)).sum();
            let quota_minutes = tag.quota.minutes_on(date);

            GroupTotal {
                key: GroupKey::Tag(tag.id),
                name: tag.name.clone(),
                color: tag.color.clone(),
                seconds,
                quota_minutes,
                difference: seconds - quota_minutes * 60,
                running: tagged.clone().any(|e| e.is_running()),
            }
        })
        .collect();

    let untagged: Vec<&&Entry> = day.iter().filter(|e| e.is_untagged()).collect();
    if !untagged.is_empty() {
        let seconds: i64 = untagged.iter().map(|e| e.effective_seconds(now)).sum();
        groups.push(GroupTotal {
            key: GroupKey::Untagged,
            name: UNTAGGED_NAME.to_string(),
            color: UNTAGGED_COLOR.to_string(),
            seconds,
            quota_minutes: daily_max_minutes,
            difference: seconds - daily_max_minutes * 60,
            running: untagged.iter().any(|e| e.is_running()),
        });
    }

    DaySummary {
        date,
        total_seconds: day.iter().map(|e| e.effective_seconds(now)).sum(),
        difference: groups.iter().map(|g| g.difference).sum(),
        running: day.iter().any(|e| e.is_running()),
        groups,
    }
}

/// One summary per day of `days`, in order.
pub fn summarize_days(
    days: &[NaiveDate],
    entries: &[Entry],
    tags: &[Tag],
    daily_max_minutes: i64,
    now: NaiveDateTime,
) -> Vec<DaySummary> {
    days.iter()
        .map(|d| summarize_day(*d, entries, tags, daily_max_minutes, now))
        .collect()
}

/// Per group, the sum of the per-day signed differences (never capped).
/// Tags appear in first-seen order, "no tag" last.
pub fn accumulate(days: &[DaySummary]) -> Vec<PeriodTotal> {
    let mut order: Vec<GroupKey> = Vec::new();
    let mut totals: BTreeMap<GroupKey, PeriodTotal> = BTreeMap::new();

    for day in days {
        for g in &day.groups {
            let t = totals.entry(g.key).or_insert_with(|| {
                order.push(g.key);
                PeriodTotal {
                    key: g.key,
                    name: g.name.clone(),
                    color: g.color.clone(),
                    seconds: 0,
                    quota_seconds: 0,
                    difference: 0,
                }
            });
            t.seconds += g.seconds;
            t.quota_seconds += g.quota_minutes * 60;
            t.difference += g.difference;
        }
    }

    order.sort_by_key(|k| matches!(k, GroupKey::Untagged));
    order
        .into_iter()
        .filter_map(|k| totals.remove(&k))
        .collect()
}

/// Sum of all group differences of a period.
pub fn period_difference(totals: &[PeriodTotal]) -> i64 {
    totals.iter().map(|t| t.difference).sum()
}
