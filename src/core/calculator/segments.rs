//! Splitting entry intervals into per-day calendar segments.

use crate::models::entry::Entry;
use crate::utils::date::next_midnight;
use chrono::{NaiveDate, NaiveDateTime, Timelike};
use serde::Serialize;
use std::collections::HashMap;

/// Portion of an entry that falls within one calendar day of the displayed week.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Segment {
    /// Day offset from the week start, 0..=6.
    pub day: usize,
    /// Minute of day where the segment starts.
    pub start: f64,
    /// Length in minutes.
    pub duration: f64,
    #[serde(skip)]
    pub seconds: i64,
    pub id: i64,
    pub description: String,
    pub color: String,
}

/// Raw `(day offset, start, end)` pieces of `[start, end)` inside the 7 days
/// beginning at `week_start`.
pub fn split_interval(
    start: NaiveDateTime,
    end: NaiveDateTime,
    week_start: NaiveDate,
) -> Vec<(usize, NaiveDateTime, NaiveDateTime)> {
    let mut out = Vec::new();
    let mut cursor = start;

    while cursor < end {
        let midnight = next_midnight(cursor);
        let piece_end = end.min(midnight);
        let offset = (cursor.date() - week_start).num_days();

        if offset >= 7 {
            break;
        }
        if offset >= 0 {
            out.push((offset as usize, cursor, piece_end));
        }
        cursor = midnight;
    }

    out
}

/// Segments of every entry overlapping the week. The running timer ends at
/// `now`; entries without a start (cancellations) are skipped.
/// `colors` maps tag id to color; an entry takes the color of its first tag.
pub fn build_segments(
    entries: &[Entry],
    week_start: NaiveDate,
    now: NaiveDateTime,
    colors: &HashMap<i64, String>,
    default_color: &str,
) -> Vec<Segment> {
    let mut out = Vec::new();

    for e in entries {
        let (Some(start), Some(end)) = (e.start, e.interval_end(now)) else {
            continue;
        };

        let color = e
            .tag_ids
            .first()
            .and_then(|id| colors.get(id))
            .map(String::as_str)
            .unwrap_or(default_color);

        for (day, from, to) in split_interval(start, end, week_start) {
            let seconds = (to - from).num_seconds();
            out.push(Segment {
                day,
                start: (from.num_seconds_from_midnight() as f64) / 60.0,
                duration: seconds as f64 / 60.0,
                seconds,
                id: e.id,
                description: e.description.clone().unwrap_or_default(),
                color: color.to_string(),
            });
        }
    }

    out
}
