//! Read-only views assembled fresh for every page render.

use crate::core::calculator::aggregate::{
    UNTAGGED_COLOR, accumulate, period_difference, summarize_day, summarize_days,
};
use crate::core::calculator::segments::{Segment, build_segments};
use crate::db::queries::{
    count_untagged_entries, load_active_entry, load_entries_between, load_entries_by_date,
    load_entries_overlapping,
};
use crate::db::settings::get_daily_max_minutes;
use crate::db::tags::{load_tags, tag_in_use};
use crate::errors::AppResult;
use crate::models::day_summary::{DaySummary, PeriodTotal};
use crate::models::entry::Entry;
use crate::models::tag::Tag;
use crate::utils::date::{
    elapsed_days_of_month, first_of_month, first_of_next_month, week_days, week_start,
};
use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use rusqlite::Connection;
use std::collections::HashMap;

pub struct HomeView {
    pub now: NaiveDateTime,
    pub today: DaySummary,
    pub active: Option<Entry>,
    /// Seconds elapsed on the running timer (0 when idle).
    pub elapsed: i64,
    pub tags: Vec<Tag>,
    pub daily_max_minutes: i64,
}

pub fn home_view(conn: &Connection, now: NaiveDateTime) -> AppResult<HomeView> {
    let tags = load_tags(conn)?;
    let daily_max_minutes = get_daily_max_minutes(conn)?;
    let active = load_active_entry(conn)?;
    let elapsed = active
        .as_ref()
        .map(|e| e.effective_seconds(now))
        .unwrap_or(0);

    let entries = load_entries_by_date(conn, now.date())?;
    let today = summarize_day(now.date(), &entries, &tags, daily_max_minutes, now);

    Ok(HomeView {
        now,
        today,
        active,
        elapsed,
        tags,
        daily_max_minutes,
    })
}

pub struct DayLog {
    pub summary: DaySummary,
    pub entries: Vec<Entry>,
}

pub struct MonthLog {
    pub year: i32,
    pub month: u32,
    /// Days having at least one entry, ascending.
    pub days: Vec<DayLog>,
    /// Accumulated over the days of the month up to today.
    pub totals: Vec<PeriodTotal>,
    pub difference: i64,
    pub tags: Vec<Tag>,
    pub daily_max_minutes: i64,
}

pub fn month_log(conn: &Connection, year: i32, month: u32, now: NaiveDateTime) -> AppResult<MonthLog> {
    let tags = load_tags(conn)?;
    let daily_max_minutes = get_daily_max_minutes(conn)?;

    let (Some(from), Some(to)) = (first_of_month(year, month), first_of_next_month(year, month))
    else {
        return Err(crate::errors::AppError::BadRequest(format!(
            "invalid month {}/{}",
            month, year
        )));
    };
    let entries = load_entries_between(conn, from, to)?;

    let elapsed = elapsed_days_of_month(year, month, now.date());
    let summaries = summarize_days(&elapsed, &entries, &tags, daily_max_minutes, now);
    let totals = accumulate(&summaries);
    let difference = period_difference(&totals);

    let mut by_date: Vec<(NaiveDate, Vec<Entry>)> = Vec::new();
    for e in entries {
        if let Some((d, list)) = by_date.last_mut()
            && *d == e.date
        {
            list.push(e);
            continue;
        }
        by_date.push((e.date, vec![e]));
    }

    let days = by_date
        .into_iter()
        .map(|(date, list)| DayLog {
            summary: summarize_day(date, &list, &tags, daily_max_minutes, now),
            entries: list,
        })
        .collect();

    Ok(MonthLog {
        year,
        month,
        days,
        totals,
        difference,
        tags,
        daily_max_minutes,
    })
}

pub struct WeekCalendar {
    pub week_start: NaiveDate,
    pub days: Vec<DaySummary>,
    pub segments: Vec<Segment>,
    pub totals: Vec<PeriodTotal>,
    pub difference: i64,
}

pub fn week_calendar(conn: &Connection, reference: NaiveDate, now: NaiveDateTime) -> AppResult<WeekCalendar> {
    let tags = load_tags(conn)?;
    let daily_max_minutes = get_daily_max_minutes(conn)?;

    let start = week_start(reference);
    let days_of_week = week_days(start);

    let entries = load_entries_overlapping(conn, start, start + Duration::days(7))?;

    let colors: HashMap<i64, String> = tags.iter().map(|t| (t.id, t.color.clone())).collect();
    let segments = build_segments(&entries, start, now, &colors, UNTAGGED_COLOR);

    let days = summarize_days(&days_of_week, &entries, &tags, daily_max_minutes, now);
    let counted: Vec<DaySummary> = days
        .iter()
        .filter(|d| d.date <= now.date())
        .cloned()
        .collect();
    let totals = accumulate(&counted);
    let difference = period_difference(&totals);

    Ok(WeekCalendar {
        week_start: start,
        days,
        segments,
        totals,
        difference,
    })
}

pub struct SettingsView {
    pub daily_max_minutes: i64,
    pub tags: Vec<Tag>,
    pub untagged_entries: i64,
}

pub fn settings_view(conn: &Connection) -> AppResult<SettingsView> {
    Ok(SettingsView {
        daily_max_minutes: get_daily_max_minutes(conn)?,
        tags: load_tags(conn)?,
        untagged_entries: count_untagged_entries(conn)?,
    })
}

pub struct TagRow {
    pub tag: Tag,
    pub in_use: bool,
}

pub fn tag_rows(conn: &Connection) -> AppResult<Vec<TagRow>> {
    let mut out = Vec::new();
    for tag in load_tags(conn)? {
        let in_use = tag_in_use(conn, tag.id)?;
        out.push(TagRow { tag, in_use });
    }
    Ok(out)
}

/// `month`/`year` query values, falling back to the current month.
pub fn resolve_month(month: Option<u32>, year: Option<i32>, today: NaiveDate) -> (i32, u32) {
    let month = month.filter(|m| (1..=12).contains(m)).unwrap_or(today.month());
    let year = year.unwrap_or(today.year());
    (year, month)
}
