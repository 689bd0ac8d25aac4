use crate::core::tags::ensure_tags_exist;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::insert_entry;
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::utils::date::{parse_date, parse_datetime};
use crate::utils::time::hm_to_seconds;
use chrono::{Duration, NaiveDateTime};
use tracing::info;

pub const DEFAULT_CANCEL_DESCRIPTION: &str = "Hours cancellation";

/// `accion=manual`. Missing numeric fields default to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualRequest {
    /// Raw `datetime-local` value; required.
    pub start: String,
    /// Raw `datetime-local` value; optional.
    pub end: Option<String>,
    pub hours: i64,
    pub minutes: i64,
    pub description: Option<String>,
    pub tag_ids: Vec<i64>,
}

/// `accion=cancelar`. Missing numeric fields default to 0.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CancelRequest {
    /// Raw `YYYY-MM-DD`; required.
    pub date: String,
    pub hours: i64,
    pub minutes: i64,
    /// Defaults to [`DEFAULT_CANCEL_DESCRIPTION`].
    pub description: Option<String>,
    /// Optional: untagged cancellations count against the global maximum.
    pub tag_ids: Vec<i64>,
}

/// Authoritative end and duration of a manual entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved {
    pub end: NaiveDateTime,
    pub duration: i64,
}

fn out_of_range() -> AppError {
    AppError::validation("The duration is out of range.")
}

/// An explicit end after `start` wins; otherwise the duration fields are used.
/// Fails when neither gives a positive duration.
pub fn resolve_manual(
    start: NaiveDateTime,
    end: Option<NaiveDateTime>,
    end_given: bool,
    hours: i64,
    minutes: i64,
) -> AppResult<Resolved> {
    if let Some(end) = end
        && end > start
    {
        return Ok(Resolved {
            end,
            duration: (end - start).num_seconds(),
        });
    }

    let duration = hm_to_seconds(hours, minutes).ok_or_else(out_of_range)?;
    if duration > 0 {
        let end = Duration::try_seconds(duration)
            .and_then(|d| start.checked_add_signed(d))
            .ok_or_else(out_of_range)?;
        return Ok(Resolved { end, duration });
    }

    if end_given {
        Err(AppError::validation("The end date and time must be after the start."))
    } else {
        Err(AppError::validation(
            "Provide a duration or a valid end date and time.",
        ))
    }
}

pub struct ManualLogic;

impl ManualLogic {
    pub fn add_manual(pool: &mut DbPool, req: &ManualRequest) -> AppResult<Entry> {
        if req.start.trim().is_empty() {
            return Err(AppError::validation(
                "A start date and time are required for a manual entry.",
            ));
        }
        let start = parse_datetime(&req.start)
            .ok_or_else(|| AppError::validation("Invalid start date and time format."))?;

        let end_raw = req.end.as_deref().map(str::trim).filter(|s| !s.is_empty());
        let end = end_raw.and_then(parse_datetime);
        let resolved = resolve_manual(start, end, end_raw.is_some(), req.hours, req.minutes)?;

        if req.tag_ids.is_empty() {
            return Err(AppError::validation("Select at least one tag for the entry."));
        }

        let mut entry = Entry::manual(
            start,
            resolved.end,
            resolved.duration,
            req.description.clone(),
            req.tag_ids.clone(),
        );

        let tx = pool.conn.transaction()?;
        ensure_tags_exist(&tx, &entry.tag_ids)?;
        entry.id = insert_entry(&tx, &entry)?;
        ttlog(
            &tx,
            "manual",
            &format!("entry {}", entry.id),
            &format!("Manual entry of {} s on {}", entry.duration, entry.date),
        )?;
        tx.commit()?;

        info!(entry = entry.id, duration = entry.duration, "manual entry added");
        Ok(entry)
    }

    pub fn add_cancellation(pool: &mut DbPool, req: &CancelRequest) -> AppResult<Entry> {
        if req.date.trim().is_empty() {
            return Err(AppError::validation("A date is required to cancel hours."));
        }
        let date =
            parse_date(&req.date).ok_or_else(|| AppError::validation("Invalid date format."))?;

        let seconds = hm_to_seconds(req.hours, req.minutes).ok_or_else(out_of_range)?;
        if seconds <= 0 {
            return Err(AppError::validation(
                "The duration to cancel must be greater than zero.",
            ));
        }

        let description = req
            .description
            .clone()
            .unwrap_or_else(|| DEFAULT_CANCEL_DESCRIPTION.to_string());
        let mut entry = Entry::cancellation(date, seconds, Some(description), req.tag_ids.clone());

        let tx = pool.conn.transaction()?;
        ensure_tags_exist(&tx, &entry.tag_ids)?;
        entry.id = insert_entry(&tx, &entry)?;
        ttlog(
            &tx,
            "cancel",
            &format!("entry {}", entry.id),
            &format!("Cancelled {} s on {}", seconds, date),
        )?;
        tx.commit()?;

        info!(entry = entry.id, seconds, "hours cancelled");
        Ok(entry)
    }
}
