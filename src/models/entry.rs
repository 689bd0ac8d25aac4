use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// One recorded time span or adjustment.
///
/// `start`/`end` are local wall-clock timestamps. A cancellation carries neither
/// and a negative `duration`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Entry {
    pub id: i64,
    pub date: NaiveDate,                // ⇔ entries.date (TEXT "YYYY-MM-DD")
    pub start: Option<NaiveDateTime>,   // ⇔ entries.start_ts (ISO8601, nullable)
    pub end: Option<NaiveDateTime>,     // ⇔ entries.end_ts (ISO8601, nullable)
    pub duration: i64,                  // ⇔ entries.duration (seconds, signed)
    pub description: Option<String>,    // ⇔ entries.description
    pub manual: bool,                   // ⇔ entries.manual (0/1)
    pub tag_ids: Vec<i64>,              // ⇔ entry_tags.tag_id
}

impl Entry {
    /// A live timer started at `now`. Duration stays 0 until stopped.
    pub fn timer(now: NaiveDateTime, description: Option<String>, tag_ids: Vec<i64>) -> Self {
        Self {
            id: 0,
            date: now.date(),
            start: Some(now),
            end: None,
            duration: 0,
            description,
            manual: false,
            tag_ids,
        }
    }

    pub fn manual(
        start: NaiveDateTime,
        end: NaiveDateTime,
        duration: i64,
        description: Option<String>,
        tag_ids: Vec<i64>,
    ) -> Self {
        Self {
            id: 0,
            date: start.date(),
            start: Some(start),
            end: Some(end),
            duration,
            description,
            manual: true,
            tag_ids,
        }
    }

    /// Subtractive adjustment for `date`; `seconds` is the amount to remove.
    pub fn cancellation(
        date: NaiveDate,
        seconds: i64,
        description: Option<String>,
        tag_ids: Vec<i64>,
    ) -> Self {
        Self {
            id: 0,
            date,
            start: None,
            end: None,
            duration: -seconds.abs(),
            description,
            manual: true,
            tag_ids,
        }
    }

    pub fn is_running(&self) -> bool {
        self.end.is_none() && !self.manual
    }

    pub fn is_cancellation(&self) -> bool {
        self.manual && self.start.is_none() && self.duration < 0
    }

    pub fn is_untagged(&self) -> bool {
        self.tag_ids.is_empty()
    }

    pub fn has_tag(&self, tag_id: i64) -> bool {
        self.tag_ids.contains(&tag_id)
    }

    /// Seconds this entry contributes at `now`: stored duration, or the
    /// elapsed time for the running timer.
    pub fn effective_seconds(&self, now: NaiveDateTime) -> i64 {
        match (self.is_running(), self.start) {
            (true, Some(start)) => (now - start).num_seconds().max(0),
            _ => self.duration,
        }
    }

    /// Effective end of the interval: the stored end, `now` for the running
    /// timer, or `start + duration` as a last resort.
    pub fn interval_end(&self, now: NaiveDateTime) -> Option<NaiveDateTime> {
        let start = self.start?;
        Some(match self.end {
            Some(end) => end,
            None if self.is_running() => now,
            None => chrono::Duration::try_seconds(self.duration.max(0))
                .and_then(|d| start.checked_add_signed(d))?,
        })
    }
}
