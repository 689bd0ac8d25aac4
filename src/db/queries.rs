use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use crate::utils::date::format_ts;
use chrono::{NaiveDate, NaiveDateTime};
use rusqlite::{Connection, OptionalExtension, Result, Row, params};
use std::collections::HashMap;

const ENTRY_COLUMNS: &str = "id, date, start_ts, end_ts, duration, description, manual";

fn conversion_error(idx: usize, err: AppError) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(err))
}

fn parse_ts_column(idx: usize, value: Option<String>) -> Result<Option<NaiveDateTime>> {
    match value {
        None => Ok(None),
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => crate::utils::date::parse_datetime(&s)
            .map(Some)
            .ok_or_else(|| conversion_error(idx, AppError::InvalidTime(s))),
    }
}

/// Map an `entries` row; `tag_ids` are attached afterwards.
pub fn map_row(row: &Row) -> Result<Entry> {
    let date_str: String = row.get("date")?;
    let date = NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
        .map_err(|_| conversion_error(1, AppError::InvalidDate(date_str.clone())))?;

    Ok(Entry {
        id: row.get("id")?,
        date,
        start: parse_ts_column(2, row.get("start_ts")?)?,
        end: parse_ts_column(3, row.get("end_ts")?)?,
        duration: row.get("duration")?,
        description: row.get("description")?,
        manual: row.get::<_, i64>("manual")? == 1,
        tag_ids: Vec::new(),
    })
}

/// Fill `tag_ids` for every entry with a single query.
fn attach_tags(conn: &Connection, entries: &mut [Entry]) -> AppResult<()> {
    if entries.is_empty() {
        return Ok(());
    }

    let placeholders = vec!["?"; entries.len()].join(",");
    let sql = format!(
        "SELECT entry_id, tag_id FROM entry_tags WHERE entry_id IN ({}) ORDER BY tag_id",
        placeholders
    );

    let ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(rusqlite::params_from_iter(ids.iter()), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
    })?;

    let mut by_entry: HashMap<i64, Vec<i64>> = HashMap::new();
    for r in rows {
        let (entry_id, tag_id) = r?;
        by_entry.entry(entry_id).or_default().push(tag_id);
    }

    for e in entries.iter_mut() {
        e.tag_ids = by_entry.remove(&e.id).unwrap_or_default();
    }
    Ok(())
}

fn collect_entries(conn: &Connection, sql: &str, params: &[&dyn rusqlite::ToSql]) -> AppResult<Vec<Entry>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_row)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    attach_tags(conn, &mut out)?;
    Ok(out)
}

/// Entries whose `date` falls in `[from, to)`, ordered by date then id.
pub fn load_entries_between(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Entry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries
         WHERE date >= ?1 AND date < ?2
         ORDER BY date ASC, id ASC"
    );
    collect_entries(conn, &sql, &[&from.to_string(), &to.to_string()])
}

/// Entries whose interval overlaps `[from, to)`: dated inside it, or started
/// earlier and ending (or still running) past `from`. Cancellations only by date.
pub fn load_entries_overlapping(conn: &Connection, from: NaiveDate, to: NaiveDate) -> AppResult<Vec<Entry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries
         WHERE date < ?2
           AND (date >= ?1
                OR (start_ts IS NOT NULL AND (end_ts IS NULL OR end_ts > ?1)))
         ORDER BY date ASC, id ASC"
    );
    collect_entries(conn, &sql, &[&from.to_string(), &to.to_string()])
}

pub fn load_entries_by_date(conn: &Connection, date: NaiveDate) -> AppResult<Vec<Entry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries
         WHERE date = ?1
         ORDER BY id ASC"
    );
    collect_entries(conn, &sql, &[&date.to_string()])
}

pub fn load_entry(conn: &Connection, id: i64) -> AppResult<Option<Entry>> {
    let sql = format!("SELECT {ENTRY_COLUMNS} FROM entries WHERE id = ?1");
    let mut out = collect_entries(conn, &sql, &[&id])?;
    Ok(out.pop())
}

/// The running timer, if any: `end_ts IS NULL AND manual = 0`.
pub fn load_active_entry(conn: &Connection) -> AppResult<Option<Entry>> {
    let sql = format!(
        "SELECT {ENTRY_COLUMNS} FROM entries
         WHERE end_ts IS NULL AND manual = 0
         ORDER BY id DESC LIMIT 1"
    );
    let mut stmt = conn.prepare(&sql)?;
    let found = stmt.query_row([], map_row).optional()?;

    match found {
        Some(entry) => {
            let mut v = vec![entry];
            attach_tags(conn, &mut v)?;
            Ok(v.pop())
        }
        None => Ok(None),
    }
}

/// Insert the entry and its tag links; returns the new id.
pub fn insert_entry(conn: &Connection, e: &Entry) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO entries (date, start_ts, end_ts, duration, description, manual)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            e.date.to_string(),
            e.start.as_ref().map(format_ts),
            e.end.as_ref().map(format_ts),
            e.duration,
            e.description,
            if e.manual { 1 } else { 0 },
        ],
    )?;
    let id = conn.last_insert_rowid();
    link_tags(conn, id, &e.tag_ids)?;
    Ok(id)
}

/// Close an entry: set its end and duration.
pub fn finish_entry(conn: &Connection, id: i64, end: NaiveDateTime, duration: i64) -> AppResult<()> {
    conn.execute(
        "UPDATE entries SET end_ts = ?1, duration = ?2 WHERE id = ?3",
        params![format_ts(&end), duration, id],
    )?;
    Ok(())
}

/// Delete an entry and its tag links. Returns false when no row matched.
pub fn delete_entry(pool: &mut DbPool, id: i64) -> AppResult<bool> {
    let tx = pool.conn.transaction()?;
    tx.execute("DELETE FROM entry_tags WHERE entry_id = ?1", [id])?;
    let removed = tx.execute("DELETE FROM entries WHERE id = ?1", [id])?;
    tx.commit()?;
    Ok(removed > 0)
}

fn link_tags(conn: &Connection, entry_id: i64, tag_ids: &[i64]) -> AppResult<()> {
    let mut stmt =
        conn.prepare_cached("INSERT OR IGNORE INTO entry_tags (entry_id, tag_id) VALUES (?1, ?2)")?;
    for tag_id in tag_ids {
        stmt.execute(params![entry_id, tag_id])?;
    }
    Ok(())
}

/// Replace every association of `entry_id` with `tag_ids`.
pub fn set_entry_tags(pool: &mut DbPool, entry_id: i64, tag_ids: &[i64]) -> AppResult<()> {
    let tx = pool.conn.transaction()?;
    tx.execute("DELETE FROM entry_tags WHERE entry_id = ?1", [entry_id])?;
    link_tags(&tx, entry_id, tag_ids)?;
    tx.commit()?;
    Ok(())
}

/// Link every entry that has no tag to `tag_id`. Returns the number of entries tagged.
pub fn tag_untagged_entries(conn: &Connection, tag_id: i64) -> AppResult<usize> {
    let n = conn.execute(
        "INSERT INTO entry_tags (entry_id, tag_id)
         SELECT e.id, ?1 FROM entries e
         WHERE NOT EXISTS (SELECT 1 FROM entry_tags et WHERE et.entry_id = e.id)",
        [tag_id],
    )?;
    Ok(n)
}

pub fn count_untagged_entries(conn: &Connection) -> AppResult<i64> {
    let n = conn.query_row(
        "SELECT COUNT(*) FROM entries e
         WHERE NOT EXISTS (SELECT 1 FROM entry_tags et WHERE et.entry_id = e.id)",
        [],
        |row| row.get(0),
    )?;
    Ok(n)
}
