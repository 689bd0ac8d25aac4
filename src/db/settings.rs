//! Singleton values of the `config` table.

use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, params};

pub const DAILY_MAX_KEY: &str = "daily_max_minutes";

/// 7h 30m
pub const DEFAULT_DAILY_MAX_MINUTES: i64 = 450;

pub fn get_value(conn: &Connection, key: &str) -> AppResult<Option<String>> {
    let value = conn
        .query_row("SELECT value FROM config WHERE key = ?1", [key], |row| {
            row.get::<_, String>(0)
        })
        .optional()?;
    Ok(value)
}

pub fn set_value(conn: &Connection, key: &str, value: &str) -> AppResult<()> {
    conn.execute(
        "INSERT INTO config (key, value) VALUES (?1, ?2)
         ON CONFLICT(key) DO UPDATE SET value = excluded.value",
        params![key, value],
    )?;
    Ok(())
}

/// Global daily maximum used for untagged entries; 0 when the row is missing.
pub fn get_daily_max_minutes(conn: &Connection) -> AppResult<i64> {
    match get_value(conn, DAILY_MAX_KEY)? {
        Some(v) => v
            .trim()
            .parse::<i64>()
            .map_err(|_| AppError::Config(format!("Invalid {} value: {}", DAILY_MAX_KEY, v))),
        None => Ok(0),
    }
}

pub fn set_daily_max_minutes(conn: &Connection, minutes: i64) -> AppResult<()> {
    set_value(conn, DAILY_MAX_KEY, &minutes.to_string())
}
