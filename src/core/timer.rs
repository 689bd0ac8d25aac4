//! Live timer state machine: Idle <-> Running.
//!
//! The running timer is not kept in memory; it is the (single) entry with
//! `end_ts IS NULL AND manual = 0`. Both transitions check and write inside an
//! IMMEDIATE transaction so two concurrent starts cannot both succeed.

use crate::core::tags::ensure_tags_exist;
use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{finish_entry, insert_entry, load_active_entry};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use chrono::NaiveDateTime;
use rusqlite::{ErrorCode, TransactionBehavior};
use tracing::info;

/// `accion=start`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StartRequest {
    /// Trimmed; empty becomes `None`.
    pub description: Option<String>,
    /// At least one is required.
    pub tag_ids: Vec<i64>,
}

pub struct TimerLogic;

impl TimerLogic {
    pub fn start(pool: &mut DbPool, now: NaiveDateTime, req: &StartRequest) -> AppResult<Entry> {
        if req.tag_ids.is_empty() {
            return Err(AppError::validation(
                "Select at least one tag before starting the timer.",
            ));
        }

        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        if load_active_entry(&tx)?.is_some() {
            return Err(already_running());
        }
        ensure_tags_exist(&tx, &req.tag_ids)?;

        let mut entry = Entry::timer(now, req.description.clone(), req.tag_ids.clone());
        entry.id = insert_entry(&tx, &entry).map_err(|e| match e {
            AppError::Db(rusqlite::Error::SqliteFailure(err, _))
                if err.code == ErrorCode::ConstraintViolation =>
            {
                already_running()
            }
            other => other,
        })?;

        ttlog(
            &tx,
            "start",
            &format!("entry {}", entry.id),
            &format!("Timer started at {}", now),
        )?;
        tx.commit()?;

        info!(entry = entry.id, tags = ?entry.tag_ids, "timer started");
        Ok(entry)
    }

    pub fn stop(pool: &mut DbPool, now: NaiveDateTime) -> AppResult<Entry> {
        let tx = pool
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let Some(mut entry) = load_active_entry(&tx)? else {
            return Err(AppError::validation("No timer is running."));
        };

        let start = entry
            .start
            .ok_or_else(|| AppError::Other(format!("Running entry {} has no start", entry.id)))?;
        let duration = (now - start).num_seconds().max(0);

        finish_entry(&tx, entry.id, now, duration)?;
        ttlog(
            &tx,
            "stop",
            &format!("entry {}", entry.id),
            &format!("Timer stopped after {} s", duration),
        )?;
        tx.commit()?;

        entry.end = Some(now);
        entry.duration = duration;

        info!(entry = entry.id, duration, "timer stopped");
        Ok(entry)
    }
}

fn already_running() -> AppError {
    AppError::validation("A timer is already running. Stop it before starting a new one.")
}
