use crate::db::log::ttlog;
use crate::db::pool::DbPool;
use crate::db::queries::{delete_entry, load_entry};
use crate::errors::{AppError, AppResult};
use crate::models::entry::Entry;
use tracing::info;

pub struct DeleteLogic;

impl DeleteLogic {
    /// Delete one entry (its tag links go with it).
    pub fn apply(pool: &mut DbPool, id: i64) -> AppResult<Entry> {
        let entry = load_entry(&pool.conn, id)?
            .ok_or_else(|| AppError::NotFound(format!("entry {}", id)))?;

        if !delete_entry(pool, id)? {
            return Err(AppError::NotFound(format!("entry {}", id)));
        }

        ttlog(
            &pool.conn,
            "del",
            &format!("entry {}", id),
            &format!("Deleted entry of {} s on {}", entry.duration, entry.date),
        )?;
        info!(entry = id, "entry deleted");
        Ok(entry)
    }
}
