use crate::errors::{AppError, AppResult};
use crate::models::tag::{Tag, WeekQuota};
use rusqlite::{Connection, ErrorCode, OptionalExtension, Result, Row, params};

const TAG_COLUMNS: &str =
    "id, name, color, max_mon, max_tue, max_wed, max_thu, max_fri, max_sat, max_sun";

const QUOTA_COLUMNS: [&str; 7] = [
    "max_mon", "max_tue", "max_wed", "max_thu", "max_fri", "max_sat", "max_sun",
];

pub fn map_tag(row: &Row) -> Result<Tag> {
    let mut quota = WeekQuota::default();
    for (i, col) in QUOTA_COLUMNS.iter().enumerate() {
        quota.set(i, row.get(*col)?);
    }

    Ok(Tag {
        id: row.get("id")?,
        name: row.get("name")?,
        color: row.get("color")?,
        quota,
    })
}

/// Duplicate names hit the UNIQUE constraint; report them as a validation error.
fn map_unique_violation(e: rusqlite::Error, name: &str) -> AppError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _) if err.code == ErrorCode::ConstraintViolation => {
            AppError::validation(format!("A tag named '{}' already exists.", name))
        }
        _ => AppError::Db(e),
    }
}

pub fn load_tags(conn: &Connection) -> AppResult<Vec<Tag>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TAG_COLUMNS} FROM tags ORDER BY name COLLATE NOCASE ASC"
    ))?;
    let rows = stmt.query_map([], map_tag)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn load_tag(conn: &Connection, id: i64) -> AppResult<Option<Tag>> {
    let tag = conn
        .query_row(
            &format!("SELECT {TAG_COLUMNS} FROM tags WHERE id = ?1"),
            [id],
            map_tag,
        )
        .optional()?;
    Ok(tag)
}

pub fn insert_tag(conn: &Connection, name: &str, color: &str, quota: &WeekQuota) -> AppResult<i64> {
    let q = quota.0;
    conn.execute(
        "INSERT INTO tags (name, color, max_mon, max_tue, max_wed, max_thu, max_fri, max_sat, max_sun)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![name, color, q[0], q[1], q[2], q[3], q[4], q[5], q[6]],
    )
    .map_err(|e| map_unique_violation(e, name))?;
    Ok(conn.last_insert_rowid())
}

/// Update name and quotas. Returns false when the tag does not exist.
pub fn update_tag(conn: &Connection, id: i64, name: &str, quota: &WeekQuota) -> AppResult<bool> {
    let q = quota.0;
    let n = conn
        .execute(
            "UPDATE tags
             SET name = ?1, max_mon = ?2, max_tue = ?3, max_wed = ?4,
                 max_thu = ?5, max_fri = ?6, max_sat = ?7, max_sun = ?8
             WHERE id = ?9",
            params![name, q[0], q[1], q[2], q[3], q[4], q[5], q[6], id],
        )
        .map_err(|e| map_unique_violation(e, name))?;
    Ok(n > 0)
}

pub fn set_tag_color(conn: &Connection, id: i64, color: &str) -> AppResult<bool> {
    let n = conn.execute("UPDATE tags SET color = ?1 WHERE id = ?2", params![color, id])?;
    Ok(n > 0)
}

pub fn tag_in_use(conn: &Connection, id: i64) -> AppResult<bool> {
    let mut stmt = conn.prepare_cached("SELECT 1 FROM entry_tags WHERE tag_id = ?1 LIMIT 1")?;
    Ok(stmt.exists([id])?)
}

/// Delete an unreferenced tag. Fails with a validation error while any entry uses it.
/// Returns false when the tag does not exist.
pub fn delete_tag(conn: &Connection, id: i64) -> AppResult<bool> {
    if tag_in_use(conn, id)? {
        return Err(AppError::validation(
            "The tag is assigned to one or more entries and cannot be deleted.",
        ));
    }
    let n = conn.execute("DELETE FROM tags WHERE id = ?1", [id])?;
    Ok(n > 0)
}

/// Set `minutes` as the quota of the given weekdays (0 = Monday) on every tag,
/// in a single statement. Returns the number of tags updated.
pub fn seed_tag_quotas(conn: &Connection, weekdays: &[usize], minutes: i64) -> AppResult<usize> {
    let sets: Vec<String> = weekdays
        .iter()
        .filter_map(|d| QUOTA_COLUMNS.get(*d))
        .map(|col| format!("{col} = ?1"))
        .collect();
    if sets.is_empty() {
        return Ok(0);
    }
    let n = conn.execute(&format!("UPDATE tags SET {}", sets.join(", ")), [minutes])?;
    Ok(n)
}
