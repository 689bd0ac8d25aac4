use crate::db::settings::{DAILY_MAX_KEY, DEFAULT_DAILY_MAX_MINUTES};
use crate::errors::{AppError, AppResult};
use rusqlite::{Connection, OptionalExtension, Result, params};
use tracing::{info, warn};

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )?;
    Ok(())
}

fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt = conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create every table of the current schema (no-op when present).
fn create_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            date        TEXT NOT NULL,
            start_ts    TEXT,
            end_ts      TEXT,
            duration    INTEGER NOT NULL DEFAULT 0,
            description TEXT,
            manual      INTEGER NOT NULL DEFAULT 0 CHECK(manual IN (0,1))
        );

        CREATE TABLE IF NOT EXISTS tags (
            id       INTEGER PRIMARY KEY AUTOINCREMENT,
            name     TEXT NOT NULL UNIQUE,
            color    TEXT NOT NULL,
            max_mon  INTEGER NOT NULL DEFAULT 0,
            max_tue  INTEGER NOT NULL DEFAULT 0,
            max_wed  INTEGER NOT NULL DEFAULT 0,
            max_thu  INTEGER NOT NULL DEFAULT 0,
            max_fri  INTEGER NOT NULL DEFAULT 0,
            max_sat  INTEGER NOT NULL DEFAULT 0,
            max_sun  INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS entry_tags (
            entry_id INTEGER NOT NULL REFERENCES entries(id) ON DELETE CASCADE,
            tag_id   INTEGER NOT NULL REFERENCES tags(id),
            PRIMARY KEY (entry_id, tag_id)
        );

        CREATE TABLE IF NOT EXISTS config (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        CREATE INDEX IF NOT EXISTS idx_entries_date ON entries(date);
        CREATE INDEX IF NOT EXISTS idx_entry_tags_tag ON entry_tags(tag_id);
        "#,
    )?;
    Ok(())
}

/// Move a database created with the original table names
/// (`registros`, `registro_tags`, `config(clave, valor)`) into the current schema.
fn migrate_legacy_tables(conn: &Connection) -> Result<()> {
    if table_exists(conn, "registros")? {
        warn!("Legacy 'registros' table detected, copying rows into 'entries'");

        conn.execute_batch(
            r#"
            BEGIN;

            INSERT INTO entries (id, date, start_ts, end_ts, duration, description, manual)
            SELECT id, fecha, inicio, fin, duracion, descripcion, manual
            FROM registros;

            DROP TABLE registros;

            UPDATE sqlite_sequence
                SET seq = (SELECT IFNULL(MAX(id), 0) FROM entries)
            WHERE name = 'entries';

            COMMIT;
            "#,
        )?;
    }

    if table_exists(conn, "registro_tags")? {
        if table_has_column(conn, "registro_tags", "registro_id")? {
            conn.execute_batch(
                r#"
                INSERT OR IGNORE INTO entry_tags (entry_id, tag_id)
                SELECT registro_id, tag_id FROM registro_tags
                WHERE registro_id IN (SELECT id FROM entries)
                  AND tag_id IN (SELECT id FROM tags);
                "#,
            )?;
        }
        conn.execute_batch("DROP TABLE registro_tags;")?;
    }

    Ok(())
}

/// The legacy config table used `clave`/`valor` columns and a Spanish key.
fn migrate_legacy_config(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "config")? || !table_has_column(conn, "config", "clave")? {
        return Ok(());
    }

    warn!("Legacy config table detected, converting to key/value");

    conn.execute_batch(&format!(
        r#"
        BEGIN;

        ALTER TABLE config RENAME TO config_old;

        CREATE TABLE config (
            key   TEXT PRIMARY KEY,
            value TEXT NOT NULL
        );

        INSERT INTO config (key, value)
        SELECT CASE clave WHEN 'horas_max_diarias' THEN '{key}' ELSE clave END, IFNULL(valor, '')
        FROM config_old;

        DROP TABLE config_old;

        COMMIT;
        "#,
        key = DAILY_MAX_KEY
    ))?;

    Ok(())
}

fn migration_applied(conn: &Connection, version: &str) -> Result<bool> {
    let mut chk = conn.prepare(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

fn mark_migration(conn: &Connection, version: &str, message: &str) -> Result<()> {
    conn.execute(
        "INSERT INTO log (date, operation, target, message)
         VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
        [version, message],
    )?;
    Ok(())
}

/// At most one running timer: close every open timer but the newest, then
/// let a partial unique index hold the invariant from now on.
fn migrate_single_running_timer(conn: &Connection) -> Result<()> {
    let version = "20250301_0001_single_running_timer";

    if migration_applied(conn, version)? {
        return Ok(());
    }

    conn.execute_batch(
        r#"
        BEGIN;

        UPDATE entries
           SET end_ts = start_ts, duration = 0
         WHERE end_ts IS NULL AND manual = 0
           AND id <> (SELECT MAX(id) FROM entries WHERE end_ts IS NULL AND manual = 0);

        CREATE UNIQUE INDEX IF NOT EXISTS idx_entries_single_running
            ON entries(manual) WHERE end_ts IS NULL AND manual = 0;

        COMMIT;
        "#,
    )?;

    mark_migration(conn, version, "Enforced a single running timer")?;
    info!("Migration applied: {}", version);

    Ok(())
}

fn ensure_default_config(conn: &Connection) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO config (key, value) VALUES (?1, ?2)",
        params![DAILY_MAX_KEY, DEFAULT_DAILY_MAX_MINUTES.to_string()],
    )?;
    Ok(())
}

fn backup_before_migration(db_path: &str) -> AppResult<()> {
    use chrono::Local;
    use std::fs::{self, File};
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let backup_name = format!(
        "{}-backup_db_pre_entries_schema.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let backup_path = std::path::Path::new(db_path)
        .parent()
        .unwrap_or_else(|| std::path::Path::new("."))
        .join(&backup_name);

    let file = File::create(&backup_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| AppError::Migration(format!("Backup failed (start_file): {}", e)))?;

    let db_content = fs::read(db_path)?;
    zip.write_all(&db_content)?;

    zip.finish()
        .map_err(|e| AppError::Migration(format!("Backup failed (finish): {}", e)))?;

    info!("Backup created: {}", backup_path.display());
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::initialize::init_db().
pub fn run_pending_migrations(conn: &Connection) -> AppResult<()> {
    // 1) Ensure log table
    ensure_log_table(conn)?;

    // 2) Detect legacy schema
    let is_legacy_schema = table_exists(conn, "registros")?
        || table_exists(conn, "registro_tags")?
        || (table_exists(conn, "config")? && table_has_column(conn, "config", "clave")?);

    // 3) If legacy -> perform pre-migration backup
    if is_legacy_schema {
        warn!("Legacy schema detected, creating safety backup before migration");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if !db_path.is_empty() {
            backup_before_migration(&db_path)?;
        } else {
            warn!("Could not determine DB path, backup skipped");
        }

        migrate_legacy_config(conn)?;
    }

    // 4) Current schema
    create_schema(conn)?;

    if is_legacy_schema {
        migrate_legacy_tables(conn)?;
    }

    // 5) Versioned migrations
    migrate_single_running_timer(conn)?;

    // 6) Defaults
    ensure_default_config(conn)?;

    Ok(())
}
