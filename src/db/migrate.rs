use rusqlite::{Connection, OptionalExtension, Result};
use tracing::info;

/// Check if a table exists.
fn table_exists(conn: &Connection, name: &str) -> Result<bool> {
    let mut stmt =
        conn.prepare("SELECT name FROM sqlite_master WHERE type='table' AND name=?1")?;
    let exists: Option<String> = stmt.query_row([name], |row| row.get(0)).optional()?;
    Ok(exists.is_some())
}

/// Check if a table has a given column.
fn column_exists(conn: &Connection, table: &str, column: &str) -> Result<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info('{}')", table))?;
    let cols = stmt.query_map([], |row| row.get::<_, String>(1))?;

    for c in cols {
        if c? == column {
            return Ok(true);
        }
    }
    Ok(false)
}

/// Create the `employees` table with the modern schema.
fn create_employees_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS employees (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            name       TEXT NOT NULL,
            rfid_tag   TEXT NOT NULL UNIQUE,
            is_admin   INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL,
            active     INTEGER NOT NULL DEFAULT 1
        );

        CREATE UNIQUE INDEX IF NOT EXISTS idx_employees_rfid_tag ON employees(rfid_tag);
        "#,
    )?;
    Ok(())
}

/// Create the `time_entries` table with the modern schema.
fn create_time_entries_table(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS time_entries (
            id          INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id INTEGER NOT NULL REFERENCES employees(id),
            timestamp   TEXT NOT NULL,
            action      TEXT NOT NULL CHECK(action IN ('in','out')),
            active      INTEGER NOT NULL DEFAULT 1
        );

        CREATE INDEX IF NOT EXISTS idx_entries_employee_ts ON time_entries(employee_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_entries_ts ON time_entries(timestamp);
        "#,
    )?;
    Ok(())
}

/// Databases from before soft-delete support lack the `active` column on
/// `time_entries`; add it so old entries stay visible.
fn migrate_add_active_to_entries(conn: &Connection) -> Result<()> {
    if !table_exists(conn, "time_entries")? {
        return Ok(());
    }
    if column_exists(conn, "time_entries", "active")? {
        return Ok(());
    }

    conn.execute(
        "ALTER TABLE time_entries ADD COLUMN active INTEGER NOT NULL DEFAULT 1",
        [],
    )?;
    info!("added 'active' column to time_entries table");
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db().
pub fn run_pending_migrations(conn: &Connection) -> Result<()> {
    // 1) Ensure base tables
    if !table_exists(conn, "employees")? {
        create_employees_table(conn)?;
        info!("created employees table");
    }
    if !table_exists(conn, "time_entries")? {
        create_time_entries_table(conn)?;
        info!("created time_entries table");
    }

    // 2) Column-level upgrades for legacy databases
    migrate_add_active_to_entries(conn)?;

    // 3) Indexes are cheap to re-assert
    conn.execute_batch(
        r#"
        CREATE UNIQUE INDEX IF NOT EXISTS idx_employees_rfid_tag ON employees(rfid_tag);
        CREATE INDEX IF NOT EXISTS idx_entries_employee_ts ON time_entries(employee_id, timestamp);
        CREATE INDEX IF NOT EXISTS idx_entries_ts ON time_entries(timestamp);
        "#,
    )?;

    Ok(())
}
