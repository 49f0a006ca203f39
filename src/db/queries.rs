use crate::errors::{AppError, AppResult};
use crate::models::action::Action;
use crate::models::employee::Employee;
use crate::models::entry::TimeEntry;
use chrono::{DateTime, NaiveDateTime, Utc};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Result, Row};
use std::collections::BTreeMap;

/// Storage format for entry timestamps. TEXT in this shape sorts
/// lexicographically in chronological order.
pub const TS_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn ts_to_db(ts: &NaiveDateTime) -> String {
    ts.format(TS_FORMAT).to_string()
}

/// Drop sub-second precision so the in-memory value matches what the row
/// stores.
pub fn trunc_seconds(ts: NaiveDateTime) -> NaiveDateTime {
    use chrono::Timelike;
    ts.with_nanosecond(0).unwrap_or(ts)
}

fn parse_ts(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, TS_FORMAT)
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
}

// ---------------------------------------------
// Row mappers
// ---------------------------------------------

pub fn map_employee(row: &Row) -> Result<Employee> {
    let created_raw: String = row.get("created_at")?;

    let created_at = DateTime::parse_from_rfc3339(&created_raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| {
            rusqlite::Error::FromSqlConversionFailure(
                0,
                rusqlite::types::Type::Text,
                Box::new(AppError::InvalidInput(format!(
                    "Invalid created_at: {}",
                    created_raw
                ))),
            )
        })?;

    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        rfid_tag: row.get("rfid_tag")?,
        is_admin: row.get::<_, i64>("is_admin")? != 0,
        created_at,
        active: row.get::<_, i64>("active")? != 0,
    })
}

pub fn map_entry(row: &Row) -> Result<TimeEntry> {
    let ts_raw: String = row.get("timestamp")?;
    let timestamp = parse_ts(&ts_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidInput(format!(
                "Invalid timestamp: {}",
                ts_raw
            ))),
        )
    })?;

    let action_raw: String = row.get("action")?;
    let action = Action::from_db_str(&action_raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            Box::new(AppError::InvalidInput(format!(
                "Invalid action: {}",
                action_raw
            ))),
        )
    })?;

    Ok(TimeEntry {
        id: row.get("id")?,
        employee_id: row.get("employee_id")?,
        timestamp,
        action,
        active: row.get::<_, i64>("active")? != 0,
    })
}

// ---------------------------------------------
// Employees
// ---------------------------------------------

/// Active employees only; the lookup used by scan handling.
pub fn get_employee_by_tag(conn: &Connection, tag: &str) -> AppResult<Option<Employee>> {
    let found = conn
        .query_row(
            "SELECT * FROM employees WHERE rfid_tag = ?1 AND active = 1",
            [tag],
            map_employee,
        )
        .optional()?;
    Ok(found)
}

pub fn get_employee_by_id(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let found = conn
        .query_row("SELECT * FROM employees WHERE id = ?1", [id], map_employee)
        .optional()?;
    Ok(found)
}

/// Any employee holding this tag, active or not. Tag uniqueness is total.
pub fn find_tag_owner(conn: &Connection, tag: &str) -> AppResult<Option<Employee>> {
    let found = conn
        .query_row(
            "SELECT * FROM employees WHERE rfid_tag = ?1",
            [tag],
            map_employee,
        )
        .optional()?;
    Ok(found)
}

pub fn get_admin_count(conn: &Connection) -> AppResult<i64> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM employees WHERE is_admin = 1 AND active = 1",
        [],
        |row| row.get(0),
    )?;
    Ok(count)
}

pub fn insert_employee(
    conn: &Connection,
    name: &str,
    tag: &str,
    is_admin: bool,
) -> AppResult<Employee> {
    let created_at = Utc::now();
    conn.execute(
        "INSERT INTO employees (name, rfid_tag, is_admin, created_at, active)
         VALUES (?1, ?2, ?3, ?4, 1)",
        params![name, tag, is_admin as i64, created_at.to_rfc3339()],
    )?;

    Ok(Employee {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
        rfid_tag: tag.to_string(),
        is_admin,
        created_at,
        active: true,
    })
}

pub fn list_employees(conn: &Connection, include_inactive: bool) -> AppResult<Vec<Employee>> {
    let sql = if include_inactive {
        "SELECT * FROM employees ORDER BY name ASC"
    } else {
        "SELECT * FROM employees WHERE active = 1 ORDER BY name ASC"
    };

    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Active employees whose name contains `partial` (case-insensitive).
pub fn find_employees_by_name(conn: &Connection, partial: &str) -> AppResult<Vec<Employee>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM employees
         WHERE active = 1 AND name LIKE ?1
         ORDER BY name ASC",
    )?;
    let pattern = format!("%{}%", partial);
    let rows = stmt.query_map([pattern], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_employee_name(conn: &Connection, id: i64, name: &str) -> AppResult<usize> {
    let n = conn.execute(
        "UPDATE employees SET name = ?1 WHERE id = ?2",
        params![name, id],
    )?;
    Ok(n)
}

// ---------------------------------------------
// Time entries
// ---------------------------------------------

pub fn insert_entry(
    conn: &Connection,
    employee_id: i64,
    timestamp: NaiveDateTime,
    action: Action,
) -> AppResult<TimeEntry> {
    let timestamp = trunc_seconds(timestamp);
    conn.execute(
        "INSERT INTO time_entries (employee_id, timestamp, action, active)
         VALUES (?1, ?2, ?3, 1)",
        params![employee_id, ts_to_db(&timestamp), action.to_db_str()],
    )?;

    Ok(TimeEntry {
        id: conn.last_insert_rowid(),
        employee_id,
        timestamp,
        action,
        active: true,
    })
}

pub fn get_entry(conn: &Connection, id: i64) -> AppResult<Option<TimeEntry>> {
    let found = conn
        .query_row("SELECT * FROM time_entries WHERE id = ?1", [id], map_entry)
        .optional()?;
    Ok(found)
}

/// Last active entry by `(timestamp, id)`, the basis for action
/// determination.
pub fn last_active_entry(conn: &Connection, employee_id: i64) -> AppResult<Option<TimeEntry>> {
    let found = conn
        .query_row(
            "SELECT * FROM time_entries
             WHERE employee_id = ?1 AND active = 1
             ORDER BY timestamp DESC, id DESC
             LIMIT 1",
            [employee_id],
            map_entry,
        )
        .optional()?;
    Ok(found)
}

/// Last active entry at or before `ts`; used when an entry is inserted out
/// of chronological order.
pub fn last_active_entry_at_or_before(
    conn: &Connection,
    employee_id: i64,
    ts: &NaiveDateTime,
) -> AppResult<Option<TimeEntry>> {
    let found = conn
        .query_row(
            "SELECT * FROM time_entries
             WHERE employee_id = ?1 AND active = 1 AND timestamp <= ?2
             ORDER BY timestamp DESC, id DESC
             LIMIT 1",
            params![employee_id, ts_to_db(ts)],
            map_entry,
        )
        .optional()?;
    Ok(found)
}

pub fn first_active_entry(conn: &Connection, employee_id: i64) -> AppResult<Option<TimeEntry>> {
    let found = conn
        .query_row(
            "SELECT * FROM time_entries
             WHERE employee_id = ?1 AND active = 1
             ORDER BY timestamp ASC, id ASC
             LIMIT 1",
            [employee_id],
            map_entry,
        )
        .optional()?;
    Ok(found)
}

/// All active entries for an employee in `(timestamp, id)` order.
pub fn active_entries(conn: &Connection, employee_id: i64) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM time_entries
         WHERE employee_id = ?1 AND active = 1
         ORDER BY timestamp ASC, id ASC",
    )?;
    let rows = stmt.query_map([employee_id], map_entry)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

/// Active entries in `[since, until)`, `(timestamp, id)` order.
pub fn active_entries_between(
    conn: &Connection,
    employee_id: i64,
    since: &NaiveDateTime,
    until: &NaiveDateTime,
) -> AppResult<Vec<TimeEntry>> {
    let mut stmt = conn.prepare(
        "SELECT * FROM time_entries
         WHERE employee_id = ?1 AND active = 1
           AND timestamp >= ?2 AND timestamp < ?3
         ORDER BY timestamp ASC, id ASC",
    )?;
    let rows = stmt.query_map(
        params![employee_id, ts_to_db(since), ts_to_db(until)],
        map_entry,
    )?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn update_action(conn: &Connection, id: i64, action: Action) -> AppResult<()> {
    conn.execute(
        "UPDATE time_entries SET action = ?1 WHERE id = ?2",
        params![action.to_db_str(), id],
    )?;
    Ok(())
}

/// Flip `active` off for the given ids; already-deleted rows are ignored.
pub fn soft_delete(conn: &Connection, ids: &[i64]) -> AppResult<usize> {
    if ids.is_empty() {
        return Ok(0);
    }
    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = format!(
        "UPDATE time_entries SET active = 0 WHERE active = 1 AND id IN ({})",
        placeholders
    );
    let n = conn.execute(&sql, params_from_iter(ids.iter()))?;
    Ok(n)
}

/// Which employee owns which of the given (still active) entries.
pub fn owners_of_entries(
    conn: &Connection,
    ids: &[i64],
) -> AppResult<BTreeMap<i64, Vec<i64>>> {
    let mut map: BTreeMap<i64, Vec<i64>> = BTreeMap::new();
    if ids.is_empty() {
        return Ok(map);
    }

    let placeholders = vec!["?"; ids.len()].join(",");
    let sql = format!(
        "SELECT id, employee_id FROM time_entries
         WHERE active = 1 AND id IN ({})
         ORDER BY employee_id ASC, id ASC",
        placeholders
    );
    let mut stmt = conn.prepare(&sql)?;
    let rows = stmt.query_map(params_from_iter(ids.iter()), |row| {
        Ok((row.get::<_, i64>(0)?, row.get::<_, i64>(1)?))
    })?;

    for r in rows {
        let (id, employee_id) = r?;
        map.entry(employee_id).or_default().push(id);
    }
    Ok(map)
}

// ---------------------------------------------
// Export
// ---------------------------------------------

/// One line of the raw-entries export: an active entry joined with its
/// (active) employee.
#[derive(Debug, Clone)]
pub struct ExportRow {
    pub entry_id: i64,
    pub employee_id: i64,
    pub employee_name: String,
    pub rfid_tag: String,
    pub timestamp: NaiveDateTime,
    pub action: Action,
}

pub fn export_rows(conn: &Connection) -> AppResult<Vec<ExportRow>> {
    let mut stmt = conn.prepare(
        "SELECT t.id, t.employee_id, e.name, e.rfid_tag, t.timestamp, t.action
         FROM time_entries t
         JOIN employees e ON e.id = t.employee_id
         WHERE t.active = 1 AND e.active = 1
         ORDER BY t.timestamp DESC, t.id DESC",
    )?;

    let rows = stmt.query_map([], |row| {
        let ts_raw: String = row.get(4)?;
        let action_raw: String = row.get(5)?;
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, i64>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
            ts_raw,
            action_raw,
        ))
    })?;

    let mut out = Vec::new();
    for r in rows {
        let (entry_id, employee_id, employee_name, rfid_tag, ts_raw, action_raw) = r?;
        let timestamp = parse_ts(&ts_raw)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid timestamp: {}", ts_raw)))?;
        let action = Action::from_db_str(&action_raw)
            .ok_or_else(|| AppError::InvalidInput(format!("Invalid action: {}", action_raw)))?;
        out.push(ExportRow {
            entry_id,
            employee_id,
            employee_name,
            rfid_tag,
            timestamp,
            action,
        });
    }
    Ok(out)
}
