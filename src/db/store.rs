//! The Store: single owner of persisted data.
//!
//! Every mutation goes through an employee-level lock plus an SQLite
//! transaction with explicit commit; transient busy/locked errors are
//! retried by `db::retry` before surfacing as `StorageUnavailable`.

use chrono::{Duration, Local, NaiveDateTime};
use rusqlite::{Connection, Transaction};
use std::sync::{Mutex, PoisonError};
use tracing::{info, warn};

use crate::core::recalc::ActionRecalculator;
use crate::db::locks::EmployeeLocks;
use crate::db::queries::{self, ExportRow};
use crate::db::{initialize, retry};
use crate::errors::{AppError, AppResult};
use crate::models::action::Action;
use crate::models::employee::Employee;
use crate::models::entry::TimeEntry;
use crate::utils::tag;

pub struct Store {
    conn: Mutex<Connection>,
    locks: EmployeeLocks,
}

impl Store {
    /// Open (and if necessary create) the database at `path`.
    pub fn open(path: &str) -> AppResult<Self> {
        let conn = retry::with_retry(|| Connection::open(path).map_err(retry::classify))?;
        conn.pragma_update(None, "foreign_keys", "ON")?;
        initialize::init_db(&conn)?;

        Ok(Self {
            conn: Mutex::new(conn),
            locks: EmployeeLocks::new(),
        })
    }

    /// Run a read-only closure against the connection, retrying transient
    /// failures.
    fn read<T, F>(&self, f: F) -> AppResult<T>
    where
        F: Fn(&Connection) -> AppResult<T>,
    {
        retry::with_retry(|| {
            let conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            f(&conn)
        })
    }

    /// Run a closure inside a transaction with explicit commit. The closure
    /// may run more than once when a transient error forces a retry; any
    /// error rolls the transaction back.
    fn with_tx<T, F>(&self, f: F) -> AppResult<T>
    where
        F: Fn(&Transaction) -> AppResult<T>,
    {
        retry::with_retry(|| {
            let mut conn = self.conn.lock().unwrap_or_else(PoisonError::into_inner);
            let tx = conn.transaction().map_err(retry::classify)?;
            let out = f(&tx)?;
            tx.commit().map_err(retry::classify)?;
            Ok(out)
        })
    }

    // ---------------------------------------------
    // Employees
    // ---------------------------------------------

    pub fn get_employee_by_tag(&self, raw_tag: &str) -> AppResult<Option<Employee>> {
        let tag = tag::normalize(raw_tag);
        self.read(|conn| queries::get_employee_by_tag(conn, &tag))
    }

    pub fn get_employee(&self, id: i64) -> AppResult<Option<Employee>> {
        self.read(|conn| queries::get_employee_by_id(conn, id))
    }

    pub fn get_admin_count(&self) -> AppResult<i64> {
        self.read(queries::get_admin_count)
    }

    pub fn list_employees(&self, include_inactive: bool) -> AppResult<Vec<Employee>> {
        self.read(|conn| queries::list_employees(conn, include_inactive))
    }

    pub fn find_employees_by_name(&self, partial: &str) -> AppResult<Vec<Employee>> {
        self.read(|conn| queries::find_employees_by_name(conn, partial))
    }

    /// Register a new employee.
    ///
    /// The first employee ever registered must be an administrator, and a
    /// tag stays taken even when its previous owner was retired.
    pub fn create_employee(
        &self,
        name: &str,
        raw_tag: &str,
        is_admin: bool,
    ) -> AppResult<Employee> {
        let name = validate_name(name)?;
        let tag = tag::normalize(raw_tag);
        if !tag::is_valid(&tag) {
            return Err(AppError::InvalidInput(format!(
                "RFID tag must be 4-50 hex characters, got '{}'",
                tag
            )));
        }

        let result = self.with_tx(|tx| {
            if queries::get_admin_count(tx)? == 0 && !is_admin {
                return Err(AppError::FirstUserMustBeAdmin);
            }
            if queries::find_tag_owner(tx, &tag)?.is_some() {
                return Err(AppError::DuplicateTag(tag.clone()));
            }
            queries::insert_employee(tx, &name, &tag, is_admin)
        });

        match result {
            // The unique index is the backstop for a racing registration.
            Err(AppError::Db(e)) if is_unique_violation(&e) => {
                Err(AppError::DuplicateTag(tag))
            }
            Ok(employee) => {
                info!(%employee, admin = is_admin, "employee registered");
                Ok(employee)
            }
            other => other,
        }
    }

    pub fn update_employee_name(&self, id: i64, new_name: &str) -> AppResult<Employee> {
        let name = validate_name(new_name)?;
        self.with_tx(|tx| {
            let n = queries::update_employee_name(tx, id, &name)?;
            if n == 0 {
                return Err(AppError::InvalidInput(format!("no employee with id {}", id)));
            }
            queries::get_employee_by_id(tx, id)?
                .ok_or_else(|| AppError::Other(format!("employee {} vanished", id)))
        })
    }

    // ---------------------------------------------
    // Time entries
    // ---------------------------------------------

    pub fn get_last_active_entry(&self, employee: &Employee) -> AppResult<Option<TimeEntry>> {
        self.read(|conn| queries::last_active_entry(conn, employee.id))
    }

    pub fn get_entry(&self, id: i64) -> AppResult<Option<TimeEntry>> {
        self.read(|conn| queries::get_entry(conn, id))
    }

    pub fn first_active_entry(&self, employee: &Employee) -> AppResult<Option<TimeEntry>> {
        self.read(|conn| queries::first_active_entry(conn, employee.id))
    }

    /// All active entries, optionally restricted to `[since, until)`.
    pub fn list_entries(
        &self,
        employee: &Employee,
        since: Option<NaiveDateTime>,
        until: Option<NaiveDateTime>,
    ) -> AppResult<Vec<TimeEntry>> {
        self.read(|conn| match (&since, &until) {
            (Some(s), Some(u)) => queries::active_entries_between(conn, employee.id, s, u),
            _ => {
                let mut entries = queries::active_entries(conn, employee.id)?;
                if let Some(s) = &since {
                    entries.retain(|e| e.timestamp >= *s);
                }
                if let Some(u) = &until {
                    entries.retain(|e| e.timestamp < *u);
                }
                Ok(entries)
            }
        })
    }

    /// Record a clock action: determine IN/OUT from the last active entry
    /// and insert, as one critical section under the employee lock.
    pub fn create_time_entry(
        &self,
        employee: &Employee,
        timestamp: NaiveDateTime,
    ) -> AppResult<(TimeEntry, Action)> {
        if !employee.active {
            return Err(AppError::InactiveEmployee(employee.name.clone()));
        }
        validate_timestamp(timestamp)?;

        let lock = self.locks.for_employee(employee.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        self.with_tx(|tx| {
            let last = queries::last_active_entry(tx, employee.id)?;
            let action = Action::next_after(last.map(|e| e.action));
            let entry = queries::insert_entry(tx, employee.id, timestamp, action)?;
            Ok((entry, action))
        })
    }

    /// Insert an entry at an arbitrary timestamp. The action comes from the
    /// entry's chronological position; recalculation then repairs everything
    /// after it.
    pub fn insert_manual_entry(
        &self,
        employee: &Employee,
        timestamp: NaiveDateTime,
    ) -> AppResult<TimeEntry> {
        if !employee.active {
            return Err(AppError::InactiveEmployee(employee.name.clone()));
        }
        validate_timestamp(timestamp)?;

        let lock = self.locks.for_employee(employee.id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

        let entry = self.with_tx(|tx| {
            let before = queries::last_active_entry_at_or_before(tx, employee.id, &timestamp)?;
            let action = Action::next_after(before.map(|e| e.action));
            queries::insert_entry(tx, employee.id, timestamp, action)
        })?;

        // The insert has committed; a recalculation failure must not undo it.
        if let Err(e) = self.recalculate_locked(employee.id) {
            warn!("recalculation after manual insert failed: {}", e);
            return Ok(entry);
        }

        // Recalculation may have rewritten the new entry's action.
        let refreshed = self.read(|conn| queries::get_entry(conn, entry.id))?;
        Ok(refreshed.unwrap_or(entry))
    }

    /// Soft-delete entries and repair the IN/OUT sequence of every affected
    /// employee. Returns how many rows were newly deactivated.
    pub fn soft_delete_entries(&self, ids: &[i64]) -> AppResult<usize> {
        let groups = self.read(|conn| queries::owners_of_entries(conn, ids))?;

        let mut total = 0;
        for (employee_id, entry_ids) in groups {
            let lock = self.locks.for_employee(employee_id);
            let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);

            total += self.with_tx(|tx| queries::soft_delete(tx, &entry_ids))?;

            // Deletion has committed; recalculation is best-effort.
            if let Err(e) = self.recalculate_locked(employee_id) {
                warn!("recalculation after soft delete failed: {}", e);
            }
        }
        Ok(total)
    }

    /// Re-impose IN/OUT alternation on an employee's active entries. Returns
    /// the number of rewritten rows (0 when the sequence was already sound).
    pub fn recalculate(&self, employee_id: i64) -> AppResult<usize> {
        let lock = self.locks.for_employee(employee_id);
        let _guard = lock.lock().unwrap_or_else(PoisonError::into_inner);
        self.recalculate_locked(employee_id)
    }

    /// Caller must hold the employee lock.
    fn recalculate_locked(&self, employee_id: i64) -> AppResult<usize> {
        self.with_tx(|tx| {
            let entries = queries::active_entries(tx, employee_id)?;
            let plan = ActionRecalculator::plan(&entries);
            if plan.is_empty() {
                return Ok(0);
            }
            for (id, action) in &plan {
                queries::update_action(tx, *id, *action)?;
            }
            info!(employee_id, rewritten = plan.len(), "repaired in/out sequence");
            Ok(plan.len())
        })
        .map_err(|e| AppError::RecalculationFailed(e.to_string()))
    }

    // ---------------------------------------------
    // Export
    // ---------------------------------------------

    /// Active entries of active employees, newest first.
    pub fn export_rows(&self) -> AppResult<Vec<ExportRow>> {
        self.read(queries::export_rows)
    }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(f, _)
            if f.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn validate_name(raw: &str) -> AppResult<String> {
    let name = raw.trim();
    if name.is_empty() {
        return Err(AppError::InvalidInput("employee name cannot be empty".into()));
    }
    if name.chars().count() > 100 {
        return Err(AppError::InvalidInput(
            "employee name cannot exceed 100 characters".into(),
        ));
    }
    if name.chars().any(char::is_control) {
        return Err(AppError::InvalidInput(
            "employee name contains control characters".into(),
        ));
    }
    Ok(name.to_string())
}

/// Reject timestamps outside `[now - 365 d, now + 1 d]`; anything further
/// out is almost certainly a clock error.
fn validate_timestamp(ts: NaiveDateTime) -> AppResult<()> {
    let now = Local::now().naive_local();
    if ts < now - Duration::days(365) || ts > now + Duration::days(1) {
        return Err(AppError::InvalidInput(format!(
            "timestamp {} is outside the accepted window",
            ts.format(queries::TS_FORMAT)
        )));
    }
    Ok(())
}
