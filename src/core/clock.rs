//! Clock in/out business logic.

use chrono::Local;
use tracing::info;

use crate::db::Store;
use crate::errors::AppResult;
use crate::models::action::Action;
use crate::models::employee::Employee;
use crate::models::entry::TimeEntry;

/// Result of a successful clock action.
#[derive(Debug, Clone)]
pub struct ClockResult {
    pub action: Action,
    pub entry: TimeEntry,
    pub employee: Employee,
}

pub struct ClockEngine;

impl ClockEngine {
    /// Record the next clock action for an employee at the current time.
    ///
    /// Action determination and insert are one critical section inside the
    /// Store (employee lock + transaction), so two concurrent scans of the
    /// same badge can never both record `in`.
    pub fn perform_clock_action(store: &Store, employee: &Employee) -> AppResult<ClockResult> {
        let now = Local::now().naive_local();
        let (entry, action) = store.create_time_entry(employee, now)?;

        info!(employee = %employee.name, action = %action, "clock action recorded");

        Ok(ClockResult {
            action,
            entry,
            employee: employee.clone(),
        })
    }
}
