use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

use super::action::Action;

/// A single clock event. Rows are append-only: the editor soft-deletes by
/// flipping `active`, and `action` may be rewritten by recalculation.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TimeEntry {
    pub id: i64,
    pub employee_id: i64,        // ⇔ time_entries.employee_id
    pub timestamp: NaiveDateTime, // ⇔ time_entries.timestamp (TEXT, local wall clock)
    pub action: Action,          // ⇔ time_entries.action ('in' | 'out')
    pub active: bool,            // ⇔ time_entries.active (soft-delete flag)
}

impl TimeEntry {
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date()
    }

    pub fn timestamp_str(&self) -> String {
        self.timestamp.format("%Y-%m-%d %H:%M:%S").to_string()
    }
}
