//! Per-employee mutexes serialising read-then-write storage operations.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

/// Lock registry keyed by employee id. Handles are created on first use and
/// live for the whole process, so two operations on the same employee always
/// contend on the same mutex.
#[derive(Default)]
pub struct EmployeeLocks {
    map: Mutex<HashMap<i64, Arc<Mutex<()>>>>,
}

impl EmployeeLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_employee(&self, employee_id: i64) -> Arc<Mutex<()>> {
        let mut map = self.map.lock().unwrap_or_else(PoisonError::into_inner);
        map.entry(employee_id)
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }
}
