//! In-memory application state owned by the event loop.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::models::employee::Employee;

/// A badge confirmation awaited before opening the entry editor.
#[derive(Debug, Clone)]
pub struct PendingIdentification {
    pub employee: Employee,
    pub requested_at: Instant,
}

pub struct AppState {
    scan_debounce: Duration,
    employee_timeout: Duration,
    identification_timeout: Duration,

    last_clocked: Option<Employee>,
    clock_generation: u64,

    pending: Option<PendingIdentification>,
    ident_generation: u64,

    recent_scans: HashMap<String, Instant>,
}

impl AppState {
    pub fn new(
        scan_debounce: Duration,
        employee_timeout: Duration,
        identification_timeout: Duration,
    ) -> Self {
        Self {
            scan_debounce,
            employee_timeout,
            identification_timeout,
            last_clocked: None,
            clock_generation: 0,
            pending: None,
            ident_generation: 0,
            recent_scans: HashMap::new(),
        }
    }

    pub fn from_config(cfg: &Config) -> Self {
        Self::new(
            cfg.scan_debounce(),
            cfg.employee_timeout(),
            cfg.identification_timeout(),
        )
    }

    pub fn employee_timeout(&self) -> Duration {
        self.employee_timeout
    }

    pub fn identification_timeout(&self) -> Duration {
        self.identification_timeout
    }

    // ---------------------------------------------
    // Scan debounce
    // ---------------------------------------------

    /// True when `tag` was already accepted within the debounce window.
    /// A miss records the scan time.
    pub fn is_recent_scan(&mut self, tag: &str) -> bool {
        let now = Instant::now();
        if let Some(prev) = self.recent_scans.get(tag) {
            if now.duration_since(*prev) < self.scan_debounce {
                return true;
            }
        }
        self.recent_scans.insert(tag.to_string(), now);
        false
    }

    // ---------------------------------------------
    // Last clocked employee
    // ---------------------------------------------

    /// Remember who clocked last. Returns a generation token: the expiry
    /// timer only clears the state when its token is still current, so a
    /// newer clock action silently outlives a stale timer.
    pub fn set_last_clocked(&mut self, employee: Employee) -> u64 {
        self.last_clocked = Some(employee);
        self.clock_generation += 1;
        self.clock_generation
    }

    pub fn clear_last_clocked_if(&mut self, generation: u64) {
        if self.clock_generation == generation {
            self.last_clocked = None;
        }
    }

    pub fn clear_last_clocked(&mut self) {
        self.last_clocked = None;
        self.clock_generation += 1;
    }

    pub fn last_clocked(&self) -> Option<&Employee> {
        self.last_clocked.as_ref()
    }

    // ---------------------------------------------
    // Pending identification
    // ---------------------------------------------

    /// Arm a badge confirmation for `employee`. Returns a generation token
    /// for the expiry timer.
    pub fn begin_identification(&mut self, employee: Employee) -> u64 {
        self.pending = Some(PendingIdentification {
            employee,
            requested_at: Instant::now(),
        });
        self.ident_generation += 1;
        self.ident_generation
    }

    /// Current pending confirmation, dropping it when it has sat longer
    /// than the identification timeout.
    pub fn pending_identification(&mut self) -> Option<PendingIdentification> {
        if let Some(p) = &self.pending {
            if p.requested_at.elapsed() > self.identification_timeout {
                self.pending = None;
                return None;
            }
        }
        self.pending.clone()
    }

    /// Clear only when `generation` is still current; true when cleared.
    pub fn clear_identification_if(&mut self, generation: u64) -> bool {
        if self.ident_generation == generation && self.pending.is_some() {
            self.pending = None;
            return true;
        }
        false
    }

    pub fn clear_identification(&mut self) {
        self.pending = None;
        self.ident_generation += 1;
    }
}
