//! Working-time report structures produced by `core::report`.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::employee::Employee;

/// A paired (in, out) interval. `clock_out` is `None` for an open session;
/// open sessions contribute nothing to totals.
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub clock_in: NaiveDateTime,
    pub clock_out: Option<NaiveDateTime>,
    pub duration: Option<Duration>,
    pub clock_in_id: i64,
    pub clock_out_id: Option<i64>,
}

impl Session {
    pub fn is_open(&self) -> bool {
        self.clock_out.is_none()
    }
}

/// One calendar day of the report. Sessions crossing midnight are listed on
/// the day of their clock-in.
#[derive(Debug, Clone, PartialEq)]
pub struct DayReport {
    pub date: NaiveDate,
    pub sessions: Vec<Session>,
    pub daily_total: Duration,
    pub has_open_session: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReportTotals {
    pub total: Duration,
    /// Days with at least one closed session.
    pub days_with_work: usize,
    pub average_per_day: Duration,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    pub employee: Employee,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub days: Vec<DayReport>,
    pub totals: ReportTotals,
    /// Anomalies observed during pairing ("out without prior in").
    pub warnings: Vec<String>,
}

impl Report {
    pub fn session_count(&self) -> usize {
        self.days.iter().map(|d| d.sessions.len()).sum()
    }
}
