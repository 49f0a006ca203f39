//! Working-time report generation.
//!
//! Entries are paired into sessions FIFO across the whole range rather than
//! per day, which is what makes sessions spanning midnight come out right: a
//! session belongs to the calendar day of its clock-in.

use chrono::{Days, Duration, NaiveDate, NaiveDateTime, NaiveTime};
use std::collections::{BTreeMap, VecDeque};
use tracing::debug;

use crate::db::Store;
use crate::errors::{AppError, AppResult};
use crate::models::action::Action;
use crate::models::employee::Employee;
use crate::models::report::{DayReport, Report, ReportTotals, Session};

pub struct ReportEngine;

impl ReportEngine {
    /// Build the working-time report for `[start, end]` (inclusive local
    /// calendar dates).
    ///
    /// Output is fully determined by the employee's active entries: no
    /// wall-clock reads, no randomness.
    pub fn generate(
        store: &Store,
        employee: &Employee,
        start: NaiveDate,
        end: NaiveDate,
    ) -> AppResult<Report> {
        if start > end {
            return Err(AppError::InvalidInput(format!(
                "report range {} .. {} is inverted",
                start, end
            )));
        }

        // Fetch one extra day past `end` so a session that starts on the
        // last day and clocks out after midnight still finds its out-entry.
        let since = start.and_time(NaiveTime::MIN);
        let until = end
            .checked_add_days(Days::new(2))
            .map(|d| d.and_time(NaiveTime::MIN))
            .ok_or_else(|| AppError::InvalidInput("report range too large".into()))?;

        let entries = store.list_entries(employee, Some(since), Some(until))?;

        // FIFO pairing across the whole range.
        let mut pending_ins: VecDeque<(NaiveDateTime, i64)> = VecDeque::new();
        let mut sessions: Vec<Session> = Vec::new();
        let mut warnings: Vec<String> = Vec::new();

        for entry in &entries {
            match entry.action {
                Action::In => pending_ins.push_back((entry.timestamp, entry.id)),
                Action::Out => match pending_ins.pop_front() {
                    Some((clock_in, clock_in_id)) => {
                        sessions.push(Session {
                            clock_in,
                            clock_out: Some(entry.timestamp),
                            duration: Some(entry.timestamp - clock_in),
                            clock_in_id,
                            clock_out_id: Some(entry.id),
                        });
                    }
                    None => {
                        warnings.push(format!(
                            "clock-out without prior clock-in at {}",
                            entry.timestamp_str()
                        ));
                    }
                },
            }
        }

        // Whatever is still pending is an open session.
        if !pending_ins.is_empty() {
            debug!(
                employee = %employee.name,
                open = pending_ins.len(),
                "open sessions without a clock-out"
            );
        }
        for (clock_in, clock_in_id) in pending_ins {
            sessions.push(Session {
                clock_in,
                clock_out: None,
                duration: None,
                clock_in_id,
                clock_out_id: None,
            });
        }

        // Group by clock-in day. Sessions beginning in the overshoot window
        // past `end` were only fetched to close midnight-crossers; drop them.
        let mut by_day: BTreeMap<NaiveDate, Vec<Session>> = BTreeMap::new();
        for session in sessions {
            let date = session.clock_in.date();
            if date < start || date > end {
                continue;
            }
            by_day.entry(date).or_default().push(session);
        }

        let mut days = Vec::with_capacity(by_day.len());
        let mut total = Duration::zero();
        let mut days_with_work = 0usize;

        for (date, mut day_sessions) in by_day {
            day_sessions.sort_by_key(|s| (s.clock_in, s.clock_in_id));

            let daily_total = day_sessions
                .iter()
                .filter_map(|s| s.duration)
                .fold(Duration::zero(), |acc, d| acc + d);
            let has_open_session = day_sessions.iter().any(Session::is_open);

            if day_sessions.iter().any(|s| !s.is_open()) {
                days_with_work += 1;
            }
            total += daily_total;

            days.push(DayReport {
                date,
                sessions: day_sessions,
                daily_total,
                has_open_session,
            });
        }

        let average_per_day = if days_with_work > 0 {
            Duration::seconds(total.num_seconds() / days_with_work as i64)
        } else {
            Duration::zero()
        };

        Ok(Report {
            employee: employee.clone(),
            start,
            end,
            days,
            totals: ReportTotals {
                total,
                days_with_work,
                average_per_day,
            },
            warnings,
        })
    }
}
