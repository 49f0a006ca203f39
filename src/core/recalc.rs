//! IN/OUT sequence repair.
//!
//! After a manual insert, a soft delete or a timestamp edit, an employee's
//! active entries may no longer alternate. The recalculator rewrites the
//! `action` column so the sequence reads `in, out, in, out, …` again.

use crate::models::action::Action;
use crate::models::entry::TimeEntry;

pub struct ActionRecalculator;

impl ActionRecalculator {
    /// Compute the rewrites needed to make `entries` alternate starting
    /// with `in`. Entries must already be in `(timestamp, id)` order.
    ///
    /// An empty plan means the sequence is sound; callers skip the write
    /// entirely in that case, so a no-op never touches the database.
    pub fn plan(entries: &[TimeEntry]) -> Vec<(i64, Action)> {
        let mut expected = Action::In;
        let mut plan = Vec::new();

        for entry in entries {
            if entry.action != expected {
                plan.push((entry.id, expected));
            }
            expected = expected.opposite();
        }

        plan
    }

    /// Check without planning; handy for assertions and reports.
    pub fn is_alternating(entries: &[TimeEntry]) -> bool {
        let mut expected = Action::In;
        for entry in entries {
            if entry.action != expected {
                return false;
            }
            expected = expected.opposite();
        }
        true
    }
}
