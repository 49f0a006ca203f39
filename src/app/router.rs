//! Scan routing: debounce, then dispatch on the current UI mode.
//!
//! The reader callback only does `dispatcher.post(...)`; everything in this
//! module runs single-threaded on the event loop.

use tracing::{debug, info, warn};

use crate::core::clock::ClockEngine;
use crate::errors::AppError;
use crate::models::action::Action;
use crate::models::employee::Employee;
use crate::utils::tag;

use super::dispatcher::Dispatcher;
use super::Engine;

/// The screen the kiosk is showing, which decides what a badge read means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Timeclock,
    Register,
    Identify,
    Admin,
    EntryEditPending,
}

/// Surface the router drives. The touchscreen adapter implements this;
/// `timeclock run` ships a console implementation and tests use a
/// recording fake.
pub trait UiPort {
    fn mode(&self) -> Mode;
    fn set_mode(&mut self, mode: Mode);
    fn show_error(&mut self, title: &str, message: &str);
    fn show_info(&mut self, title: &str, message: &str);
    fn show_greeter(&mut self, employee: &Employee, action: Action);
    fn update_status(&mut self, message: &str);
    fn stash_registration_tag(&mut self, tag: &str);
    fn show_identification(&mut self, info: &str);
    fn open_entry_editor(&mut self, employee: &Employee);
}

/// Entry point for badge reads; runs on the event loop.
pub fn handle_scan(engine: &mut Engine, dispatcher: &Dispatcher, raw_tag: &str) {
    let tag = tag::normalize(raw_tag);
    if tag.is_empty() {
        return;
    }

    if engine.state.is_recent_scan(&tag) {
        debug!(%tag, "duplicate scan suppressed");
        return;
    }

    info!(%tag, "handling scan");

    let employee = match engine.store.get_employee_by_tag(&tag) {
        Ok(found) => found,
        Err(e) => {
            warn!("employee lookup failed: {}", e);
            engine
                .ui
                .show_error("Database error", "Could not read employee data, try again.");
            engine.feedback.error();
            return;
        }
    };

    match engine.ui.mode() {
        Mode::Timeclock => handle_timeclock_scan(engine, dispatcher, &tag, employee),
        Mode::Register => handle_register_scan(engine, &tag, employee),
        Mode::Identify => handle_identify_scan(engine, &tag, employee),
        Mode::Admin => handle_admin_scan(engine, &tag, employee),
        Mode::EntryEditPending => handle_entry_edit_scan(engine, &tag, employee),
    }
}

fn handle_timeclock_scan(
    engine: &mut Engine,
    dispatcher: &Dispatcher,
    tag: &str,
    employee: Option<Employee>,
) {
    let Some(employee) = employee else {
        engine
            .ui
            .show_error("Unknown tag", &format!("Tag ID: {}", tag));
        engine.feedback.error();
        return;
    };

    if employee.is_admin {
        engine.ui.set_mode(Mode::Admin);
        return;
    }

    match ClockEngine::perform_clock_action(&engine.store, &employee) {
        Ok(result) => {
            engine.ui.show_greeter(&result.employee, result.action);
            engine.ui.update_status(&format!(
                "Clocked {} - {}",
                result.action.to_db_str().to_uppercase(),
                result.employee.name
            ));
            engine.feedback.success();
            arm_employee_expiry(engine, dispatcher, result.employee);
        }
        Err(e) => {
            warn!("clock action failed: {}", e);
            engine
                .ui
                .show_error("Error", &format!("Failed to record time: {}", e));
            engine.feedback.error();
        }
    }
}

/// Remember the clocked employee and schedule the timer that forgets them.
fn arm_employee_expiry(engine: &mut Engine, dispatcher: &Dispatcher, employee: Employee) {
    let generation = engine.state.set_last_clocked(employee);
    let timeout = engine.state.employee_timeout();
    dispatcher.schedule_after(timeout, move |engine, _| {
        engine.state.clear_last_clocked_if(generation);
    });
}

fn handle_register_scan(engine: &mut Engine, tag: &str, employee: Option<Employee>) {
    match employee {
        Some(existing) => {
            engine
                .ui
                .show_error("Error", &format!("Tag already assigned to {}", existing.name));
            engine.feedback.error();
        }
        None => {
            engine.ui.stash_registration_tag(tag);
            engine.feedback.success();
        }
    }
}

fn handle_identify_scan(engine: &mut Engine, tag: &str, employee: Option<Employee>) {
    let info = match employee {
        Some(e) => format!("Name: {}\nID: {}\nRole: {}", e.name, e.rfid_tag, e.role_str()),
        None => format!("Tag ID: {}\nStatus: not registered", tag),
    };
    engine.ui.show_identification(&info);
}

fn handle_admin_scan(engine: &mut Engine, tag: &str, employee: Option<Employee>) {
    match employee {
        Some(e) if e.is_admin => {} // already here, stay
        Some(_) => {
            engine
                .ui
                .show_info("Admin mode", "Switch to clock mode to clock in/out.");
        }
        None => {
            engine
                .ui
                .show_error("Unknown tag", &format!("Tag ID: {}", tag));
            engine.feedback.error();
        }
    }
}

fn handle_entry_edit_scan(engine: &mut Engine, tag: &str, employee: Option<Employee>) {
    let Some(pending) = engine.state.pending_identification() else {
        // Confirmation expired before a badge arrived.
        engine.ui.set_mode(Mode::Timeclock);
        engine
            .ui
            .show_error("Timeout", "Badge confirmation expired, please retry.");
        return;
    };

    match employee {
        Some(e) if e.id == pending.employee.id => {
            engine.state.clear_identification();
            engine.ui.open_entry_editor(&e);
            engine.feedback.success();
        }
        _ => {
            warn!(%tag, "badge mismatch during entry edit confirmation");
            let err = AppError::PendingIdentificationMismatch;
            engine.ui.show_error("Wrong badge", &err.to_string());
            engine.feedback.error();
        }
    }
}

/// Arm a badge confirmation for `employee` before their entries may be
/// edited, and switch the UI into the waiting mode. Expiry falls back to
/// the clock screen.
pub fn begin_entry_edit(engine: &mut Engine, dispatcher: &Dispatcher, employee: Employee) {
    let generation = engine.state.begin_identification(employee);
    let timeout = engine.state.identification_timeout();
    engine.ui.set_mode(Mode::EntryEditPending);

    dispatcher.schedule_after(timeout, move |engine, _| {
        if engine.state.clear_identification_if(generation)
            && engine.ui.mode() == Mode::EntryEditPending
        {
            engine.ui.set_mode(Mode::Timeclock);
        }
    });
}
