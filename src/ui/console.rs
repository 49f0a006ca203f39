//! Minimal console adapter for running the engine without the touchscreen.
//! Popups become status lines; the registration form is a stashed tag the
//! operator picks up with `add-employee`.

use crate::app::router::{Mode, UiPort};
use crate::models::action::Action;
use crate::models::employee::Employee;
use crate::ui::messages;

pub struct ConsoleUi {
    mode: Mode,
    registration_tag: Option<String>,
}

impl ConsoleUi {
    pub fn new() -> Self {
        Self {
            mode: Mode::Timeclock,
            registration_tag: None,
        }
    }

    pub fn registration_tag(&self) -> Option<&str> {
        self.registration_tag.as_deref()
    }
}

impl Default for ConsoleUi {
    fn default() -> Self {
        Self::new()
    }
}

impl UiPort for ConsoleUi {
    fn mode(&self) -> Mode {
        self.mode
    }

    fn set_mode(&mut self, mode: Mode) {
        messages::info(format!("screen: {:?}", mode));
        self.mode = mode;
    }

    fn show_error(&mut self, title: &str, message: &str) {
        messages::error(format!("{}: {}", title, message));
    }

    fn show_info(&mut self, title: &str, message: &str) {
        messages::info(format!("{}: {}", title, message));
    }

    fn show_greeter(&mut self, employee: &Employee, action: Action) {
        messages::success(format!(
            "{} - {}",
            action.to_db_str().to_uppercase(),
            employee.name
        ));
    }

    fn update_status(&mut self, message: &str) {
        messages::info(message);
    }

    fn stash_registration_tag(&mut self, tag: &str) {
        messages::success(format!(
            "New tag captured: {} (register it with add-employee)",
            tag
        ));
        self.registration_tag = Some(tag.to_string());
    }

    fn show_identification(&mut self, info: &str) {
        for line in info.lines() {
            messages::info(line);
        }
    }

    fn open_entry_editor(&mut self, employee: &Employee) {
        messages::info(format!("entry editor requested for {}", employee.name));
    }
}
