use chrono::{DateTime, Utc};
use serde::Serialize;

/// An employee row. Employees are never physically deleted; retiring one
/// sets `active = false` and keeps the tag reserved forever.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,          // ⇔ employees.name (1–100 chars, trimmed)
    pub rfid_tag: String,      // ⇔ employees.rfid_tag (uppercase hex, unique)
    pub is_admin: bool,        // ⇔ employees.is_admin
    pub created_at: DateTime<Utc>, // ⇔ employees.created_at (TEXT, RFC3339)
    pub active: bool,          // ⇔ employees.active (soft-delete flag)
}

impl Employee {
    pub fn role_str(&self) -> &'static str {
        if self.is_admin {
            "Administrator"
        } else {
            "Employee"
        }
    }
}

impl std::fmt::Display for Employee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name, self.rfid_tag)
    }
}
