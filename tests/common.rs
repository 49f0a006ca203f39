#![allow(dead_code)]
use assert_cmd::Command;
use std::env;
use std::fs;
use std::path::PathBuf;

use chrono::NaiveDateTime;
use timeclock::db::Store;
use timeclock::models::employee::Employee;

pub fn tc() -> Command {
    Command::cargo_bin("timeclock").expect("timeclock binary")
}

/// Create a unique test DB path inside the system temp dir and remove any
/// existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_timeclock.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

pub fn open_store(db_path: &str) -> Store {
    Store::open(db_path).expect("open store")
}

/// The first employee must be an administrator; most tests want one around.
pub fn seed_admin(store: &Store) -> Employee {
    store
        .create_employee("Admin", "AD000001", true)
        .expect("create admin")
}

pub fn seed_employee(store: &Store, name: &str, tag: &str) -> Employee {
    if store.get_admin_count().expect("admin count") == 0 {
        seed_admin(store);
    }
    store
        .create_employee(name, tag, false)
        .expect("create employee")
}

pub fn ts(s: &str) -> NaiveDateTime {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").expect("parse test timestamp")
}

/// Timestamp on today's local date, for entries that must pass the
/// plausibility window.
pub fn today_at(hms: &str) -> NaiveDateTime {
    let date = chrono::Local::now().date_naive();
    ts(&format!("{} {}", date.format("%Y-%m-%d"), hms))
}

/// Insert a raw entry row, bypassing action determination and timestamp
/// validation; for constructing legacy or duplicated sequences.
pub fn insert_raw(db_path: &str, employee_id: i64, when: &str, action: &str) -> i64 {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.execute(
        "INSERT INTO time_entries (employee_id, timestamp, action, active)
         VALUES (?1, ?2, ?3, 1)",
        rusqlite::params![employee_id, when, action],
    )
    .expect("insert raw entry");
    conn.last_insert_rowid()
}

/// Retire an employee directly, as the admin screen would.
pub fn deactivate_employee(db_path: &str, employee_id: i64) {
    let conn = rusqlite::Connection::open(db_path).expect("open db");
    conn.execute(
        "UPDATE employees SET active = 0 WHERE id = ?1",
        [employee_id],
    )
    .expect("deactivate employee");
}
