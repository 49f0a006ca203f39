use predicates::str::contains;
use std::fs;

mod common;
use common::{setup_test_db, tc};

fn init_with_admin(db_path: &str) {
    tc().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();
    tc().args([
        "--db",
        db_path,
        "--test",
        "add-employee",
        "--name",
        "Admin",
        "--tag",
        "AD000001",
        "--admin",
    ])
    .assert()
    .success();
}

fn add_alice(db_path: &str) {
    tc().args([
        "--db",
        db_path,
        "--test",
        "add-employee",
        "--name",
        "Alice",
        "--tag",
        "AAAA1111",
    ])
    .assert()
    .success();
}

#[test]
fn init_creates_the_database() {
    let db_path = setup_test_db("cli_init");

    tc().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn first_registration_must_be_admin() {
    let db_path = setup_test_db("cli_first_run");
    tc().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success();

    tc().args([
        "--db",
        &db_path,
        "--test",
        "add-employee",
        "--name",
        "X",
        "--tag",
        "AB000001",
    ])
    .assert()
    .failure()
    .stderr(contains("administrator"));

    tc().args([
        "--db",
        &db_path,
        "--test",
        "add-employee",
        "--name",
        "X",
        "--tag",
        "AB000001",
        "--admin",
    ])
    .assert()
    .success();
}

#[test]
fn duplicate_tags_are_rejected() {
    let db_path = setup_test_db("cli_duplicate_tag");
    init_with_admin(&db_path);
    add_alice(&db_path);

    tc().args([
        "--db",
        &db_path,
        "--test",
        "add-employee",
        "--name",
        "Impostor",
        "--tag",
        "aaaa1111",
    ])
    .assert()
    .failure()
    .stderr(contains("already assigned"));
}

#[test]
fn insert_and_list_entries() {
    let db_path = setup_test_db("cli_insert_list");
    init_with_admin(&db_path);
    add_alice(&db_path);

    for time in ["08:00", "12:00"] {
        tc().args([
            "--db",
            &db_path,
            "--test",
            "insert-entry",
            "--tag",
            "AAAA1111",
            "--time",
            time,
        ])
        .assert()
        .success();
    }

    tc().args(["--db", &db_path, "--test", "list-entries", "--tag", "AAAA1111"])
        .assert()
        .success()
        .stdout(contains("Total entries: 2"))
        .stdout(contains("IN"))
        .stdout(contains("OUT"));
}

#[test]
fn delete_entry_repairs_the_sequence() {
    let db_path = setup_test_db("cli_delete");
    init_with_admin(&db_path);
    add_alice(&db_path);

    for time in ["08:00", "12:00", "13:00"] {
        tc().args([
            "--db",
            &db_path,
            "--test",
            "insert-entry",
            "--tag",
            "AAAA1111",
            "--time",
            time,
        ])
        .assert()
        .success();
    }

    // Wrong owner is refused without --force.
    tc().args([
        "--db",
        &db_path,
        "--test",
        "delete-entry",
        "--id",
        "2",
        "--name",
        "Bob",
    ])
    .assert()
    .failure()
    .stderr(contains("belongs to"));

    // Deleting the midday out flips the 13:00 entry back to out.
    tc().args([
        "--db",
        &db_path,
        "--test",
        "delete-entry",
        "--id",
        "2",
        "--tag",
        "AAAA1111",
        "--force",
    ])
    .assert()
    .success();

    tc().args(["--db", &db_path, "--test", "list-entries", "--tag", "AAAA1111"])
        .assert()
        .success()
        .stdout(contains("Total entries: 2"))
        .stdout(contains("OUT"));
}

#[test]
fn change_employee_name_updates_listings() {
    let db_path = setup_test_db("cli_rename");
    init_with_admin(&db_path);
    add_alice(&db_path);

    tc().args([
        "--db",
        &db_path,
        "--test",
        "change-employee-name",
        "--tag",
        "AAAA1111",
        "--new-name",
        "Alice Smith",
    ])
    .assert()
    .success()
    .stdout(contains("Renamed"));

    tc().args(["--db", &db_path, "--test", "list-entries", "--all"])
        .assert()
        .success()
        .stdout(contains("Alice Smith"));
}

#[test]
fn report_shows_daily_totals() {
    let db_path = setup_test_db("cli_report");
    init_with_admin(&db_path);
    add_alice(&db_path);

    for time in ["08:00", "12:00"] {
        tc().args([
            "--db",
            &db_path,
            "--test",
            "insert-entry",
            "--tag",
            "AAAA1111",
            "--time",
            time,
        ])
        .assert()
        .success();
    }

    tc().args(["--db", &db_path, "--test", "report", "--tag", "AAAA1111"])
        .assert()
        .success()
        .stdout(contains("WORKING TIME REPORT"))
        .stdout(contains("04:00:00"));
}

#[test]
fn export_writes_the_csv_contract() {
    let db_path = setup_test_db("cli_export");
    init_with_admin(&db_path);
    add_alice(&db_path);

    tc().args([
        "--db",
        &db_path,
        "--test",
        "insert-entry",
        "--tag",
        "AAAA1111",
        "--time",
        "09:00",
    ])
    .assert()
    .success();

    let mut out_dir = std::env::temp_dir();
    out_dir.push("cli_export_timeclock_out");
    fs::remove_dir_all(&out_dir).ok();
    let out_str = out_dir.to_string_lossy().to_string();

    tc().args(["--db", &db_path, "--test", "export", "--out", &out_str])
        .assert()
        .success()
        .stdout(contains("Exported"));

    let exported: Vec<_> = fs::read_dir(&out_dir)
        .expect("export dir")
        .filter_map(|e| e.ok())
        .filter(|e| {
            e.file_name()
                .to_string_lossy()
                .starts_with("TimeClock_Entries_")
        })
        .collect();
    assert_eq!(exported.len(), 1);

    let content = fs::read_to_string(exported[0].path()).expect("read export");
    assert!(content.starts_with(
        "entry_id;employee_id;employee_name;rfid_tag;timestamp_iso8601;action;active"
    ));
    assert!(content.contains(";Alice;AAAA1111;"));
}

#[test]
fn unknown_employees_fail_cleanly() {
    let db_path = setup_test_db("cli_unknown");
    init_with_admin(&db_path);

    tc().args(["--db", &db_path, "--test", "list-entries", "--tag", "DEAD0001"])
        .assert()
        .failure();

    tc().args([
        "--db",
        &db_path,
        "--test",
        "report",
        "--name",
        "Nobody",
    ])
    .assert()
    .failure()
    .stderr(contains("no employee found"));
}
