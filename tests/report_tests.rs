use chrono::NaiveDate;
use timeclock::core::report::ReportEngine;
use timeclock::models::action::Action;
use timeclock::utils::time::format_hms;

mod common;
use common::{insert_raw, open_store, seed_employee, setup_test_db};

fn date(s: &str) -> NaiveDate {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").expect("parse test date")
}

#[test]
fn midnight_crossing_counts_on_the_starting_day() {
    let db_path = setup_test_db("report_midnight");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-01-15 23:30:00", "in");
    insert_raw(&db_path, alice.id, "2024-01-16 07:30:00", "out");

    let report =
        ReportEngine::generate(&store, &alice, date("2024-01-15"), date("2024-01-16"))
            .expect("report");

    assert_eq!(report.days.len(), 1, "only the starting day carries the session");
    assert_eq!(report.days[0].date, date("2024-01-15"));
    assert_eq!(report.days[0].sessions.len(), 1);
    assert_eq!(format_hms(report.days[0].daily_total), "08:00:00");
    assert_eq!(format_hms(report.totals.total), "08:00:00");
    assert_eq!(report.totals.days_with_work, 1);
    assert_eq!(format_hms(report.totals.average_per_day), "08:00:00");
}

#[test]
fn session_ending_after_range_end_is_still_closed() {
    let db_path = setup_test_db("report_range_end");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    // Clock-out falls one day past the requested range.
    insert_raw(&db_path, alice.id, "2024-01-16 22:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-01-17 06:00:00", "out");

    let report =
        ReportEngine::generate(&store, &alice, date("2024-01-16"), date("2024-01-16"))
            .expect("report");

    assert_eq!(report.session_count(), 1);
    let session = &report.days[0].sessions[0];
    assert!(!session.is_open());
    assert_eq!(format_hms(report.totals.total), "08:00:00");
}

#[test]
fn duplicate_ins_pair_fifo() {
    let db_path = setup_test_db("report_fifo");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    let in1 = insert_raw(&db_path, alice.id, "2024-02-01 08:00:00", "in");
    let in2 = insert_raw(&db_path, alice.id, "2024-02-01 08:01:00", "in");
    let out1 = insert_raw(&db_path, alice.id, "2024-02-01 12:00:00", "out");
    let out2 = insert_raw(&db_path, alice.id, "2024-02-01 12:01:00", "out");
    insert_raw(&db_path, alice.id, "2024-02-01 13:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-02-01 17:00:00", "out");

    let report =
        ReportEngine::generate(&store, &alice, date("2024-02-01"), date("2024-02-01"))
            .expect("report");

    let sessions = &report.days[0].sessions;
    assert_eq!(sessions.len(), 3);

    // First-in pairs with first-out.
    assert_eq!(sessions[0].clock_in_id, in1);
    assert_eq!(sessions[0].clock_out_id, Some(out1));
    assert_eq!(sessions[1].clock_in_id, in2);
    assert_eq!(sessions[1].clock_out_id, Some(out2));
    for s in sessions {
        assert_eq!(s.duration.map(format_hms).as_deref(), Some("04:00:00"));
    }

    // Dropping the duplicate session repairs the sequence.
    store
        .soft_delete_entries(&[in2, out2])
        .expect("soft delete");

    let entries = store.list_entries(&alice, None, None).expect("entries");
    assert_eq!(entries.len(), 4);
    let actions: Vec<Action> = entries.iter().map(|e| e.action).collect();
    assert_eq!(
        actions,
        vec![Action::In, Action::Out, Action::In, Action::Out]
    );

    let report =
        ReportEngine::generate(&store, &alice, date("2024-02-01"), date("2024-02-01"))
            .expect("report");
    assert_eq!(report.session_count(), 2);
    assert_eq!(format_hms(report.totals.total), "08:00:00");
}

#[test]
fn open_session_contributes_nothing() {
    let db_path = setup_test_db("report_open");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-03-04 09:00:00", "in");

    let report =
        ReportEngine::generate(&store, &alice, date("2024-03-04"), date("2024-03-04"))
            .expect("report");

    assert_eq!(report.days.len(), 1);
    let day = &report.days[0];
    assert_eq!(day.sessions.len(), 1);
    assert!(day.has_open_session);
    assert!(day.sessions[0].clock_out.is_none());
    assert!(day.sessions[0].duration.is_none());
    assert_eq!(day.daily_total.num_seconds(), 0);
    assert_eq!(report.totals.days_with_work, 0);
    assert_eq!(report.totals.average_per_day.num_seconds(), 0);
}

#[test]
fn out_without_prior_in_is_skipped_with_warning() {
    let db_path = setup_test_db("report_orphan_out");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-03-05 07:00:00", "out");
    insert_raw(&db_path, alice.id, "2024-03-05 09:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-03-05 17:00:00", "out");

    let report =
        ReportEngine::generate(&store, &alice, date("2024-03-05"), date("2024-03-05"))
            .expect("report");

    assert_eq!(report.session_count(), 1);
    assert_eq!(report.warnings.len(), 1);
    assert!(report.warnings[0].contains("without prior clock-in"));
    assert_eq!(format_hms(report.totals.total), "08:00:00");
}

#[test]
fn reports_are_deterministic() {
    let db_path = setup_test_db("report_determinism");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-04-01 08:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-04-01 12:30:00", "out");
    insert_raw(&db_path, alice.id, "2024-04-02 23:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-04-03 06:00:00", "out");
    insert_raw(&db_path, alice.id, "2024-04-05 09:00:00", "in");

    let first = ReportEngine::generate(&store, &alice, date("2024-04-01"), date("2024-04-05"))
        .expect("report");
    let second = ReportEngine::generate(&store, &alice, date("2024-04-01"), date("2024-04-05"))
        .expect("report");

    assert_eq!(first, second);
}

#[test]
fn soft_deleted_entries_are_invisible_everywhere() {
    let db_path = setup_test_db("report_soft_delete");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-05-01 08:00:00", "in");
    let out_id = insert_raw(&db_path, alice.id, "2024-05-01 16:00:00", "out");

    store.soft_delete_entries(&[out_id]).expect("soft delete");

    let entries = store.list_entries(&alice, None, None).expect("entries");
    assert_eq!(entries.len(), 1, "queries must not return deleted rows");

    let report =
        ReportEngine::generate(&store, &alice, date("2024-05-01"), date("2024-05-01"))
            .expect("report");
    assert_eq!(report.session_count(), 1);
    assert!(report.days[0].has_open_session, "the surviving in is now open");
    assert_eq!(report.totals.total.num_seconds(), 0);

    let export = store.export_rows().expect("export");
    assert!(
        export.iter().all(|r| r.entry_id != out_id),
        "export must not contain deleted rows"
    );
}
