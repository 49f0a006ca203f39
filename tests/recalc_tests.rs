use timeclock::core::recalc::ActionRecalculator;
use timeclock::models::action::Action;

mod common;
use common::{insert_raw, open_store, seed_employee, setup_test_db, today_at};

#[test]
fn sound_sequences_need_no_rewrites() {
    let db_path = setup_test_db("recalc_noop");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-06-01 08:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-06-01 12:00:00", "out");
    insert_raw(&db_path, alice.id, "2024-06-01 13:00:00", "in");

    let entries = store.list_entries(&alice, None, None).expect("entries");
    assert!(ActionRecalculator::plan(&entries).is_empty());

    let rewritten = store.recalculate(alice.id).expect("recalculate");
    assert_eq!(rewritten, 0, "a sound sequence must not be touched");
}

#[test]
fn broken_sequences_are_repaired() {
    let db_path = setup_test_db("recalc_repair");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-06-02 08:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-06-02 09:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-06-02 10:00:00", "in");

    let rewritten = store.recalculate(alice.id).expect("recalculate");
    assert_eq!(rewritten, 1, "only the middle entry needs flipping");

    let entries = store.list_entries(&alice, None, None).expect("entries");
    let actions: Vec<Action> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![Action::In, Action::Out, Action::In]);
}

#[test]
fn recalculation_is_idempotent() {
    let db_path = setup_test_db("recalc_idempotent");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    insert_raw(&db_path, alice.id, "2024-06-03 08:00:00", "out");
    insert_raw(&db_path, alice.id, "2024-06-03 12:00:00", "out");
    insert_raw(&db_path, alice.id, "2024-06-03 13:00:00", "in");
    insert_raw(&db_path, alice.id, "2024-06-03 17:00:00", "in");

    let first = store.recalculate(alice.id).expect("recalculate");
    assert!(first > 0);
    let after_first = store.list_entries(&alice, None, None).expect("entries");

    let second = store.recalculate(alice.id).expect("recalculate");
    assert_eq!(second, 0, "a second run must be a no-op");
    let after_second = store.list_entries(&alice, None, None).expect("entries");

    assert_eq!(after_first, after_second);
    assert!(ActionRecalculator::is_alternating(&after_second));
}

#[test]
fn manual_insert_repairs_everything_after_it() {
    let db_path = setup_test_db("recalc_manual_insert");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    store
        .create_time_entry(&alice, today_at("08:00:00"))
        .expect("clock in");
    store
        .create_time_entry(&alice, today_at("12:00:00"))
        .expect("clock out");

    // A forgotten break: insert between the two.
    let inserted = store
        .insert_manual_entry(&alice, today_at("10:00:00"))
        .expect("manual insert");
    assert_eq!(inserted.action, Action::Out, "position after an in means out");

    let entries = store.list_entries(&alice, None, None).expect("entries");
    let actions: Vec<Action> = entries.iter().map(|e| e.action).collect();
    assert_eq!(actions, vec![Action::In, Action::Out, Action::In]);
    assert!(ActionRecalculator::is_alternating(&entries));
}

#[test]
fn equal_timestamps_break_ties_by_id() {
    let db_path = setup_test_db("recalc_tie");
    let store = open_store(&db_path);
    let alice = seed_employee(&store, "Alice", "AAAA1111");

    let first = insert_raw(&db_path, alice.id, "2024-06-04 08:00:00", "in");
    let second = insert_raw(&db_path, alice.id, "2024-06-04 08:00:00", "in");

    store.recalculate(alice.id).expect("recalculate");

    let entries = store.list_entries(&alice, None, None).expect("entries");
    assert_eq!(entries[0].id, first);
    assert_eq!(entries[0].action, Action::In);
    assert_eq!(entries[1].id, second);
    assert_eq!(entries[1].action, Action::Out);
}
