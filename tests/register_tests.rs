use timeclock::errors::AppError;

mod common;
use common::{deactivate_employee, open_store, seed_admin, setup_test_db};

#[test]
fn first_employee_must_be_an_admin() {
    let db_path = setup_test_db("register_first_run");
    let store = open_store(&db_path);

    let err = store
        .create_employee("X", "AB000001", false)
        .expect_err("non-admin first employee must be rejected");
    assert!(matches!(err, AppError::FirstUserMustBeAdmin));

    let admin = store
        .create_employee("X", "AB000001", true)
        .expect("admin first employee succeeds");
    assert!(admin.is_admin);

    // With an admin in place, regular employees register fine.
    store
        .create_employee("Alice", "AAAA1111", false)
        .expect("second employee");
}

#[test]
fn tags_stay_unique_across_retired_employees() {
    let db_path = setup_test_db("register_unique_tags");
    let store = open_store(&db_path);
    seed_admin(&store);

    let bob = store
        .create_employee("Bob", "BBBB2222", false)
        .expect("create bob");

    deactivate_employee(&db_path, bob.id);

    let err = store
        .create_employee("New Bob", "BBBB2222", false)
        .expect_err("a retired employee's tag stays reserved");
    assert!(matches!(err, AppError::DuplicateTag(_)));
}

#[test]
fn tags_are_normalised_on_ingest() {
    let db_path = setup_test_db("register_normalise");
    let store = open_store(&db_path);
    seed_admin(&store);

    let alice = store
        .create_employee("  Alice  ", "  aaaa1111 ", false)
        .expect("create with messy input");
    assert_eq!(alice.name, "Alice");
    assert_eq!(alice.rfid_tag, "AAAA1111");

    // Lookups normalise the same way, so a lowercase read still matches.
    let found = store
        .get_employee_by_tag("aaaa1111")
        .expect("lookup")
        .expect("employee found");
    assert_eq!(found.id, alice.id);

    let err = store
        .create_employee("Clone", "aaaa1111", false)
        .expect_err("case-differing duplicate must be rejected");
    assert!(matches!(err, AppError::DuplicateTag(_)));
}

#[test]
fn invalid_names_and_tags_are_rejected() {
    let db_path = setup_test_db("register_validation");
    let store = open_store(&db_path);
    seed_admin(&store);

    let err = store
        .create_employee("   ", "CC003333", false)
        .expect_err("blank name");
    assert!(matches!(err, AppError::InvalidInput(_)));

    let long_name = "x".repeat(101);
    let err = store
        .create_employee(&long_name, "CC003333", false)
        .expect_err("over-long name");
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = store
        .create_employee("Short Tag", "AB1", false)
        .expect_err("tag below 4 chars");
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = store
        .create_employee("Bad Tag", "NOTHEX_1", false)
        .expect_err("non-hex tag");
    assert!(matches!(err, AppError::InvalidInput(_)));
}

#[test]
fn renames_are_validated_too() {
    let db_path = setup_test_db("register_rename");
    let store = open_store(&db_path);
    let admin = seed_admin(&store);

    let renamed = store
        .update_employee_name(admin.id, "Head Admin")
        .expect("rename");
    assert_eq!(renamed.name, "Head Admin");

    let err = store
        .update_employee_name(admin.id, "  ")
        .expect_err("blank rename");
    assert!(matches!(err, AppError::InvalidInput(_)));

    let err = store
        .update_employee_name(9999, "Ghost")
        .expect_err("unknown employee id");
    assert!(matches!(err, AppError::InvalidInput(_)));
}
