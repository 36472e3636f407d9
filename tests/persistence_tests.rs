mod common;

use common::{date, expense, income, setup_test_env};
use fintrack_core::{
    config::Config,
    errors::FinanceError,
    ledger::RuleBook,
    recurring::{Frequency, TimeUnit},
    storage::StorageBackend,
};

fn sample_book() -> RuleBook {
    let mut book = RuleBook::new("Household Budget");
    book.add_rule(income("Salary", 3000.0, Frequency::Monthly, date(2024, 1, 1)))
        .expect("add salary");
    book.add_rule(
        expense("Gym", 42.5, Frequency::Custom, date(2024, 1, 3))
            .with_custom(2, TimeUnit::Week)
            .with_end_date(date(2024, 12, 31)),
    )
    .expect("add gym");
    book.materialize_due(date(2024, 2, 15));
    book
}

#[test]
fn save_and_load_round_trip() {
    let (storage, _) = setup_test_env(3);
    let book = sample_book();

    storage.save(&book, "Household Budget").expect("save");
    let loaded = storage.load("Household Budget").expect("load");

    assert_eq!(loaded.id, book.id);
    assert_eq!(loaded.name, book.name);
    assert_eq!(loaded.rules, book.rules);
    assert_eq!(loaded.transactions, book.transactions);
    assert!(storage
        .book_path("Household Budget")
        .ends_with("books/household_budget.json"));
}

#[test]
fn missing_books_are_storage_errors() {
    let (storage, _) = setup_test_env(3);
    assert!(matches!(
        storage.load("nowhere"),
        Err(FinanceError::StorageError(_))
    ));
}

#[test]
fn backups_are_pruned_to_retention() {
    let (storage, _) = setup_test_env(2);
    let book = sample_book();

    for note in ["first", "second", "third", "fourth"] {
        storage
            .backup(&book, "household", Some(note))
            .expect("backup");
    }

    let backups = storage.list_backups("household").expect("list");
    assert_eq!(backups.len(), 2);
    assert!(backups.iter().all(|name| name.starts_with("household_")));
}

#[test]
fn rapid_backups_keep_the_newest_and_stay_restorable() {
    let (storage, _) = setup_test_env(2);
    let mut book = sample_book();

    let mut returned = Vec::new();
    for note in ["alpha", "bravo", "charlie", "delta", "echo"] {
        book.name = note.to_string();
        returned.push(storage.backup(&book, "b", Some(note)).expect("backup"));
    }

    let backups = storage.list_backups("b").expect("list");
    assert_eq!(backups, vec![returned[4].clone(), returned[3].clone()]);
    assert!(backups[0].ends_with("_echo.json"));
    assert!(backups[1].ends_with("_delta.json"));

    let restored = storage.restore("b", &returned[4]).expect("restore newest");
    assert_eq!(restored.name, "echo");
}

#[test]
fn single_retention_keeps_the_backup_just_written() {
    let (storage, _) = setup_test_env(1);
    let book = sample_book();

    for note in ["alpha", "bravo", "charlie"] {
        let name = storage.backup(&book, "b", Some(note)).expect("backup");
        assert_eq!(storage.list_backups("b").expect("list"), vec![name.clone()]);
        assert!(storage.restore("b", &name).is_ok());
    }
}

#[test]
fn quick_successive_saves_keep_every_previous_version() {
    let (storage, _) = setup_test_env(5);
    let mut book = sample_book();

    for name in ["first", "second", "third"] {
        book.name = name.to_string();
        storage.save(&book, "b").expect("save");
    }

    let backups = storage.list_backups("b").expect("list");
    assert_eq!(backups.len(), 2);
    let names: Vec<String> = backups
        .iter()
        .map(|backup| storage.restore("b", backup).expect("restore").name)
        .collect();
    assert_eq!(names, vec!["second".to_string(), "first".to_string()]);
}

#[test]
fn saving_over_an_existing_book_keeps_a_backup() {
    let (storage, _) = setup_test_env(5);
    let mut book = sample_book();

    storage.save(&book, "household").expect("first save");
    assert!(storage.list_backups("household").expect("list").is_empty());

    book.name = "Renamed".into();
    storage.save(&book, "household").expect("second save");
    assert_eq!(storage.list_backups("household").expect("list").len(), 1);
}

#[test]
fn restore_replaces_the_current_book() {
    let (storage, _) = setup_test_env(5);
    let original = sample_book();
    storage.save(&original, "household").expect("save");
    let backup = storage
        .backup(&original, "household", Some("before cleanup"))
        .expect("backup");
    assert!(backup.ends_with("_before-cleanup.json"));

    let mut edited = original.clone();
    edited.rules.clear();
    edited.transactions.clear();
    storage.save(&edited, "household").expect("save edited");
    assert!(storage.load("household").expect("load").rules.is_empty());

    let restored = storage.restore("household", &backup).expect("restore");
    assert_eq!(restored.rules, original.rules);
    assert_eq!(
        storage.load("household").expect("reload").transactions,
        original.transactions
    );

    assert!(matches!(
        storage.restore("household", "household_19990101_0000.json"),
        Err(FinanceError::StorageError(_))
    ));
}

#[test]
fn ad_hoc_paths_round_trip() {
    let (storage, _) = setup_test_env(1);
    let book = sample_book();
    let path = storage.base_dir().join("exports").join("snapshot.json");
    std::fs::create_dir_all(path.parent().expect("parent")).expect("create export dir");

    storage.save_to_path(&book, &path).expect("export");
    let imported = storage.load_from_path(&path).expect("import");
    assert_eq!(imported.rules, book.rules);
}

#[test]
fn corrupt_books_fail_to_load() {
    let (storage, _) = setup_test_env(1);
    std::fs::write(storage.book_path("broken"), "{ \"rules\": [").expect("write corrupt book");
    assert!(storage.load("broken").is_err());
}

#[test]
fn config_round_trip() {
    let (_, config_manager) = setup_test_env(1);
    assert_eq!(config_manager.load().expect("defaults"), Config::default());

    let config = Config {
        locale: "de-DE".into(),
        currency: "EUR".into(),
        projection_months: 12,
        last_opened_book: Some("household".into()),
        ..Config::default()
    };
    config_manager.save(&config).expect("save config");

    let loaded = config_manager.load().expect("load config");
    assert_eq!(loaded, config);
    assert_eq!(loaded.currency_code().as_str(), "EUR");
    assert_eq!(loaded.locale_config().decimal_separator, ',');
}
