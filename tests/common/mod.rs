#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use fintrack_core::{
    config::ConfigManager,
    recurring::{FlowKind, Frequency, RecurringRule},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Creates isolated storage and config managers backed by a unique directory per test.
pub fn setup_test_env(retention: usize) -> (JsonStorage, ConfigManager) {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);

    let storage = JsonStorage::new(Some(base.clone()), Some(retention)).expect("json storage");
    let config_manager = ConfigManager::with_base_dir(base).expect("config manager");
    (storage, config_manager)
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn income(name: &str, amount: f64, frequency: Frequency, start: NaiveDate) -> RecurringRule {
    RecurringRule::new(name, FlowKind::Income, amount, frequency, start)
}

pub fn expense(name: &str, amount: f64, frequency: Frequency, start: NaiveDate) -> RecurringRule {
    RecurringRule::new(name, FlowKind::Expense, amount, frequency, start)
}
