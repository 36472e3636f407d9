pub mod json_backend;

use std::path::Path;

use crate::{errors::Result, ledger::RuleBook};

/// Abstraction over persistence backends capable of storing rule books and their backups.
pub trait StorageBackend: Send + Sync {
    fn save(&self, book: &RuleBook, name: &str) -> Result<()>;
    fn load(&self, name: &str) -> Result<RuleBook>;
    fn list_backups(&self, name: &str) -> Result<Vec<String>>;
    fn backup(&self, book: &RuleBook, name: &str, note: Option<&str>) -> Result<String>;
    fn restore(&self, name: &str, backup_name: &str) -> Result<RuleBook>;

    /// Ad-hoc file helpers outside the managed directory layout.
    fn save_to_path(&self, book: &RuleBook, path: &Path) -> Result<()> {
        json_backend::save_book_to_path(book, path)
    }

    fn load_from_path(&self, path: &Path) -> Result<RuleBook> {
        json_backend::load_book_from_path(path)
    }
}

pub use json_backend::JsonStorage;
