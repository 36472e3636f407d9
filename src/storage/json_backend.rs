use chrono::{NaiveDateTime, Timelike, Utc};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{debug, info};

use crate::{
    config::Config,
    errors::{FinanceError, Result},
    ledger::RuleBook,
    utils::{
        paths::{backups_dir_in, books_dir_in, ensure_dir, resolve_base},
        persistence::{read_json, write_json_atomic},
    },
};

use super::StorageBackend;

const BACKUP_EXTENSION: &str = "json";
const BACKUP_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";
const DEFAULT_RETENTION: usize = 5;

/// Stores each rule book as a pretty-printed JSON file with rotating backups.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    books_dir: PathBuf,
    backups_dir: PathBuf,
    retention: usize,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>, retention: Option<usize>) -> Result<Self> {
        let root = resolve_base(root);
        let books_dir = books_dir_in(&root);
        let backups_dir = backups_dir_in(&root);
        ensure_dir(&books_dir)?;
        ensure_dir(&backups_dir)?;
        Ok(Self {
            root,
            books_dir,
            backups_dir,
            retention: retention.unwrap_or(DEFAULT_RETENTION).max(1),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        Self::new(Some(config.resolve_data_root()), Some(config.backup_retention))
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn book_path(&self, name: &str) -> PathBuf {
        self.books_dir
            .join(format!("{}.{}", canonical_name(name), BACKUP_EXTENSION))
    }

    fn backup_dir(&self, name: &str) -> PathBuf {
        self.backups_dir.join(canonical_name(name))
    }

    pub fn backup_path(&self, name: &str, backup_name: &str) -> PathBuf {
        self.backup_dir(name).join(backup_name)
    }

    /// Next backup name for `name`, always ordered after every existing backup.
    ///
    /// Backups taken within the same second (or while the clock reads earlier
    /// than the newest backup) get an increasing sequence number instead.
    fn next_backup_file_name(&self, name: &str, note: Option<&str>) -> Result<String> {
        let now = truncate_to_second(Utc::now().naive_utc());
        let newest = self
            .list_backups(name)?
            .first()
            .and_then(|entry| parse_backup_key(entry));
        let (taken, sequence) = match newest {
            Some((newest, sequence)) if newest >= now => (newest, sequence + 1),
            _ => (now, 0),
        };
        let mut file_stem = format!(
            "{}_{}_{:03}",
            canonical_name(name),
            taken.format(BACKUP_TIMESTAMP_FORMAT),
            sequence
        );
        if let Some(label) = sanitize_note(note) {
            file_stem.push('_');
            file_stem.push_str(&label);
        }
        Ok(format!("{}.{}", file_stem, BACKUP_EXTENSION))
    }

    /// Copies the current file aside before it is overwritten.
    fn backup_existing_file(&self, name: &str, path: &Path) -> Result<()> {
        if !path.exists() {
            return Ok(());
        }
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let file_name = self.next_backup_file_name(name, None)?;
        let backup_path = dir.join(&file_name);
        if backup_path.exists() {
            return Err(FinanceError::StorageError(format!(
                "backup `{}` already exists",
                file_name
            )));
        }
        fs::copy(path, &backup_path)?;
        self.prune_backups(name, &file_name)
    }

    /// Removes backups beyond the retention count, never touching `latest`.
    fn prune_backups(&self, name: &str, latest: &str) -> Result<()> {
        let older = self
            .list_backups(name)?
            .into_iter()
            .filter(|entry| entry != latest);
        for entry in older.skip(self.retention.saturating_sub(1)) {
            debug!(backup = %entry, "pruning old backup");
            fs::remove_file(self.backup_path(name, &entry))?;
        }
        Ok(())
    }
}

impl StorageBackend for JsonStorage {
    fn save(&self, book: &RuleBook, name: &str) -> Result<()> {
        let path = self.book_path(name);
        self.backup_existing_file(name, &path)?;
        save_book_to_path(book, &path)?;
        info!(
            book = %name,
            rules = book.rules.len(),
            transactions = book.transactions.len(),
            "rule book saved"
        );
        Ok(())
    }

    fn load(&self, name: &str) -> Result<RuleBook> {
        let path = self.book_path(name);
        if !path.exists() {
            return Err(FinanceError::StorageError(format!(
                "rule book `{}` not found",
                name
            )));
        }
        load_book_from_path(&path)
    }

    fn list_backups(&self, name: &str) -> Result<Vec<String>> {
        let dir = self.backup_dir(name);
        if !dir.exists() {
            return Ok(Vec::new());
        }
        let mut entries = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().and_then(|ext| ext.to_str()) != Some(BACKUP_EXTENSION) {
                continue;
            }
            if let Some(file_name) = path.file_name().and_then(|file| file.to_str()) {
                entries.push(file_name.to_string());
            }
        }
        entries.sort_by(|a, b| {
            parse_backup_key(b)
                .cmp(&parse_backup_key(a))
                .then_with(|| b.cmp(a))
        });
        Ok(entries)
    }

    fn backup(&self, book: &RuleBook, name: &str, note: Option<&str>) -> Result<String> {
        let dir = self.backup_dir(name);
        ensure_dir(&dir)?;
        let file_name = self.next_backup_file_name(name, note)?;
        write_json_atomic(book, &dir.join(&file_name))?;
        self.prune_backups(name, &file_name)?;
        Ok(file_name)
    }

    fn restore(&self, name: &str, backup_name: &str) -> Result<RuleBook> {
        let backup_path = self.backup_path(name, backup_name);
        if !backup_path.exists() {
            return Err(FinanceError::StorageError(format!(
                "backup `{}` not found",
                backup_name
            )));
        }
        let book = load_book_from_path(&backup_path)?;
        save_book_to_path(&book, &self.book_path(name))?;
        info!(book = %name, backup = %backup_name, "rule book restored");
        Ok(book)
    }
}

pub fn save_book_to_path(book: &RuleBook, path: &Path) -> Result<()> {
    write_json_atomic(book, path)
}

pub fn load_book_from_path(path: &Path) -> Result<RuleBook> {
    read_json(path)
}

fn canonical_name(name: &str) -> String {
    let sanitized: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| match c {
            'a'..='z' | '0'..='9' => c,
            _ => '_',
        })
        .collect();
    if sanitized.trim_matches('_').is_empty() {
        "book".into()
    } else {
        sanitized
    }
}

fn sanitize_note(note: Option<&str>) -> Option<String> {
    let raw = note?.trim();
    let mut sanitized = String::new();
    let mut last_dash = false;
    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            sanitized.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if (ch.is_whitespace() || matches!(ch, '-' | '.' | '_'))
            && !sanitized.is_empty()
            && !last_dash
        {
            sanitized.push('-');
            last_dash = true;
        }
    }
    let trimmed = sanitized.trim_matches('-');
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Reads the `YYYYmmdd_HHMMSS` stamp and sequence number from a backup file
/// name, with or without a trailing note.
fn parse_backup_key(name: &str) -> Option<(NaiveDateTime, u32)> {
    let stem = name.strip_suffix(&format!(".{}", BACKUP_EXTENSION))?;
    let parts: Vec<&str> = stem.split('_').collect();
    // Notes never contain underscores, so the key ends the stem or sits just before the note.
    let candidates = [parts.len().checked_sub(3), parts.len().checked_sub(4)];
    candidates.into_iter().flatten().find_map(|idx| {
        let date_part = parts.get(idx)?;
        let time_part = parts.get(idx + 1)?;
        let sequence_part = parts.get(idx + 2)?;
        if !is_digits(date_part, 8) || !is_digits(time_part, 6) || !is_sequence(sequence_part) {
            return None;
        }
        let taken =
            NaiveDateTime::parse_from_str(&format!("{}{}", date_part, time_part), "%Y%m%d%H%M%S")
                .ok()?;
        Some((taken, sequence_part.parse().ok()?))
    })
}

fn truncate_to_second(stamp: NaiveDateTime) -> NaiveDateTime {
    stamp.with_nanosecond(0).unwrap_or(stamp)
}

fn is_digits(value: &str, len: usize) -> bool {
    value.len() == len && value.chars().all(|c| c.is_ascii_digit())
}

fn is_sequence(value: &str) -> bool {
    value.len() >= 3 && value.chars().all(|c| c.is_ascii_digit())
}
