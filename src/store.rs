//! Persistence for the user's custom records and categories.
//!
//! The `Store` trait is the only way the rest of the crate reaches persisted state. `JsonStore`
//! keeps each collection as a JSON blob in the spendlog home; `MemoryStore` keeps them in memory.

use crate::backup::{self, Backup};
use crate::model::{Category, Record};
use crate::{utils, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing::trace;

/// Loads and saves the custom (non-seed) records and categories.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    async fn load_records(&self) -> Result<Vec<Record>>;
    async fn save_records(&self, records: &[Record]) -> Result<()>;
    async fn load_categories(&self) -> Result<Vec<Category>>;
    async fn save_categories(&self, categories: &[Category]) -> Result<()>;
}

/// A `Store` backed by two JSON files. A missing file loads as an empty collection.
#[derive(Debug, Clone)]
pub struct JsonStore {
    records_path: PathBuf,
    categories_path: PathBuf,
    backup: Option<Backup>,
}

impl JsonStore {
    pub fn new(records_path: impl Into<PathBuf>, categories_path: impl Into<PathBuf>) -> Self {
        Self {
            records_path: records_path.into(),
            categories_path: categories_path.into(),
            backup: None,
        }
    }

    /// Snapshot the previous contents of a file into `backup` before each save.
    pub fn with_backup(mut self, backup: Backup) -> Self {
        self.backup = Some(backup);
        self
    }

    pub fn records_path(&self) -> &Path {
        &self.records_path
    }

    pub fn categories_path(&self) -> &Path {
        &self.categories_path
    }

    async fn load<T>(path: &Path) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
    {
        if !path.is_file() {
            trace!("{} does not exist, loading nothing", path.display());
            return Ok(Vec::new());
        }
        utils::deserialize(path).await
    }

    async fn save<T>(&self, prefix: &str, path: &Path, data: &[T]) -> Result<()>
    where
        T: Serialize + DeserializeOwned + Sync,
    {
        if let Some(backup) = &self.backup {
            let previous: Vec<T> = Self::load(path).await?;
            if !previous.is_empty() {
                backup.save_json(prefix, &previous).await?;
            }
        }
        let json = serde_json::to_string_pretty(data)?;
        utils::write(path, json).await
    }
}

#[async_trait::async_trait]
impl Store for JsonStore {
    async fn load_records(&self) -> Result<Vec<Record>> {
        Self::load(&self.records_path).await
    }

    async fn save_records(&self, records: &[Record]) -> Result<()> {
        self.save(backup::RECORDS, &self.records_path, records)
            .await
    }

    async fn load_categories(&self) -> Result<Vec<Category>> {
        Self::load(&self.categories_path).await
    }

    async fn save_categories(&self, categories: &[Category]) -> Result<()> {
        self.save(backup::CATEGORIES, &self.categories_path, categories)
            .await
    }
}

/// A `Store` that keeps everything in memory.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: Mutex<Vec<Record>>,
    categories: Mutex<Vec<Category>>,
}

impl MemoryStore {
    pub fn new(records: Vec<Record>, categories: Vec<Category>) -> Self {
        Self {
            records: Mutex::new(records),
            categories: Mutex::new(categories),
        }
    }
}

fn lock<T: Clone>(m: &Mutex<Vec<T>>) -> Vec<T> {
    match m.lock() {
        Ok(guard) => guard.clone(),
        Err(poisoned) => poisoned.into_inner().clone(),
    }
}

fn replace<T: Clone>(m: &Mutex<Vec<T>>, data: &[T]) {
    let mut guard = match m.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    *guard = data.to_vec();
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn load_records(&self) -> Result<Vec<Record>> {
        Ok(lock(&self.records))
    }

    async fn save_records(&self, records: &[Record]) -> Result<()> {
        replace(&self.records, records);
        Ok(())
    }

    async fn load_categories(&self) -> Result<Vec<Category>> {
        Ok(lock(&self.categories))
    }

    async fn save_categories(&self, categories: &[Category]) -> Result<()> {
        replace(&self.categories, categories);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Amount;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;
    use std::str::FromStr;
    use tempfile::TempDir;

    fn record(id: u64) -> Record {
        Record::new(
            id,
            "Food",
            "Lunch",
            Amount::new(Decimal::from(120)),
            NaiveDate::from_ymd_opt(2024, 3, 5).unwrap(),
        )
    }

    #[tokio::test]
    async fn test_json_store_missing_files_load_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(
            dir.path().join("records.json"),
            dir.path().join("categories.json"),
        );
        assert!(store.load_records().await.unwrap().is_empty());
        assert!(store.load_categories().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_json_store_save_then_load() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(
            dir.path().join("records.json"),
            dir.path().join("categories.json"),
        );
        store.save_records(&[record(16), record(17)]).await.unwrap();
        store
            .save_categories(&[Category::custom(8, "Pets")])
            .await
            .unwrap();

        let records = store.load_records().await.unwrap();
        assert_eq!(records, vec![record(16), record(17)]);
        let categories = store.load_categories().await.unwrap();
        assert_eq!(categories[0].name(), "Pets");
    }

    #[tokio::test]
    async fn test_json_store_corrupt_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let records_path = dir.path().join("records.json");
        std::fs::write(&records_path, "not json").unwrap();
        let store = JsonStore::new(records_path, dir.path().join("categories.json"));
        let err = store.load_records().await.unwrap_err();
        assert!(err.to_string().contains("Failed to parse JSON file"));
    }

    #[tokio::test]
    async fn test_json_store_snapshots_previous_contents() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::new(dir.path(), 5);
        let store = JsonStore::new(
            dir.path().join("records.json"),
            dir.path().join("categories.json"),
        )
        .with_backup(backup.clone());

        store.save_records(&[record(16)]).await.unwrap();
        assert!(backup.list(backup::RECORDS).await.unwrap().is_empty());

        store.save_records(&[record(16), record(17)]).await.unwrap();
        let snapshots = backup.list(backup::RECORDS).await.unwrap();
        assert_eq!(snapshots.len(), 1);
        let saved: Vec<Record> =
            utils::deserialize(&dir.path().join(&snapshots[0])).await.unwrap();
        assert_eq!(saved, vec![record(16)]);
    }

    #[tokio::test]
    async fn test_json_store_amounts_are_not_rounded() {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::new(
            dir.path().join("records.json"),
            dir.path().join("categories.json"),
        );
        let date = NaiveDate::from_ymd_opt(2024, 3, 5).unwrap();
        let records: Vec<Record> = ["0.004", "12.345", "99.99"]
            .into_iter()
            .enumerate()
            .map(|(ix, s)| {
                let amount = Amount::new(Decimal::from_str(s).unwrap());
                Record::new(ix as u64 + 16, "Food", "", amount, date)
            })
            .collect();
        store.save_records(&records).await.unwrap();

        let json = std::fs::read_to_string(store.records_path()).unwrap();
        assert!(json.contains("\"amount\": \"0.004\""), "{json}");
        assert!(json.contains("\"amount\": \"12.345\""), "{json}");
        assert_eq!(store.load_records().await.unwrap(), records);
        assert!(store.load_records().await.unwrap()[0].amount().is_positive());
    }

    #[tokio::test]
    async fn test_memory_store() {
        let store = MemoryStore::default();
        store.save_records(&[record(1)]).await.unwrap();
        assert_eq!(store.load_records().await.unwrap(), vec![record(1)]);
    }
}
