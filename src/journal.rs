//! The spending journal: the seed dataset merged with the user's custom records and categories.
//!
//! Only custom entries are ever written back to the `Store`. Seed entries are read-only.

use crate::model::{Amount, Category, Record};
use crate::seed::Seed;
use crate::store::Store;
use crate::Result;
use anyhow::{bail, ensure};
use chrono::NaiveDate;
use std::collections::HashSet;
use tracing::{debug, info};

/// The fields a user supplies for a new record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecord {
    pub category: String,
    pub description: String,
    pub amount: Amount,
    pub date: NaiveDate,
}

pub struct Journal<S: Store> {
    store: S,
    seed: Seed,
    custom_records: Vec<Record>,
    custom_categories: Vec<Category>,
    /// Seed records followed by custom records.
    records: Vec<Record>,
    /// Seed categories followed by custom categories.
    categories: Vec<Category>,
}

impl<S: Store> Journal<S> {
    /// Loads the custom entries from `store` and merges them after `seed`.
    pub async fn load(store: S, seed: Seed) -> Result<Self> {
        let custom_records = store.load_records().await?;
        let custom_categories = store.load_categories().await?;
        debug!(
            "Loaded {} custom records and {} custom categories",
            custom_records.len(),
            custom_categories.len()
        );
        let mut journal = Self {
            store,
            seed,
            custom_records,
            custom_categories,
            records: Vec::new(),
            categories: Vec::new(),
        };
        journal.merge();
        Ok(journal)
    }

    fn merge(&mut self) {
        self.records = self
            .seed
            .records()
            .iter()
            .chain(&self.custom_records)
            .cloned()
            .collect();
        self.categories = self
            .seed
            .categories()
            .iter()
            .chain(&self.custom_categories)
            .cloned()
            .collect();
    }

    /// Every record, seed first.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Every category, seed first.
    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    /// Every category, sorted by name.
    pub fn categories_by_name(&self) -> Vec<Category> {
        let mut sorted = self.categories.clone();
        sorted.sort_by(|a, b| a.name().cmp(b.name()));
        sorted
    }

    pub fn custom_records(&self) -> &[Record] {
        &self.custom_records
    }

    pub fn has_category(&self, name: &str) -> bool {
        self.categories.iter().any(|c| c.name() == name)
    }

    fn is_seed_record(&self, id: u64) -> bool {
        self.seed.records().iter().any(|r| r.id() == id)
    }

    /// Adds a record and persists the custom records.
    ///
    /// The category must be known and the amount must be greater than zero.
    pub async fn add_record(&mut self, new: NewRecord) -> Result<Record> {
        let category = new.category.trim();
        ensure!(!category.is_empty(), "A category is required");
        ensure!(
            self.has_category(category),
            "Unknown category '{category}'. Add it first with `spendlog category add`"
        );
        ensure!(
            new.amount.is_positive(),
            "The amount must be greater than zero, got {}",
            new.amount
        );

        let id = self.records.iter().map(Record::id).max().unwrap_or(0) + 1;
        let record = Record::new(
            id,
            category,
            new.description.trim(),
            new.amount,
            new.date,
        );

        let mut custom = self.custom_records.clone();
        custom.push(record.clone());
        self.store.save_records(&custom).await?;
        self.custom_records = custom;
        self.merge();
        info!("Added record {id} of {} to {category}", record.amount());
        Ok(record)
    }

    /// Deletes custom records by id. Either every id is deleted or none are.
    pub async fn delete_records(&mut self, ids: &[u64]) -> Result<Vec<u64>> {
        ensure!(!ids.is_empty(), "No record ids were given");
        for id in ids {
            if self.is_seed_record(*id) {
                bail!("Record {id} is part of the bundled dataset and cannot be deleted");
            }
            if !self.custom_records.iter().any(|r| r.id() == *id) {
                bail!("Record not found: {id}");
            }
        }

        let doomed: HashSet<u64> = ids.iter().copied().collect();
        let remaining: Vec<Record> = self
            .custom_records
            .iter()
            .filter(|r| !doomed.contains(&r.id()))
            .cloned()
            .collect();
        self.store.save_records(&remaining).await?;
        self.custom_records = remaining;
        self.merge();

        let mut deleted: Vec<u64> = doomed.into_iter().collect();
        deleted.sort_unstable();
        Ok(deleted)
    }

    /// Adds a custom category and persists the custom categories.
    pub async fn add_category(&mut self, name: &str) -> Result<Category> {
        let name = name.trim();
        ensure!(!name.is_empty(), "A category name is required");
        ensure!(
            !self.has_category(name),
            "The category '{name}' already exists"
        );

        let id = self.categories.iter().map(Category::id).max().unwrap_or(0) + 1;
        let category = Category::custom(id, name);

        let mut custom = self.custom_categories.clone();
        custom.push(category.clone());
        self.store.save_categories(&custom).await?;
        self.custom_categories = custom;
        self.merge();
        info!("Added category '{name}'");
        Ok(category)
    }
}
