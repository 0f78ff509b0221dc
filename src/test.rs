//! Shared test utilities for creating test environments.
//!
//! This module is only compiled when running tests (`#[cfg(test)]`).

use crate::journal::{Journal, NewRecord};
use crate::model::{Amount, Record};
use crate::seed::Seed;
use crate::store::Store;
use crate::Config;
use chrono::NaiveDate;
use std::str::FromStr;
use tempfile::TempDir;

/// Test environment that sets up an initialized spendlog home directory.
/// Holds TempDir to keep the directory alive for the duration of the test.
pub struct TestEnv {
    _temp_dir: TempDir,
    config: Config,
}

impl TestEnv {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let config = Config::create(temp_dir.path().join("spendlog"))
            .await
            .unwrap();
        Self {
            _temp_dir: temp_dir,
            config,
        }
    }

    /// Returns a clone of the Config.
    pub fn config(&self) -> Config {
        self.config.clone()
    }

    /// The custom records as currently persisted in `records.json`.
    pub async fn custom_records(&self) -> Vec<Record> {
        self.config.store().load_records().await.unwrap()
    }

    /// Adds a custom record through the journal, bypassing the command layer.
    pub async fn add_record(&self, category: &str, amount: &str, date: NaiveDate) -> Record {
        let mut journal = Journal::load(self.config.store(), Seed::bundled().unwrap())
            .await
            .unwrap();
        journal
            .add_record(NewRecord {
                category: category.to_string(),
                description: String::new(),
                amount: Amount::from_str(amount).unwrap(),
                date,
            })
            .await
            .unwrap()
    }
}
