//! The bundled, read-only dataset that every journal starts from.

use crate::model::{Category, Record};
use crate::Result;
use anyhow::Context;

const SPENDING_DATA: &str = include_str!("../data/spending_data.json");
const CATEGORY_DATA: &str = include_str!("../data/category_data.json");

/// Seed records and categories. Custom entries are merged after these at load time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Seed {
    records: Vec<Record>,
    categories: Vec<Category>,
}

impl Seed {
    pub fn new(records: Vec<Record>, categories: Vec<Category>) -> Self {
        Self {
            records,
            categories,
        }
    }

    /// Parses the dataset compiled into the binary.
    pub fn bundled() -> Result<Self> {
        let records = serde_json::from_str(SPENDING_DATA)
            .context("Failed to parse the bundled spending data")?;
        let categories = serde_json::from_str(CATEGORY_DATA)
            .context("Failed to parse the bundled category data")?;
        Ok(Self::new(records, categories))
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }
}
