//! Command handlers for the spendlog CLI.
//!
//! This module contains implementations for all CLI subcommands. Handlers that depend on the
//! current date have an `_at` variant taking `today` explicitly.

mod category;
mod init;
mod records;
mod report;

use crate::error::{ErrorType, IntoResult};
use crate::journal::Journal;
use crate::seed::Seed;
use crate::store::JsonStore;
use crate::{Config, Result};
use chrono::NaiveDate;
use serde::Serialize;
use std::fmt::Debug;
use tracing::{debug, info};

pub use category::{category_add, category_list};
pub use init::init;
pub use records::{add, add_at, delete, list};
pub use report::{chart, chart_at, summary, summary_at};

/// The output type for a command. This allows the command to return a consistent message,
/// optionally structured data, and optionally a rendering of that data for stdout.
#[derive(Debug, Clone, Serialize)]
pub struct Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// A message that can be printed to the user regarding the outcome of the command execution.
    message: String,

    /// Any structured data that needs to be output from the call.
    structure: Option<T>,

    /// A table, JSON or CSV rendering of `structure` meant for stdout.
    #[serde(skip)]
    display: Option<String>,
}

impl<T, S> From<S> for Out<T>
where
    T: Debug + Clone + Serialize,
    S: Into<String>,
{
    fn from(value: S) -> Self {
        Out::new_message(value)
    }
}

impl<T> Out<T>
where
    T: Serialize + Clone + Debug,
{
    /// Create a new `Out` object that has `Some(structure)`.
    pub fn new<S>(message: S, structure: T) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: Some(structure),
            display: None,
        }
    }

    /// Create a new `Out` object that has `None` for `structure`.
    pub fn new_message<S>(message: S) -> Self
    where
        S: Into<String>,
    {
        Self {
            message: message.into(),
            structure: None,
            display: None,
        }
    }

    /// Attach the text that `print` writes to stdout.
    pub fn with_display(mut self, display: String) -> Self {
        self.display = Some(display);
        self
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn structure(&self) -> Option<&T> {
        self.structure.as_ref()
    }

    pub fn display(&self) -> Option<&str> {
        self.display.as_deref()
    }

    /// Print the message to `info!`, the display text (if any) to stdout and the structured data
    /// (if it exists) as JSON to `debug!`.
    pub fn print(&self) {
        info!("{}", self.message);
        if let Some(display) = self.display() {
            println!("{display}");
        }
        if let Some(structure) = self.structure() {
            if let Ok(json) = serde_json::to_string_pretty(structure) {
                debug!("Command output:\n\n{json}\n\n");
            }
        }
    }
}

/// The local calendar date.
pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Loads the journal for the spendlog home described by `config`.
async fn open_journal(config: &Config) -> Result<Journal<JsonStore>> {
    let seed = Seed::bundled().pub_result(ErrorType::Store)?;
    Journal::load(config.store(), seed)
        .await
        .pub_result(ErrorType::Store)
}

fn plural(count: usize, one: &str, many: &str) -> String {
    format!("{count} {}", if count == 1 { one } else { many })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_from_message() {
        let out: Out<()> = "done".into();
        assert_eq!(out.message(), "done");
        assert!(out.structure().is_none());
        assert!(out.display().is_none());
    }

    #[test]
    fn test_out_display_is_not_serialized() {
        let out = Out::new("one", vec![1]).with_display("| x |".to_string());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json, serde_json::json!({"message": "one", "structure": [1]}));
        assert_eq!(out.display(), Some("| x |"));
    }

    #[test]
    fn test_plural() {
        assert_eq!(plural(1, "record", "records"), "1 record");
        assert_eq!(plural(0, "category", "categories"), "0 categories");
    }
}
