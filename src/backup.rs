//! Rotating JSON snapshots of the persisted journal, taken before it is overwritten.

use crate::{utils, Result};
use anyhow::Context;
use chrono::Local;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Prefix for snapshots of the custom records.
pub const RECORDS: &str = "records";

/// Prefix for snapshots of the custom categories.
pub const CATEGORIES: &str = "categories";

/// Writes snapshot files named `{prefix}.YYYY-MM-DD-NNN.json` and keeps at most `backup_copies`
/// of them per prefix.
#[derive(Debug, Clone)]
pub struct Backup {
    backups_dir: PathBuf,
    backup_copies: u32,
}

impl Backup {
    pub fn new(backups_dir: impl Into<PathBuf>, backup_copies: u32) -> Self {
        Self {
            backups_dir: backups_dir.into(),
            backup_copies,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.backups_dir
    }

    /// Saves `data` as pretty-printed JSON and returns the path of the new snapshot.
    pub async fn save_json<T>(&self, prefix: &str, data: &T) -> Result<PathBuf>
    where
        T: Serialize + ?Sized,
    {
        let date = Local::now().format("%Y-%m-%d").to_string();
        let seq = self.next_sequence_number(prefix, &date).await?;
        let path = self.backups_dir.join(format!("{prefix}.{date}-{seq:03}.json"));

        let json = serde_json::to_string_pretty(data)
            .with_context(|| format!("Failed to serialize the {prefix} snapshot"))?;
        utils::write(&path, json).await?;
        debug!("Saved backup to {}", path.display());

        self.rotate(prefix).await?;
        Ok(path)
    }

    /// Lists the snapshot file names for `prefix`, oldest first.
    pub async fn list(&self, prefix: &str) -> Result<Vec<String>> {
        let mut names = Vec::new();
        let mut dir = utils::read_dir(&self.backups_dir).await?;
        while let Some(entry) = dir
            .next_entry()
            .await
            .context("Failed to read directory entry")?
        {
            let name = entry.file_name().to_string_lossy().to_string();
            if is_backup_file(&name, prefix) {
                names.push(name);
            }
        }
        // The name format sorts by date, then sequence number
        names.sort();
        Ok(names)
    }

    async fn next_sequence_number(&self, prefix: &str, date: &str) -> Result<u32> {
        let max_seq = self
            .list(prefix)
            .await?
            .iter()
            .filter_map(|name| parse_sequence_number(name, prefix, date))
            .max()
            .unwrap_or(0);
        Ok(max_seq + 1)
    }

    async fn rotate(&self, prefix: &str) -> Result<()> {
        let names = self.list(prefix).await?;
        let to_delete = names.len().saturating_sub(self.backup_copies as usize);
        for name in names.into_iter().take(to_delete) {
            utils::remove(&self.backups_dir.join(name)).await?;
        }
        Ok(())
    }
}

/// Parses `NNN` out of `{prefix}.{date}-NNN.json`.
fn parse_sequence_number(filename: &str, prefix: &str, date: &str) -> Option<u32> {
    filename
        .strip_prefix(&format!("{prefix}.{date}-"))?
        .strip_suffix(".json")?
        .parse()
        .ok()
}

fn is_backup_file(filename: &str, prefix: &str) -> bool {
    filename
        .strip_prefix(&format!("{prefix}."))
        .and_then(|rest| rest.strip_suffix(".json"))
        .and_then(|stem| stem.rsplit_once('-'))
        .is_some_and(|(date, seq)| {
            date.len() == 10 && !seq.is_empty() && seq.chars().all(|c| c.is_ascii_digit())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_parse_sequence_number() {
        assert_eq!(
            parse_sequence_number("records.2025-12-14-001.json", "records", "2025-12-14"),
            Some(1)
        );
        assert_eq!(
            parse_sequence_number("records.2025-12-14-042.json", "records", "2025-12-14"),
            Some(42)
        );
        assert_eq!(
            parse_sequence_number("categories.2025-12-14-001.json", "records", "2025-12-14"),
            None
        );
        assert_eq!(
            parse_sequence_number("records.2025-12-13-001.json", "records", "2025-12-14"),
            None
        );
    }

    #[test]
    fn test_is_backup_file() {
        assert!(is_backup_file("records.2025-12-14-001.json", RECORDS));
        assert!(!is_backup_file("records.2025-12-14-001.json", CATEGORIES));
        assert!(!is_backup_file("records.json", RECORDS));
        assert!(!is_backup_file("records.json.tmp", RECORDS));
    }

    #[tokio::test]
    async fn test_save_json_rotates() {
        let dir = TempDir::new().unwrap();
        let backup = Backup::new(dir.path(), 2);
        for i in 0..4 {
            backup.save_json(RECORDS, &vec![i]).await.unwrap();
        }
        backup.save_json(CATEGORIES, &vec!["Food"]).await.unwrap();

        let records = backup.list(RECORDS).await.unwrap();
        assert_eq!(records.len(), 2);
        assert!(records[0].ends_with("-003.json"), "{records:?}");
        assert!(records[1].ends_with("-004.json"), "{records:?}");
        assert_eq!(backup.list(CATEGORIES).await.unwrap().len(), 1);
    }
}
