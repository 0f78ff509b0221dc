use crate::commands::Out;
use crate::error::{ErrorType, IntoResult};
use crate::{Config, Result};
use anyhow::Context;
use std::path::Path;

/// Creates the spendlog home directory, its `.backups` subdirectory and an initial `config.json`
/// with default settings.
///
/// # Arguments
/// - `spendlog_home` - The directory that will be the root of the data, e.g. `$HOME/spendlog`
///
/// # Errors
/// - Returns an error if the directory has already been initialized.
/// - Returns an error if any file operations fail.
pub async fn init(spendlog_home: &Path) -> Result<Out<()>> {
    let config = Config::create(spendlog_home)
        .await
        .context("Unable to create the spendlog directory and config")
        .pub_result(ErrorType::Config)?;
    Ok(format!(
        "Successfully created the spendlog directory at {}",
        config.root().display()
    )
    .into())
}
