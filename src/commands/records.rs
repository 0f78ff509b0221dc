//! Handlers for adding, deleting and listing records.

use crate::args::{AddArgs, DeleteArgs, ListArgs};
use crate::commands::{open_journal, plural, today, Out};
use crate::error::{ErrorType, IntoResult};
use crate::journal::NewRecord;
use crate::model::Record;
use crate::{render, Config, Result};
use chrono::NaiveDate;

/// Records a new expense. Without `--date` the expense is dated today.
///
/// # Errors
/// - Returns an error if the category is unknown or the amount is not positive.
/// - Returns an error if the custom records cannot be saved.
pub async fn add(config: Config, args: AddArgs) -> Result<Out<Record>> {
    add_at(config, args, today()).await
}

/// `add`, with `today` supplied by the caller.
pub async fn add_at(config: Config, args: AddArgs, today: NaiveDate) -> Result<Out<Record>> {
    let mut journal = open_journal(&config).await?;
    let record = journal
        .add_record(NewRecord {
            category: args.category,
            description: args.description.unwrap_or_default(),
            amount: args.amount,
            date: args.date.unwrap_or(today),
        })
        .await
        .pub_result(ErrorType::Request)?;
    let message = format!(
        "Added record {} of {} to {} on {}",
        record.id(),
        record.amount().display_with(config.currency_symbol()),
        record.category(),
        record.date()
    );
    Ok(Out::new(message, record))
}

/// Deletes custom records by ID. Either every ID is deleted or none are.
///
/// # Errors
/// - Returns an error if any ID is unknown or belongs to the bundled dataset.
/// - Returns an error if the custom records cannot be saved.
pub async fn delete(config: Config, args: DeleteArgs) -> Result<Out<Vec<u64>>> {
    let mut journal = open_journal(&config).await?;
    let deleted = journal
        .delete_records(args.ids())
        .await
        .pub_result(ErrorType::Request)?;
    Ok(Out::new(
        format!("Deleted {}", plural(deleted.len(), "record", "records")),
        deleted,
    ))
}

/// Lists every record in the journal, most recently added first.
pub async fn list(config: Config, args: ListArgs) -> Result<Out<Vec<Record>>> {
    let journal = open_journal(&config).await?;
    let mut records = journal.records().to_vec();
    records.sort_by(|a, b| b.id().cmp(&a.id()));
    let display = render::records(&records, args.format, config.currency_symbol())
        .pub_result(ErrorType::Request)?;
    Ok(Out::new(format!("Found {}", plural(records.len(), "record", "records")), records)
        .with_display(display))
}
