//! Text renderings of journal data: markdown tables for people, JSON and CSV for other programs.

use crate::engine::{Aggregate, BucketReport};
use crate::model::{Amount, Category, Granularity, Record};
use crate::summary::Summary;
use crate::Result;
use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format for the listing and reporting commands.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// A markdown table.
    #[default]
    Table,
    /// Pretty-printed JSON.
    Json,
    /// Comma-separated values with a header row.
    Csv,
}

serde_plain::derive_display_from_serialize!(Format);
serde_plain::derive_fromstr_from_deserialize!(Format);

impl Format {
    /// Tables show `symbol` and thousands separators. CSV shows plain numbers.
    fn money(self, amount: Amount, symbol: &str) -> String {
        match self {
            Format::Table => amount.display_with(symbol),
            _ => amount.to_string(),
        }
    }
}

#[derive(Tabled, Serialize)]
struct RecordRow {
    id: u64,
    date: NaiveDate,
    category: String,
    amount: String,
    description: String,
}

#[derive(Tabled, Serialize)]
struct CategoryRow {
    id: u64,
    category: String,
    description: String,
}

#[derive(Tabled, Serialize)]
struct BreakdownRow {
    category: String,
    amount: String,
    count: usize,
    percentage: String,
}

fn markdown<T: Tabled>(rows: &[T]) -> String {
    Table::new(rows).with(Style::markdown()).to_string()
}

fn csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    for row in rows {
        writer.serialize(row).context("Unable to write CSV row")?;
    }
    finish_csv(writer)
}

fn finish_csv(writer: csv::Writer<Vec<u8>>) -> Result<String> {
    let bytes = writer.into_inner().context("Unable to flush CSV output")?;
    String::from_utf8(bytes).context("CSV output is not valid UTF-8")
}

fn json<T: Serialize + ?Sized>(data: &T) -> Result<String> {
    serde_json::to_string_pretty(data).context("Unable to serialize output as JSON")
}

/// Renders `rows` as a table or CSV, or `data` as JSON.
fn render<R, T>(format: Format, rows: &[R], data: &T) -> Result<String>
where
    R: Tabled + Serialize,
    T: Serialize + ?Sized,
{
    match format {
        Format::Table => Ok(markdown(rows)),
        Format::Csv => csv(rows),
        Format::Json => json(data),
    }
}

/// Renders journal records. JSON keeps the exact stored amounts.
pub fn records(records: &[Record], format: Format, symbol: &str) -> Result<String> {
    let rows: Vec<RecordRow> = records
        .iter()
        .map(|r| RecordRow {
            id: r.id(),
            date: r.date(),
            category: r.category().to_string(),
            amount: format.money(r.amount(), symbol),
            description: r.description().to_string(),
        })
        .collect();
    render(format, &rows, records)
}

pub fn categories(categories: &[Category], format: Format) -> Result<String> {
    let rows: Vec<CategoryRow> = categories
        .iter()
        .map(|c| CategoryRow {
            id: c.id(),
            category: c.name().to_string(),
            description: c.description().to_string(),
        })
        .collect();
    render(format, &rows, categories)
}

/// Renders chart buckets. Grouped buckets get one column per category, in `categories` order.
pub fn buckets(
    report: &BucketReport,
    categories: &[Category],
    format: Format,
    symbol: &str,
) -> Result<String> {
    if format == Format::Json {
        return json(report.buckets());
    }

    let grouped = matches!(
        report.buckets().first().map(|b| b.aggregate()),
        Some(Aggregate::ByCategory { .. })
    );
    let headers: Vec<String> = if grouped {
        std::iter::once("period")
            .chain(categories.iter().map(Category::name))
            .map(String::from)
            .collect()
    } else {
        ["period", "amount", "count"].map(String::from).to_vec()
    };
    let rows: Vec<Vec<String>> = report
        .buckets()
        .iter()
        .map(|bucket| {
            let mut row = vec![bucket.period().to_string()];
            match bucket.aggregate() {
                Aggregate::Total { amount, count } => {
                    row.push(format.money(*amount, symbol));
                    row.push(count.to_string());
                }
                Aggregate::ByCategory { .. } => row.extend(categories.iter().map(|c| {
                    let amount = bucket.aggregate().category_amount(c.name());
                    format.money(amount.unwrap_or_default(), symbol)
                })),
            }
            row
        })
        .collect();

    if format == Format::Csv {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&headers)
            .context("Unable to write CSV header")?;
        for row in &rows {
            writer.write_record(row).context("Unable to write CSV row")?;
        }
        return finish_csv(writer);
    }

    let mut builder = Builder::default();
    builder.push_record(headers);
    for row in rows {
        builder.push_record(row);
    }
    Ok(builder.build().with(Style::markdown()).to_string())
}

/// Renders the dashboard summary. The table and CSV forms show the category breakdown; the
/// totals are part of the JSON form and the table heading.
pub fn summary(summary: &Summary, format: Format, symbol: &str) -> Result<String> {
    let rows: Vec<BreakdownRow> = summary
        .breakdown
        .iter()
        .map(|t| BreakdownRow {
            category: t.name.clone(),
            amount: format.money(t.value, symbol),
            count: t.count,
            percentage: format!("{:.1}", t.percentage),
        })
        .collect();
    if format != Format::Table {
        return render(format, &rows, summary);
    }

    let scope = match (summary.granularity, summary.reference) {
        (Granularity::AllTime, _) => "all time".to_string(),
        (_, Some(reference)) => reference.to_string(),
        (_, None) => "this month".to_string(),
    };
    Ok(format!(
        "Total spending (all time): {}\nTotal ({}): {}\n\nSpending by category, {scope}\n\n{}",
        summary.total_all_time.display_with(symbol),
        summary.granularity,
        summary.total_filtered.display_with(symbol),
        markdown(&rows)
    ))
}
