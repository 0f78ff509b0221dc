//! Dashboard figures that sit next to the time-series chart: totals, the per-category breakdown
//! and the years present in the journal.

use crate::engine::keys;
use crate::model::{Amount, Granularity, Record, ReferencePeriod};
use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

/// One slice of the category breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryTotal {
    pub name: String,
    pub value: Amount,
    pub count: usize,
    /// Share of the breakdown's grand total, in percent, to one decimal place.
    pub percentage: Decimal,
}

/// Everything the dashboard shows besides the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub granularity: Granularity,
    pub reference: Option<ReferencePeriod>,
    pub total_all_time: Amount,
    /// Total of the records selected by the time filter.
    pub total_filtered: Amount,
    pub breakdown: Vec<CategoryTotal>,
    pub years: Vec<i32>,
}

/// Sum of every record's amount.
pub fn total<'a>(records: impl IntoIterator<Item = &'a Record>) -> Amount {
    records.into_iter().map(Record::amount).sum()
}

/// Selects the records the dashboard's "filtered" total covers.
///
/// `Daily` keeps records dated `today`, `Weekly` the Sunday-start week containing `today`,
/// `Monthly` the reference month (or the current month without one), and `AllTime` everything.
pub fn filter_by_time<'a>(
    records: &'a [Record],
    granularity: Granularity,
    reference: Option<ReferencePeriod>,
    today: NaiveDate,
) -> Vec<&'a Record> {
    let week = keys::week_start(today);
    let month = reference.unwrap_or_else(|| ReferencePeriod::containing(today));
    records
        .iter()
        .filter(|r| match granularity {
            Granularity::AllTime => true,
            Granularity::Daily => r.date() == today,
            Granularity::Weekly => keys::week_start(r.date()) == week,
            Granularity::Monthly => month.contains(r.date()),
        })
        .collect()
}

/// Per-category totals, largest first. Ties keep first-seen order.
pub fn category_totals<'a>(records: impl IntoIterator<Item = &'a Record>) -> Vec<CategoryTotal> {
    let mut order: Vec<&str> = Vec::new();
    let mut sums: HashMap<&str, (Amount, usize)> = HashMap::new();
    for record in records {
        let entry = sums.entry(record.category()).or_insert_with(|| {
            order.push(record.category());
            (Amount::ZERO, 0)
        });
        entry.0 += record.amount();
        entry.1 += 1;
    }

    let grand_total: Amount = sums.values().map(|(value, _)| *value).sum();
    let mut totals: Vec<CategoryTotal> = order
        .into_iter()
        .map(|name| {
            let (value, count) = sums[name];
            CategoryTotal {
                name: name.to_string(),
                value,
                count,
                percentage: percentage(value, grand_total),
            }
        })
        .collect();
    totals.sort_by(|a, b| b.value.cmp(&a.value));
    totals
}

fn percentage(part: Amount, whole: Amount) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    (part.value() * Decimal::ONE_HUNDRED / whole.value()).round_dp(1)
}

/// Distinct years present in the records, most recent first.
pub fn years(records: &[Record]) -> Vec<i32> {
    let years: BTreeSet<i32> = records.iter().map(|r| r.date().year()).collect();
    years.into_iter().rev().collect()
}

/// Builds the dashboard summary.
///
/// The breakdown covers every record for `AllTime` and the reference month otherwise.
pub fn summarize(
    records: &[Record],
    granularity: Granularity,
    reference: Option<ReferencePeriod>,
    today: NaiveDate,
) -> Summary {
    let breakdown = match granularity {
        Granularity::AllTime => category_totals(records),
        _ => {
            let month = reference.unwrap_or_else(|| ReferencePeriod::containing(today));
            category_totals(records.iter().filter(|r| month.contains(r.date())))
        }
    };
    Summary {
        granularity,
        reference,
        total_all_time: total(records),
        total_filtered: total(filter_by_time(records, granularity, reference, today)),
        breakdown,
        years: years(records),
    }
}
